//! In-memory REST backend for the property collection.

pub mod store;

pub use store::PropertyStore;

use crate::models::{Property, PropertyDraft};
use anyhow::{Context, Result};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info};

pub const API_PREFIX: &str = "/api/properties";

type SharedStore = Arc<PropertyStore>;

pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route(API_PREFIX, get(list_properties).post(create_property))
        .route(
            &format!("{}/:id", API_PREFIX),
            get(get_property).put(update_property).delete(delete_property),
        )
        .with_state(store)
}

/// Serve on an already bound listener until the task is dropped
pub async fn serve(listener: TcpListener, store: SharedStore) -> Result<()> {
    let addr = listener.local_addr().context("Listener has no local address")?;
    info!("Serving properties on http://{}{}", addr, API_PREFIX);

    axum::serve(listener, router(store))
        .await
        .context("HTTP server failed")
}

pub async fn bind_and_serve(bind_addr: &str, store: SharedStore) -> Result<()> {
    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    serve(listener, store).await
}

async fn list_properties(State(store): State<SharedStore>) -> Json<Vec<Property>> {
    Json(store.find_all().await)
}

async fn get_property(
    State(store): State<SharedStore>,
    Path(id): Path<i64>,
) -> Result<Json<Property>, StatusCode> {
    store
        .find_by_id(id)
        .await
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn create_property(
    State(store): State<SharedStore>,
    Json(draft): Json<PropertyDraft>,
) -> (StatusCode, Json<Property>) {
    let created = store.create(draft).await;
    debug!("Created property {}", created.id);
    (StatusCode::CREATED, Json(created))
}

async fn update_property(
    State(store): State<SharedStore>,
    Path(id): Path<i64>,
    Json(draft): Json<PropertyDraft>,
) -> Result<Json<Property>, StatusCode> {
    store
        .update(id, draft)
        .await
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn delete_property(State(store): State<SharedStore>, Path(id): Path<i64>) -> StatusCode {
    if store.delete(id).await {
        debug!("Deleted property {}", id);
    }
    StatusCode::NO_CONTENT
}
