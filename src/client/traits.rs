use crate::models::{Property, PropertyDraft};
use anyhow::Result;
use async_trait::async_trait;

/// Remote property collection.
///
/// Every call has exactly two outcomes: `Ok` for a success status, `Err` for
/// any other status or a transport failure.
#[async_trait]
pub trait PropertyApi: Send + Sync {
    /// Fetch the whole collection in server order
    async fn list(&self) -> Result<Vec<Property>>;

    async fn get(&self, id: i64) -> Result<Property>;

    async fn create(&self, draft: &PropertyDraft) -> Result<()>;

    async fn update(&self, id: i64, draft: &PropertyDraft) -> Result<()>;

    async fn delete(&self, id: i64) -> Result<()>;
}
