use crate::client::traits::PropertyApi;
use crate::client::types::ApiSettings;
use crate::models::{Property, PropertyDraft};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::{debug, warn};

/// reqwest-backed client for the property REST API
pub struct HttpPropertyApi {
    client: Client,
    base_url: String,
}

impl HttpPropertyApi {
    /// Create a client with custom connection settings
    pub fn with_settings(settings: ApiSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn item_url(&self, id: i64) -> String {
        format!("{}/{}", self.base_url, id)
    }
}

/// Turn any non-success status into an error
fn ensure_ok(response: Response, what: &str) -> Result<Response> {
    let status = response.status();
    if !status.is_success() {
        warn!("{} returned status: {}", what, status);
        anyhow::bail!("{} failed: {}", what, status);
    }
    Ok(response)
}

#[async_trait]
impl PropertyApi for HttpPropertyApi {
    async fn list(&self) -> Result<Vec<Property>> {
        debug!("GET {}", self.base_url);

        let response = self
            .client
            .get(&self.base_url)
            .send()
            .await
            .context("Failed to fetch property list")?;

        let properties = ensure_ok(response, "List properties")?
            .json::<Vec<Property>>()
            .await
            .context("Failed to decode property list")?;

        debug!("Fetched {} properties", properties.len());
        Ok(properties)
    }

    async fn get(&self, id: i64) -> Result<Property> {
        let url = self.item_url(id);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch property {}", id))?;

        ensure_ok(response, "Get property")?
            .json::<Property>()
            .await
            .with_context(|| format!("Failed to decode property {}", id))
    }

    async fn create(&self, draft: &PropertyDraft) -> Result<()> {
        debug!("POST {}", self.base_url);

        let response = self
            .client
            .post(&self.base_url)
            .json(draft)
            .send()
            .await
            .context("Failed to send create request")?;

        ensure_ok(response, "Create property")?;
        Ok(())
    }

    async fn update(&self, id: i64, draft: &PropertyDraft) -> Result<()> {
        let url = self.item_url(id);
        debug!("PUT {}", url);

        let response = self
            .client
            .put(&url)
            .json(draft)
            .send()
            .await
            .with_context(|| format!("Failed to send update for property {}", id))?;

        ensure_ok(response, "Update property")?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let url = self.item_url(id);
        debug!("DELETE {}", url);

        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .with_context(|| format!("Failed to send delete for property {}", id))?;

        ensure_ok(response, "Delete property")?;
        Ok(())
    }
}
