use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/properties";

/// Connection settings for the property API
#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Collection endpoint, without a trailing slash
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: concat!("property-desk/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
