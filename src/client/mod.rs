pub mod http;
pub mod traits;
pub mod types;

pub use http::HttpPropertyApi;
pub use traits::PropertyApi;
pub use types::ApiSettings;
