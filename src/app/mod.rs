pub mod console;
pub mod controller;
pub mod state;
pub mod status;
pub mod view;

pub use controller::PropertyClient;
pub use state::{FormField, PropertyForm, ViewState};
pub use status::{StatusKind, StatusLine, StatusMessage};
