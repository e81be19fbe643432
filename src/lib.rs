pub mod app;
pub mod client;
pub mod models;
pub mod server;
