//! Storecast HTTP service layer
//!
//! Thin boundary over `storecast-core`: request/response types, the
//! error→HTTP translation, and process configuration.

pub mod config;
pub mod server;

pub use config::ServiceConfig;
pub use server::{build_router, start_server, AppState};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
