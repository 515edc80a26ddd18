//! atlas-server: process bootstrap for atlas
//!
//! Loads settings, builds the connection pool and serves the HTTP
//! listener. Entity routes are not mounted yet; only `/health` is.

pub mod config;
pub mod error;
pub mod routes;
pub mod server;

pub use config::{DatabaseProfile, DatabaseTarget, ServerSettings, Settings};
pub use error::{ConfigError, ServerError};
pub use server::{build_router, run_server};
