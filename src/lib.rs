//! Home IoT telemetry server library
//!
//! Device registry and sensor reading store behind a JSON HTTP API. The
//! modules are shared by the server binary and the `bootstrap` admin binary.

pub mod api_contract;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod routes;

// Re-export commonly used types for convenience
pub use config::AppSettings;
pub use error::{AppError, AppResult};
