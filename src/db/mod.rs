pub mod connection;
pub mod migrations;
pub mod repositories;
pub mod seed;

// Re-export the connection module's functions for ease of use
pub use connection::{begin_write, create_pool, verify_connection};
pub use migrations::{reset_schema, run_migrations};
pub use repositories::*;
