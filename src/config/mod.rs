pub mod settings;

use tracing::info;

pub use settings::AppSettings;

use crate::error::AppResult;

/// Initialize application configuration
pub fn init_config() -> AppResult<settings::AppSettings> {
    info!("Initializing application configuration from environment");
    settings::AppSettings::from_env()
}
