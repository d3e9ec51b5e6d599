use std::env;
use crate::error::AppError;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppSettings {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    pub name: String,
    pub environment: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// Apply pending (non-destructive) migrations when the server starts.
    pub auto_migrate: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

impl AppSettings {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the settings from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        // App config
        let app_name = var_or("APP_NAME", "iot-telemetry");
        let environment = var_or("ENVIRONMENT", "development");

        // Database config
        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| AppError::Configuration("DATABASE_URL must be set".to_string()))?;

        let max_connections = var_or("DATABASE_MAX_CONNECTIONS", "5")
            .parse::<u32>()
            .map_err(|_| AppError::Configuration("DATABASE_MAX_CONNECTIONS must be a valid number".to_string()))?;

        if max_connections == 0 {
            return Err(AppError::Configuration("DATABASE_MAX_CONNECTIONS must be at least 1".to_string()));
        }

        let auto_migrate = parse_bool(&var_or("DATABASE_AUTO_MIGRATE", "false"))
            .ok_or_else(|| AppError::Configuration("DATABASE_AUTO_MIGRATE must be true or false".to_string()))?;

        // Server config
        let server_host = var_or("SERVER_HOST", "0.0.0.0");
        let server_port = var_or("SERVER_PORT", "5001")
            .parse::<u16>()
            .map_err(|_| AppError::Configuration("SERVER_PORT must be a valid port number".to_string()))?;

        // CORS origins
        let cors_origins = var_or("CORS_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            app: AppConfig {
                name: app_name,
                environment,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
                auto_migrate,
            },
            server: ServerConfig {
                host: server_host,
                port: server_port,
                cors_origins,
            },
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
