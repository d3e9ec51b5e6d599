use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};
use std::str::FromStr;
use std::time::Duration;
use crate::config::settings::DatabaseConfig;
use crate::error::AppError;

fn connect_options(database_url: &str) -> Result<SqliteConnectOptions, AppError> {
    if !database_url.starts_with("sqlite:") {
        return Err(AppError::Configuration(
            "DATABASE_URL must use the sqlite: scheme".to_string(),
        ));
    }

    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| AppError::Configuration(format!("Invalid DATABASE_URL: {}", e)))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    Ok(options)
}

/// Creates the SQLite connection pool described by the database settings.
///
/// The database file is created when missing. If the first attempts fail the
/// pool creation is retried a few times before giving up.
pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool, AppError> {
    let options = connect_options(&config.url)?;

    log::info!("Creating database connection pool");

    let max_retries = 3;
    let mut last_error = None;

    for attempt in 1..=max_retries {
        log::info!("Database connection attempt {} of {}", attempt, max_retries);

        match SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options.clone())
            .await
        {
            Ok(pool) => {
                log::info!("Successfully connected to database");
                return Ok(pool);
            }
            Err(e) => {
                log::warn!("Database connection attempt {} failed: {}", attempt, e);
                last_error = Some(e);

                if attempt < max_retries {
                    let delay = Duration::from_secs(2 * attempt as u64);
                    log::info!("Retrying in {} seconds...", delay.as_secs());
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    let error = last_error.map(|e| e.to_string()).unwrap_or_else(|| "Unknown database connection error".to_string());

    log::error!("All database connection attempts failed: {}", error);
    log::error!("Please check your database configuration and ensure the database file is writable.");

    Err(AppError::Database(error))
}

/// Verifies the database connection by executing a trivial query.
pub async fn verify_connection(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::query_as::<_, (i32,)>("SELECT 1 as result")
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Database connection verification failed: {}", e);
            AppError::Database(e.to_string())
        })?;

    log::info!("Database connection verified successfully");
    Ok(())
}

/// Starts a transaction that takes the SQLite write lock up front, so
/// concurrent writers queue on `busy_timeout` instead of failing to upgrade.
pub async fn begin_write(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>, AppError> {
    pool.begin_with("BEGIN IMMEDIATE")
        .await
        .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))
}
