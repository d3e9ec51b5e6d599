#![allow(dead_code)]

use iot_telemetry_server::config::settings::DatabaseConfig;
use iot_telemetry_server::db::{create_pool, run_migrations};
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Migrated pool on a throwaway database file. Keep the `TempDir` alive for
/// as long as the pool is used.
pub async fn test_pool() -> (TempDir, SqlitePool) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let config = DatabaseConfig {
        url: format!("sqlite://{}", dir.path().join("telemetry.db").display()),
        max_connections: 4,
        auto_migrate: true,
    };

    let pool = create_pool(&config).await.expect("create pool");
    run_migrations(&pool).await.expect("migrate");

    (dir, pool)
}

pub async fn count_rows(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .expect("count rows")
}
