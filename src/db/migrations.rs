use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use crate::db::connection::begin_write;
use crate::error::AppResult;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Applies every pending migration. Safe to run repeatedly; never drops data.
pub async fn run_migrations(pool: &SqlitePool) -> AppResult<()> {
    log::info!("Applying database migrations");
    MIGRATOR.run(pool).await?;
    log::info!("Database schema is up to date");
    Ok(())
}

/// Drops both tables and the migration ledger, then rebuilds the schema.
///
/// Destroys all stored devices and readings. Only reachable from the
/// bootstrap binary.
pub async fn reset_schema(pool: &SqlitePool) -> AppResult<()> {
    log::warn!("Dropping all tables and recreating the schema");

    let mut tx = begin_write(pool).await?;
    for statement in [
        "DROP TABLE IF EXISTS sensor_data",
        "DROP TABLE IF EXISTS devices",
        "DROP TABLE IF EXISTS _sqlx_migrations",
    ] {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    run_migrations(pool).await
}
