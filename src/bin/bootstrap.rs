//! Administrative entry point for schema management and demo data.
//!
//! ```text
//! bootstrap migrate   apply pending migrations (non-destructive)
//! bootstrap reset     drop every table and recreate the schema
//! bootstrap seed      insert demonstration rows into an empty registry
//! ```

use anyhow::{Context, bail};
use dotenv::dotenv;

use iot_telemetry_server::config::init_config;
use iot_telemetry_server::db::{create_pool, reset_schema, run_migrations, seed::seed_demo_data};

const USAGE: &str = "usage: bootstrap <migrate|reset|seed>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let command = match std::env::args().nth(1) {
        Some(command) => command,
        None => bail!(USAGE),
    };

    let settings = init_config().context("Failed to load application settings")?;
    let pool = create_pool(&settings.database)
        .await
        .context("Failed to connect to the database")?;

    match command.as_str() {
        "migrate" => {
            run_migrations(&pool).await.context("Migration failed")?;
        }
        "reset" => {
            reset_schema(&pool).await.context("Schema reset failed")?;
            log::warn!("All devices and readings were removed");
        }
        "seed" => {
            run_migrations(&pool).await.context("Migration failed")?;
            if seed_demo_data(&pool).await.context("Seeding failed")? {
                log::info!("Demo devices and readings inserted");
            } else {
                log::info!("Registry not empty, nothing seeded");
            }
        }
        other => {
            pool.close().await;
            bail!("unknown command '{}'\n{}", other, USAGE);
        }
    }

    pool.close().await;
    Ok(())
}
