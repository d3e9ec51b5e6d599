use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger};
use dotenv::dotenv;
use std::net::TcpListener;

use iot_telemetry_server::config::init_config;
use iot_telemetry_server::db::{create_pool, run_migrations, verify_connection};
use iot_telemetry_server::routes::configure_app;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Load application settings
    let app_settings = match init_config() {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("Failed to load application settings: {}", e);
            log::error!("Cannot start server without valid settings");
            std::process::exit(1);
        }
    };

    // Database connection setup
    let db_pool = match create_pool(&app_settings.database).await {
        Ok(pool) => {
            if let Err(e) = verify_connection(&pool).await {
                log::error!("Database connection verification failed: {}", e);
                log::error!("Cannot start server without a working database connection");
                std::process::exit(1);
            }
            log::info!("Database connection established successfully");
            pool
        }
        Err(e) => {
            log::error!("Failed to create database connection pool: {}", e);
            log::error!("Cannot start server without a working database connection");
            std::process::exit(1);
        }
    };

    // Schema changes normally go through `bootstrap migrate`
    if app_settings.database.auto_migrate {
        if let Err(e) = run_migrations(&db_pool).await {
            log::error!("Failed to apply database migrations: {}", e);
            std::process::exit(1);
        }
    }

    let host = &app_settings.server.host;
    let port = app_settings.server.port;

    log::info!(
        "Starting {} ({}) at http://{}:{}",
        app_settings.app.name,
        app_settings.app.environment,
        host,
        port
    );

    let server_addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(server_addr)?;

    let pool_for_shutdown = db_pool.clone();

    HttpServer::new(move || {
        // Configure CORS using actix-cors
        let mut cors = Cors::default();

        if app_settings.server.cors_origins.contains(&"*".to_string()) {
            cors = cors.allow_any_origin();
        } else {
            for origin in &app_settings.server.cors_origins {
                cors = cors.allowed_origin(origin);
            }
        }

        cors = cors
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .configure(|cfg| configure_app(cfg, &db_pool))
    })
    .listen(listener)?
    .run()
    .await?;

    log::info!("Server stopped, closing database pool");
    pool_for_shutdown.close().await;

    Ok(())
}
