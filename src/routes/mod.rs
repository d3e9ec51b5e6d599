use actix_web::web;
use sqlx::SqlitePool;

use crate::db::repositories::{DeviceRepository, SensorReadingRepository};
use crate::error::AppError;
use crate::handlers;

/// Registers the pool, the repositories, extractor settings and every route on an app.
/// Shared by the server binary and the integration tests.
pub fn configure_app(cfg: &mut web::ServiceConfig, db_pool: &SqlitePool) {
    cfg.app_data(web::Data::new(db_pool.clone()))
        .app_data(web::Data::new(DeviceRepository::new(db_pool.clone())))
        .app_data(web::Data::new(SensorReadingRepository::new(db_pool.clone())))
        .app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .route("/health", web::get().to(handlers::health::health_check))
        .service(web::scope("/api").configure(configure_routes));
}

/// Configures the JSON API mounted under "/api".
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // Device registry (/api/devices)
    cfg.service(
        web::scope("/devices")
            .route("", web::post().to(handlers::device_handlers::register_device_handler))
            .route("", web::get().to(handlers::device_handlers::list_devices_handler))
            .route("/{id}", web::get().to(handlers::device_handlers::get_device_handler))
            .route("/{id}", web::put().to(handlers::device_handlers::update_device_handler))
            .route("/{id}", web::delete().to(handlers::device_handlers::delete_device_handler))
    );

    // Reading store (/api/sensor-data)
    cfg.service(
        web::scope("/sensor-data")
            .route("", web::post().to(handlers::sensor_data_handlers::ingest_sensor_data_handler))
            .route("", web::get().to(handlers::sensor_data_handlers::query_sensor_data_handler))
    );
}

// Malformed bodies and parameters surface as the crate's own error body.

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::InvalidInput(err.to_string()).into())
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::InvalidInput(err.to_string()).into())
}

// A non-numeric id cannot name a device.
fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| AppError::NotFound(format!("No such device: {}", err)).into())
}
