use actix_web::{web, HttpResponse, Result};
use tracing::{debug, info};

use crate::api_contract::common::StatusResponse;
use crate::api_contract::sensor_data::{SensorDataQuery, SensorDataRequest, SensorReadingResponse};
use crate::db::repositories::sensor_reading_repository::{DEFAULT_QUERY_LIMIT, SensorReadingRepository};
use crate::error::AppError;

/// Endpoint for IoT devices to push a reading
pub async fn ingest_sensor_data_handler(
    reading_repo: web::Data<SensorReadingRepository>,
    req_body: web::Json<SensorDataRequest>,
) -> Result<HttpResponse, AppError> {
    let reading = req_body.into_inner().into_new_reading()?;
    let stored = reading_repo.insert_reading(reading).await?;

    info!(
        reading_id = stored.id,
        device_id = %stored.device_id,
        "Sensor reading stored"
    );

    Ok(HttpResponse::Ok().json(StatusResponse::success("Data received")))
}

/// Recent readings, newest first
pub async fn query_sensor_data_handler(
    reading_repo: web::Data<SensorReadingRepository>,
    query: web::Query<SensorDataQuery>,
) -> Result<HttpResponse, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_QUERY_LIMIT);
    let device_filter = query.device_filter();

    let readings = reading_repo.recent_readings(device_filter, limit).await?;

    debug!(
        device_id = device_filter.unwrap_or("*"),
        limit,
        returned = readings.len(),
        "Retrieved sensor readings"
    );

    let response: Vec<SensorReadingResponse> = readings.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(response))
}
