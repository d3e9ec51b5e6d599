use actix_web::{web, HttpResponse, Result};
use chrono::Utc;
use tracing::{debug, info};

use crate::api_contract::common::StatusResponse;
use crate::api_contract::devices::{
    DeviceResponse, RegisterDeviceRequest, RegisterDeviceResponse, UpdateDeviceRequest,
};
use crate::db::repositories::device_repository::DeviceRepository;
use crate::error::AppError;

/// Register a new device
pub async fn register_device_handler(
    device_repo: web::Data<DeviceRepository>,
    req_body: web::Json<RegisterDeviceRequest>,
) -> Result<HttpResponse, AppError> {
    let new_device = req_body.into_inner().into_new_device()?;
    let device = device_repo.register_device(new_device).await?;

    info!(
        id = device.id,
        device_id = %device.device_id,
        device_type = %device.device_type,
        "Device registered successfully"
    );

    let response = RegisterDeviceResponse {
        message: "Device added successfully".to_string(),
        id: device.id,
        device_id: device.device_id,
    };

    Ok(HttpResponse::Created().json(response))
}

/// List every registered device
pub async fn list_devices_handler(
    device_repo: web::Data<DeviceRepository>,
) -> Result<HttpResponse, AppError> {
    let devices = device_repo.list_devices().await?;
    let now = Utc::now();

    let device_infos: Vec<DeviceResponse> = devices
        .into_iter()
        .map(|device| DeviceResponse::from_device(device, now))
        .collect();

    debug!(device_count = device_infos.len(), "Retrieved devices");

    Ok(HttpResponse::Ok().json(device_infos))
}

pub async fn get_device_handler(
    device_repo: web::Data<DeviceRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let device = device_repo.get_device_by_id(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(DeviceResponse::from_device(device, Utc::now())))
}

/// Apply a partial update to a device
pub async fn update_device_handler(
    device_repo: web::Data<DeviceRepository>,
    path: web::Path<i64>,
    req_body: web::Json<UpdateDeviceRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let patch = req_body.into_inner().into_patch()?;

    if patch.is_empty() {
        debug!(id, "Update request carried no changes");
    }

    let device = device_repo.update_device(id, patch).await?;

    info!(id, device_id = %device.device_id, "Device updated successfully");

    Ok(HttpResponse::Ok().json(StatusResponse::success("Device updated successfully")))
}

/// Delete a device and all of its readings
pub async fn delete_device_handler(
    device_repo: web::Data<DeviceRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let (device, readings_deleted) = device_repo.delete_device(id).await?;

    info!(
        id,
        device_id = %device.device_id,
        readings_deleted,
        "Device deleted with its sensor data"
    );

    Ok(HttpResponse::Ok().json(StatusResponse::success(
        "Device and all related data deleted successfully",
    )))
}
