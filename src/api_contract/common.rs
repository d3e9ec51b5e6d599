use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Width of the external identifier column.
pub const MAX_DEVICE_ID_LEN: usize = 50;

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

impl StatusResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
        }
    }
}

pub fn validate_device_id(device_id: &str) -> Result<(), AppError> {
    if device_id.trim().is_empty() {
        return Err(AppError::InvalidInput("device_id must not be empty".to_string()));
    }
    if device_id.chars().count() > MAX_DEVICE_ID_LEN {
        return Err(AppError::InvalidInput(format!(
            "device_id must be at most {} characters",
            MAX_DEVICE_ID_LEN
        )));
    }
    Ok(())
}

/// Accepts whole numbers of seconds, including integral floats such as `30.0`.
pub fn validate_update_interval(update_interval: f64) -> Result<i64, AppError> {
    if !update_interval.is_finite() || update_interval.fract() != 0.0 {
        return Err(AppError::InvalidInput(
            "update_interval must be a whole number of seconds".to_string(),
        ));
    }
    if update_interval < 1.0 || update_interval >= i64::MAX as f64 {
        return Err(AppError::InvalidInput(
            "update_interval must be a positive number of seconds".to_string(),
        ));
    }
    Ok(update_interval as i64)
}

/// Rejects `NaN` and infinities, which JSON can only render as `null`.
pub fn validate_measurement(field: &str, value: Option<f64>) -> Result<Option<f64>, AppError> {
    match value {
        Some(v) if !v.is_finite() => Err(AppError::InvalidInput(format!(
            "{} must be a finite number",
            field
        ))),
        other => Ok(other),
    }
}
