use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, BoolFromInt, DisplayFromStr, PickFirst};

use crate::api_contract::common::{validate_device_id, validate_measurement};
use crate::db::repositories::sensor_reading_repository::{NewSensorReading, SensorReading};
use crate::error::AppError;

/// Reading pushed by device firmware. Measurements may be numbers or numeric
/// strings; `motion` may be a boolean or 0/1.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct SensorDataRequest {
    pub device_id: String,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub temperature: Option<f64>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub humidity: Option<f64>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub pressure: Option<f64>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub light: Option<f64>,
    #[serde_as(as = "Option<PickFirst<(_, BoolFromInt)>>")]
    pub motion: Option<bool>,
}

impl SensorDataRequest {
    pub fn into_new_reading(self) -> Result<NewSensorReading, AppError> {
        validate_device_id(&self.device_id)?;

        Ok(NewSensorReading {
            device_id: self.device_id,
            temperature: validate_measurement("temperature", self.temperature)?,
            humidity: validate_measurement("humidity", self.humidity)?,
            pressure: validate_measurement("pressure", self.pressure)?,
            light: validate_measurement("light", self.light)?,
            motion: Some(self.motion.unwrap_or(false)),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct SensorDataQuery {
    pub device_id: Option<String>,
    pub limit: Option<i64>,
}

impl SensorDataQuery {
    /// An empty `device_id` parameter means no filter.
    pub fn device_filter(&self) -> Option<&str> {
        self.device_id.as_deref().filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReadingResponse {
    pub id: i64,
    pub device_id: String,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub light: Option<f64>,
    pub motion: Option<bool>,
    pub timestamp: DateTime<Utc>,
}

impl From<SensorReading> for SensorReadingResponse {
    fn from(reading: SensorReading) -> Self {
        Self {
            id: reading.id,
            device_id: reading.device_id,
            temperature: reading.temperature,
            humidity: reading.humidity,
            pressure: reading.pressure,
            light: reading.light,
            motion: reading.motion,
            timestamp: reading.timestamp,
        }
    }
}
