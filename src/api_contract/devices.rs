use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};

use crate::api_contract::common::{validate_device_id, validate_update_interval};
use crate::db::repositories::device_repository::{
    DEFAULT_UPDATE_INTERVAL, DEFAULT_WIFI_SECURITY, Device, DevicePatch, NewDevice,
};
use crate::error::AppError;

fn default_wifi_security() -> Option<String> {
    Some(DEFAULT_WIFI_SECURITY.to_string())
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub struct RegisterDeviceRequest {
    pub device_id: String,
    pub device_name: String,
    pub device_type: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub wifi_ssid: Option<String>,
    #[serde(default = "default_wifi_security")]
    pub wifi_security: Option<String>,
    #[serde(default)]
    pub static_ip: Option<String>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub update_interval: Option<f64>,
    #[serde(default, alias = "temperature")]
    pub has_temperature: bool,
    #[serde(default, alias = "humidity")]
    pub has_humidity: bool,
    #[serde(default, alias = "pressure")]
    pub has_pressure: bool,
    #[serde(default, alias = "light")]
    pub has_light: bool,
    #[serde(default, alias = "motion")]
    pub has_motion: bool,
    #[serde(default, alias = "distance")]
    pub has_distance: bool,
}

impl RegisterDeviceRequest {
    pub fn into_new_device(self) -> Result<NewDevice, AppError> {
        validate_device_id(&self.device_id)?;
        let update_interval = match self.update_interval {
            Some(update_interval) => validate_update_interval(update_interval)?,
            None => DEFAULT_UPDATE_INTERVAL,
        };

        Ok(NewDevice {
            device_id: self.device_id,
            device_name: self.device_name,
            device_type: self.device_type,
            location: self.location,
            description: self.description,
            wifi_ssid: self.wifi_ssid,
            wifi_security: self.wifi_security,
            static_ip: self.static_ip,
            update_interval,
            has_temperature: self.has_temperature,
            has_humidity: self.has_humidity,
            has_pressure: self.has_pressure,
            has_light: self.has_light,
            has_motion: self.has_motion,
            has_distance: self.has_distance,
        })
    }
}

/// Body of `PUT /api/devices/{id}`.
///
/// Omitted fields are left alone. The nullable text fields accept an explicit
/// `null` to clear the stored value; `null` on any other field counts as
/// omitted. `device_id` is immutable and ignored if sent.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct UpdateDeviceRequest {
    #[serde(default)]
    pub device_name: Option<String>,
    #[serde(default)]
    pub device_type: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub location: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub wifi_ssid: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub wifi_security: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub static_ip: Option<Option<String>>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub update_interval: Option<f64>,
    #[serde(default, alias = "temperature")]
    pub has_temperature: Option<bool>,
    #[serde(default, alias = "humidity")]
    pub has_humidity: Option<bool>,
    #[serde(default, alias = "pressure")]
    pub has_pressure: Option<bool>,
    #[serde(default, alias = "light")]
    pub has_light: Option<bool>,
    #[serde(default, alias = "motion")]
    pub has_motion: Option<bool>,
    #[serde(default, alias = "distance")]
    pub has_distance: Option<bool>,
}

impl UpdateDeviceRequest {
    pub fn into_patch(self) -> Result<DevicePatch, AppError> {
        let update_interval = self.update_interval.map(validate_update_interval).transpose()?;

        Ok(DevicePatch {
            device_name: self.device_name,
            device_type: self.device_type,
            location: self.location,
            description: self.description,
            wifi_ssid: self.wifi_ssid,
            wifi_security: self.wifi_security,
            static_ip: self.static_ip,
            update_interval,
            has_temperature: self.has_temperature,
            has_humidity: self.has_humidity,
            has_pressure: self.has_pressure,
            has_light: self.has_light,
            has_motion: self.has_motion,
            has_distance: self.has_distance,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterDeviceResponse {
    pub message: String,
    pub id: i64,
    pub device_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceResponse {
    pub id: i64,
    pub device_id: String,
    pub device_name: String,
    pub device_type: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub wifi_ssid: Option<String>,
    pub wifi_security: Option<String>,
    pub static_ip: Option<String>,
    pub update_interval: i64,
    pub has_temperature: bool,
    pub has_humidity: bool,
    pub has_pressure: bool,
    pub has_light: bool,
    pub has_motion: bool,
    pub has_distance: bool,
    pub is_online: bool,
    pub last_seen: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl DeviceResponse {
    pub fn from_device(device: Device, now: DateTime<Utc>) -> Self {
        let is_online = device.is_online_at(now);

        Self {
            id: device.id,
            device_id: device.device_id,
            device_name: device.device_name,
            device_type: device.device_type,
            location: device.location,
            description: device.description,
            wifi_ssid: device.wifi_ssid,
            wifi_security: device.wifi_security,
            static_ip: device.static_ip,
            update_interval: device.update_interval,
            has_temperature: device.has_temperature,
            has_humidity: device.has_humidity,
            has_pressure: device.has_pressure,
            has_light: device.has_light,
            has_motion: device.has_motion,
            has_distance: device.has_distance,
            is_online,
            last_seen: device.last_seen,
            created_at: device.created_at,
        }
    }
}
