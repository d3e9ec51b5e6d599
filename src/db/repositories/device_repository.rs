use crate::db::connection::begin_write;
use crate::db::repositories::sensor_reading_repository::SensorReadingRepository;
use crate::error::AppError;
use chrono::{DateTime, Duration, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction, query, query_as, query_scalar};

/// Readings are expected every `update_interval` seconds; a device counts as
/// online while its last reading is younger than this many intervals.
pub const ONLINE_GRACE_INTERVALS: i64 = 3;

pub const DEFAULT_UPDATE_INTERVAL: i64 = 10;
pub const DEFAULT_WIFI_SECURITY: &str = "WPA2";

const DEVICE_COLUMNS: &str = r#"
    id, device_id, device_name, device_type, location, description,
    wifi_ssid, wifi_security, static_ip, update_interval,
    has_temperature, has_humidity, has_pressure, has_light, has_motion, has_distance,
    last_seen, created_at
"#;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Device {
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
    pub last_seen: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Device {
    pub fn is_online_at(&self, now: DateTime<Utc>) -> bool {
        match self.last_seen {
            Some(last_seen) => {
                let window = Duration::try_seconds(self.update_interval.saturating_mul(ONLINE_GRACE_INTERVALS))
                    .unwrap_or(Duration::MAX);
                now.signed_duration_since(last_seen) <= window
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewDevice {
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
}

impl NewDevice {
    pub fn new(device_id: impl Into<String>, device_name: impl Into<String>, device_type: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            device_name: device_name.into(),
            device_type: device_type.into(),
            location: None,
            description: None,
            wifi_ssid: None,
            wifi_security: Some(DEFAULT_WIFI_SECURITY.to_string()),
            static_ip: None,
            update_interval: DEFAULT_UPDATE_INTERVAL,
            has_temperature: false,
            has_humidity: false,
            has_pressure: false,
            has_light: false,
            has_motion: false,
            has_distance: false,
        }
    }
}

/// Partial update of a device.
///
/// `None` leaves the stored value untouched. For the nullable text columns
/// `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DevicePatch {
    pub device_name: Option<String>,
    pub device_type: Option<String>,
    pub location: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub wifi_ssid: Option<Option<String>>,
    pub wifi_security: Option<Option<String>>,
    pub static_ip: Option<Option<String>>,
    pub update_interval: Option<i64>,
    pub has_temperature: Option<bool>,
    pub has_humidity: Option<bool>,
    pub has_pressure: Option<bool>,
    pub has_light: Option<bool>,
    pub has_motion: Option<bool>,
    pub has_distance: Option<bool>,
}

fn set<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

impl DevicePatch {
    pub fn is_empty(&self) -> bool {
        *self == DevicePatch::default()
    }

    pub fn apply_to(self, device: &mut Device) {
        set(&mut device.device_name, self.device_name);
        set(&mut device.device_type, self.device_type);
        set(&mut device.location, self.location);
        set(&mut device.description, self.description);
        set(&mut device.wifi_ssid, self.wifi_ssid);
        set(&mut device.wifi_security, self.wifi_security);
        set(&mut device.static_ip, self.static_ip);
        set(&mut device.update_interval, self.update_interval);
        set(&mut device.has_temperature, self.has_temperature);
        set(&mut device.has_humidity, self.has_humidity);
        set(&mut device.has_pressure, self.has_pressure);
        set(&mut device.has_light, self.has_light);
        set(&mut device.has_motion, self.has_motion);
        set(&mut device.has_distance, self.has_distance);
    }
}

#[derive(Clone)]
pub struct DeviceRepository {
    db_pool: SqlitePool,
}

impl DeviceRepository {
    pub fn new(db_pool: SqlitePool) -> Self {
        Self { db_pool }
    }

    /// Register a new device. Fails with `Conflict` when the external id is taken.
    pub async fn register_device(&self, request: NewDevice) -> Result<Device, AppError> {
        let mut tx = begin_write(&self.db_pool).await?;

        let sql = format!(
            r#"
            INSERT INTO devices (
                device_id, device_name, device_type, location, description,
                wifi_ssid, wifi_security, static_ip, update_interval,
                has_temperature, has_humidity, has_pressure, has_light, has_motion, has_distance,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING {}
            "#,
            DEVICE_COLUMNS
        );

        let device = query_as::<_, Device>(&sql)
            .bind(&request.device_id)
            .bind(&request.device_name)
            .bind(&request.device_type)
            .bind(&request.location)
            .bind(&request.description)
            .bind(&request.wifi_ssid)
            .bind(&request.wifi_security)
            .bind(&request.static_ip)
            .bind(request.update_interval)
            .bind(request.has_temperature)
            .bind(request.has_humidity)
            .bind(request.has_pressure)
            .bind(request.has_light)
            .bind(request.has_motion)
            .bind(request.has_distance)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_error) if db_error.is_unique_violation() => {
                    AppError::Conflict("Device ID already exists".to_string())
                }
                other => AppError::Database(format!("Failed to register device: {}", other)),
            })?;

        tx.commit().await
            .map_err(|e| AppError::Database(format!("Failed to commit transaction: {}", e)))?;

        Ok(device)
    }

    /// All devices in registration order
    pub async fn list_devices(&self) -> Result<Vec<Device>, AppError> {
        let sql = format!("SELECT {} FROM devices ORDER BY id ASC", DEVICE_COLUMNS);

        let devices = query_as::<_, Device>(&sql)
            .fetch_all(&self.db_pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to fetch devices: {}", e)))?;

        Ok(devices)
    }

    /// Get device by surrogate key
    pub async fn get_device_by_id(&self, id: i64) -> Result<Device, AppError> {
        let sql = format!("SELECT {} FROM devices WHERE id = $1", DEVICE_COLUMNS);

        query_as::<_, Device>(&sql)
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to fetch device: {}", e)))?
            .ok_or_else(|| AppError::NotFound(format!("Device not found: {}", id)))
    }

    /// Apply a partial update. Fields absent from the patch keep their value.
    pub async fn update_device(&self, id: i64, patch: DevicePatch) -> Result<Device, AppError> {
        let mut tx = begin_write(&self.db_pool).await?;

        let mut device = Self::get_device_for_update_with_executor(id, &mut tx).await?;
        patch.apply_to(&mut device);

        query(
            r#"
            UPDATE devices
            SET
                device_name = $2,
                device_type = $3,
                location = $4,
                description = $5,
                wifi_ssid = $6,
                wifi_security = $7,
                static_ip = $8,
                update_interval = $9,
                has_temperature = $10,
                has_humidity = $11,
                has_pressure = $12,
                has_light = $13,
                has_motion = $14,
                has_distance = $15
            WHERE id = $1
            "#,
        )
        .bind(device.id)
        .bind(&device.device_name)
        .bind(&device.device_type)
        .bind(&device.location)
        .bind(&device.description)
        .bind(&device.wifi_ssid)
        .bind(&device.wifi_security)
        .bind(&device.static_ip)
        .bind(device.update_interval)
        .bind(device.has_temperature)
        .bind(device.has_humidity)
        .bind(device.has_pressure)
        .bind(device.has_light)
        .bind(device.has_motion)
        .bind(device.has_distance)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Database(format!("Failed to update device: {}", e)))?;

        tx.commit().await
            .map_err(|e| AppError::Database(format!("Failed to commit transaction: {}", e)))?;

        Ok(device)
    }

    /// Delete a device together with every reading carrying its external id.
    /// Returns the number of readings removed.
    pub async fn delete_device(&self, id: i64) -> Result<(Device, u64), AppError> {
        let mut tx = begin_write(&self.db_pool).await?;

        let device = Self::get_device_for_update_with_executor(id, &mut tx).await?;

        let readings_deleted =
            SensorReadingRepository::delete_by_device_id_with_executor(&device.device_id, &mut tx).await?;

        query("DELETE FROM devices WHERE id = $1")
            .bind(device.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete device: {}", e)))?;

        tx.commit().await
            .map_err(|e| AppError::Database(format!("Failed to commit transaction: {}", e)))?;

        Ok((device, readings_deleted))
    }

    pub async fn count_devices(&self) -> Result<i64, AppError> {
        query_scalar("SELECT COUNT(*) FROM devices")
            .fetch_one(&self.db_pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to count devices: {}", e)))
    }

    /// Record that a reading arrived for `device_id`. Unregistered ids are a
    /// no-op; returns whether a device row was touched.
    pub async fn mark_seen_with_executor(
        device_id: &str,
        seen_at: DateTime<Utc>,
        tx: &mut Transaction<'_, Sqlite>,
    ) -> Result<bool, AppError> {
        let result = query("UPDATE devices SET last_seen = $2 WHERE device_id = $1")
            .bind(device_id)
            .bind(seen_at)
            .execute(&mut **tx)
            .await
            .map_err(|e| AppError::Database(format!("Failed to update device presence: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_device_for_update_with_executor(
        id: i64,
        tx: &mut Transaction<'_, Sqlite>,
    ) -> Result<Device, AppError> {
        let sql = format!("SELECT {} FROM devices WHERE id = $1", DEVICE_COLUMNS);

        query_as::<_, Device>(&sql)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| AppError::Database(format!("Failed to fetch device: {}", e)))?
            .ok_or_else(|| AppError::NotFound(format!("Device not found: {}", id)))
    }
}
