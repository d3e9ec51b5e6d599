use crate::db::connection::begin_write;
use crate::db::repositories::device_repository::DeviceRepository;
use crate::error::AppError;
use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction, query, query_as};

pub const DEFAULT_QUERY_LIMIT: i64 = 50;

const READING_COLUMNS: &str =
    "id, device_id, temperature, humidity, pressure, light, motion, timestamp";

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct SensorReading {
    pub id: i64,
    pub device_id: String,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub light: Option<f64>,
    pub motion: Option<bool>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewSensorReading {
    pub device_id: String,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub light: Option<f64>,
    pub motion: Option<bool>,
}

#[derive(Clone)]
pub struct SensorReadingRepository {
    db_pool: SqlitePool,
}

impl SensorReadingRepository {
    pub fn new(db_pool: SqlitePool) -> Self {
        Self { db_pool }
    }

    /// Store one reading stamped with the current time.
    ///
    /// The device id is not checked against the registry. When it does match
    /// a registered device, that device's `last_seen` moves forward in the
    /// same transaction.
    pub async fn insert_reading(&self, reading: NewSensorReading) -> Result<SensorReading, AppError> {
        let mut tx = begin_write(&self.db_pool).await?;

        let stored = Self::insert_reading_with_executor(&reading, Utc::now(), &mut tx).await?;
        DeviceRepository::mark_seen_with_executor(&stored.device_id, stored.timestamp, &mut tx).await?;

        tx.commit().await
            .map_err(|e| AppError::Database(format!("Failed to commit transaction: {}", e)))?;

        Ok(stored)
    }

    pub async fn insert_reading_with_executor(
        reading: &NewSensorReading,
        timestamp: DateTime<Utc>,
        tx: &mut Transaction<'_, Sqlite>,
    ) -> Result<SensorReading, AppError> {
        let sql = format!(
            r#"
            INSERT INTO sensor_data (device_id, temperature, humidity, pressure, light, motion, timestamp)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            READING_COLUMNS
        );

        query_as::<_, SensorReading>(&sql)
            .bind(&reading.device_id)
            .bind(reading.temperature)
            .bind(reading.humidity)
            .bind(reading.pressure)
            .bind(reading.light)
            .bind(reading.motion)
            .bind(timestamp)
            .fetch_one(&mut **tx)
            .await
            .map_err(|e| AppError::Database(format!("Failed to store sensor reading: {}", e)))
    }

    /// Newest readings first, optionally restricted to one device.
    pub async fn recent_readings(
        &self,
        device_id: Option<&str>,
        limit: i64,
    ) -> Result<Vec<SensorReading>, AppError> {
        if limit < 0 {
            return Err(AppError::InvalidInput("limit must not be negative".to_string()));
        }

        let readings = match device_id {
            Some(device_id) => {
                let sql = format!(
                    "SELECT {} FROM sensor_data WHERE device_id = $1 ORDER BY timestamp DESC, id DESC LIMIT $2",
                    READING_COLUMNS
                );
                query_as::<_, SensorReading>(&sql)
                    .bind(device_id)
                    .bind(limit)
                    .fetch_all(&self.db_pool)
                    .await
            }
            None => {
                let sql = format!(
                    "SELECT {} FROM sensor_data ORDER BY timestamp DESC, id DESC LIMIT $1",
                    READING_COLUMNS
                );
                query_as::<_, SensorReading>(&sql)
                    .bind(limit)
                    .fetch_all(&self.db_pool)
                    .await
            }
        }
        .map_err(|e| AppError::Database(format!("Failed to fetch sensor readings: {}", e)))?;

        Ok(readings)
    }

    /// Remove every reading carrying `device_id`. Returns the number removed.
    pub async fn delete_by_device_id_with_executor(
        device_id: &str,
        tx: &mut Transaction<'_, Sqlite>,
    ) -> Result<u64, AppError> {
        let result = query("DELETE FROM sensor_data WHERE device_id = $1")
            .bind(device_id)
            .execute(&mut **tx)
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete sensor readings: {}", e)))?;

        Ok(result.rows_affected())
    }
}
