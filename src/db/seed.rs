use sqlx::SqlitePool;
use crate::db::repositories::{DeviceRepository, NewDevice, NewSensorReading, SensorReadingRepository};
use crate::error::AppResult;

fn demo_devices() -> Vec<NewDevice> {
    let living_room = NewDevice {
        location: Some("Living Room".to_string()),
        description: Some("Temperature and humidity monitoring".to_string()),
        wifi_ssid: Some("MyWiFi".to_string()),
        update_interval: 30,
        has_temperature: true,
        has_humidity: true,
        ..NewDevice::new("ESP32_001", "Living Room Sensor", "ESP32")
    };

    let kitchen = NewDevice {
        location: Some("Kitchen".to_string()),
        description: Some("Motion detection and light monitoring".to_string()),
        wifi_ssid: Some("MyWiFi".to_string()),
        update_interval: 15,
        has_motion: true,
        has_light: true,
        ..NewDevice::new("PICO_001", "Kitchen Sensor", "PICO WH")
    };

    let bedroom = NewDevice {
        location: Some("Bedroom".to_string()),
        description: Some("Environmental monitoring".to_string()),
        wifi_ssid: Some("MyWiFi".to_string()),
        update_interval: 60,
        has_temperature: true,
        has_pressure: true,
        ..NewDevice::new("ESP32_002", "Bedroom Sensor", "ESP32")
    };

    vec![living_room, kitchen, bedroom]
}

fn demo_readings() -> Vec<NewSensorReading> {
    let reading = |device_id: &str, temperature, humidity, pressure, light, motion| NewSensorReading {
        device_id: device_id.to_string(),
        temperature: Some(temperature),
        humidity: Some(humidity),
        pressure: Some(pressure),
        light: Some(light),
        motion: Some(motion),
    };

    vec![
        reading("ESP32_001", 24.5, 58.2, 1013.25, 450.0, false),
        reading("ESP32_001", 25.1, 59.5, 1012.8, 470.0, true),
        reading("PICO_001", 22.8, 55.0, 1014.2, 320.0, false),
        reading("PICO_001", 23.2, 56.3, 1013.9, 340.0, false),
        reading("ESP32_002", 21.5, 52.1, 1015.1, 280.0, false),
    ]
}

/// Inserts the demonstration devices and readings when no device exists yet.
/// Returns whether anything was written.
pub async fn seed_demo_data(pool: &SqlitePool) -> AppResult<bool> {
    let devices = DeviceRepository::new(pool.clone());

    if devices.count_devices().await? > 0 {
        log::info!("Devices already present, skipping demo data");
        return Ok(false);
    }

    for device in demo_devices() {
        devices.register_device(device).await?;
    }

    let readings = SensorReadingRepository::new(pool.clone());
    for reading in demo_readings() {
        readings.insert_reading(reading).await?;
    }

    log::info!("Demo data created");
    Ok(true)
}
