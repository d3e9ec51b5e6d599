pub mod device_repository;
pub mod sensor_reading_repository;

pub use device_repository::{Device, DevicePatch, DeviceRepository, NewDevice};
pub use sensor_reading_repository::{NewSensorReading, SensorReading, SensorReadingRepository};
