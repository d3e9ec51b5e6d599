pub mod device_handlers;
pub mod health;
pub mod sensor_data_handlers;
