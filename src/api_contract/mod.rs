pub mod common;
pub mod devices;
pub mod sensor_data;
