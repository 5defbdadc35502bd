//! Sensor drivers.

pub mod apds9960;
pub mod gesture;
