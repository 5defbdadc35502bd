//! Application core: the sensor resource logic, zero direct I/O.
//!
//! Configuration handling, capability enables and reading formatting live
//! here. All interaction with the bus happens through **port traits**
//! defined in [`ports`], keeping this layer testable without a real sensor.

pub mod ports;
pub mod reading;
pub mod service;
