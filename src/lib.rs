//! APDS9960 sensor resource library.
//!
//! Exposes the resource, its ports and the register driver for the runner
//! binary and for integration testing. The Linux bus factory is behind the
//! `linux` feature; everything else builds and tests on any host.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod pins;
pub mod resource;

pub use app::reading::{Gesture, Reading};
pub use app::service::Apds9960Sensor;
pub use config::SensorSettings;
pub use error::{Error, HardwareError, Result, ValidationError};
pub use resource::{APDS9960_MODEL, ComponentConfig, Model, Registry, register_apds9960};
