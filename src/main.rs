//! APDS9960 sensor module: standalone runner.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  Registry  (hipsterbrown:sensor:apds9960 → constructor)  │
//! │                         │                                │
//! │                         ▼                                │
//! │  Apds9960Sensor ──▶ BusDriverFactory ──▶ /dev/i2c-N      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Reads one component config (JSON) from the file named by the first
//! argument, or from stdin, then prints one JSON reading per second.
#![deny(unused_must_use)]

use std::io::Read;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};

use apds9960_sensor::adapters::hardware::{LinuxBusFactory, linux_bus_factory};
use apds9960_sensor::adapters::log_sink;
use apds9960_sensor::adapters::time::MonotonicClock;
use apds9960_sensor::pins::{DEFAULT_I2C_BUS, I2C_BUS_ENV};
use apds9960_sensor::{Apds9960Sensor, ComponentConfig, Registry, register_apds9960};

const POLL_INTERVAL: Duration = Duration::from_secs(1);
const READ_TIMEOUT: Duration = Duration::from_millis(500);

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    log_sink::init().context("installing logger")?;
    info!("apds9960-sensor v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Explicit model registration ────────────────────────
    let bus = std::env::var(I2C_BUS_ENV).unwrap_or_else(|_| DEFAULT_I2C_BUS.to_owned());
    info!("using I2C bus {}", bus);
    let mut registry: Registry<Apds9960Sensor<LinuxBusFactory, MonotonicClock>> = Registry::new();
    register_apds9960(&mut registry, move || linux_bus_factory(bus.clone()))?;

    // ── 3. Component config ───────────────────────────────────
    let raw = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).context("reading stdin")?;
            buf
        }
    };
    let config: ComponentConfig = serde_json::from_str(&raw).context("parsing component config")?;

    // ── 4. Validate, construct, poll ──────────────────────────
    let deps = registry.validate(&config)?;
    let mut sensor = registry.create(&config, &deps)?;
    info!("{} ready ({})", sensor.name(), config.model);

    loop {
        match futures_lite::future::block_on(sensor.get_readings(None, Some(READ_TIMEOUT))) {
            Ok(reading) => println!("{}", serde_json::Value::Object(reading.to_map())),
            Err(e) => warn!("{}: reading failed: {}", sensor.name(), e),
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}
