//! Application service: the APDS9960 sensor resource.
//!
//! [`Apds9960Sensor`] owns at most one open sensor handle and exposes the
//! three entry points the host runtime calls: configuration validation,
//! reconfiguration and an async read. All I/O flows through the port
//! traits, so the service is testable with a fake driver.
//!
//! ```text
//!  DriverFactory ──▶ ┌────────────────────────┐
//!                    │     Apds9960Sensor      │ ──▶ Reading
//!  ClockPort ──────▶ │ Unconfigured/Configured │
//!                    └────────────────────────┘
//! ```

use core::time::Duration;

use log::{debug, info, warn};

use crate::config::{Attributes, SensorSettings};
use crate::error::{HardwareError, Result};
use crate::resource::ComponentConfig;

use super::ports::{ClockPort, DriverFactory, SensorDriverPort};
use super::reading::{Gesture, Reading, format_color};

enum State<D> {
    /// No open handle; only validation is meaningful.
    Unconfigured,
    Configured { settings: SensorSettings, driver: D },
}

/// The APDS9960 sensor resource.
pub struct Apds9960Sensor<F: DriverFactory, C: ClockPort> {
    name: String,
    factory: F,
    clock: C,
    state: State<F::Driver>,
}

impl<F: DriverFactory, C: ClockPort> Apds9960Sensor<F, C> {
    /// Construct an unconfigured resource.
    ///
    /// Does **not** open the bus: call [`reconfigure`](Self::reconfigure) next.
    pub fn new(name: impl Into<String>, factory: F, clock: C) -> Self {
        Self {
            name: name.into(),
            factory,
            clock,
            state: State::Unconfigured,
        }
    }

    // ── Host entry points ─────────────────────────────────────

    /// Validate the attributes and return the implicit dependencies (none).
    ///
    /// Side-effect free; never touches the bus.
    pub fn validate_config(config: &ComponentConfig) -> Result<Vec<String>> {
        validate_attributes(&config.attributes)?;
        Ok(Vec::new())
    }

    /// Tear down the current handle and rebuild hardware state from `config`.
    ///
    /// Validation runs first, so a rejected config leaves the resource and
    /// the bus untouched. A hardware failure leaves it unconfigured.
    pub fn reconfigure(&mut self, config: &ComponentConfig, dependencies: &[String]) -> Result<()> {
        let settings = SensorSettings::from_attributes(&config.attributes)?;
        if !dependencies.is_empty() {
            debug!("{}: ignoring {} dependencies", self.name, dependencies.len());
        }

        if matches!(self.state, State::Configured { .. }) {
            debug!("{}: releasing previous sensor handle", self.name);
        }
        self.state = State::Unconfigured;

        let mut driver = self.factory.open().inspect_err(|e| {
            warn!("{}: opening sensor failed: {}", self.name, e);
        })?;
        apply_settings(&mut driver, &settings).inspect_err(|e| {
            warn!("{}: programming sensor failed: {}", self.name, e);
        })?;

        info!(
            "{}: configured proximity={} color={} gesture={} interrupt={}",
            self.name, settings.proximity, settings.color, settings.gesture, settings.interrupt
        );
        self.state = State::Configured { settings, driver };
        Ok(())
    }

    /// Poll every enabled capability once.
    ///
    /// `extra` is accepted for contract compatibility and ignored. `timeout`
    /// is checked before each bus transaction; an in-flight transaction is
    /// not interrupted.
    pub async fn get_readings(
        &mut self,
        _extra: Option<&Attributes>,
        timeout: Option<Duration>,
    ) -> Result<Reading> {
        let State::Configured { settings, driver } = &mut self.state else {
            return Err(HardwareError::NotConfigured.into());
        };
        let deadline = timeout.map(|t| {
            let micros = u64::try_from(t.as_micros()).unwrap_or(u64::MAX);
            self.clock.now_us().saturating_add(micros)
        });
        let clock = &self.clock;

        let mut reading = Reading::default();

        if settings.proximity {
            check_deadline(clock, deadline)?;
            reading.proximity = Some(driver.read_proximity()?);
            futures_lite::future::yield_now().await;
        }

        if settings.color {
            check_deadline(clock, deadline)?;
            reading.color = Some(format_color(driver.read_color()?));
            futures_lite::future::yield_now().await;
        }

        if settings.gesture {
            check_deadline(clock, deadline)?;
            reading.gesture = Some(Gesture::from_code(driver.read_gesture()?));
        }

        debug!("{}: {:?}", self.name, reading);
        Ok(reading)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a sensor handle is currently open.
    pub fn is_configured(&self) -> bool {
        matches!(self.state, State::Configured { .. })
    }

    /// Settings applied by the last successful reconfigure.
    pub fn settings(&self) -> Option<&SensorSettings> {
        match &self.state {
            State::Configured { settings, .. } => Some(settings),
            State::Unconfigured => None,
        }
    }
}

/// Validate a bare attribute map.
pub fn validate_attributes(attrs: &Attributes) -> Result<SensorSettings> {
    Ok(SensorSettings::from_attributes(attrs)?)
}

/// Program enable flags and the interrupt window, in that order.
fn apply_settings<D: SensorDriverPort>(
    driver: &mut D,
    settings: &SensorSettings,
) -> core::result::Result<(), HardwareError> {
    driver.set_proximity_enabled(settings.proximity)?;
    driver.set_color_enabled(settings.color)?;
    driver.set_gesture_enabled(settings.gesture)?;
    driver.set_interrupt_enabled(settings.interrupt)?;
    if settings.interrupt {
        driver.set_interrupt_thresholds(settings.interrupt_window())?;
    }
    Ok(())
}

fn check_deadline(clock: &impl ClockPort, deadline: Option<u64>) -> core::result::Result<(), HardwareError> {
    match deadline {
        Some(d) if clock.now_us() >= d => Err(HardwareError::Timeout),
        _ => Ok(()),
    }
}
