//! Port traits: the hexagonal boundary between the resource logic and the
//! sensor hardware.
//!
//! ```text
//!   Apds9960Adapter ──▶ SensorDriverPort ──▶ Apds9960Sensor (service)
//!   I2cBusFactory   ──▶ DriverFactory    ──┘
//! ```
//!
//! The [`Apds9960Sensor`](super::service::Apds9960Sensor) consumes these
//! through generics, so the service never touches the bus directly and the
//! whole read path is testable with a fake driver.

use crate::config::InterruptWindow;
use crate::error::HardwareError;

// ───────────────────────────────────────────────────────────────
// Sensor driver port (driven adapter: domain ↔ sensor)
// ───────────────────────────────────────────────────────────────

/// Capability contract of an opened APDS9960 handle.
///
/// Each call is one independent bus transaction (or a short sequence of
/// them); implementations do no caching.
pub trait SensorDriverPort {
    fn set_proximity_enabled(&mut self, enabled: bool) -> Result<(), HardwareError>;

    fn set_color_enabled(&mut self, enabled: bool) -> Result<(), HardwareError>;

    fn set_gesture_enabled(&mut self, enabled: bool) -> Result<(), HardwareError>;

    /// Enable or disable the proximity interrupt.
    fn set_interrupt_enabled(&mut self, enabled: bool) -> Result<(), HardwareError>;

    /// Program the proximity interrupt window (low, high, persistence).
    fn set_interrupt_thresholds(&mut self, window: InterruptWindow) -> Result<(), HardwareError>;

    /// Raw 8-bit proximity count.
    fn read_proximity(&mut self) -> Result<u8, HardwareError>;

    /// Raw `[red, green, blue, clear]` 16-bit channel counts.
    fn read_color(&mut self) -> Result<[u16; 4], HardwareError>;

    /// Raw gesture code: 1 up, 2 down, 3 left, 4 right, anything else none.
    fn read_gesture(&mut self) -> Result<u8, HardwareError>;
}

// ───────────────────────────────────────────────────────────────
// Driver factory (opens the bus and the device handle)
// ───────────────────────────────────────────────────────────────

/// Opens a fresh sensor handle. Called once per reconfigure.
pub trait DriverFactory {
    type Driver: SensorDriverPort;

    fn open(&mut self) -> Result<Self::Driver, HardwareError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port (read deadlines)
// ───────────────────────────────────────────────────────────────

/// Monotonic time source.
pub trait ClockPort {
    /// Microseconds since an arbitrary fixed origin.
    fn now_us(&self) -> u64;
}
