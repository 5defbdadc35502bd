//! Hardware adapter: bridges the APDS9960 register driver to the
//! [`SensorDriverPort`] and [`DriverFactory`] port traits.
//!
//! [`Apds9960Adapter`] is the only type in the system that issues sensor
//! bus transactions. [`BusDriverFactory`] opens the bus, initialises the
//! part and hands the adapter to the service on every reconfigure.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::app::ports::{DriverFactory, SensorDriverPort};
use crate::config::InterruptWindow;
use crate::drivers::apds9960::Apds9960;
use crate::error::HardwareError;

/// Concrete adapter that exposes the register driver behind the port trait.
pub struct Apds9960Adapter<I, D> {
    sensor: Apds9960<I, D>,
}

impl<I: I2c, D: DelayNs> Apds9960Adapter<I, D> {
    pub fn new(sensor: Apds9960<I, D>) -> Self {
        Self { sensor }
    }

    /// Release the underlying bus and delay.
    pub fn release(self) -> (I, D) {
        self.sensor.release()
    }
}

// ── SensorDriverPort implementation ───────────────────────────

impl<I: I2c, D: DelayNs> SensorDriverPort for Apds9960Adapter<I, D> {
    fn set_proximity_enabled(&mut self, enabled: bool) -> Result<(), HardwareError> {
        self.sensor.enable_proximity(enabled)
    }

    fn set_color_enabled(&mut self, enabled: bool) -> Result<(), HardwareError> {
        self.sensor.enable_color(enabled)
    }

    fn set_gesture_enabled(&mut self, enabled: bool) -> Result<(), HardwareError> {
        self.sensor.enable_gesture(enabled)
    }

    fn set_interrupt_enabled(&mut self, enabled: bool) -> Result<(), HardwareError> {
        self.sensor.enable_proximity_interrupt(enabled)
    }

    fn set_interrupt_thresholds(&mut self, window: InterruptWindow) -> Result<(), HardwareError> {
        self.sensor.set_proximity_interrupt_threshold(window)
    }

    fn read_proximity(&mut self) -> Result<u8, HardwareError> {
        self.sensor.proximity()
    }

    fn read_color(&mut self) -> Result<[u16; 4], HardwareError> {
        self.sensor.color_data()
    }

    fn read_gesture(&mut self) -> Result<u8, HardwareError> {
        self.sensor.gesture()
    }
}

// ── DriverFactory implementation ──────────────────────────────

/// Opens a bus with `open_bus`, then initialises a fresh driver on it.
pub struct BusDriverFactory<M> {
    open_bus: M,
}

impl<M> BusDriverFactory<M> {
    pub fn new(open_bus: M) -> Self {
        Self { open_bus }
    }
}

impl<M, I, D> DriverFactory for BusDriverFactory<M>
where
    M: FnMut() -> Result<(I, D), HardwareError>,
    I: I2c,
    D: DelayNs,
{
    type Driver = Apds9960Adapter<I, D>;

    fn open(&mut self) -> Result<Self::Driver, HardwareError> {
        let (i2c, delay) = (self.open_bus)()?;
        let mut sensor = Apds9960::new(i2c, delay);
        sensor.init()?;
        Ok(Apds9960Adapter::new(sensor))
    }
}

// ── Linux /dev/i2c-* bus ──────────────────────────────────────

#[cfg(feature = "linux")]
pub use linux::{LinuxBusFactory, linux_bus_factory};

#[cfg(feature = "linux")]
mod linux {
    use linux_embedded_hal::{Delay, I2cdev};
    use log::warn;

    use super::BusDriverFactory;
    use crate::error::HardwareError;

    /// Factory over a Linux I2C character device.
    pub type LinuxBusFactory = BusDriverFactory<Box<dyn FnMut() -> Result<(I2cdev, Delay), HardwareError>>>;

    /// Build a factory that opens `path` (e.g. `/dev/i2c-1`) on every reconfigure.
    pub fn linux_bus_factory(path: impl Into<String>) -> LinuxBusFactory {
        let path = path.into();
        BusDriverFactory::new(Box::new(move || {
            let i2c = I2cdev::new(&path).map_err(|e| {
                warn!("opening {} failed: {}", path, e);
                HardwareError::BusOpen
            })?;
            Ok((i2c, Delay))
        }))
    }
}
