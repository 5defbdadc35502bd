//! Bus and address assignments for the APDS9960 breakout.
//!
//! Single source of truth: the bus factory and the register driver
//! reference this module rather than hard-coding the device path or the
//! I2C address.

// ---------------------------------------------------------------------------
// I2C bus
// ---------------------------------------------------------------------------

/// Default Linux I2C character device (SDA/SCL header pins on a Pi-style board).
pub const DEFAULT_I2C_BUS: &str = "/dev/i2c-1";

/// Environment variable that overrides [`DEFAULT_I2C_BUS`] for the runner.
pub const I2C_BUS_ENV: &str = "APDS9960_I2C_BUS";

// ---------------------------------------------------------------------------
// APDS9960
// ---------------------------------------------------------------------------

/// Fixed 7-bit I2C address of the APDS9960.
pub const APDS9960_I2C_ADDR: u8 = 0x39;
