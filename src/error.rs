//! Unified error types for the APDS9960 sensor resource.
//!
//! Two failure kinds come out of the sensor resource: a rejected
//! configuration ([`ValidationError`]) and a bus or device failure
//! ([`HardwareError`]). The model registry adds [`RegistryError`]. All of
//! them convert into the top-level [`Error`] so every API shares a single
//! `Result` alias.

use core::fmt;

use embedded_hal::i2c::ErrorKind;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible resource operation funnels into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The configuration attributes were rejected.
    Validation(ValidationError),
    /// The bus or the sensor failed.
    Hardware(HardwareError),
    /// The model registry could not resolve or accept a model.
    Registry(RegistryError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(e) => write!(f, "validation: {e}"),
            Self::Hardware(e) => write!(f, "hardware: {e}"),
            Self::Registry(e) => write!(f, "registry: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Validation errors
// ---------------------------------------------------------------------------

/// A configuration attribute failed type or range checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// The attribute is present but holds the wrong JSON type.
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
    /// The attribute is an integer outside its closed range.
    OutOfRange {
        field: &'static str,
        value: i128,
        min: i128,
        max: i128,
    },
}

impl ValidationError {
    /// Name of the offending attribute.
    pub fn field(&self) -> &'static str {
        match self {
            Self::WrongType { field, .. } | Self::OutOfRange { field, .. } => field,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongType { field, expected } => {
                write!(f, "{field} must be {expected}")
            }
            Self::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(f, "{field} must be {min}–{max}, got {value}"),
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for Error {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

// ---------------------------------------------------------------------------
// Hardware errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwareError {
    /// The bus device could not be opened.
    BusOpen,
    /// An I2C transaction failed.
    Bus(ErrorKind),
    /// The ID register did not identify an APDS9960.
    UnexpectedDeviceId(u8),
    /// A read was requested before the first successful reconfigure.
    NotConfigured,
    /// The caller's read deadline passed between bus transactions.
    Timeout,
}

impl fmt::Display for HardwareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BusOpen => write!(f, "I2C bus open failed"),
            Self::Bus(kind) => write!(f, "I2C transaction failed: {kind}"),
            Self::UnexpectedDeviceId(id) => write!(f, "unexpected device id 0x{id:02X}"),
            Self::NotConfigured => write!(f, "sensor not configured"),
            Self::Timeout => write!(f, "read deadline exceeded"),
        }
    }
}

impl std::error::Error for HardwareError {}

impl From<HardwareError> for Error {
    fn from(e: HardwareError) -> Self {
        Self::Hardware(e)
    }
}

// ---------------------------------------------------------------------------
// Registry errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The model triple is already registered.
    DuplicateModel(String),
    /// No registration exists for the model triple.
    UnknownModel(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateModel(m) => write!(f, "model {m} already registered"),
            Self::UnknownModel(m) => write!(f, "unknown model {m}"),
        }
    }
}

impl std::error::Error for RegistryError {}

impl From<RegistryError> for Error {
    fn from(e: RegistryError) -> Self {
        Self::Registry(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
