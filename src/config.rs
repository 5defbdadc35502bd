//! Sensor configuration parameters
//!
//! [`SensorSettings`] is parsed from the component's attribute map, the
//! JSON shape of the host's `google.protobuf.Struct`. Every number in that
//! encoding is a double, and hand-written configs often quote values, so
//! parsing is lax: booleans accept `0`/`1` and the usual yes/no words,
//! integers accept integral floats, decimal strings and booleans. `null`
//! and fractional numbers are rejected. Unknown keys are ignored and missing
//! keys take the defaults below.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ValidationError;

/// Attribute map as delivered by the host runtime.
pub type Attributes = Map<String, Value>;

const THRESHOLD_RANGE: (i128, i128) = (0, 255);
const PERSISTENCE_RANGE: (i128, i128) = (0, 15);

/// Validated sensor configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SensorSettings {
    /// Enable the RGBC colour engine.
    pub color: bool,
    /// Enable the gesture engine.
    pub gesture: bool,
    /// Enable the proximity engine.
    pub proximity: bool,
    /// Enable the proximity interrupt.
    pub interrupt: bool,
    /// Proximity interrupt low threshold (0-255)
    pub interrupt_low_threshold: u8,
    /// Proximity interrupt high threshold (0-255)
    pub interrupt_high_threshold: u8,
    /// Proximity interrupt persistence (0-15)
    pub interrupt_persistence_ms: u8,
}

impl Default for SensorSettings {
    fn default() -> Self {
        Self {
            color: false,
            gesture: false,
            proximity: true,
            interrupt: false,
            interrupt_low_threshold: 0,
            interrupt_high_threshold: 255,
            interrupt_persistence_ms: 1,
        }
    }
}

impl SensorSettings {
    /// Parse and range-check the attribute map.
    ///
    /// Out-of-range values are rejected, never clamped.
    pub fn from_attributes(attrs: &Attributes) -> Result<Self, ValidationError> {
        let d = Self::default();
        Ok(Self {
            color: bool_field(attrs, "color", d.color)?,
            gesture: bool_field(attrs, "gesture", d.gesture)?,
            proximity: bool_field(attrs, "proximity", d.proximity)?,
            interrupt: bool_field(attrs, "interrupt", d.interrupt)?,
            interrupt_low_threshold: int_field(
                attrs,
                "interrupt_low_threshold",
                d.interrupt_low_threshold,
                THRESHOLD_RANGE,
            )?,
            interrupt_high_threshold: int_field(
                attrs,
                "interrupt_high_threshold",
                d.interrupt_high_threshold,
                THRESHOLD_RANGE,
            )?,
            interrupt_persistence_ms: int_field(
                attrs,
                "interrupt_persistence_ms",
                d.interrupt_persistence_ms,
                PERSISTENCE_RANGE,
            )?,
        })
    }

    /// Render back into an attribute map (all keys present).
    pub fn to_attributes(&self) -> Attributes {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// The `(low, high, persistence)` proximity interrupt window.
    pub fn interrupt_window(&self) -> InterruptWindow {
        InterruptWindow {
            low: self.interrupt_low_threshold,
            high: self.interrupt_high_threshold,
            persistence: self.interrupt_persistence_ms,
        }
    }
}

/// Proximity interrupt threshold window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterruptWindow {
    pub low: u8,
    pub high: u8,
    pub persistence: u8,
}

fn bool_field(attrs: &Attributes, field: &'static str, default: bool) -> Result<bool, ValidationError> {
    let Some(value) = attrs.get(field) else {
        return Ok(default);
    };
    let parsed = match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f == 0.0 => Some(false),
            Some(f) if f == 1.0 => Some(true),
            _ => None,
        },
        Value::String(s) => parse_bool_str(s),
        _ => None,
    };
    parsed.ok_or(ValidationError::WrongType {
        field,
        expected: "a boolean",
    })
}

fn parse_bool_str(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "on" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn int_field(
    attrs: &Attributes,
    field: &'static str,
    default: u8,
    (min, max): (i128, i128),
) -> Result<u8, ValidationError> {
    let Some(value) = attrs.get(field) else {
        return Ok(default);
    };
    let int = match value {
        Value::Number(n) => number_as_int(n),
        Value::String(s) => parse_int_str(s),
        Value::Bool(b) => Some(i128::from(*b)),
        _ => None,
    }
    .ok_or(ValidationError::WrongType {
        field,
        expected: "an integer",
    })?;
    if !(min..=max).contains(&int) {
        return Err(ValidationError::OutOfRange {
            field,
            value: int,
            min,
            max,
        });
    }
    Ok(int as u8)
}

fn number_as_int(n: &serde_json::Number) -> Option<i128> {
    if let Some(i) = n.as_i64() {
        return Some(i128::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Some(i128::from(u));
    }
    match n.as_f64() {
        // Saturating conversion; anything this large fails the range check.
        Some(f) if f.is_finite() && f.fract() == 0.0 => Some(f as i128),
        _ => None,
    }
}

/// Decimal integer text, optionally signed, with surrounding whitespace and
/// a zero fraction (`"12.00"`) tolerated.
fn parse_int_str(s: &str) -> Option<i128> {
    let s = s.trim();
    let s = match s.split_once('.') {
        Some((whole, frac)) if !whole.is_empty() && frac.bytes().all(|b| b == b'0') => whole,
        Some(_) => return None,
        None => s,
    };
    s.parse().ok()
}
