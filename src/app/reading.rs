//! Reading map produced by one sensor poll.
//!
//! Disabled capabilities are `None` here and `null` in the JSON map the
//! host receives, which keeps "no data" distinct from a zero reading.

use serde::Serialize;
use serde_json::{Map, Value};

/// Full-scale raw colour channel count.
pub const MAX_COLOR_DATA: u32 = 65_535;
/// Full-scale formatted colour channel.
pub const MAX_COLOR_RGB: u32 = 255;

/// Swipe direction reported by the gesture engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gesture {
    Up,
    Down,
    Left,
    Right,
    None,
}

impl Gesture {
    /// Map a raw gesture code. Every code other than 1–4 is [`Gesture::None`].
    pub const fn from_code(code: u8) -> Self {
        match code {
            0x01 => Self::Up,
            0x02 => Self::Down,
            0x03 => Self::Left,
            0x04 => Self::Right,
            _ => Self::None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
            Self::None => "none",
        }
    }
}

impl core::fmt::Display for Gesture {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rescale one 16-bit colour channel to 0–255, truncating.
pub const fn scale_color_channel(raw: u16) -> u8 {
    (raw as u32 * MAX_COLOR_RGB / MAX_COLOR_DATA) as u8
}

/// Rescale a raw `[r, g, b, c]` sample channel by channel.
pub fn format_color(raw: [u16; 4]) -> [u8; 4] {
    raw.map(scale_color_channel)
}

/// One sensor poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Reading {
    pub proximity: Option<u8>,
    pub color: Option<[u8; 4]>,
    pub gesture: Option<Gesture>,
}

impl Reading {
    /// Render as the host's generic reading map (exactly three keys).
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::with_capacity(3);
        map.insert(
            "proximity".into(),
            self.proximity.map_or(Value::Null, Value::from),
        );
        map.insert(
            "color".into(),
            self.color
                .map_or(Value::Null, |c| Value::Array(c.iter().map(|&v| Value::from(v)).collect())),
        );
        map.insert(
            "gesture".into(),
            self.gesture.map_or(Value::Null, |g| Value::from(g.as_str())),
        );
        map
    }
}
