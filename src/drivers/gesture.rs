//! Gesture FIFO direction decoder.
//!
//! The gesture engine fills a FIFO with `(up, down, left, right)` photodiode
//! datasets. A swipe shows up as an imbalance on one axis that first leans
//! one way (leading edge) and then the other (trailing edge). The decoder
//! counts leading edges per direction and reports a gesture on the first
//! matching trailing edge.

/// Swipe up.
pub const GESTURE_UP: u8 = 0x01;
/// Swipe down.
pub const GESTURE_DOWN: u8 = 0x02;
/// Swipe left.
pub const GESTURE_LEFT: u8 = 0x03;
/// Swipe right.
pub const GESTURE_RIGHT: u8 = 0x04;
/// No gesture detected.
pub const GESTURE_NONE: u8 = 0x00;

/// Minimum photodiode imbalance that counts as an edge.
const EDGE_THRESHOLD: i16 = 13;

/// Result of feeding one dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// The dataset crossed the edge threshold on either axis.
    pub edge: bool,
    /// Detected gesture code, or [`GESTURE_NONE`].
    pub code: u8,
}

#[derive(Debug, Default)]
pub struct GestureDecoder {
    saw_up_start: u8,
    saw_down_start: u8,
    saw_left_start: u8,
    saw_right_start: u8,
}

impl GestureDecoder {
    pub const fn new() -> Self {
        Self {
            saw_up_start: 0,
            saw_down_start: 0,
            saw_left_start: 0,
            saw_right_start: 0,
        }
    }

    /// Feed one `[up, down, left, right]` FIFO dataset.
    pub fn feed(&mut self, dataset: [u8; 4]) -> Step {
        let [up, down, left, right] = dataset.map(i16::from);
        let up_down = imbalance(up, down);
        let left_right = imbalance(left, right);
        let mut code = GESTURE_NONE;

        if up_down < 0 {
            if self.saw_down_start > 0 {
                code = GESTURE_UP;
            } else {
                self.saw_up_start = self.saw_up_start.saturating_add(1);
            }
        } else if up_down > 0 {
            if self.saw_up_start > 0 {
                code = GESTURE_DOWN;
            } else {
                self.saw_down_start = self.saw_down_start.saturating_add(1);
            }
        }

        if left_right < 0 {
            if self.saw_right_start > 0 {
                code = GESTURE_LEFT;
            } else {
                self.saw_left_start = self.saw_left_start.saturating_add(1);
            }
        } else if left_right > 0 {
            if self.saw_left_start > 0 {
                code = GESTURE_RIGHT;
            } else {
                self.saw_right_start = self.saw_right_start.saturating_add(1);
            }
        }

        Step {
            edge: up_down != 0 || left_right != 0,
            code,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

fn imbalance(a: i16, b: i16) -> i16 {
    let diff = a - b;
    if diff.abs() > EDGE_THRESHOLD { diff } else { 0 }
}
