//! APDS9960 proximity / RGBC / gesture sensor driver.
//!
//! Register-level driver over the `embedded-hal` 1.0 I2C and delay traits.
//! Each public method is one short sequence of bus transactions; the driver
//! keeps no cached readings.
//!
//! ## Enable register
//!
//! | bit | name | function            |
//! |-----|------|---------------------|
//! | 0   | PON  | oscillator power on |
//! | 1   | AEN  | RGBC (colour) ADC   |
//! | 2   | PEN  | proximity           |
//! | 5   | PIEN | proximity interrupt |
//! | 6   | GEN  | gesture engine      |

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{Error as _, I2c};
use log::debug;

use super::gesture::{GESTURE_NONE, GestureDecoder};
use crate::config::InterruptWindow;
use crate::error::HardwareError;
use crate::pins::APDS9960_I2C_ADDR;

mod reg {
    pub const ENABLE: u8 = 0x80;
    pub const ATIME: u8 = 0x81;
    pub const PILT: u8 = 0x89;
    pub const PIHT: u8 = 0x8B;
    pub const PERS: u8 = 0x8C;
    pub const ID: u8 = 0x92;
    pub const CDATAL: u8 = 0x94;
    pub const PDATA: u8 = 0x9C;
    pub const GPENTH: u8 = 0xA0;
    pub const GEXTH: u8 = 0xA1;
    pub const GCONF1: u8 = 0xA2;
    pub const GCONF2: u8 = 0xA3;
    pub const GPULSE: u8 = 0xA6;
    pub const GCONF3: u8 = 0xAA;
    pub const GCONF4: u8 = 0xAB;
    pub const GFLVL: u8 = 0xAE;
    pub const GSTATUS: u8 = 0xAF;
    pub const AICLEAR: u8 = 0xE7;
    pub const GFIFO_U: u8 = 0xFC;
}

const ENABLE_PON: u8 = 1 << 0;
const ENABLE_AEN: u8 = 1 << 1;
const ENABLE_PEN: u8 = 1 << 2;
const ENABLE_PIEN: u8 = 1 << 5;
const ENABLE_GEN: u8 = 1 << 6;

const GCONF4_GMODE: u8 = 1 << 0;
const GSTATUS_GVALID: u8 = 1 << 0;
const PERS_PPERS_SHIFT: u8 = 4;
const PERS_PPERS_MASK: u8 = 0xF0;

/// ID register values of genuine parts.
const DEVICE_IDS: [u8; 2] = [0xAB, 0xA8];

/// Gesture FIFO depth in datasets.
const FIFO_DEPTH: usize = 32;
/// Interval between gesture FIFO polls.
const GESTURE_POLL_MS: u32 = 10;
/// Give up after this long without a new edge.
const GESTURE_IDLE_WINDOW_MS: u32 = 300;
/// Hard bound on polls per gesture read.
const GESTURE_MAX_POLLS: u32 = 100;

/// APDS9960 register driver.
pub struct Apds9960<I, D> {
    i2c: I,
    delay: D,
    decoder: GestureDecoder,
}

impl<I: I2c, D: DelayNs> Apds9960<I, D> {
    /// Wrap a bus. The device is not touched until [`init`](Self::init).
    pub fn new(i2c: I, delay: D) -> Self {
        Self {
            i2c,
            delay,
            decoder: GestureDecoder::new(),
        }
    }

    /// Verify the part, clear every engine and power on with gesture defaults.
    pub fn init(&mut self) -> Result<(), HardwareError> {
        let id = self.read_reg(reg::ID)?;
        if !DEVICE_IDS.contains(&id) {
            return Err(HardwareError::UnexpectedDeviceId(id));
        }

        self.write_reg(reg::ENABLE, 0)?;
        self.write_reg(reg::GCONF4, 0)?;
        self.clear_interrupts()?;
        self.delay.delay_ms(10);
        self.write_reg(reg::ENABLE, ENABLE_PON)?;
        self.delay.delay_ms(10);

        // Gesture engine: all four photodiodes, FIFO interrupt after 4
        // datasets, 4x gain, entry threshold 50 counts, 16 us x 6 pulses.
        self.write_reg(reg::GCONF3, 0x00)?;
        self.write_reg(reg::GCONF1, 0x40)?;
        self.write_reg(reg::GCONF2, 0x40)?;
        self.write_reg(reg::GPENTH, 50)?;
        self.write_reg(reg::GEXTH, 0)?;
        self.write_reg(reg::GPULSE, 0x85)?;

        // 256 integration cycles (ATIME = 256 - cycles).
        self.write_reg(reg::ATIME, 0x00)?;
        self.decoder.reset();
        debug!("APDS9960 id=0x{:02X} initialised", id);
        Ok(())
    }

    // ── Engine enables ────────────────────────────────────────

    pub fn enable_proximity(&mut self, on: bool) -> Result<(), HardwareError> {
        self.update_bits(reg::ENABLE, ENABLE_PEN, on)
    }

    pub fn enable_color(&mut self, on: bool) -> Result<(), HardwareError> {
        self.update_bits(reg::ENABLE, ENABLE_AEN, on)
    }

    /// Toggle the gesture engine. Disabling also leaves gesture mode.
    pub fn enable_gesture(&mut self, on: bool) -> Result<(), HardwareError> {
        if !on {
            self.update_bits(reg::GCONF4, GCONF4_GMODE, false)?;
        }
        self.update_bits(reg::ENABLE, ENABLE_GEN, on)
    }

    pub fn enable_proximity_interrupt(&mut self, on: bool) -> Result<(), HardwareError> {
        self.update_bits(reg::ENABLE, ENABLE_PIEN, on)
    }

    /// Program PILT, PIHT and the 4-bit proximity persistence (PPERS).
    pub fn set_proximity_interrupt_threshold(&mut self, window: InterruptWindow) -> Result<(), HardwareError> {
        self.write_reg(reg::PILT, window.low)?;
        self.write_reg(reg::PIHT, window.high)?;
        let persistence = window.persistence.min(15) << PERS_PPERS_SHIFT;
        let pers = self.read_reg(reg::PERS)?;
        self.write_reg(reg::PERS, (pers & !PERS_PPERS_MASK) | persistence)
    }

    /// Clear all non-gesture interrupts.
    pub fn clear_interrupts(&mut self) -> Result<(), HardwareError> {
        self.i2c
            .write(APDS9960_I2C_ADDR, &[reg::AICLEAR])
            .map_err(|e| HardwareError::Bus(e.kind()))
    }

    // ── Data ──────────────────────────────────────────────────

    /// Raw proximity count.
    pub fn proximity(&mut self) -> Result<u8, HardwareError> {
        self.read_reg(reg::PDATA)
    }

    /// Raw `[red, green, blue, clear]` channel counts.
    pub fn color_data(&mut self) -> Result<[u16; 4], HardwareError> {
        let mut buf = [0u8; 8];
        self.read_block(reg::CDATAL, &mut buf)?;
        let word = |i: usize| u16::from_le_bytes([buf[i], buf[i + 1]]);
        // CDATA, RDATA, GDATA, BDATA are laid out in that order.
        Ok([word(2), word(4), word(6), word(0)])
    }

    /// Wait for and decode one swipe.
    ///
    /// Returns [`GESTURE_NONE`] when no valid gesture data is pending, when
    /// the first FIFO poll shows no edge, or when no new edge arrives within
    /// 300 ms.
    pub fn gesture(&mut self) -> Result<u8, HardwareError> {
        if self.read_reg(reg::GSTATUS)? & GSTATUS_GVALID == 0 {
            return Ok(GESTURE_NONE);
        }
        let result = self.poll_gesture();
        self.decoder.reset();
        result
    }

    /// Give the bus and delay back.
    pub fn release(self) -> (I, D) {
        (self.i2c, self.delay)
    }

    fn poll_gesture(&mut self) -> Result<u8, HardwareError> {
        let mut fifo = [0u8; FIFO_DEPTH * 4];
        let mut last_edge: Option<u32> = None;

        for poll in 0..GESTURE_MAX_POLLS {
            self.delay.delay_ms(GESTURE_POLL_MS);

            let level = usize::from(self.read_reg(reg::GFLVL)?).min(FIFO_DEPTH);
            if level > 0 {
                let data = &mut fifo[..level * 4];
                self.read_block(reg::GFIFO_U, data)?;
                let step = self.decoder.feed([data[0], data[1], data[2], data[3]]);
                if step.code != GESTURE_NONE {
                    return Ok(step.code);
                }
                if step.edge {
                    last_edge = Some(poll);
                }
            }

            match last_edge {
                None => return Ok(GESTURE_NONE),
                Some(edge) if (poll - edge) * GESTURE_POLL_MS > GESTURE_IDLE_WINDOW_MS => {
                    return Ok(GESTURE_NONE);
                }
                Some(_) => {}
            }
        }
        Ok(GESTURE_NONE)
    }

    // ── Register access ───────────────────────────────────────

    fn read_reg(&mut self, register: u8) -> Result<u8, HardwareError> {
        let mut buf = [0u8; 1];
        self.read_block(register, &mut buf)?;
        Ok(buf[0])
    }

    fn read_block(&mut self, register: u8, buf: &mut [u8]) -> Result<(), HardwareError> {
        self.i2c
            .write_read(APDS9960_I2C_ADDR, &[register], buf)
            .map_err(|e| HardwareError::Bus(e.kind()))
    }

    fn write_reg(&mut self, register: u8, value: u8) -> Result<(), HardwareError> {
        self.i2c
            .write(APDS9960_I2C_ADDR, &[register, value])
            .map_err(|e| HardwareError::Bus(e.kind()))
    }

    fn update_bits(&mut self, register: u8, mask: u8, set: bool) -> Result<(), HardwareError> {
        let current = self.read_reg(register)?;
        let next = if set { current | mask } else { current & !mask };
        if next != current {
            self.write_reg(register, next)?;
        }
        Ok(())
    }
}
