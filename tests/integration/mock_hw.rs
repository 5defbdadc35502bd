//! Mock sensor hardware for integration tests.
//!
//! Every handle opened by [`MockFactory`] records its port calls into a
//! shared [`MockBus`], so tests can assert on the full command history and
//! inject raw values or failures after the factory has been moved into the
//! resource.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use apds9960_sensor::HardwareError;
use apds9960_sensor::app::ports::{ClockPort, DriverFactory, SensorDriverPort};
use apds9960_sensor::config::InterruptWindow;
use embedded_hal::i2c::ErrorKind;

// ── Driver call record ────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverCall {
    Proximity(bool),
    Color(bool),
    Gesture(bool),
    Interrupt(bool),
    Thresholds(InterruptWindow),
    ReadProximity,
    ReadColor,
    ReadGesture,
}

// ── Shared bus state ──────────────────────────────────────────

#[derive(Debug)]
pub struct MockBus {
    /// `(handle, call)` in issue order; handles count up from 1.
    pub calls: Vec<(usize, DriverCall)>,
    pub opened: usize,
    pub proximity: u8,
    pub color: [u16; 4],
    pub gesture: u8,
    pub fail_open: bool,
    pub fail_reads: bool,
    pub fail_gesture: bool,
    /// Makes `set_gesture_enabled` fail while programming a new handle.
    pub fail_enable: bool,
}

impl Default for MockBus {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            opened: 0,
            proximity: 0,
            color: [0; 4],
            gesture: 0,
            fail_open: false,
            fail_reads: false,
            fail_gesture: false,
            fail_enable: false,
        }
    }
}

#[allow(dead_code)]
impl MockBus {
    /// Calls issued on one handle, in order.
    pub fn calls_on(&self, handle: usize) -> Vec<DriverCall> {
        self.calls
            .iter()
            .filter(|(h, _)| *h == handle)
            .map(|(_, c)| *c)
            .collect()
    }

    pub fn reads(&self) -> usize {
        self.calls
            .iter()
            .filter(|(_, c)| {
                matches!(
                    c,
                    DriverCall::ReadProximity | DriverCall::ReadColor | DriverCall::ReadGesture
                )
            })
            .count()
    }
}

pub type SharedBus = Rc<RefCell<MockBus>>;

// ── MockDriver ────────────────────────────────────────────────

pub struct MockDriver {
    handle: usize,
    bus: SharedBus,
}

impl MockDriver {
    fn record(&self, call: DriverCall) {
        self.bus.borrow_mut().calls.push((self.handle, call));
    }

    fn read_guard(&self) -> Result<(), HardwareError> {
        if self.bus.borrow().fail_reads {
            Err(HardwareError::Bus(ErrorKind::NoAcknowledge(
                embedded_hal::i2c::NoAcknowledgeSource::Address,
            )))
        } else {
            Ok(())
        }
    }
}

impl SensorDriverPort for MockDriver {
    fn set_proximity_enabled(&mut self, enabled: bool) -> Result<(), HardwareError> {
        self.record(DriverCall::Proximity(enabled));
        Ok(())
    }

    fn set_color_enabled(&mut self, enabled: bool) -> Result<(), HardwareError> {
        self.record(DriverCall::Color(enabled));
        Ok(())
    }

    fn set_gesture_enabled(&mut self, enabled: bool) -> Result<(), HardwareError> {
        self.record(DriverCall::Gesture(enabled));
        if self.bus.borrow().fail_enable {
            return Err(HardwareError::Bus(ErrorKind::Other));
        }
        Ok(())
    }

    fn set_interrupt_enabled(&mut self, enabled: bool) -> Result<(), HardwareError> {
        self.record(DriverCall::Interrupt(enabled));
        Ok(())
    }

    fn set_interrupt_thresholds(&mut self, window: InterruptWindow) -> Result<(), HardwareError> {
        self.record(DriverCall::Thresholds(window));
        Ok(())
    }

    fn read_proximity(&mut self) -> Result<u8, HardwareError> {
        self.record(DriverCall::ReadProximity);
        self.read_guard()?;
        Ok(self.bus.borrow().proximity)
    }

    fn read_color(&mut self) -> Result<[u16; 4], HardwareError> {
        self.record(DriverCall::ReadColor);
        self.read_guard()?;
        Ok(self.bus.borrow().color)
    }

    fn read_gesture(&mut self) -> Result<u8, HardwareError> {
        self.record(DriverCall::ReadGesture);
        self.read_guard()?;
        if self.bus.borrow().fail_gesture {
            return Err(HardwareError::Bus(ErrorKind::Bus));
        }
        Ok(self.bus.borrow().gesture)
    }
}

// ── MockFactory ───────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockFactory {
    pub bus: SharedBus,
}

impl MockFactory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DriverFactory for MockFactory {
    type Driver = MockDriver;

    fn open(&mut self) -> Result<MockDriver, HardwareError> {
        let mut bus = self.bus.borrow_mut();
        if bus.fail_open {
            return Err(HardwareError::BusOpen);
        }
        bus.opened += 1;
        Ok(MockDriver {
            handle: bus.opened,
            bus: Rc::clone(&self.bus),
        })
    }
}

// ── StepClock ─────────────────────────────────────────────────

/// Clock that advances by `step_us` on every query.
#[derive(Default)]
pub struct StepClock {
    now: Cell<u64>,
    pub step_us: u64,
}

#[allow(dead_code)]
impl StepClock {
    pub fn stepping(step_us: u64) -> Self {
        Self {
            now: Cell::new(0),
            step_us,
        }
    }
}

impl ClockPort for StepClock {
    fn now_us(&self) -> u64 {
        let t = self.now.get();
        self.now.set(t + self.step_us);
        t
    }
}
