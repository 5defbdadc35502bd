//! Integration tests for the Apds9960Sensor → SensorDriverPort pipeline.
//!
//! These run on the host and drive the full reconfigure / read chain
//! against the recording mock driver.

use std::time::Duration;

use apds9960_sensor::config::InterruptWindow;
use apds9960_sensor::{APDS9960_MODEL, Apds9960Sensor, ComponentConfig, Error, Gesture, HardwareError};
use futures_lite::future::block_on;
use serde_json::{Value, json};

use super::mock_hw::{DriverCall, MockFactory, StepClock};

type Sensor = Apds9960Sensor<MockFactory, StepClock>;

fn config(attrs: Value) -> ComponentConfig {
    let Value::Object(attrs) = attrs else {
        panic!("attributes must be a JSON object");
    };
    ComponentConfig::new("apds", APDS9960_MODEL, attrs)
}

fn make_sensor() -> (Sensor, MockFactory) {
    let factory = MockFactory::new();
    let sensor = Apds9960Sensor::new("apds", factory.clone(), StepClock::default());
    (sensor, factory)
}

fn configured(attrs: Value) -> (Sensor, MockFactory) {
    let (mut sensor, factory) = make_sensor();
    sensor.reconfigure(&config(attrs), &[]).expect("reconfigure");
    (sensor, factory)
}

// ── End-to-end scenarios ─────────────────────────────────────

#[test]
fn proximity_only_reports_absent_color_and_gesture() {
    let (mut sensor, factory) = configured(json!({
        "proximity": true,
        "color": false,
        "gesture": false,
    }));
    factory.bus.borrow_mut().proximity = 17;

    let reading = block_on(sensor.get_readings(None, None)).unwrap();
    assert_eq!(
        Value::Object(reading.to_map()),
        json!({ "proximity": 17, "color": null, "gesture": null })
    );
}

#[test]
fn color_sample_is_rescaled_per_channel() {
    let (mut sensor, factory) = configured(json!({ "color": true }));
    factory.bus.borrow_mut().color = [65_535, 0, 32_767, 10_000];

    let reading = block_on(sensor.get_readings(None, None)).unwrap();
    assert_eq!(reading.color, Some([255, 0, 127, 38]));
}

#[test]
fn gesture_codes_map_to_directions() {
    let (mut sensor, factory) = configured(json!({ "gesture": true }));

    factory.bus.borrow_mut().gesture = 0x02;
    let reading = block_on(sensor.get_readings(None, None)).unwrap();
    assert_eq!(reading.gesture, Some(Gesture::Down));
    assert_eq!(reading.to_map()["gesture"], json!("down"));

    factory.bus.borrow_mut().gesture = 0x07;
    let reading = block_on(sensor.get_readings(None, None)).unwrap();
    assert_eq!(reading.gesture, Some(Gesture::None));
    assert_eq!(reading.to_map()["gesture"], json!("none"));
}

#[test]
fn out_of_range_threshold_fails_before_bus_is_opened() {
    let bad = config(json!({ "interrupt": true, "interrupt_low_threshold": 300 }));

    let err = Sensor::validate_config(&bad).unwrap_err();
    assert!(matches!(err, Error::Validation(_)), "got {err:?}");

    let (mut sensor, factory) = make_sensor();
    let err = sensor.reconfigure(&bad, &[]).unwrap_err();
    assert!(matches!(err, Error::Validation(_)), "got {err:?}");
    assert_eq!(factory.bus.borrow().opened, 0, "no handle may be opened");
    assert!(!sensor.is_configured());
}

// ── Reconfigure semantics ────────────────────────────────────

#[test]
fn validate_is_side_effect_free() {
    let factory = MockFactory::new();
    let deps = Sensor::validate_config(&config(json!({ "color": true }))).unwrap();
    assert!(deps.is_empty());
    assert_eq!(factory.bus.borrow().opened, 0);
    assert!(factory.bus.borrow().calls.is_empty());
}

#[test]
fn enables_are_applied_in_order() {
    let (_sensor, factory) = configured(json!({ "color": true }));
    assert_eq!(
        factory.bus.borrow().calls_on(1),
        vec![
            DriverCall::Proximity(true),
            DriverCall::Color(true),
            DriverCall::Gesture(false),
            DriverCall::Interrupt(false),
        ]
    );
}

#[test]
fn interrupt_window_programmed_after_interrupt_enable() {
    let (_sensor, factory) = configured(json!({
        "interrupt": true,
        "interrupt_low_threshold": 20,
        "interrupt_high_threshold": 180,
        "interrupt_persistence_ms": 4,
    }));
    let calls = factory.bus.borrow().calls_on(1);
    assert_eq!(
        &calls[3..],
        &[
            DriverCall::Interrupt(true),
            DriverCall::Thresholds(InterruptWindow {
                low: 20,
                high: 180,
                persistence: 4,
            }),
        ]
    );
}

#[test]
fn reconfigure_replaces_previous_flags() {
    let (mut sensor, factory) = configured(json!({ "color": true, "gesture": true }));
    let first = block_on(sensor.get_readings(None, None)).unwrap();
    assert!(first.color.is_some() && first.gesture.is_some());

    sensor.reconfigure(&config(json!({})), &[]).unwrap();
    assert_eq!(factory.bus.borrow().opened, 2, "each reconfigure opens a new handle");

    let second = block_on(sensor.get_readings(None, None)).unwrap();
    assert!(second.proximity.is_some());
    assert_eq!(second.color, None);
    assert_eq!(second.gesture, None);
}

#[test]
fn disabled_capabilities_are_never_read() {
    let (mut sensor, factory) = configured(json!({ "proximity": false }));
    for _ in 0..3 {
        let reading = block_on(sensor.get_readings(None, None)).unwrap();
        assert_eq!(reading, apds9960_sensor::Reading::default());
    }
    assert_eq!(factory.bus.borrow().reads(), 0);
}

#[test]
fn every_read_issues_fresh_transactions() {
    let (mut sensor, factory) = configured(json!({ "color": true }));
    block_on(sensor.get_readings(None, None)).unwrap();
    block_on(sensor.get_readings(None, None)).unwrap();
    assert_eq!(factory.bus.borrow().reads(), 4);
}

// ── Error propagation ────────────────────────────────────────

#[test]
fn read_failure_propagates_as_hardware_error() {
    let (mut sensor, factory) = configured(json!({}));
    factory.bus.borrow_mut().fail_reads = true;
    let err = block_on(sensor.get_readings(None, None)).unwrap_err();
    assert!(matches!(err, Error::Hardware(HardwareError::Bus(_))), "got {err:?}");
}

#[test]
fn partial_failure_fails_whole_read() {
    let (mut sensor, factory) = configured(json!({ "color": true, "gesture": true }));
    factory.bus.borrow_mut().fail_gesture = true;
    let err = block_on(sensor.get_readings(None, None)).unwrap_err();
    assert!(matches!(err, Error::Hardware(_)));
    // proximity and colour were read before the failure
    assert_eq!(factory.bus.borrow().reads(), 3);
}

#[test]
fn open_failure_leaves_sensor_unconfigured() {
    let (mut sensor, factory) = configured(json!({}));
    factory.bus.borrow_mut().fail_open = true;

    let err = sensor.reconfigure(&config(json!({ "color": true })), &[]).unwrap_err();
    assert_eq!(err, Error::Hardware(HardwareError::BusOpen));
    assert!(!sensor.is_configured());

    let err = block_on(sensor.get_readings(None, None)).unwrap_err();
    assert_eq!(err, Error::Hardware(HardwareError::NotConfigured));
}

#[test]
fn programming_failure_leaves_sensor_unconfigured() {
    let (mut sensor, factory) = configured(json!({ "color": true }));
    factory.bus.borrow_mut().fail_enable = true;

    let err = sensor.reconfigure(&config(json!({ "gesture": true })), &[]).unwrap_err();
    assert_eq!(err, Error::Hardware(HardwareError::Bus(embedded_hal::i2c::ErrorKind::Other)));
    assert!(!sensor.is_configured());
    assert_eq!(sensor.settings(), None);
    // the new handle stopped at the failing enable
    assert_eq!(
        factory.bus.borrow().calls_on(2),
        vec![DriverCall::Proximity(true), DriverCall::Color(false), DriverCall::Gesture(true)]
    );

    let err = block_on(sensor.get_readings(None, None)).unwrap_err();
    assert_eq!(err, Error::Hardware(HardwareError::NotConfigured));
}

// ── Timeout ──────────────────────────────────────────────────

#[test]
fn deadline_checked_between_transactions() {
    let factory = MockFactory::new();
    let mut sensor = Apds9960Sensor::new("apds", factory.clone(), StepClock::stepping(1_000));
    sensor
        .reconfigure(&config(json!({ "color": true, "gesture": true })), &[])
        .unwrap();

    // Deadline at 2.5 ms: the clock reads 1 ms before proximity, 2 ms
    // before colour and 3 ms before gesture.
    let err = block_on(sensor.get_readings(None, Some(Duration::from_micros(2_500)))).unwrap_err();
    assert_eq!(err, Error::Hardware(HardwareError::Timeout));
    assert_eq!(factory.bus.borrow().reads(), 2, "gesture must not be read");
}

#[test]
fn no_timeout_means_no_deadline() {
    let factory = MockFactory::new();
    let mut sensor = Apds9960Sensor::new("apds", factory, StepClock::stepping(u64::MAX / 4));
    sensor
        .reconfigure(&config(json!({ "color": true, "gesture": true })), &[])
        .unwrap();
    assert!(block_on(sensor.get_readings(None, None)).is_ok());
}

#[test]
fn extra_is_ignored() {
    let (mut sensor, _factory) = configured(json!({}));
    let extra = json!({ "from_data_manager": true });
    let extra = extra.as_object();
    assert!(block_on(sensor.get_readings(extra, None)).is_ok());
}
