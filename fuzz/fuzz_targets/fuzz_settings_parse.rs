//! Fuzz target: `SensorSettings::from_attributes`
//!
//! Parses arbitrary bytes as a JSON attribute map and asserts that parsing
//! never panics and that every accepted config is within range and
//! survives a render/parse round trip unchanged.
//!
//! cargo fuzz run fuzz_settings_parse

#![no_main]

use apds9960_sensor::config::{Attributes, SensorSettings};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(attrs) = serde_json::from_slice::<Attributes>(data) else {
        return;
    };

    if let Ok(settings) = SensorSettings::from_attributes(&attrs) {
        assert!(settings.interrupt_persistence_ms <= 15, "persistence out of range");

        let again = SensorSettings::from_attributes(&settings.to_attributes())
            .expect("rendered settings must parse");
        assert_eq!(settings, again);
    }
});
