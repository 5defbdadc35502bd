//! Fuzz target: `GestureDecoder::feed`
//!
//! Streams arbitrary bytes through the decoder four at a time, the way the
//! gesture FIFO delivers them, and asserts it only ever reports codes 0–4.
//!
//! cargo fuzz run fuzz_gesture_decoder

#![no_main]

use apds9960_sensor::drivers::gesture::GestureDecoder;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut decoder = GestureDecoder::new();

    for chunk in data.chunks_exact(4) {
        let step = decoder.feed([chunk[0], chunk[1], chunk[2], chunk[3]]);
        assert!(step.code <= 4, "code outside the gesture vocabulary");
        if step.code != 0 {
            decoder.reset();
        }
    }
});
