//! Fuzz target: remote alarm-limits string parser.
//!
//! The argument arrives from the network unvalidated; the parser must
//! never panic, and anything it accepts must format back to the same pair.

#![no_main]

use leakdetector::limits::parse_limits;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = core::str::from_utf8(data) else {
        return;
    };
    if let Ok(limits) = parse_limits(s) {
        let again = format!("{},{}", limits.low, limits.high);
        assert_eq!(parse_limits(&again), Ok(limits));
    }
});
