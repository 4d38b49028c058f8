//! Fuzz target: DHT falling-edge frame decoder.
//!
//! Edge timestamps come from an interrupt on a noisy wire.  Decoding must
//! never panic, and any accepted frame must carry a valid checksum.

#![no_main]

use leakdetector::sensors::dht::decode_frame;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let edges: Vec<u32> = data
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    if let Ok(frame) = decode_frame(&edges) {
        let sum = frame[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
        assert_eq!(sum, frame[4]);
    }
});
