//! Fuzz target for the delimited and JSON loaders.
//!
//! The loader must never panic on malformed input, whatever the delimiter
//! or encoding.

#![no_main]

use edastat::Loader;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    let loader = Loader::new();
    for delimiter in [b',', b'\t', b';', b'|'] {
        let _ = loader.parse_delimited(data, delimiter);
    }

    if let Ok(text) = std::str::from_utf8(data) {
        let _ = loader.parse_json(text);
    }
});
