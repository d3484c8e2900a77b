#![no_main]

use libfuzzer_sys::fuzz_target;
use tagwire::{adapter, decode, Registry};

fuzz_target!(|data: &[u8]| {
    // Fuzz object decode and raw value unpack - test for panics, crashes,
    // runaway recursion on malformed ext payloads
    let registry = Registry::with_defaults();
    let _ = decode(data, &registry);
    let _ = adapter::unpack(data, &registry);
});
