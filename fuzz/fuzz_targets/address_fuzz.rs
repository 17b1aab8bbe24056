//! Fuzz test for SuiAddress parsing
//!
//! Parsing arbitrary text must never panic, and any accepted input must
//! canonicalize to a form that parses back to the same address.
//!
//! Run with: cargo +nightly fuzz run address_fuzz -- -max_total_time=60

#![no_main]

use libfuzzer_sys::fuzz_target;
use suiterm_core::SuiAddress;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(address) = input.parse::<SuiAddress>() {
            let canonical = address.to_canonical();
            assert_eq!(canonical.len(), 66, "Canonical form is 0x + 64 digits");
            assert_eq!(canonical, canonical.to_lowercase());

            let reparsed: SuiAddress = canonical
                .parse()
                .expect("Canonical form should always parse");
            assert_eq!(reparsed, address, "Canonical form should round-trip");
        }
    }
});
