//! Fuzz test for output sanitization
//!
//! Sanitizing arbitrary text must never panic. Text containing none of the
//! secret shapes (no `0x`, no `suiprivkey`, no whitespace-separated word
//! runs) must come back unchanged.
//!
//! Run with: cargo +nightly fuzz run sanitize_fuzz -- -max_total_time=60

#![no_main]

use libfuzzer_sys::fuzz_target;
use suiterm_core::{mask_address, sanitize_output};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let output = sanitize_output(input);
        let _ = mask_address(input);

        let plain = !input.contains("0x")
            && !input.contains("suiprivkey")
            && !input.chars().any(char::is_whitespace);
        if plain {
            assert_eq!(output, input, "Text without secrets should pass through");
        }
    }
});
