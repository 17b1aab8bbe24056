//! Scrubbing of secrets from text that is about to be shown to a user.
//!
//! The bridge relays raw CLI output and error strings. Anything that ends
//! up in UI state passes through [`sanitize_output`] first.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PRIVATE_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"suiprivkey[a-zA-Z0-9]+").expect("Invalid private key regex"));

static FULL_ADDRESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"0x[a-fA-F0-9]{64}").expect("Invalid address regex"));

static MNEMONIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([a-z]+\s+){11,23}[a-z]+\b").expect("Invalid mnemonic regex")
});

/// Replace private keys, full-length addresses and mnemonic phrases.
pub fn sanitize_output(text: &str) -> String {
    let result = PRIVATE_KEY.replace_all(text, "****");
    let result = FULL_ADDRESS.replace_all(&result, |caps: &Captures<'_>| mask_address(&caps[0]));
    let result = MNEMONIC.replace_all(&result, "[MNEMONIC]");
    result.into_owned()
}

/// Shorten an address to `0x` + first four + `...` + last four digits.
///
/// Inputs shorter than 10 characters are returned unchanged.
pub fn mask_address(addr: &str) -> String {
    if addr.len() < 10 || !addr.is_ascii() {
        return addr.to_string();
    }
    format!("0x{}...{}", &addr[2..6], &addr[addr.len() - 4..])
}
