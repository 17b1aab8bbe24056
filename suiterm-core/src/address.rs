//! Canonical Sui account / object addresses.
//!
//! A `SuiAddress` can only be obtained by parsing, and parsing always
//! produces the canonical form: lowercase, `0x` prefix, 64 hex digits.
//! Cache keys embed addresses, so two spellings of the same address
//! (`0x2`, `0x0000...0002`, `0X02`) must end up identical here.

use crate::error::AddressError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of bytes in an address.
pub const ADDRESS_LENGTH: usize = 32;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SuiAddress([u8; ADDRESS_LENGTH]);

impl SuiAddress {
    /// Build an address from raw bytes.
    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Raw address bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// Canonical string form (`0x` + 64 lowercase hex digits).
    pub fn to_canonical(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Shortened display form, e.g. `0x1234...abcd`.
    pub fn short(&self) -> String {
        crate::sanitize::mask_address(&self.to_canonical())
    }
}

impl FromStr for SuiAddress {
    type Err = AddressError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(AddressError::Empty);
        }

        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| AddressError::MissingPrefix {
                input: trimmed.to_string(),
            })?;

        if digits.is_empty() {
            return Err(AddressError::NoDigits);
        }
        if digits.len() > ADDRESS_LENGTH * 2 {
            return Err(AddressError::TooLong { len: digits.len() });
        }

        let padded = format!("{:0>width$}", digits, width = ADDRESS_LENGTH * 2);
        let mut bytes = [0u8; ADDRESS_LENGTH];
        hex::decode_to_slice(&padded, &mut bytes).map_err(|_| AddressError::InvalidHex {
            input: trimmed.to_string(),
        })?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for SuiAddress {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SuiAddress> for String {
    fn from(address: SuiAddress) -> Self {
        address.to_canonical()
    }
}

impl fmt::Display for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical())
    }
}

impl fmt::Debug for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SuiAddress({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn short_and_long_forms_are_equal() {
        let short: SuiAddress = "0x2".parse().unwrap();
        let long: SuiAddress =
            "0x0000000000000000000000000000000000000000000000000000000000000002"
                .parse()
                .unwrap();
        assert_eq!(short, long);
        assert_eq!(short.to_string(), long.to_string());
    }

    #[test]
    fn parsing_is_case_insensitive() {
        let upper: SuiAddress = "0XABCDEF".parse().unwrap();
        let lower: SuiAddress = "0xabcdef".parse().unwrap();
        assert_eq!(upper, lower);
        assert!(upper.to_string().ends_with("abcdef"));
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!("".parse::<SuiAddress>(), Err(AddressError::Empty));
        assert_eq!("   ".parse::<SuiAddress>(), Err(AddressError::Empty));
        assert_eq!("0x".parse::<SuiAddress>(), Err(AddressError::NoDigits));
        assert!(matches!(
            "abcd".parse::<SuiAddress>(),
            Err(AddressError::MissingPrefix { .. })
        ));
        assert!(matches!(
            "0xzz".parse::<SuiAddress>(),
            Err(AddressError::InvalidHex { .. })
        ));
        let too_long = format!("0x{}", "a".repeat(65));
        assert_eq!(
            too_long.parse::<SuiAddress>(),
            Err(AddressError::TooLong { len: 65 })
        );
    }

    #[test]
    fn serde_uses_canonical_string() {
        let address: SuiAddress = "0x2".parse().unwrap();
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(
            json,
            "\"0x0000000000000000000000000000000000000000000000000000000000000002\""
        );
        let back: SuiAddress = serde_json::from_str("\"0x02\"").unwrap();
        assert_eq!(back, address);
        assert!(serde_json::from_str::<SuiAddress>("\"nope\"").is_err());
    }

    proptest! {
        #[test]
        fn canonical_form_reparses_to_same_address(bytes in any::<[u8; 32]>()) {
            let address = SuiAddress::new(bytes);
            let canonical = address.to_canonical();
            prop_assert_eq!(canonical.len(), 66);
            prop_assert_eq!(&canonical, &address.to_string());
            let reparsed: SuiAddress = canonical.parse().unwrap();
            prop_assert_eq!(reparsed, address);
        }

        #[test]
        fn leading_zeros_do_not_change_identity(digits in "[0-9a-f]{1,40}", zeros in 0usize..24) {
            let plain: SuiAddress = format!("0x{}", digits).parse().unwrap();
            let padded: SuiAddress = format!("0x{}{}", "0".repeat(zeros), digits).parse().unwrap();
            prop_assert_eq!(plain, padded);
        }
    }
}
