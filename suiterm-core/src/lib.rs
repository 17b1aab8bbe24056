//! suiterm Core - Wallet Payload Types
//!
//! Pure data structures shared by the cache, the backend client and the
//! store. Nothing in this crate performs I/O.

pub mod address;
pub mod error;
pub mod sanitize;
pub mod types;

pub use address::SuiAddress;
pub use error::{AddressError, ValidationError};
pub use sanitize::{mask_address, sanitize_output};
pub use types::*;

/// Timestamp type using UTC timezone.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Amounts are carried in MIST (1 SUI = 10^9 MIST).
pub type Mist = u64;

/// Number of MIST in one SUI.
pub const MIST_PER_SUI: Mist = 1_000_000_000;
