//! Wire payloads exchanged with the wallet bridge server.

use crate::{Mist, SuiAddress, Timestamp};
use serde::{Deserialize, Serialize};

// ============================================================================
// ENVELOPE
// ============================================================================

/// Every bridge endpoint answers with this envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

// ============================================================================
// ADDRESSES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressEntry {
    pub address: SuiAddress,
    #[serde(default)]
    pub alias: Option<String>,
    pub balance_mist: Mist,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressList {
    #[serde(default)]
    pub active_address: Option<SuiAddress>,
    pub addresses: Vec<AddressEntry>,
}

impl AddressList {
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    /// The active address, falling back to the entry flagged active.
    pub fn active(&self) -> Option<SuiAddress> {
        self.active_address.or_else(|| {
            self.addresses
                .iter()
                .find(|entry| entry.is_active)
                .map(|entry| entry.address)
        })
    }

    pub fn total_balance(&self) -> Mist {
        self.addresses.iter().map(|entry| entry.balance_mist).sum()
    }
}

/// Signature scheme for newly generated keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyScheme {
    Ed25519,
    Secp256k1,
    Secp256r1,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedAddress {
    pub address: SuiAddress,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub recovery_phrase: Option<String>,
}

// ============================================================================
// ENVIRONMENTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    pub alias: String,
    pub rpc_url: String,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentList {
    #[serde(default)]
    pub active_env: Option<String>,
    pub environments: Vec<Environment>,
}

impl EnvironmentList {
    pub fn is_empty(&self) -> bool {
        self.environments.is_empty()
    }

    pub fn active(&self) -> Option<&str> {
        self.active_env.as_deref().or_else(|| {
            self.environments
                .iter()
                .find(|env| env.is_active)
                .map(|env| env.alias.as_str())
        })
    }
}

// ============================================================================
// COINS & OBJECTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasCoin {
    pub coin_object_id: SuiAddress,
    pub version: u64,
    pub digest: String,
    pub balance_mist: Mist,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedObject {
    pub object_id: SuiAddress,
    pub version: u64,
    pub digest: String,
    #[serde(default)]
    pub object_type: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Result of a transaction submitted through the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionOutcome {
    pub digest: String,
    pub status: String,
    #[serde(default)]
    pub gas_used_mist: Option<Mist>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaucetReceipt {
    pub address: SuiAddress,
    pub transferred_mist: Mist,
    #[serde(default)]
    pub tx_digest: Option<String>,
}

// ============================================================================
// COMMUNITY MEMBERSHIP
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityStatus {
    pub address: SuiAddress,
    pub is_member: bool,
    #[serde(default)]
    pub joined_at: Option<Timestamp>,
    pub member_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    None,
    Bronze,
    Silver,
    Gold,
    Platinum,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierInfo {
    pub address: SuiAddress,
    pub tier: Tier,
    pub points: u64,
    #[serde(default)]
    pub next_tier_points: Option<u64>,
}

// ============================================================================
// RAW CLI
// ============================================================================

/// Output of a raw CLI invocation relayed by the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub duration_ms: u64,
}

impl CommandOutput {
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }

    /// Copy with secrets scrubbed from both streams.
    pub fn sanitized(&self) -> Self {
        Self {
            stdout: crate::sanitize_output(&self.stdout),
            stderr: crate::sanitize_output(&self.stderr),
            exit_code: self.exit_code,
            duration_ms: self.duration_ms,
        }
    }
}
