//! The bridge surface the store talks to, and the request bodies it sends.

use crate::error::ClientResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use suiterm_core::{
    AddressList, CommandOutput, CommunityStatus, CreatedAddress, Environment, EnvironmentList,
    FaucetReceipt, GasCoin, KeyScheme, Mist, OwnedObject, SuiAddress, TierInfo,
    TransactionOutcome, ValidationError,
};

/// Mnemonic lengths the key generator accepts.
pub const WORD_LENGTHS: [u8; 5] = [12, 15, 18, 21, 24];

/// One method per bridge endpoint.
///
/// Implementations must be cheap to share; the store keeps one behind an
/// `Arc` and calls it from inside cached fetch futures.
#[async_trait]
pub trait WalletBackend: Send + Sync + 'static {
    async fn get_addresses(&self) -> ClientResult<AddressList>;
    async fn get_environments(&self) -> ClientResult<EnvironmentList>;
    async fn get_gas_coins(&self, owner: &SuiAddress) -> ClientResult<Vec<GasCoin>>;
    async fn get_objects(&self, owner: &SuiAddress) -> ClientResult<Vec<OwnedObject>>;
    /// `None` asks about the bridge's active address.
    async fn get_community_status(&self, owner: Option<&SuiAddress>)
        -> ClientResult<CommunityStatus>;
    async fn get_tier_info(&self, owner: &SuiAddress) -> ClientResult<TierInfo>;

    /// Returns the address that is active afterwards.
    async fn switch_address(&self, address: &SuiAddress) -> ClientResult<SuiAddress>;
    async fn create_address(&self, request: &CreateAddressRequest) -> ClientResult<CreatedAddress>;
    async fn remove_address(&self, address: &SuiAddress) -> ClientResult<()>;

    /// Returns the alias that is active afterwards.
    async fn switch_environment(&self, alias: &str) -> ClientResult<String>;
    async fn add_environment(&self, request: &AddEnvironmentRequest) -> ClientResult<Environment>;
    async fn remove_environment(&self, alias: &str) -> ClientResult<()>;

    async fn split_coin(&self, request: &SplitCoinRequest) -> ClientResult<TransactionOutcome>;
    async fn merge_coins(&self, request: &MergeCoinsRequest) -> ClientResult<TransactionOutcome>;
    async fn request_faucet(&self, address: &SuiAddress) -> ClientResult<FaucetReceipt>;
    async fn join_community(&self, address: &SuiAddress) -> ClientResult<CommunityStatus>;

    async fn execute_command(&self, args: &[String]) -> ClientResult<CommandOutput>;

    /// Walrus blob listing for `owner`, as reported by the walrus CLI.
    async fn list_blobs(&self, owner: &SuiAddress) -> ClientResult<CommandOutput>;
    async fn upload_blob(&self, request: &UploadBlobRequest) -> ClientResult<CommandOutput>;
    async fn download_blob(&self, request: &DownloadBlobRequest) -> ClientResult<CommandOutput>;
}

// ============================================================================
// REQUEST BODIES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAddressRequest {
    pub scheme: KeyScheme,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_length: Option<u8>,
}

impl CreateAddressRequest {
    pub fn new(scheme: KeyScheme) -> Self {
        Self {
            scheme,
            alias: None,
            word_length: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_word_length(mut self, words: u8) -> Self {
        self.word_length = Some(words);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(alias) = &self.alias {
            validate_alias("alias", alias)?;
        }
        if let Some(words) = self.word_length {
            if !WORD_LENGTHS.contains(&words) {
                return Err(ValidationError::InvalidValue {
                    field: "word_length".to_string(),
                    reason: format!("must be one of {:?}", WORD_LENGTHS),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddEnvironmentRequest {
    pub alias: String,
    pub rpc_url: String,
}

impl AddEnvironmentRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_alias("alias", &self.alias)?;
        let url = self.rpc_url.trim();
        if url.is_empty() {
            return Err(ValidationError::RequiredFieldMissing {
                field: "rpc_url".to_string(),
            });
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ValidationError::InvalidValue {
                field: "rpc_url".to_string(),
                reason: "must start with http:// or https://".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitCoinRequest {
    pub coin_id: SuiAddress,
    pub amounts: Vec<Mist>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_budget: Option<Mist>,
}

impl SplitCoinRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.amounts.is_empty() {
            return Err(ValidationError::RequiredFieldMissing {
                field: "amounts".to_string(),
            });
        }
        if self.amounts.iter().any(|amount| *amount == 0) {
            return Err(ValidationError::InvalidValue {
                field: "amounts".to_string(),
                reason: "every amount must be > 0".to_string(),
            });
        }
        validate_gas_budget(self.gas_budget)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeCoinsRequest {
    pub primary_coin: SuiAddress,
    pub coin_to_merge: SuiAddress,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_budget: Option<Mist>,
}

impl MergeCoinsRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.primary_coin == self.coin_to_merge {
            return Err(ValidationError::InvalidValue {
                field: "coin_to_merge".to_string(),
                reason: "cannot merge a coin into itself".to_string(),
            });
        }
        validate_gas_budget(self.gas_budget)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadBlobRequest {
    /// File path on the bridge host.
    pub path: String,
    /// Storage duration; the walrus default applies when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epochs: Option<u32>,
}

impl UploadBlobRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.path.trim().is_empty() {
            return Err(ValidationError::RequiredFieldMissing {
                field: "path".to_string(),
            });
        }
        if self.epochs == Some(0) {
            return Err(ValidationError::InvalidValue {
                field: "epochs".to_string(),
                reason: "must be > 0 when set".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadBlobRequest {
    pub blob_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
}

impl DownloadBlobRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let id = self.blob_id.trim();
        if id.is_empty() {
            return Err(ValidationError::RequiredFieldMissing {
                field: "blob_id".to_string(),
            });
        }
        if id.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidValue {
                field: "blob_id".to_string(),
                reason: "must not contain whitespace".to_string(),
            });
        }
        if let Some(path) = &self.output_path {
            if path.trim().is_empty() {
                return Err(ValidationError::InvalidValue {
                    field: "output_path".to_string(),
                    reason: "must not be blank when set".to_string(),
                });
            }
        }
        Ok(())
    }
}

fn validate_alias(field: &str, alias: &str) -> Result<(), ValidationError> {
    if alias.trim().is_empty() {
        return Err(ValidationError::RequiredFieldMissing {
            field: field.to_string(),
        });
    }
    if alias.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            reason: "must not contain whitespace".to_string(),
        });
    }
    Ok(())
}

fn validate_gas_budget(budget: Option<Mist>) -> Result<(), ValidationError> {
    match budget {
        Some(0) => Err(ValidationError::InvalidValue {
            field: "gas_budget".to_string(),
            reason: "must be > 0 when set".to_string(),
        }),
        _ => Ok(()),
    }
}
