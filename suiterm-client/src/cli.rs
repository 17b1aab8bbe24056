//! Command-line surface of the `suiterm` binary.

use crate::backend::{
    DownloadBlobRequest, MergeCoinsRequest, SplitCoinRequest, UploadBlobRequest, WalletBackend,
};
use crate::error::{CliError, StoreError};
use crate::store::WalletStore;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use suiterm_core::{Mist, SuiAddress};

#[derive(Debug, Parser)]
#[command(name = "suiterm")]
#[command(about = "Inspect and manage a Sui wallet through the suiterm bridge")]
pub struct Cli {
    /// Path to the TOML config (defaults to $SUITERM_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Refresh everything and print the wallet state
    Status,

    /// Make an address the active one
    SwitchAddress { address: SuiAddress },

    /// Switch the active network
    SwitchEnv { alias: String },

    /// Request faucet funds for the active address
    Faucet,

    /// Split a gas coin into the given amounts (MIST)
    Split {
        coin_id: SuiAddress,
        #[arg(required = true)]
        amounts: Vec<Mist>,
    },

    /// Merge COIN into PRIMARY
    Merge { primary: SuiAddress, coin: SuiAddress },

    /// Join the community with the active address
    JoinCommunity,

    /// List Walrus blobs of the active address
    Blobs,

    /// Store a file on Walrus
    UploadBlob {
        /// File path on the bridge host
        path: String,

        /// Storage duration in epochs
        #[arg(long)]
        epochs: Option<u32>,
    },

    /// Read a Walrus blob
    DownloadBlob {
        blob_id: String,

        /// Write the blob to this path on the bridge host
        #[arg(long = "out")]
        output_path: Option<String>,
    },

    /// Run a raw sui CLI command through the bridge
    Exec {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

impl Command {
    fn needs_addresses(&self) -> bool {
        matches!(
            self,
            Command::Faucet
                | Command::Split { .. }
                | Command::Merge { .. }
                | Command::JoinCommunity
                | Command::Blobs
                | Command::UploadBlob { .. }
        )
    }
}

/// Run one command and return `{ "result": .., "state": .. }`.
pub async fn run<B: WalletBackend>(store: &WalletStore<B>, command: Command) -> Result<Value, CliError> {
    if command.needs_addresses() {
        store.fetch_addresses().await?;
    }

    let result = match command {
        Command::Status => {
            if let Err(err) = store.refresh_all().await {
                tracing::warn!(error = %err, "Refresh incomplete");
            }
            Value::Null
        }
        Command::SwitchAddress { address } => to_json(&store.switch_address(&address).await?)?,
        Command::SwitchEnv { alias } => to_json(&store.switch_environment(&alias).await?)?,
        Command::Faucet => to_json(&store.request_faucet().await?)?,
        Command::Split { coin_id, amounts } => {
            let request = SplitCoinRequest {
                coin_id,
                amounts,
                gas_budget: None,
            };
            to_json(&store.split_coin(request).await?)?
        }
        Command::Merge { primary, coin } => {
            let request = MergeCoinsRequest {
                primary_coin: primary,
                coin_to_merge: coin,
                gas_budget: None,
            };
            to_json(&store.merge_coins(request).await?)?
        }
        Command::JoinCommunity => to_json(&store.join_community().await?)?,
        Command::Blobs => {
            let owner = store.active_address().ok_or(StoreError::NoActiveAddress)?;
            to_json(store.fetch_blobs(&owner).await?.value())?
        }
        Command::UploadBlob { path, epochs } => {
            to_json(&store.upload_blob(UploadBlobRequest { path, epochs }).await?)?
        }
        Command::DownloadBlob {
            blob_id,
            output_path,
        } => {
            let request = DownloadBlobRequest {
                blob_id,
                output_path,
            };
            to_json(&store.download_blob(request).await?)?
        }
        Command::Exec { args } => to_json(&store.run_command(&args).await?)?,
    };

    Ok(json!({
        "result": result,
        "state": to_json(&store.snapshot())?,
    }))
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, CliError> {
    Ok(serde_json::to_value(value)?)
}
