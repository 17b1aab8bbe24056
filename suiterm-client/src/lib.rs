//! suiterm client library exports.

pub mod api_client;
pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod store;

pub use api_client::RestClient;
pub use backend::WalletBackend;
pub use config::ClientConfig;
pub use error::{CliError, ClientError, ClientResult, StoreError, StoreResult};
pub use store::{CachePolicy, FetchOutcome, Mutation, WalletState, WalletStore};
