//! REST client for the wallet bridge server.

use crate::backend::{
    AddEnvironmentRequest, CreateAddressRequest, DownloadBlobRequest, MergeCoinsRequest,
    SplitCoinRequest, UploadBlobRequest, WalletBackend,
};
use crate::config::{AuthConfig, ClientConfig};
use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde::Serialize;
use suiterm_core::{
    AddressList, CommandOutput, CommunityStatus, CreatedAddress, Envelope, Environment,
    EnvironmentList, FaucetReceipt, GasCoin, OwnedObject, SuiAddress, TierInfo,
    TransactionOutcome,
};

#[derive(Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
    auth_header: HeaderMap,
}

#[derive(Serialize)]
struct AddressBody<'a> {
    address: &'a SuiAddress,
}

#[derive(Serialize)]
struct AliasBody<'a> {
    alias: &'a str,
}

#[derive(Serialize)]
struct CommandBody<'a> {
    args: &'a [String],
}

#[derive(Serialize)]
struct OwnerQuery<'a> {
    address: &'a SuiAddress,
}

impl RestClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        let auth_header = build_auth_headers(&config.auth)?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            auth_header,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T, Q>(&self, path: &str, query: Option<&Q>) -> ClientResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.get(url).headers(self.auth_header.clone());
        if let Some(query) = query {
            request = request.query(query);
        }
        tracing::debug!(path, "GET");
        let response = request.send().await?;
        let envelope = self.parse_response::<T>(response).await?;
        require_data(envelope)
    }

    async fn post_json<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let envelope = self.post_envelope::<T, B>(path, body).await?;
        require_data(envelope)
    }

    /// POST to an endpoint whose success carries no payload.
    async fn post_unit<B>(&self, path: &str, body: &B) -> ClientResult<()>
    where
        B: Serialize + ?Sized,
    {
        self.post_envelope::<serde_json::Value, B>(path, body)
            .await
            .map(|_| ())
    }

    async fn post_envelope<T, B>(&self, path: &str, body: &B) -> ClientResult<Envelope<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(path, "POST");
        let response = self
            .client
            .post(url)
            .headers(self.auth_header.clone())
            .json(body)
            .send()
            .await?;
        self.parse_response(response).await
    }

    async fn parse_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> ClientResult<Envelope<T>> {
        let status = response.status();
        let text = response.text().await?;
        decode_envelope(status.as_u16(), &text)
    }
}

/// Turn a raw status and body into an accepted envelope.
fn decode_envelope<T: DeserializeOwned>(status: u16, text: &str) -> ClientResult<Envelope<T>> {
    if !(200..300).contains(&status) {
        // Bridges answer errors with an envelope too; prefer its message.
        if let Ok(envelope) = serde_json::from_str::<Envelope<serde_json::Value>>(text) {
            if let Some(message) = envelope.error {
                return Err(ClientError::Status {
                    status,
                    body: message,
                });
            }
        }
        return Err(ClientError::Status {
            status,
            body: text.to_string(),
        });
    }

    let envelope: Envelope<T> = serde_json::from_str(text)?;
    if !envelope.success {
        let message = envelope
            .error
            .unwrap_or_else(|| "request failed without a message".to_string());
        return Err(ClientError::Rejected(message));
    }
    Ok(envelope)
}

fn require_data<T>(envelope: Envelope<T>) -> ClientResult<T> {
    envelope
        .data
        .ok_or_else(|| ClientError::InvalidResponse("success response carried no data".to_string()))
}

fn build_auth_headers(auth: &AuthConfig) -> ClientResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    if let Some(api_key) = &auth.api_key {
        headers.insert(
            HeaderName::from_static("x-api-key"),
            HeaderValue::from_str(api_key).map_err(|e| ClientError::Config(e.to_string()))?,
        );
    }
    Ok(headers)
}

#[async_trait]
impl WalletBackend for RestClient {
    async fn get_addresses(&self) -> ClientResult<AddressList> {
        self.get_json::<_, ()>("/api/addresses", None).await
    }

    async fn get_environments(&self) -> ClientResult<EnvironmentList> {
        self.get_json::<_, ()>("/api/environments", None).await
    }

    async fn get_gas_coins(&self, owner: &SuiAddress) -> ClientResult<Vec<GasCoin>> {
        let path = format!("/api/coins/{}/gas", owner);
        self.get_json::<_, ()>(&path, None).await
    }

    async fn get_objects(&self, owner: &SuiAddress) -> ClientResult<Vec<OwnedObject>> {
        let path = format!("/api/objects/{}", owner);
        self.get_json::<_, ()>(&path, None).await
    }

    async fn get_community_status(
        &self,
        owner: Option<&SuiAddress>,
    ) -> ClientResult<CommunityStatus> {
        let query = owner.map(|address| OwnerQuery { address });
        self.get_json("/api/community/status", query.as_ref()).await
    }

    async fn get_tier_info(&self, owner: &SuiAddress) -> ClientResult<TierInfo> {
        let path = format!("/api/community/tier/{}", owner);
        self.get_json::<_, ()>(&path, None).await
    }

    async fn switch_address(&self, address: &SuiAddress) -> ClientResult<SuiAddress> {
        self.post_json("/api/addresses/switch", &AddressBody { address })
            .await
    }

    async fn create_address(&self, request: &CreateAddressRequest) -> ClientResult<CreatedAddress> {
        self.post_json("/api/addresses", request).await
    }

    async fn remove_address(&self, address: &SuiAddress) -> ClientResult<()> {
        self.post_unit("/api/addresses/remove", &AddressBody { address })
            .await
    }

    async fn switch_environment(&self, alias: &str) -> ClientResult<String> {
        self.post_json("/api/environments/switch", &AliasBody { alias })
            .await
    }

    async fn add_environment(&self, request: &AddEnvironmentRequest) -> ClientResult<Environment> {
        self.post_json("/api/environments", request).await
    }

    async fn remove_environment(&self, alias: &str) -> ClientResult<()> {
        self.post_unit("/api/environments/remove", &AliasBody { alias })
            .await
    }

    async fn split_coin(&self, request: &SplitCoinRequest) -> ClientResult<TransactionOutcome> {
        self.post_json("/api/coins/split", request).await
    }

    async fn merge_coins(&self, request: &MergeCoinsRequest) -> ClientResult<TransactionOutcome> {
        self.post_json("/api/coins/merge", request).await
    }

    async fn request_faucet(&self, address: &SuiAddress) -> ClientResult<FaucetReceipt> {
        self.post_json("/api/faucet", &AddressBody { address }).await
    }

    async fn join_community(&self, address: &SuiAddress) -> ClientResult<CommunityStatus> {
        self.post_json("/api/community/join", &AddressBody { address })
            .await
    }

    async fn execute_command(&self, args: &[String]) -> ClientResult<CommandOutput> {
        self.post_json("/api/cli/execute", &CommandBody { args }).await
    }

    async fn list_blobs(&self, owner: &SuiAddress) -> ClientResult<CommandOutput> {
        let path = format!("/api/walrus/blobs/{}", owner);
        self.get_json::<_, ()>(&path, None).await
    }

    async fn upload_blob(&self, request: &UploadBlobRequest) -> ClientResult<CommandOutput> {
        self.post_json("/api/walrus/upload", request).await
    }

    async fn download_blob(&self, request: &DownloadBlobRequest) -> ClientResult<CommandOutput> {
        self.post_json("/api/walrus/download", request).await
    }
}
