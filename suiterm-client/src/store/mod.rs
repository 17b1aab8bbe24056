//! Application state store.
//!
//! The store is the only caller of the request cache. Fetch actions read
//! through it; mutation actions call the bridge directly and then apply the
//! mutation's invalidation set before reloading what it touched.

mod mutation;
mod policy;
mod state;

pub use mutation::{Invalidation, Mutation, Resource};
pub use policy::CachePolicy;
pub use state::{HasContent, Loadable, Modal, UiState, WalletState};

use crate::backend::{
    AddEnvironmentRequest, CreateAddressRequest, DownloadBlobRequest, MergeCoinsRequest,
    SplitCoinRequest, UploadBlobRequest, WalletBackend,
};
use crate::error::{ClientError, ClientResult, StoreError, StoreResult};
use futures_util::future::join_all;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use suiterm_cache::{CacheKey, CacheStats, KeyFamily, KeyPattern, RequestCache};
use suiterm_core::{
    sanitize_output, AddressList, CommandOutput, CommunityStatus, CreatedAddress, Environment,
    EnvironmentList, FaucetReceipt, GasCoin, OwnedObject, SuiAddress, TierInfo,
    TransactionOutcome,
};

type Slot<T> = fn(&mut WalletState) -> &mut Loadable<T>;

/// Result of a fetch action that did not fail outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome<T> {
    /// Fresh from the cache or the bridge.
    Loaded(T),
    /// The reload failed; the previously displayed value was kept.
    KeptStale(T),
}

impl<T> FetchOutcome<T> {
    pub fn value(&self) -> &T {
        match self {
            FetchOutcome::Loaded(value) | FetchOutcome::KeptStale(value) => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            FetchOutcome::Loaded(value) | FetchOutcome::KeptStale(value) => value,
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, FetchOutcome::KeptStale(_))
    }
}

pub struct WalletStore<B: WalletBackend> {
    backend: Arc<B>,
    cache: RequestCache<ClientError>,
    policy: CachePolicy,
    state: Arc<Mutex<WalletState>>,
}

impl<B: WalletBackend> Clone for WalletStore<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            cache: self.cache.clone(),
            policy: self.policy,
            state: Arc::clone(&self.state),
        }
    }
}

impl<B: WalletBackend> WalletStore<B> {
    pub fn new(backend: B, policy: CachePolicy) -> Self {
        Self::with_cache(Arc::new(backend), RequestCache::new(), policy)
    }

    pub fn with_cache(backend: Arc<B>, cache: RequestCache<ClientError>, policy: CachePolicy) -> Self {
        Self {
            backend,
            cache,
            policy,
            state: Arc::new(Mutex::new(WalletState::default())),
        }
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    /// Copy of the current state for rendering.
    pub fn snapshot(&self) -> WalletState {
        self.lock_state().clone()
    }

    pub fn active_address(&self) -> Option<SuiAddress> {
        self.lock_state().active_address
    }

    pub fn active_env(&self) -> Option<String> {
        self.lock_state().active_env.clone()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Whether an entry for `key` is stored, fresh or stale.
    pub fn is_cached(&self, key: &CacheKey) -> bool {
        self.cache.contains(key)
    }

    fn lock_state(&self) -> MutexGuard<'_, WalletState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::warn!("Wallet state lock poisoned; recovering");
                poisoned.into_inner()
            }
        }
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut WalletState) -> R) -> R {
        let mut guard = self.lock_state();
        f(&mut guard)
    }

    // ========================================================================
    // FETCH ACTIONS
    // ========================================================================

    pub async fn fetch_addresses(&self) -> ClientResult<FetchOutcome<AddressList>> {
        let outcome = self
            .load(CacheKey::addresses(), WalletState::addresses_mut, |backend| async move {
                backend.get_addresses().await
            })
            .await?;
        if let FetchOutcome::Loaded(list) = &outcome {
            let active = list.active();
            self.with_state(|state| state.active_address = active);
        }
        Ok(outcome)
    }

    pub async fn fetch_environments(&self) -> ClientResult<FetchOutcome<EnvironmentList>> {
        let outcome = self
            .load(CacheKey::environments(), WalletState::environments_mut, |backend| async move {
                backend.get_environments().await
            })
            .await?;
        if let FetchOutcome::Loaded(list) = &outcome {
            let active = list.active().map(str::to_string);
            self.with_state(|state| state.active_env = active);
        }
        Ok(outcome)
    }

    pub async fn fetch_gas_coins(&self, owner: &SuiAddress) -> ClientResult<FetchOutcome<Vec<GasCoin>>> {
        let owner = *owner;
        self.load(CacheKey::gas_coins(&owner), WalletState::gas_coins_mut, move |backend| async move {
            backend.get_gas_coins(&owner).await
        })
        .await
    }

    pub async fn fetch_objects(&self, owner: &SuiAddress) -> ClientResult<FetchOutcome<Vec<OwnedObject>>> {
        let owner = *owner;
        self.load(CacheKey::objects(&owner), WalletState::objects_mut, move |backend| async move {
            backend.get_objects(&owner).await
        })
        .await
    }

    pub async fn fetch_community_status(
        &self,
        owner: Option<&SuiAddress>,
    ) -> ClientResult<FetchOutcome<CommunityStatus>> {
        let owner = owner.copied();
        let key = CacheKey::community_status(owner.as_ref());
        self.load(key, WalletState::community_mut, move |backend| async move {
            backend.get_community_status(owner.as_ref()).await
        })
        .await
    }

    pub async fn fetch_tier_info(&self, owner: &SuiAddress) -> ClientResult<FetchOutcome<TierInfo>> {
        let owner = *owner;
        self.load(CacheKey::tier_info(&owner), WalletState::tier_mut, move |backend| async move {
            backend.get_tier_info(&owner).await
        })
        .await
    }

    /// Walrus listing for `owner`. Output is sanitized before it is cached.
    pub async fn fetch_blobs(&self, owner: &SuiAddress) -> ClientResult<FetchOutcome<CommandOutput>> {
        let owner = *owner;
        self.load(CacheKey::blobs(&owner), WalletState::blobs_mut, move |backend| async move {
            backend.list_blobs(&owner).await.map(|output| output.sanitized())
        })
        .await
    }

    /// Load addresses and environments, then everything bound to the
    /// active address. Walrus blobs are left to `fetch_blobs`. Every fetch is attempted; the first error is
    /// returned.
    pub async fn refresh_all(&self) -> ClientResult<()> {
        let (addresses, environments) =
            tokio::join!(self.fetch_addresses(), self.fetch_environments());
        let mut first_error = addresses.err().or(environments.err());

        if let Some(active) = self.active_address() {
            let (gas, objects, community, tier) = tokio::join!(
                self.fetch_gas_coins(&active),
                self.fetch_objects(&active),
                self.fetch_community_status(Some(&active)),
                self.fetch_tier_info(&active),
            );
            first_error = first_error
                .or(gas.err())
                .or(objects.err())
                .or(community.err())
                .or(tier.err());
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn load<T, F, Fut>(&self, key: CacheKey, slot: Slot<T>, fetch: F) -> ClientResult<FetchOutcome<T>>
    where
        T: HasContent + Clone + Send + Sync + 'static,
        F: FnOnce(Arc<B>) -> Fut + Send + 'static,
        Fut: Future<Output = ClientResult<T>> + Send + 'static,
    {
        let ttl = self.policy.ttl_for(key.family());
        self.with_state(|state| slot(state).begin(&key));

        let backend = Arc::clone(&self.backend);
        let result = self.cache.dedupe(key.clone(), ttl, move || fetch(backend)).await;

        match result {
            Ok(value) => {
                let committed = self.with_state(|state| {
                    slot(state).commit(&key, value.clone(), chrono::Utc::now())
                });
                if !committed {
                    tracing::debug!(key = %key, "Slot moved to another key; result not displayed");
                }
                Ok(FetchOutcome::Loaded(value))
            }
            Err(err) => {
                let message = sanitize_output(&err.to_string());
                let kept = self.with_state(|state| {
                    let slot = slot(state);
                    if slot.source() != Some(&key) {
                        return None;
                    }
                    let kept = slot.keep_stale();
                    if kept.is_none() {
                        slot.fail(message.clone());
                    }
                    kept
                });
                match kept {
                    Some(value) => {
                        tracing::warn!(key = %key, error = %message, "Reload failed; keeping previous value");
                        Ok(FetchOutcome::KeptStale(value))
                    }
                    None => {
                        tracing::warn!(key = %key, error = %message, "Fetch failed");
                        Err(err)
                    }
                }
            }
        }
    }

    // ========================================================================
    // MUTATION ACTIONS
    // ========================================================================

    pub async fn switch_address(&self, address: &SuiAddress) -> StoreResult<SuiAddress> {
        let call = self.backend.switch_address(address);
        self.mutate(Mutation::SwitchAddress, call, |state, active: &SuiAddress| {
            state.active_address = Some(*active);
        })
        .await
    }

    pub async fn create_address(&self, request: CreateAddressRequest) -> StoreResult<CreatedAddress> {
        request.validate()?;
        let call = self.backend.create_address(&request);
        self.mutate(Mutation::CreateAddress, call, |_, _| {}).await
    }

    /// Remove an address from the keystore and forget everything cached
    /// for it.
    pub async fn remove_address(&self, address: &SuiAddress) -> StoreResult<()> {
        let call = self.backend.remove_address(address);
        self.mutate(Mutation::RemoveAddress, call, |_, _| {}).await?;
        let removed = self.cache.invalidate_pattern(&KeyPattern::Owner(*address));
        tracing::debug!(address = %address.short(), removed, "Dropped entries of removed address");
        Ok(())
    }

    pub async fn switch_environment(&self, alias: &str) -> StoreResult<String> {
        let call = self.backend.switch_environment(alias);
        self.mutate(Mutation::SwitchEnvironment, call, |state, active: &String| {
            state.active_env = Some(active.clone());
        })
        .await
    }

    pub async fn add_environment(&self, request: AddEnvironmentRequest) -> StoreResult<Environment> {
        request.validate()?;
        let call = self.backend.add_environment(&request);
        self.mutate(Mutation::AddEnvironment, call, |_, _| {}).await
    }

    pub async fn remove_environment(&self, alias: &str) -> StoreResult<()> {
        let call = self.backend.remove_environment(alias);
        self.mutate(Mutation::RemoveEnvironment, call, |_, _| {}).await
    }

    pub async fn split_coin(&self, request: SplitCoinRequest) -> StoreResult<TransactionOutcome> {
        self.require_active()?;
        request.validate()?;
        let call = self.backend.split_coin(&request);
        self.mutate(Mutation::SplitCoin, call, |_, _| {}).await
    }

    pub async fn merge_coins(&self, request: MergeCoinsRequest) -> StoreResult<TransactionOutcome> {
        self.require_active()?;
        request.validate()?;
        let call = self.backend.merge_coins(&request);
        self.mutate(Mutation::MergeCoins, call, |_, _| {}).await
    }

    /// Request faucet funds for the active address.
    pub async fn request_faucet(&self) -> StoreResult<FaucetReceipt> {
        let active = self.require_active()?;
        let call = self.backend.request_faucet(&active);
        self.mutate(Mutation::RequestFaucet, call, |_, _| {}).await
    }

    /// Join the community with the active address.
    pub async fn join_community(&self) -> StoreResult<CommunityStatus> {
        let active = self.require_active()?;
        let call = self.backend.join_community(&active);
        self.mutate(Mutation::JoinCommunity, call, |_, _| {}).await
    }

    /// Store a file on Walrus for the active address.
    pub async fn upload_blob(&self, request: UploadBlobRequest) -> StoreResult<CommandOutput> {
        self.require_active()?;
        request.validate()?;
        let call = self.backend.upload_blob(&request);
        let output = self
            .mutate(Mutation::UploadBlob, call, |state, output: &CommandOutput| {
                state.last_command = Some(output.sanitized());
            })
            .await?;
        Ok(output.sanitized())
    }

    /// Read a Walrus blob. Nothing is cached or invalidated: the blob lands
    /// in a file on the bridge host, or in the returned stdout.
    pub async fn download_blob(&self, request: DownloadBlobRequest) -> StoreResult<CommandOutput> {
        request.validate()?;
        match self.backend.download_blob(&request).await {
            Ok(output) => {
                let output = output.sanitized();
                self.with_state(|state| state.last_command = Some(output.clone()));
                Ok(output)
            }
            Err(err) => {
                tracing::warn!(error = %sanitize_output(&err.to_string()), "Blob download failed");
                Err(err.into())
            }
        }
    }

    /// Forward raw CLI arguments to the bridge. Output is sanitized before
    /// it is stored or returned.
    pub async fn run_command(&self, args: &[String]) -> StoreResult<CommandOutput> {
        if args.iter().all(|arg| arg.trim().is_empty()) {
            return Err(StoreError::EmptyCommand);
        }
        let call = self.backend.execute_command(args);
        let output = self
            .mutate(Mutation::RunCommand, call, |state, output: &CommandOutput| {
                state.last_command = Some(output.sanitized());
            })
            .await?;
        Ok(output.sanitized())
    }

    fn require_active(&self) -> StoreResult<SuiAddress> {
        self.active_address().ok_or(StoreError::NoActiveAddress)
    }

    async fn mutate<T, Fut>(
        &self,
        mutation: Mutation,
        call: Fut,
        on_success: impl FnOnce(&mut WalletState, &T),
    ) -> StoreResult<T>
    where
        Fut: Future<Output = ClientResult<T>>,
    {
        match call.await {
            Ok(value) => {
                self.with_state(|state| {
                    state.last_mutation_error = None;
                    on_success(state, &value);
                });
                tracing::info!(mutation = %mutation, "Mutation succeeded");
                self.settle(mutation).await;
                Ok(value)
            }
            Err(err) => {
                let message = sanitize_output(&err.to_string());
                tracing::warn!(mutation = %mutation, error = %message, "Mutation failed");
                self.with_state(|state| state.last_mutation_error = Some(message));
                Err(err.into())
            }
        }
    }

    /// Drop what `mutation` made stale, then reload it.
    async fn settle(&self, mutation: Mutation) {
        if mutation.waits_for_settle() && !self.policy.faucet_settle_delay.is_zero() {
            tokio::time::sleep(self.policy.faucet_settle_delay).await;
        }

        let active = self.active_address();
        for invalidation in mutation.invalidations() {
            match invalidation.resolve(active.as_ref()) {
                Some(pattern) => {
                    let removed = self.cache.invalidate_pattern(&pattern);
                    tracing::debug!(mutation = %mutation, pattern = %pattern, removed, "Invalidated");
                }
                None => {
                    tracing::debug!(mutation = %mutation, ?invalidation, "No active address; skipped")
                }
            }
        }

        self.refetch(mutation.refetches()).await;
    }

    async fn refetch(&self, resources: &[Resource]) {
        let global = resources.iter().filter(|r| !r.is_address_bound());
        join_all(global.map(|r| self.refetch_one(*r, None))).await;

        let Some(active) = self.active_address() else {
            return;
        };
        let bound = resources.iter().filter(|r| r.is_address_bound());
        join_all(bound.map(|r| self.refetch_one(*r, Some(active)))).await;
    }

    async fn refetch_one(&self, resource: Resource, active: Option<SuiAddress>) {
        let result: ClientResult<()> = match (resource, active) {
            (Resource::Addresses, _) => self.fetch_addresses().await.map(drop),
            (Resource::Environments, _) => self.fetch_environments().await.map(drop),
            (Resource::GasCoins, Some(a)) => self.fetch_gas_coins(&a).await.map(drop),
            (Resource::Objects, Some(a)) => self.fetch_objects(&a).await.map(drop),
            (Resource::Community, Some(a)) => self.fetch_community_status(Some(&a)).await.map(drop),
            (Resource::Tier, Some(a)) => self.fetch_tier_info(&a).await.map(drop),
            (Resource::Blobs, Some(a)) => self.fetch_blobs(&a).await.map(drop),
            (_, None) => Ok(()),
        };
        if let Err(err) = result {
            tracing::warn!(?resource, error = %sanitize_output(&err.to_string()), "Refetch after mutation failed");
        }
    }

    // ========================================================================
    // UI STATE
    // ========================================================================

    pub fn select_index(&self, index: usize) {
        self.with_state(|state| {
            let visible = state.visible_addresses().len();
            state.ui.selected_index = index.min(visible.saturating_sub(1));
        });
    }

    pub fn set_search_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.with_state(|state| {
            state.ui.search_query = query;
            state.ui.selected_index = 0;
        });
    }

    pub fn open_modal(&self, modal: Modal) {
        self.with_state(|state| state.ui.active_modal = Some(modal));
    }

    pub fn close_modal(&self) {
        self.with_state(|state| state.ui.active_modal = None);
    }

    /// TTL the store applies to `family`.
    pub fn ttl_for(&self, family: KeyFamily) -> Duration {
        self.policy.ttl_for(family)
    }
}
