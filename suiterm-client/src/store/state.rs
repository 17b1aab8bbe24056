//! Store state: one loadable slot per resource, plus UI view state.

use serde::Serialize;
use suiterm_cache::CacheKey;
use suiterm_core::{
    AddressEntry, AddressList, CommandOutput, CommunityStatus, EnvironmentList, GasCoin,
    OwnedObject, SuiAddress, TierInfo, Timestamp,
};

/// Whether a slot's value is worth keeping on screen after a failed reload.
pub trait HasContent {
    fn has_content(&self) -> bool;
}

impl HasContent for AddressList {
    fn has_content(&self) -> bool {
        !self.is_empty()
    }
}

impl HasContent for EnvironmentList {
    fn has_content(&self) -> bool {
        !self.is_empty()
    }
}

impl<T> HasContent for Vec<T> {
    fn has_content(&self) -> bool {
        !self.is_empty()
    }
}

impl HasContent for CommunityStatus {
    fn has_content(&self) -> bool {
        true
    }
}

impl HasContent for TierInfo {
    fn has_content(&self) -> bool {
        true
    }
}

impl HasContent for CommandOutput {
    fn has_content(&self) -> bool {
        self.succeeded() && !self.stdout.trim().is_empty()
    }
}

/// A value the store loads from the bridge.
#[derive(Debug, Clone, Serialize)]
pub struct Loadable<T> {
    value: Option<T>,
    loading: bool,
    error: Option<String>,
    updated_at: Option<Timestamp>,
    /// Key the current value was loaded under.
    #[serde(skip)]
    source: Option<CacheKey>,
}

impl<T> Default for Loadable<T> {
    fn default() -> Self {
        Self {
            value: None,
            loading: false,
            error: None,
            updated_at: None,
            source: None,
        }
    }
}

impl<T> Loadable<T> {
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn updated_at(&self) -> Option<Timestamp> {
        self.updated_at
    }

    pub fn source(&self) -> Option<&CacheKey> {
        self.source.as_ref()
    }

    /// Mark a reload of `key` as started. A slot holding another key's
    /// value is cleared first so it never pretends to be `key`'s data.
    pub(crate) fn begin(&mut self, key: &CacheKey) {
        if self.source.as_ref() != Some(key) {
            self.value = None;
            self.error = None;
            self.updated_at = None;
            self.source = Some(key.clone());
        }
        self.loading = true;
    }

    /// Returns false when the slot moved on to another key meanwhile.
    pub(crate) fn commit(&mut self, key: &CacheKey, value: T, at: Timestamp) -> bool {
        if self.source.as_ref() != Some(key) {
            return false;
        }
        self.value = Some(value);
        self.loading = false;
        self.error = None;
        self.updated_at = Some(at);
        true
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }
}

impl<T: HasContent + Clone> Loadable<T> {
    pub fn has_content(&self) -> bool {
        self.value.as_ref().is_some_and(HasContent::has_content)
    }

    /// On a failed reload: the previous value if it is worth keeping.
    pub(crate) fn keep_stale(&mut self) -> Option<T> {
        if !self.has_content() {
            return None;
        }
        self.loading = false;
        self.error = None;
        self.value.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Modal {
    CreateAddress,
    AddEnvironment,
    SplitCoin,
    MergeCoins,
    RunCommand,
    ConfirmRemove,
    UploadBlob,
}

/// View state that never touches the cache.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UiState {
    pub selected_index: usize,
    pub search_query: String,
    pub active_modal: Option<Modal>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct WalletState {
    pub active_address: Option<SuiAddress>,
    pub active_env: Option<String>,
    pub addresses: Loadable<AddressList>,
    pub environments: Loadable<EnvironmentList>,
    pub gas_coins: Loadable<Vec<GasCoin>>,
    pub objects: Loadable<Vec<OwnedObject>>,
    pub community: Loadable<CommunityStatus>,
    pub tier: Loadable<TierInfo>,
    /// Walrus listing for the active address, sanitized.
    pub blobs: Loadable<CommandOutput>,
    pub last_command: Option<CommandOutput>,
    pub last_mutation_error: Option<String>,
    pub ui: UiState,
}

impl WalletState {
    pub(crate) fn addresses_mut(&mut self) -> &mut Loadable<AddressList> {
        &mut self.addresses
    }

    pub(crate) fn environments_mut(&mut self) -> &mut Loadable<EnvironmentList> {
        &mut self.environments
    }

    pub(crate) fn gas_coins_mut(&mut self) -> &mut Loadable<Vec<GasCoin>> {
        &mut self.gas_coins
    }

    pub(crate) fn objects_mut(&mut self) -> &mut Loadable<Vec<OwnedObject>> {
        &mut self.objects
    }

    pub(crate) fn community_mut(&mut self) -> &mut Loadable<CommunityStatus> {
        &mut self.community
    }

    pub(crate) fn tier_mut(&mut self) -> &mut Loadable<TierInfo> {
        &mut self.tier
    }

    pub(crate) fn blobs_mut(&mut self) -> &mut Loadable<CommandOutput> {
        &mut self.blobs
    }

    /// Address entries matching the search query (address or alias,
    /// case-insensitive).
    pub fn visible_addresses(&self) -> Vec<&AddressEntry> {
        let Some(list) = self.addresses.value() else {
            return Vec::new();
        };
        let query = self.ui.search_query.trim().to_lowercase();
        list.addresses
            .iter()
            .filter(|entry| {
                query.is_empty()
                    || entry.address.to_canonical().contains(&query)
                    || entry
                        .alias
                        .as_deref()
                        .is_some_and(|alias| alias.to_lowercase().contains(&query))
            })
            .collect()
    }

    pub fn selected_address(&self) -> Option<SuiAddress> {
        self.visible_addresses()
            .get(self.ui.selected_index)
            .map(|entry| entry.address)
    }

    pub fn gas_balance(&self) -> u64 {
        self.gas_coins
            .value()
            .map(|coins| coins.iter().map(|coin| coin.balance_mist).sum())
            .unwrap_or(0)
    }
}
