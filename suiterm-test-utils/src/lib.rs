//! suiterm Test Utilities
//!
//! Shared test infrastructure for the suiterm workspace:
//! - `MockBackend`, an in-memory bridge with call counters, latency and
//!   failure injection
//! - Proptest generators for wallet payloads
//! - Test fixtures for common scenarios
//! - Assertions for store results

pub use suiterm_client::backend::{
    AddEnvironmentRequest, CreateAddressRequest, DownloadBlobRequest, MergeCoinsRequest,
    SplitCoinRequest, UploadBlobRequest, WalletBackend,
};
pub use suiterm_client::{CachePolicy, ClientError, ClientResult, StoreError, StoreResult};
pub use suiterm_core::{
    AddressEntry, AddressList, CommandOutput, CommunityStatus, CreatedAddress, Environment,
    EnvironmentList, FaucetReceipt, GasCoin, Mist, OwnedObject, SuiAddress, Tier, TierInfo,
    TransactionOutcome, MIST_PER_SUI,
};

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

// ============================================================================
// MOCK BACKEND
// ============================================================================

/// Identifies one bridge endpoint for counting and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    GetAddresses,
    GetEnvironments,
    GetGasCoins,
    GetObjects,
    GetCommunityStatus,
    GetTierInfo,
    SwitchAddress,
    CreateAddress,
    RemoveAddress,
    SwitchEnvironment,
    AddEnvironment,
    RemoveEnvironment,
    SplitCoin,
    MergeCoins,
    RequestFaucet,
    JoinCommunity,
    ExecuteCommand,
    ListBlobs,
    UploadBlob,
    DownloadBlob,
}

impl Endpoint {
    pub const COUNT: usize = 20;

    fn index(self) -> usize {
        self as usize
    }
}

struct MockData {
    addresses: AddressList,
    environments: EnvironmentList,
    gas: HashMap<SuiAddress, Vec<GasCoin>>,
    objects: HashMap<SuiAddress, Vec<OwnedObject>>,
    members: HashMap<SuiAddress, CommunityStatus>,
    /// Blob ids per owner, in upload order.
    blobs: HashMap<SuiAddress, Vec<String>>,
    command_output: Option<CommandOutput>,
    next_address: u8,
    next_coin: u16,
    tx_counter: u64,
}

impl MockData {
    fn active(&self) -> Option<SuiAddress> {
        self.addresses.active()
    }

    fn next_digest(&mut self, kind: &str) -> String {
        self.tx_counter += 1;
        format!("{}-{:04}", kind, self.tx_counter)
    }

    fn mint_coin(&mut self, balance: Mist) -> GasCoin {
        self.next_coin += 1;
        GasCoin {
            coin_object_id: fixtures::coin_id(self.next_coin),
            version: 1,
            digest: format!("coin-{}", self.next_coin),
            balance_mist: balance,
        }
    }

    fn owner_of_coin(&self, coin: &SuiAddress) -> Option<SuiAddress> {
        self.gas
            .iter()
            .find(|(_, coins)| coins.iter().any(|c| c.coin_object_id == *coin))
            .map(|(owner, _)| *owner)
    }
}

/// In-memory bridge.
///
/// Every call is counted per endpoint, then waits for the configured latency
/// on the tokio clock, then fails if a failure is queued for that endpoint.
pub struct MockBackend {
    data: Mutex<MockData>,
    calls: [AtomicUsize; Endpoint::COUNT],
    latency: Mutex<Duration>,
    failures: Mutex<HashMap<Endpoint, VecDeque<ClientError>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn rejected<T>(message: &str) -> ClientResult<T> {
    Err(ClientError::Rejected(message.to_string()))
}

impl MockBackend {
    /// Backend seeded with `fixtures::sample_*` data.
    pub fn new() -> Self {
        let addresses = fixtures::sample_addresses();
        let mut gas = HashMap::new();
        let mut objects = HashMap::new();
        for entry in &addresses.addresses {
            gas.insert(entry.address, fixtures::sample_gas_coins(&entry.address));
            objects.insert(entry.address, fixtures::sample_objects(&entry.address));
        }
        Self::from_data(addresses, fixtures::sample_environments(), gas, objects)
    }

    /// Backend with no addresses and no environments.
    pub fn empty() -> Self {
        Self::from_data(
            AddressList::default(),
            EnvironmentList::default(),
            HashMap::new(),
            HashMap::new(),
        )
    }

    fn from_data(
        addresses: AddressList,
        environments: EnvironmentList,
        gas: HashMap<SuiAddress, Vec<GasCoin>>,
        objects: HashMap<SuiAddress, Vec<OwnedObject>>,
    ) -> Self {
        Self {
            data: Mutex::new(MockData {
                addresses,
                environments,
                gas,
                objects,
                members: HashMap::new(),
                blobs: HashMap::new(),
                command_output: None,
                next_address: 0x10,
                next_coin: 0x100,
                tx_counter: 0,
            }),
            calls: std::array::from_fn(|_| AtomicUsize::new(0)),
            latency: Mutex::new(Duration::ZERO),
            failures: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_latency(self, latency: Duration) -> Self {
        self.set_latency(latency);
        self
    }

    pub fn set_latency(&self, latency: Duration) {
        *lock(&self.latency) = latency;
    }

    /// Queue `error` for the next call to `endpoint`.
    pub fn fail_next(&self, endpoint: Endpoint, error: ClientError) {
        lock(&self.failures)
            .entry(endpoint)
            .or_default()
            .push_back(error);
    }

    /// Queue `times` generic rejections for `endpoint`.
    pub fn fail_next_times(&self, endpoint: Endpoint, times: usize) {
        for _ in 0..times {
            self.fail_next(endpoint, ClientError::Rejected("injected failure".to_string()));
        }
    }

    pub fn calls(&self, endpoint: Endpoint) -> usize {
        self.calls[endpoint.index()].load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.iter().map(|c| c.load(Ordering::SeqCst)).sum()
    }

    pub fn reset_calls(&self) {
        for counter in &self.calls {
            counter.store(0, Ordering::SeqCst);
        }
    }

    pub fn active_address(&self) -> Option<SuiAddress> {
        lock(&self.data).active()
    }

    pub fn set_command_output(&self, output: CommandOutput) {
        lock(&self.data).command_output = Some(output);
    }

    pub fn set_gas_coins(&self, owner: &SuiAddress, coins: Vec<GasCoin>) {
        lock(&self.data).gas.insert(*owner, coins);
    }

    async fn enter(&self, endpoint: Endpoint) -> ClientResult<()> {
        self.calls[endpoint.index()].fetch_add(1, Ordering::SeqCst);
        let latency = *lock(&self.latency);
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        let queued = lock(&self.failures)
            .get_mut(&endpoint)
            .and_then(VecDeque::pop_front);
        match queued {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WalletBackend for MockBackend {
    async fn get_addresses(&self) -> ClientResult<AddressList> {
        self.enter(Endpoint::GetAddresses).await?;
        Ok(lock(&self.data).addresses.clone())
    }

    async fn get_environments(&self) -> ClientResult<EnvironmentList> {
        self.enter(Endpoint::GetEnvironments).await?;
        Ok(lock(&self.data).environments.clone())
    }

    async fn get_gas_coins(&self, owner: &SuiAddress) -> ClientResult<Vec<GasCoin>> {
        self.enter(Endpoint::GetGasCoins).await?;
        Ok(lock(&self.data).gas.get(owner).cloned().unwrap_or_default())
    }

    async fn get_objects(&self, owner: &SuiAddress) -> ClientResult<Vec<OwnedObject>> {
        self.enter(Endpoint::GetObjects).await?;
        Ok(lock(&self.data).objects.get(owner).cloned().unwrap_or_default())
    }

    async fn get_community_status(
        &self,
        owner: Option<&SuiAddress>,
    ) -> ClientResult<CommunityStatus> {
        self.enter(Endpoint::GetCommunityStatus).await?;
        let data = lock(&self.data);
        let Some(address) = owner.copied().or_else(|| data.active()) else {
            return rejected("no active address");
        };
        let member_count = data.members.len() as u64;
        Ok(data
            .members
            .get(&address)
            .cloned()
            .unwrap_or_else(|| fixtures::community_status(&address, false, member_count)))
    }

    async fn get_tier_info(&self, owner: &SuiAddress) -> ClientResult<TierInfo> {
        self.enter(Endpoint::GetTierInfo).await?;
        let data = lock(&self.data);
        let tier = if data.members.contains_key(owner) {
            Tier::Bronze
        } else {
            Tier::None
        };
        Ok(fixtures::tier_info(owner, tier))
    }

    async fn switch_address(&self, address: &SuiAddress) -> ClientResult<SuiAddress> {
        self.enter(Endpoint::SwitchAddress).await?;
        let mut data = lock(&self.data);
        if !data.addresses.addresses.iter().any(|e| e.address == *address) {
            return rejected("address not found in keystore");
        }
        data.addresses.active_address = Some(*address);
        for entry in &mut data.addresses.addresses {
            entry.is_active = entry.address == *address;
        }
        Ok(*address)
    }

    async fn create_address(&self, request: &CreateAddressRequest) -> ClientResult<CreatedAddress> {
        self.enter(Endpoint::CreateAddress).await?;
        let mut data = lock(&self.data);
        data.next_address = data.next_address.wrapping_add(1);
        let address = fixtures::address(data.next_address);
        data.addresses.addresses.push(AddressEntry {
            address,
            alias: request.alias.clone(),
            balance_mist: 0,
            is_active: false,
        });
        let words = request.word_length.unwrap_or(12) as usize;
        Ok(CreatedAddress {
            address,
            alias: request.alias.clone(),
            recovery_phrase: Some(vec!["abandon"; words].join(" ")),
        })
    }

    async fn remove_address(&self, address: &SuiAddress) -> ClientResult<()> {
        self.enter(Endpoint::RemoveAddress).await?;
        let mut data = lock(&self.data);
        if data.active() == Some(*address) {
            return rejected("cannot remove the active address");
        }
        let before = data.addresses.addresses.len();
        data.addresses.addresses.retain(|e| e.address != *address);
        if data.addresses.addresses.len() == before {
            return rejected("address not found in keystore");
        }
        Ok(())
    }

    async fn switch_environment(&self, alias: &str) -> ClientResult<String> {
        self.enter(Endpoint::SwitchEnvironment).await?;
        let mut data = lock(&self.data);
        if !data.environments.environments.iter().any(|e| e.alias == alias) {
            return rejected("environment not found");
        }
        data.environments.active_env = Some(alias.to_string());
        for env in &mut data.environments.environments {
            env.is_active = env.alias == alias;
        }
        Ok(alias.to_string())
    }

    async fn add_environment(&self, request: &AddEnvironmentRequest) -> ClientResult<Environment> {
        self.enter(Endpoint::AddEnvironment).await?;
        let mut data = lock(&self.data);
        if data
            .environments
            .environments
            .iter()
            .any(|e| e.alias == request.alias)
        {
            return rejected("environment alias already exists");
        }
        let env = Environment {
            alias: request.alias.clone(),
            rpc_url: request.rpc_url.clone(),
            is_active: false,
        };
        data.environments.environments.push(env.clone());
        Ok(env)
    }

    async fn remove_environment(&self, alias: &str) -> ClientResult<()> {
        self.enter(Endpoint::RemoveEnvironment).await?;
        let mut data = lock(&self.data);
        if data.environments.active() == Some(alias) {
            return rejected("cannot remove the active environment");
        }
        let before = data.environments.environments.len();
        data.environments.environments.retain(|e| e.alias != alias);
        if data.environments.environments.len() == before {
            return rejected("environment not found");
        }
        Ok(())
    }

    async fn split_coin(&self, request: &SplitCoinRequest) -> ClientResult<TransactionOutcome> {
        self.enter(Endpoint::SplitCoin).await?;
        let mut data = lock(&self.data);
        let Some(owner) = data.owner_of_coin(&request.coin_id) else {
            return rejected("coin not found");
        };
        let total: Mist = request.amounts.iter().sum();
        let minted: Vec<GasCoin> = request
            .amounts
            .iter()
            .map(|amount| data.mint_coin(*amount))
            .collect();
        let coins = data.gas.entry(owner).or_default();
        let Some(source) = coins.iter_mut().find(|c| c.coin_object_id == request.coin_id) else {
            return rejected("coin not found");
        };
        if source.balance_mist < total {
            return rejected("insufficient coin balance");
        }
        source.balance_mist -= total;
        source.version += 1;
        coins.extend(minted);
        Ok(TransactionOutcome {
            digest: data.next_digest("split"),
            status: "success".to_string(),
            gas_used_mist: request.gas_budget.map(|budget| budget / 10),
        })
    }

    async fn merge_coins(&self, request: &MergeCoinsRequest) -> ClientResult<TransactionOutcome> {
        self.enter(Endpoint::MergeCoins).await?;
        let mut data = lock(&self.data);
        let Some(owner) = data.owner_of_coin(&request.primary_coin) else {
            return rejected("coin not found");
        };
        if data.owner_of_coin(&request.coin_to_merge) != Some(owner) {
            return rejected("coins must exist and share an owner");
        }
        let coins = data.gas.entry(owner).or_default();
        let merged: Mist = coins
            .iter()
            .filter(|c| c.coin_object_id == request.coin_to_merge)
            .map(|c| c.balance_mist)
            .sum();
        coins.retain(|c| c.coin_object_id != request.coin_to_merge);
        if let Some(primary) = coins
            .iter_mut()
            .find(|c| c.coin_object_id == request.primary_coin)
        {
            primary.balance_mist += merged;
            primary.version += 1;
        }
        Ok(TransactionOutcome {
            digest: data.next_digest("merge"),
            status: "success".to_string(),
            gas_used_mist: request.gas_budget.map(|budget| budget / 10),
        })
    }

    async fn request_faucet(&self, address: &SuiAddress) -> ClientResult<FaucetReceipt> {
        self.enter(Endpoint::RequestFaucet).await?;
        let mut data = lock(&self.data);
        let coin = data.mint_coin(MIST_PER_SUI);
        data.gas.entry(*address).or_default().push(coin);
        if let Some(entry) = data
            .addresses
            .addresses
            .iter_mut()
            .find(|e| e.address == *address)
        {
            entry.balance_mist += MIST_PER_SUI;
        }
        Ok(FaucetReceipt {
            address: *address,
            transferred_mist: MIST_PER_SUI,
            tx_digest: Some(data.next_digest("faucet")),
        })
    }

    async fn join_community(&self, address: &SuiAddress) -> ClientResult<CommunityStatus> {
        self.enter(Endpoint::JoinCommunity).await?;
        let mut data = lock(&self.data);
        if data.members.contains_key(address) {
            return rejected("already a member");
        }
        let member_count = data.members.len() as u64 + 1;
        let mut status = fixtures::community_status(address, true, member_count);
        status.joined_at = Some(chrono::Utc::now());
        data.members.insert(*address, status.clone());
        Ok(status)
    }

    async fn execute_command(&self, args: &[String]) -> ClientResult<CommandOutput> {
        self.enter(Endpoint::ExecuteCommand).await?;
        let data = lock(&self.data);
        Ok(data.command_output.clone().unwrap_or_else(|| CommandOutput {
            stdout: format!("sui {}", args.join(" ")),
            stderr: String::new(),
            exit_code: 0,
            duration_ms: 5,
        }))
    }

    async fn list_blobs(&self, owner: &SuiAddress) -> ClientResult<CommandOutput> {
        self.enter(Endpoint::ListBlobs).await?;
        let data = lock(&self.data);
        let ids = data.blobs.get(owner).cloned().unwrap_or_default();
        Ok(walrus_output(ids.join("\n")))
    }

    async fn upload_blob(&self, request: &UploadBlobRequest) -> ClientResult<CommandOutput> {
        self.enter(Endpoint::UploadBlob).await?;
        let mut data = lock(&self.data);
        let Some(owner) = data.active() else {
            return rejected("no active address");
        };
        let blob_id = data.next_digest("blob");
        data.blobs.entry(owner).or_default().push(blob_id.clone());
        Ok(walrus_output(format!(
            "Stored {} as {} for {} epochs",
            request.path,
            blob_id,
            request.epochs.unwrap_or(1)
        )))
    }

    async fn download_blob(&self, request: &DownloadBlobRequest) -> ClientResult<CommandOutput> {
        self.enter(Endpoint::DownloadBlob).await?;
        let data = lock(&self.data);
        if !data.blobs.values().flatten().any(|id| *id == request.blob_id) {
            return rejected("blob not found");
        }
        let target = request.output_path.as_deref().unwrap_or("stdout");
        Ok(walrus_output(format!("Read {} into {}", request.blob_id, target)))
    }
}

fn walrus_output(stdout: String) -> CommandOutput {
    CommandOutput {
        stdout,
        stderr: String::new(),
        exit_code: 0,
        duration_ms: 8,
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for wallet payloads.

    use super::*;
    use proptest::prelude::*;

    pub fn arb_address() -> impl Strategy<Value = SuiAddress> {
        any::<[u8; 32]>().prop_map(SuiAddress::new)
    }

    /// Hex spellings of one address: any case, any number of leading zeros
    /// stripped.
    pub fn arb_address_spelling() -> impl Strategy<Value = (SuiAddress, String)> {
        (arb_address(), any::<bool>(), 0usize..64).prop_map(|(address, upper, strip)| {
            let digits = address.to_canonical()[2..].to_string();
            let trimmed = digits.trim_start_matches('0');
            let keep = trimmed.len().max(digits.len().saturating_sub(strip)).max(1);
            let mut spelled = digits[digits.len() - keep..].to_string();
            if upper {
                spelled = spelled.to_uppercase();
            }
            (address, format!("0x{}", spelled))
        })
    }

    pub fn arb_address_entry() -> impl Strategy<Value = AddressEntry> {
        (
            arb_address(),
            proptest::option::of("[a-z][a-z0-9_-]{0,11}"),
            0u64..100 * MIST_PER_SUI,
        )
            .prop_map(|(address, alias, balance_mist)| AddressEntry {
                address,
                alias,
                balance_mist,
                is_active: false,
            })
    }

    /// Address list whose first entry, if any, is active.
    pub fn arb_address_list() -> impl Strategy<Value = AddressList> {
        proptest::collection::vec(arb_address_entry(), 0..8).prop_map(|mut addresses| {
            let active_address = addresses.first_mut().map(|entry| {
                entry.is_active = true;
                entry.address
            });
            AddressList {
                active_address,
                addresses,
            }
        })
    }

    pub fn arb_gas_coin() -> impl Strategy<Value = GasCoin> {
        (arb_address(), 1u64..1_000, 1u64..10 * MIST_PER_SUI).prop_map(
            |(coin_object_id, version, balance_mist)| GasCoin {
                coin_object_id,
                version,
                digest: format!("digest-{}", version),
                balance_mist,
            },
        )
    }

    pub fn arb_tier() -> impl Strategy<Value = Tier> {
        prop_oneof![
            Just(Tier::None),
            Just(Tier::Bronze),
            Just(Tier::Silver),
            Just(Tier::Gold),
            Just(Tier::Platinum),
        ]
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built test fixtures for common testing scenarios.

    use super::*;

    /// Address whose last byte is `n`.
    pub fn address(n: u8) -> SuiAddress {
        let mut bytes = [0u8; 32];
        bytes[31] = n;
        SuiAddress::new(bytes)
    }

    /// Coin object id distinct from every `address(n)`.
    pub fn coin_id(n: u16) -> SuiAddress {
        let mut bytes = [0u8; 32];
        bytes[0] = 0xc0;
        bytes[30..].copy_from_slice(&n.to_be_bytes());
        SuiAddress::new(bytes)
    }

    /// Two addresses, the first one active.
    pub fn sample_addresses() -> AddressList {
        AddressList {
            active_address: Some(address(1)),
            addresses: vec![
                AddressEntry {
                    address: address(1),
                    alias: Some("main".to_string()),
                    balance_mist: 5 * MIST_PER_SUI,
                    is_active: true,
                },
                AddressEntry {
                    address: address(2),
                    alias: Some("cold".to_string()),
                    balance_mist: MIST_PER_SUI,
                    is_active: false,
                },
            ],
        }
    }

    /// devnet (active) and testnet.
    pub fn sample_environments() -> EnvironmentList {
        EnvironmentList {
            active_env: Some("devnet".to_string()),
            environments: vec![
                Environment {
                    alias: "devnet".to_string(),
                    rpc_url: "https://fullnode.devnet.sui.io:443".to_string(),
                    is_active: true,
                },
                Environment {
                    alias: "testnet".to_string(),
                    rpc_url: "https://fullnode.testnet.sui.io:443".to_string(),
                    is_active: false,
                },
            ],
        }
    }

    pub fn sample_gas_coins(owner: &SuiAddress) -> Vec<GasCoin> {
        let seed = u16::from(owner.as_bytes()[31]) * 16;
        vec![
            GasCoin {
                coin_object_id: coin_id(seed + 1),
                version: 3,
                digest: format!("coin-{}", seed + 1),
                balance_mist: 3 * MIST_PER_SUI,
            },
            GasCoin {
                coin_object_id: coin_id(seed + 2),
                version: 7,
                digest: format!("coin-{}", seed + 2),
                balance_mist: 2 * MIST_PER_SUI,
            },
        ]
    }

    pub fn sample_objects(owner: &SuiAddress) -> Vec<OwnedObject> {
        let mut bytes = *owner.as_bytes();
        bytes[0] = 0x0b;
        vec![OwnedObject {
            object_id: SuiAddress::new(bytes),
            version: 1,
            digest: "obj-1".to_string(),
            object_type: Some("0x2::devnet_nft::DevNetNFT".to_string()),
            display_name: Some("Sample NFT".to_string()),
        }]
    }

    pub fn community_status(address: &SuiAddress, is_member: bool, member_count: u64) -> CommunityStatus {
        CommunityStatus {
            address: *address,
            is_member,
            joined_at: None,
            member_count,
        }
    }

    pub fn tier_info(address: &SuiAddress, tier: Tier) -> TierInfo {
        let (points, next_tier_points) = match tier {
            Tier::None => (0, Some(100)),
            Tier::Bronze => (100, Some(500)),
            Tier::Silver => (500, Some(2_000)),
            Tier::Gold => (2_000, Some(10_000)),
            Tier::Platinum => (10_000, None),
        };
        TierInfo {
            address: *address,
            tier,
            points,
            next_tier_points,
        }
    }

    /// Stock TTLs with no faucet settle delay.
    pub fn fast_policy() -> CachePolicy {
        CachePolicy {
            faucet_settle_delay: Duration::ZERO,
            ..CachePolicy::default()
        }
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions for store results.

    use super::*;

    /// Assert that a store action failed because the bridge rejected it.
    #[track_caller]
    pub fn assert_rejected<T: std::fmt::Debug>(result: &StoreResult<T>) {
        match result {
            Err(StoreError::Client(ClientError::Rejected(_))) => {}
            other => panic!("Expected Rejected error, got: {:?}", other),
        }
    }

    /// Assert that a store action failed for lack of an active address.
    #[track_caller]
    pub fn assert_no_active_address<T: std::fmt::Debug>(result: &StoreResult<T>) {
        match result {
            Err(StoreError::NoActiveAddress) => {}
            other => panic!("Expected NoActiveAddress error, got: {:?}", other),
        }
    }

    /// Assert that no secret-shaped text survived sanitization.
    #[track_caller]
    pub fn assert_sanitized(text: &str) {
        assert!(!text.contains("suiprivkey"), "private key leaked: {}", text);
        assert_eq!(
            text,
            suiterm_core::sanitize_output(text),
            "text is not in sanitized form"
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================
