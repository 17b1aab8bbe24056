use std::sync::Arc;
use std::time::Duration;
use suiterm_cache::{CacheKey, RequestCache};
use suiterm_client::backend::{
    AddEnvironmentRequest, CreateAddressRequest, DownloadBlobRequest, MergeCoinsRequest,
    SplitCoinRequest, UploadBlobRequest,
};
use suiterm_client::{CachePolicy, ClientError, FetchOutcome, StoreError, WalletStore};
use suiterm_core::{CommandOutput, GasCoin, KeyScheme, Tier, MIST_PER_SUI};
use suiterm_test_utils::assertions::{assert_no_active_address, assert_rejected, assert_sanitized};
use suiterm_test_utils::fixtures::{address, coin_id, fast_policy, sample_gas_coins};
use suiterm_test_utils::{Endpoint, MockBackend};

fn store_with(backend: MockBackend, policy: CachePolicy) -> WalletStore<MockBackend> {
    WalletStore::with_cache(Arc::new(backend), RequestCache::new(), policy)
}

fn store() -> WalletStore<MockBackend> {
    store_with(MockBackend::new(), fast_policy())
}

fn calls(store: &WalletStore<MockBackend>, endpoint: Endpoint) -> usize {
    store.backend().calls(endpoint)
}

// ============================================================================
// FETCH ACTIONS
// ============================================================================

#[tokio::test(start_paused = true)]
async fn fetch_addresses_sets_active_and_caches() {
    let store = store();
    let first = store.fetch_addresses().await.unwrap();
    assert!(!first.is_stale());
    assert_eq!(store.active_address(), Some(address(1)));

    let second = store.fetch_addresses().await.unwrap();
    assert_eq!(first.value(), second.value());
    assert_eq!(calls(&store, Endpoint::GetAddresses), 1);

    let snapshot = store.snapshot();
    assert!(snapshot.addresses.updated_at().is_some());
    assert!(!snapshot.addresses.is_loading());
}

#[tokio::test(start_paused = true)]
async fn overlapping_fetches_share_one_request() {
    let backend = MockBackend::new().with_latency(Duration::from_millis(200));
    let store = store_with(backend, fast_policy());

    let delayed = |ms: u64| {
        let store = store.clone();
        async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            store.fetch_addresses().await
        }
    };
    let (a, b, c) = tokio::join!(delayed(0), delayed(5), delayed(10));

    assert_eq!(calls(&store, Endpoint::GetAddresses), 1);
    let a = a.unwrap().into_value();
    assert_eq!(a, b.unwrap().into_value());
    assert_eq!(a, c.unwrap().into_value());
    assert_eq!(store.cache_stats().joined, 2);
}

#[tokio::test(start_paused = true)]
async fn gas_coins_refetch_after_ttl() {
    let store = store();
    let owner = address(1);
    store.fetch_gas_coins(&owner).await.unwrap();
    tokio::time::advance(Duration::from_millis(2_999)).await;
    store.fetch_gas_coins(&owner).await.unwrap();
    assert_eq!(calls(&store, Endpoint::GetGasCoins), 1);

    tokio::time::advance(Duration::from_millis(1)).await;
    store.fetch_gas_coins(&owner).await.unwrap();
    assert_eq!(calls(&store, Endpoint::GetGasCoins), 2);
}

#[tokio::test(start_paused = true)]
async fn failed_reload_keeps_previous_addresses() {
    let store = store();
    store.fetch_addresses().await.unwrap();
    tokio::time::advance(CachePolicy::default().addresses_ttl).await;

    store.backend().fail_next_times(Endpoint::GetAddresses, 1);
    let outcome = store.fetch_addresses().await.unwrap();
    assert!(matches!(outcome, FetchOutcome::KeptStale(ref list) if list.addresses.len() == 2));

    let snapshot = store.snapshot();
    assert!(snapshot.addresses.error().is_none());
    assert_eq!(snapshot.addresses.value().map(|l| l.addresses.len()), Some(2));
    assert_eq!(calls(&store, Endpoint::GetAddresses), 2);
}

#[tokio::test(start_paused = true)]
async fn failed_first_fetch_records_sanitized_error() {
    let store = store();
    store.backend().fail_next(
        Endpoint::GetAddresses,
        ClientError::Rejected("keystore dump suiprivkey1qqqsecret".to_string()),
    );

    let err = store.fetch_addresses().await.unwrap_err();
    assert!(matches!(err, ClientError::Rejected(_)));

    let snapshot = store.snapshot();
    let message = snapshot.addresses.error().unwrap();
    assert!(message.contains("****"));
    assert_sanitized(message);
    assert!(snapshot.addresses.value().is_none());

    // Nothing was cached, so the next read goes back to the bridge.
    store.fetch_addresses().await.unwrap();
    assert_eq!(calls(&store, Endpoint::GetAddresses), 2);
    assert!(store.snapshot().addresses.error().is_none());
}

#[tokio::test(start_paused = true)]
async fn empty_list_is_not_kept_on_failure() {
    let store = store_with(MockBackend::empty(), fast_policy());
    store.fetch_environments().await.unwrap();
    tokio::time::advance(Duration::from_secs(10)).await;

    store.backend().fail_next_times(Endpoint::GetEnvironments, 1);
    assert!(store.fetch_environments().await.is_err());
    assert!(store.snapshot().environments.error().is_some());
}

#[tokio::test(start_paused = true)]
async fn refresh_all_loads_every_slot() {
    let store = store();
    store.refresh_all().await.unwrap();

    let snapshot = store.snapshot();
    assert_eq!(snapshot.active_env.as_deref(), Some("devnet"));
    assert_eq!(snapshot.gas_coins.value().map(Vec::len), Some(2));
    assert_eq!(snapshot.gas_balance(), 5 * MIST_PER_SUI);
    assert_eq!(snapshot.objects.value().map(Vec::len), Some(1));
    assert!(snapshot.community.value().is_some());
    assert_eq!(snapshot.tier.value().map(|t| t.tier), Some(Tier::None));

    let owner = address(1);
    assert!(store.is_cached(&CacheKey::gas_coins(&owner)));
    assert!(store.is_cached(&CacheKey::objects(&owner)));
    assert!(store.is_cached(&CacheKey::community_status(Some(&owner))));
    assert!(store.is_cached(&CacheKey::tier_info(&owner)));
}

#[tokio::test(start_paused = true)]
async fn refresh_all_reports_first_error_but_loads_the_rest() {
    let store = store();
    store.backend().fail_next_times(Endpoint::GetObjects, 1);

    assert!(store.refresh_all().await.is_err());
    let snapshot = store.snapshot();
    assert!(snapshot.objects.error().is_some());
    assert!(snapshot.gas_coins.value().is_some());
    assert!(snapshot.tier.value().is_some());
}

// ============================================================================
// MUTATIONS
// ============================================================================

#[tokio::test(start_paused = true)]
async fn split_coin_invalidates_and_reloads_gas_coins() {
    let store = store();
    store.refresh_all().await.unwrap();
    let addresses_before = calls(&store, Endpoint::GetAddresses);
    assert_eq!(calls(&store, Endpoint::GetGasCoins), 1);

    let coin_id = sample_gas_coins(&address(1))[0].coin_object_id;
    store
        .split_coin(SplitCoinRequest {
            coin_id,
            amounts: vec![MIST_PER_SUI],
            gas_budget: None,
        })
        .await
        .unwrap();

    assert_eq!(calls(&store, Endpoint::GetGasCoins), 2);
    assert_eq!(calls(&store, Endpoint::GetAddresses), addresses_before);
    assert_eq!(store.snapshot().gas_coins.value().map(Vec::len), Some(3));
}

#[tokio::test(start_paused = true)]
async fn failed_mutation_leaves_cache_untouched() {
    let store = store();
    store.refresh_all().await.unwrap();
    let total_before = store.backend().total_calls();

    store.backend().fail_next_times(Endpoint::SplitCoin, 1);
    let result = store
        .split_coin(SplitCoinRequest {
            coin_id: sample_gas_coins(&address(1))[0].coin_object_id,
            amounts: vec![1],
            gas_budget: None,
        })
        .await;

    assert_rejected(&result);
    assert!(store.is_cached(&CacheKey::gas_coins(&address(1))));
    // Only the split call itself reached the bridge.
    assert_eq!(store.backend().total_calls(), total_before + 1);
    assert!(store.snapshot().last_mutation_error.is_some());
}

#[tokio::test(start_paused = true)]
async fn faucet_waits_for_settle_delay_before_invalidating() {
    let store = store_with(MockBackend::new(), CachePolicy::default());
    store.refresh_all().await.unwrap();
    let start = tokio::time::Instant::now();

    let (receipt, midway) = tokio::join!(store.request_faucet(), async {
        tokio::time::sleep(Duration::from_secs(1)).await;
        (
            calls(&store, Endpoint::GetAddresses),
            store.is_cached(&CacheKey::addresses()),
        )
    });

    let receipt = receipt.unwrap();
    assert_eq!(receipt.transferred_mist, MIST_PER_SUI);
    assert_eq!(midway, (1, true));
    assert!(start.elapsed() >= Duration::from_secs(2));
    assert_eq!(calls(&store, Endpoint::GetAddresses), 2);
    assert_eq!(calls(&store, Endpoint::GetGasCoins), 2);
    assert_eq!(store.snapshot().gas_balance(), 6 * MIST_PER_SUI);
}

#[tokio::test(start_paused = true)]
async fn switch_address_drops_membership_and_loads_new_owner() {
    let store = store();
    store.refresh_all().await.unwrap();
    let old = address(1);
    let new = address(2);

    let active = store.switch_address(&new).await.unwrap();
    assert_eq!(active, new);
    assert_eq!(store.active_address(), Some(new));

    assert!(!store.is_cached(&CacheKey::community_status(Some(&old))));
    assert!(!store.is_cached(&CacheKey::tier_info(&old)));
    assert!(store.is_cached(&CacheKey::community_status(Some(&new))));
    assert!(store.is_cached(&CacheKey::tier_info(&new)));
    assert!(store.is_cached(&CacheKey::gas_coins(&new)));

    let snapshot = store.snapshot();
    assert_eq!(snapshot.gas_coins.source(), Some(&CacheKey::gas_coins(&new)));
    assert_eq!(snapshot.tier.value().map(|t| t.address), Some(new));
}

#[tokio::test(start_paused = true)]
async fn switch_environment_drops_coin_and_object_families() {
    let store = store();
    store.refresh_all().await.unwrap();
    let gas_before = calls(&store, Endpoint::GetGasCoins);
    let objects_before = calls(&store, Endpoint::GetObjects);

    let alias = store.switch_environment("testnet").await.unwrap();
    assert_eq!(alias, "testnet");
    assert_eq!(store.active_env().as_deref(), Some("testnet"));
    assert_eq!(calls(&store, Endpoint::GetGasCoins), gas_before + 1);
    assert_eq!(calls(&store, Endpoint::GetObjects), objects_before + 1);
    assert_eq!(calls(&store, Endpoint::GetEnvironments), 2);
}

#[tokio::test(start_paused = true)]
async fn switch_environment_reloads_membership_for_the_new_network() {
    let store = store();
    store.refresh_all().await.unwrap();
    let owner = address(1);
    let community_before = calls(&store, Endpoint::GetCommunityStatus);
    let tier_before = calls(&store, Endpoint::GetTierInfo);
    store.fetch_blobs(&owner).await.unwrap();

    store.switch_environment("testnet").await.unwrap();

    assert_eq!(calls(&store, Endpoint::GetCommunityStatus), community_before + 1);
    assert_eq!(calls(&store, Endpoint::GetTierInfo), tier_before + 1);
    assert!(store.is_cached(&CacheKey::community_status(Some(&owner))));
    assert!(store.is_cached(&CacheKey::tier_info(&owner)));
    // Blob listings are dropped but only reloaded on demand.
    assert!(!store.is_cached(&CacheKey::blobs(&owner)));
    assert_eq!(calls(&store, Endpoint::ListBlobs), 1);
}

#[tokio::test(start_paused = true)]
async fn merge_coins_reloads_gas_coins_only() {
    let backend = MockBackend::new();
    let owner = address(1);
    let primary = coin_id(0x500);
    let merged = coin_id(0x501);
    backend.set_gas_coins(
        &owner,
        vec![
            GasCoin {
                coin_object_id: primary,
                version: 1,
                digest: "coin-500".to_string(),
                balance_mist: 4 * MIST_PER_SUI,
            },
            GasCoin {
                coin_object_id: merged,
                version: 1,
                digest: "coin-501".to_string(),
                balance_mist: MIST_PER_SUI,
            },
        ],
    );
    let store = store_with(backend, fast_policy());
    store.refresh_all().await.unwrap();
    let request = MergeCoinsRequest {
        primary_coin: primary,
        coin_to_merge: merged,
        gas_budget: None,
    };

    store.backend().fail_next_times(Endpoint::MergeCoins, 1);
    let total_before = store.backend().total_calls();
    assert_rejected(&store.merge_coins(request.clone()).await);
    assert_eq!(store.backend().total_calls(), total_before + 1);
    assert!(store.is_cached(&CacheKey::gas_coins(&owner)));

    let gas_before = calls(&store, Endpoint::GetGasCoins);
    let addresses_before = calls(&store, Endpoint::GetAddresses);
    let objects_before = calls(&store, Endpoint::GetObjects);
    store.merge_coins(request).await.unwrap();

    assert_eq!(calls(&store, Endpoint::GetGasCoins), gas_before + 1);
    assert_eq!(calls(&store, Endpoint::GetAddresses), addresses_before);
    assert_eq!(calls(&store, Endpoint::GetObjects), objects_before);
    assert!(store.is_cached(&CacheKey::objects(&owner)));
    let snapshot = store.snapshot();
    assert_eq!(snapshot.gas_coins.value().map(Vec::len), Some(1));
    assert_eq!(snapshot.gas_balance(), 5 * MIST_PER_SUI);
}

#[tokio::test(start_paused = true)]
async fn remove_address_reloads_list_and_forgets_the_owner() {
    let store = store();
    store.refresh_all().await.unwrap();
    let removed = address(2);
    store.fetch_gas_coins(&removed).await.unwrap();
    store.fetch_tier_info(&removed).await.unwrap();

    store.backend().fail_next_times(Endpoint::RemoveAddress, 1);
    let total_before = store.backend().total_calls();
    assert_rejected(&store.remove_address(&removed).await);
    assert_eq!(store.backend().total_calls(), total_before + 1);
    assert!(store.is_cached(&CacheKey::gas_coins(&removed)));
    assert!(store.is_cached(&CacheKey::tier_info(&removed)));

    let addresses_before = calls(&store, Endpoint::GetAddresses);
    let gas_before = calls(&store, Endpoint::GetGasCoins);
    store.remove_address(&removed).await.unwrap();

    assert_eq!(calls(&store, Endpoint::GetAddresses), addresses_before + 1);
    assert_eq!(calls(&store, Endpoint::GetGasCoins), gas_before);
    assert!(!store.is_cached(&CacheKey::gas_coins(&removed)));
    assert!(!store.is_cached(&CacheKey::tier_info(&removed)));
    assert!(store.is_cached(&CacheKey::gas_coins(&address(1))));
    let entries = store.snapshot().addresses.value().map(|l| l.addresses.len());
    assert_eq!(entries, Some(1));
}

#[tokio::test(start_paused = true)]
async fn add_environment_reloads_environments_only() {
    let store = store();
    store.refresh_all().await.unwrap();
    let request = AddEnvironmentRequest {
        alias: "local".to_string(),
        rpc_url: "http://127.0.0.1:9000".to_string(),
    };

    store.backend().fail_next_times(Endpoint::AddEnvironment, 1);
    let total_before = store.backend().total_calls();
    assert_rejected(&store.add_environment(request.clone()).await);
    assert_eq!(store.backend().total_calls(), total_before + 1);
    assert!(store.is_cached(&CacheKey::environments()));

    let environments_before = calls(&store, Endpoint::GetEnvironments);
    let addresses_before = calls(&store, Endpoint::GetAddresses);
    let env = store.add_environment(request).await.unwrap();
    assert_eq!(env.alias, "local");

    assert_eq!(calls(&store, Endpoint::GetEnvironments), environments_before + 1);
    assert_eq!(calls(&store, Endpoint::GetAddresses), addresses_before);
    assert!(store.is_cached(&CacheKey::gas_coins(&address(1))));
    let count = store
        .snapshot()
        .environments
        .value()
        .map(|l| l.environments.len());
    assert_eq!(count, Some(3));
}

#[tokio::test(start_paused = true)]
async fn remove_environment_reloads_environments_only() {
    let store = store();
    store.refresh_all().await.unwrap();

    // The bridge refuses to remove the active network.
    let total_before = store.backend().total_calls();
    assert_rejected(&store.remove_environment("devnet").await);
    assert_eq!(store.backend().total_calls(), total_before + 1);
    assert!(store.is_cached(&CacheKey::environments()));
    assert!(store.snapshot().last_mutation_error.is_some());

    let environments_before = calls(&store, Endpoint::GetEnvironments);
    let addresses_before = calls(&store, Endpoint::GetAddresses);
    store.remove_environment("testnet").await.unwrap();

    assert_eq!(calls(&store, Endpoint::GetEnvironments), environments_before + 1);
    assert_eq!(calls(&store, Endpoint::GetAddresses), addresses_before);
    assert!(store.is_cached(&CacheKey::objects(&address(1))));
    let snapshot = store.snapshot();
    assert!(snapshot.last_mutation_error.is_none());
    assert_eq!(snapshot.environments.value().map(|l| l.environments.len()), Some(1));
}

#[tokio::test(start_paused = true)]
async fn join_community_reloads_status_and_tier() {
    let store = store();
    store.refresh_all().await.unwrap();

    let status = store.join_community().await.unwrap();
    assert!(status.is_member);

    let snapshot = store.snapshot();
    assert_eq!(snapshot.community.value().map(|s| s.is_member), Some(true));
    assert_eq!(snapshot.tier.value().map(|t| t.tier), Some(Tier::Bronze));
}

#[tokio::test(start_paused = true)]
async fn coin_actions_need_an_active_address() {
    let store = store_with(MockBackend::empty(), fast_policy());
    store.fetch_addresses().await.unwrap();

    let result = store
        .split_coin(SplitCoinRequest {
            coin_id: address(7),
            amounts: vec![1],
            gas_budget: None,
        })
        .await;
    assert_no_active_address(&result);
    assert_no_active_address(&store.request_faucet().await);
    assert_eq!(calls(&store, Endpoint::SplitCoin), 0);
    assert_eq!(calls(&store, Endpoint::RequestFaucet), 0);
}

#[tokio::test(start_paused = true)]
async fn invalid_request_never_reaches_bridge() {
    let store = store();
    let result = store
        .create_address(CreateAddressRequest::new(KeyScheme::Ed25519).with_word_length(11))
        .await;
    assert!(matches!(result, Err(StoreError::Validation(_))));
    assert_eq!(calls(&store, Endpoint::CreateAddress), 0);
}

#[tokio::test(start_paused = true)]
async fn create_address_reloads_address_list() {
    let store = store();
    store.fetch_addresses().await.unwrap();

    let created = store
        .create_address(CreateAddressRequest::new(KeyScheme::Ed25519).with_alias("hot"))
        .await
        .unwrap();
    let snapshot = store.snapshot();
    let list = snapshot.addresses.value().unwrap();
    assert_eq!(list.addresses.len(), 3);
    assert!(list.addresses.iter().any(|e| e.address == created.address));
}

// ============================================================================
// WALRUS BLOBS
// ============================================================================

#[tokio::test(start_paused = true)]
async fn upload_blob_reloads_the_listing() {
    let store = store();
    store.fetch_addresses().await.unwrap();
    let owner = address(1);

    let listing = store.fetch_blobs(&owner).await.unwrap();
    assert!(listing.value().stdout.is_empty());
    store.fetch_blobs(&owner).await.unwrap();
    assert_eq!(calls(&store, Endpoint::ListBlobs), 1);

    let output = store
        .upload_blob(UploadBlobRequest {
            path: "site.tar".to_string(),
            epochs: Some(2),
        })
        .await
        .unwrap();
    assert!(output.stdout.contains("blob-0001"));

    assert_eq!(calls(&store, Endpoint::ListBlobs), 2);
    assert_eq!(calls(&store, Endpoint::GetGasCoins), 0);
    let snapshot = store.snapshot();
    assert_eq!(snapshot.blobs.value().map(|o| o.stdout.as_str()), Some("blob-0001"));
    assert_eq!(snapshot.blobs.source(), Some(&CacheKey::blobs(&owner)));
}

#[tokio::test(start_paused = true)]
async fn failed_upload_keeps_cached_listing() {
    let store = store();
    store.fetch_addresses().await.unwrap();
    let owner = address(1);
    store.fetch_blobs(&owner).await.unwrap();

    store.backend().fail_next_times(Endpoint::UploadBlob, 1);
    let result = store
        .upload_blob(UploadBlobRequest {
            path: "site.tar".to_string(),
            epochs: None,
        })
        .await;
    assert_rejected(&result);
    assert!(store.is_cached(&CacheKey::blobs(&owner)));
    assert_eq!(calls(&store, Endpoint::ListBlobs), 1);
}

#[tokio::test(start_paused = true)]
async fn upload_needs_an_active_address() {
    let store = store_with(MockBackend::empty(), fast_policy());
    store.fetch_addresses().await.unwrap();
    let result = store
        .upload_blob(UploadBlobRequest {
            path: "site.tar".to_string(),
            epochs: None,
        })
        .await;
    assert_no_active_address(&result);
    assert_eq!(calls(&store, Endpoint::UploadBlob), 0);
}

#[tokio::test(start_paused = true)]
async fn download_blob_leaves_cache_alone() {
    let store = store();
    store.fetch_addresses().await.unwrap();
    store
        .upload_blob(UploadBlobRequest {
            path: "site.tar".to_string(),
            epochs: None,
        })
        .await
        .unwrap();
    let stats_before = store.cache_stats();

    let output = store
        .download_blob(DownloadBlobRequest {
            blob_id: "blob-0001".to_string(),
            output_path: Some("copy.tar".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(output.stdout, "Read blob-0001 into copy.tar");
    let stats_after = store.cache_stats();
    assert_eq!(stats_after.entry_count, stats_before.entry_count);
    assert_eq!(stats_after.invalidations, stats_before.invalidations);
    assert_eq!(
        store.snapshot().last_command.map(|c| c.stdout),
        Some("Read blob-0001 into copy.tar".to_string())
    );

    let invalid = store
        .download_blob(DownloadBlobRequest {
            blob_id: String::new(),
            output_path: None,
        })
        .await;
    assert!(matches!(invalid, Err(StoreError::Validation(_))));
    assert_eq!(calls(&store, Endpoint::DownloadBlob), 1);
}

// ============================================================================
// RAW COMMANDS
// ============================================================================

#[tokio::test(start_paused = true)]
async fn empty_command_is_rejected_locally() {
    let store = store();
    let result = store.run_command(&[]).await;
    assert!(matches!(result, Err(StoreError::EmptyCommand)));
    let result = store.run_command(&["  ".to_string()]).await;
    assert!(matches!(result, Err(StoreError::EmptyCommand)));
    assert_eq!(calls(&store, Endpoint::ExecuteCommand), 0);
}

#[tokio::test(start_paused = true)]
async fn run_command_sanitizes_output_and_flushes_cache() {
    let store = store();
    store.refresh_all().await.unwrap();
    store.backend().set_command_output(CommandOutput {
        stdout: "suiprivkey1qq9secretsecret".to_string(),
        stderr: String::new(),
        exit_code: 0,
        duration_ms: 40,
    });

    let output = store
        .run_command(&["keytool".to_string(), "export".to_string()])
        .await
        .unwrap();
    assert_eq!(output.stdout, "****");
    assert_eq!(
        store.snapshot().last_command.map(|c| c.stdout),
        Some("****".to_string())
    );

    // Everything was dropped; only the global lists were reloaded.
    assert!(!store.is_cached(&CacheKey::gas_coins(&address(1))));
    assert!(store.is_cached(&CacheKey::addresses()));
    assert!(store.is_cached(&CacheKey::environments()));
}

// ============================================================================
// UI STATE
// ============================================================================

#[tokio::test(start_paused = true)]
async fn search_and_selection_stay_in_range() {
    let store = store();
    store.fetch_addresses().await.unwrap();

    store.select_index(10);
    assert_eq!(store.snapshot().ui.selected_index, 1);

    store.set_search_query("cold");
    let snapshot = store.snapshot();
    assert_eq!(snapshot.ui.selected_index, 0);
    assert_eq!(snapshot.selected_address(), Some(address(2)));

    store.open_modal(suiterm_client::store::Modal::SplitCoin);
    assert!(store.snapshot().ui.active_modal.is_some());
    store.close_modal();
    assert!(store.snapshot().ui.active_modal.is_none());
    assert_eq!(store.backend().total_calls(), 1);
}
