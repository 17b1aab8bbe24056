//! Static invalidation metadata for every store mutation.
//!
//! Each mutation names the keys it makes stale and the resources the store
//! reloads afterwards. Keeping the table here means a new mutation cannot
//! forget to invalidate something without it showing up in one place.

use std::fmt;
use suiterm_cache::{CacheKey, KeyFamily, KeyPattern};
use suiterm_core::SuiAddress;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mutation {
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
    UploadBlob,
    RunCommand,
}

/// A key set to drop once a mutation succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalidation {
    Addresses,
    Environments,
    /// Gas coins of whichever address is active when the mutation settles.
    ActiveGasCoins,
    /// Walrus blobs of the active address.
    ActiveBlobs,
    Family(KeyFamily),
    Everything,
}

/// A store slot that a mutation reloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Addresses,
    Environments,
    GasCoins,
    Objects,
    Community,
    Tier,
    Blobs,
}

impl Mutation {
    pub const ALL: [Mutation; 12] = [
        Mutation::SwitchAddress,
        Mutation::CreateAddress,
        Mutation::RemoveAddress,
        Mutation::SwitchEnvironment,
        Mutation::AddEnvironment,
        Mutation::RemoveEnvironment,
        Mutation::SplitCoin,
        Mutation::MergeCoins,
        Mutation::RequestFaucet,
        Mutation::JoinCommunity,
        Mutation::UploadBlob,
        Mutation::RunCommand,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Mutation::SwitchAddress => "switch_address",
            Mutation::CreateAddress => "create_address",
            Mutation::RemoveAddress => "remove_address",
            Mutation::SwitchEnvironment => "switch_environment",
            Mutation::AddEnvironment => "add_environment",
            Mutation::RemoveEnvironment => "remove_environment",
            Mutation::SplitCoin => "split_coin",
            Mutation::MergeCoins => "merge_coins",
            Mutation::RequestFaucet => "request_faucet",
            Mutation::JoinCommunity => "join_community",
            Mutation::UploadBlob => "upload_blob",
            Mutation::RunCommand => "run_command",
        }
    }

    pub const fn invalidations(self) -> &'static [Invalidation] {
        use Invalidation as I;
        match self {
            Mutation::SwitchAddress => &[
                I::Addresses,
                I::Family(KeyFamily::Community),
                I::Family(KeyFamily::Tier),
            ],
            Mutation::CreateAddress | Mutation::RemoveAddress => &[I::Addresses],
            // Only the environment list knows the network; every
            // address-bound key is per network on the bridge side.
            Mutation::SwitchEnvironment => &[
                I::Environments,
                I::Addresses,
                I::Family(KeyFamily::GasCoins),
                I::Family(KeyFamily::Objects),
                I::Family(KeyFamily::Community),
                I::Family(KeyFamily::Tier),
                I::Family(KeyFamily::Blobs),
            ],
            Mutation::AddEnvironment | Mutation::RemoveEnvironment => &[I::Environments],
            Mutation::SplitCoin | Mutation::MergeCoins => &[I::ActiveGasCoins],
            Mutation::RequestFaucet => &[I::Addresses, I::ActiveGasCoins],
            Mutation::JoinCommunity => {
                &[I::Family(KeyFamily::Community), I::Family(KeyFamily::Tier)]
            }
            Mutation::UploadBlob => &[I::ActiveBlobs],
            Mutation::RunCommand => &[I::Everything],
        }
    }

    pub const fn refetches(self) -> &'static [Resource] {
        use Resource as R;
        match self {
            Mutation::SwitchAddress => &[R::Addresses, R::Community, R::Tier, R::GasCoins, R::Objects],
            Mutation::CreateAddress | Mutation::RemoveAddress => &[R::Addresses],
            Mutation::SwitchEnvironment => &[
                R::Environments,
                R::Addresses,
                R::GasCoins,
                R::Objects,
                R::Community,
                R::Tier,
            ],
            Mutation::AddEnvironment | Mutation::RemoveEnvironment => &[R::Environments],
            Mutation::SplitCoin | Mutation::MergeCoins => &[R::GasCoins],
            Mutation::RequestFaucet => &[R::Addresses, R::GasCoins],
            Mutation::JoinCommunity => &[R::Community, R::Tier],
            Mutation::UploadBlob => &[R::Blobs],
            Mutation::RunCommand => &[R::Addresses, R::Environments],
        }
    }

    /// Whether invalidation waits for the faucet settle delay.
    pub const fn waits_for_settle(self) -> bool {
        matches!(self, Mutation::RequestFaucet)
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Invalidation {
    /// The concrete pattern, or `None` when it needs an active address and
    /// none is known.
    pub fn resolve(self, active: Option<&SuiAddress>) -> Option<KeyPattern> {
        match self {
            Invalidation::Addresses => Some(CacheKey::addresses().into()),
            Invalidation::Environments => Some(CacheKey::environments().into()),
            Invalidation::ActiveGasCoins => active.map(|a| CacheKey::gas_coins(a).into()),
            Invalidation::ActiveBlobs => active.map(|a| CacheKey::blobs(a).into()),
            Invalidation::Family(family) => Some(family.into()),
            Invalidation::Everything => Some(KeyPattern::All),
        }
    }
}

impl Resource {
    /// Resources keyed by an address need one to be active.
    pub const fn is_address_bound(self) -> bool {
        !matches!(self, Resource::Addresses | Resource::Environments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_mutation_invalidates_and_refetches() {
        for mutation in Mutation::ALL {
            assert!(!mutation.invalidations().is_empty(), "{}", mutation);
            assert!(!mutation.refetches().is_empty(), "{}", mutation);
        }
    }

    #[test]
    fn switch_address_drops_membership_families() {
        let inv = Mutation::SwitchAddress.invalidations();
        assert!(inv.contains(&Invalidation::Family(KeyFamily::Community)));
        assert!(inv.contains(&Invalidation::Family(KeyFamily::Tier)));
        assert!(inv.contains(&Invalidation::Addresses));
    }

    #[test]
    fn switch_environment_drops_every_address_bound_family() {
        let inv = Mutation::SwitchEnvironment.invalidations();
        for family in KeyFamily::ALL {
            if family == KeyFamily::Environments {
                continue;
            }
            assert!(
                inv.iter().any(|i| match i {
                    Invalidation::Family(f) => *f == family,
                    Invalidation::Addresses => family == KeyFamily::Addresses,
                    _ => false,
                }),
                "{} survives a network switch",
                family
            );
        }
    }

    #[test]
    fn upload_touches_only_active_blobs() {
        assert_eq!(Mutation::UploadBlob.invalidations(), &[Invalidation::ActiveBlobs]);
        assert_eq!(Mutation::UploadBlob.refetches(), &[Resource::Blobs]);
        let addr: SuiAddress = "0xb0".parse().unwrap();
        assert_eq!(
            Invalidation::ActiveBlobs.resolve(Some(&addr)),
            Some(KeyPattern::Exact(CacheKey::blobs(&addr)))
        );
        assert!(Resource::Blobs.is_address_bound());
    }

    #[test]
    fn only_faucet_waits() {
        let waiting: Vec<_> = Mutation::ALL
            .into_iter()
            .filter(|m| m.waits_for_settle())
            .collect();
        assert_eq!(waiting, vec![Mutation::RequestFaucet]);
    }

    #[test]
    fn active_gas_coins_needs_an_address() {
        assert_eq!(Invalidation::ActiveGasCoins.resolve(None), None);
        let addr: SuiAddress = "0xa1".parse().unwrap();
        assert_eq!(
            Invalidation::ActiveGasCoins.resolve(Some(&addr)),
            Some(KeyPattern::Exact(CacheKey::gas_coins(&addr)))
        );
        assert_eq!(Invalidation::Everything.resolve(None), Some(KeyPattern::All));
    }

    #[test]
    fn global_resources_are_not_address_bound() {
        assert!(!Resource::Addresses.is_address_bound());
        assert!(!Resource::Environments.is_address_bound());
        assert!(Resource::GasCoins.is_address_bound());
        assert!(Resource::Tier.is_address_bound());
    }
}
