use std::time::Duration;
use suiterm_cache::KeyFamily;

/// How long each resource stays fresh, plus the faucet settle delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub addresses_ttl: Duration,
    pub environments_ttl: Duration,
    pub gas_coins_ttl: Duration,
    pub objects_ttl: Duration,
    pub community_ttl: Duration,
    pub tier_ttl: Duration,
    pub blobs_ttl: Duration,
    /// Wait after a faucet request before invalidating, so the chain has
    /// indexed the transfer by the time balances are refetched.
    pub faucet_settle_delay: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            addresses_ttl: Duration::from_secs(3),
            environments_ttl: Duration::from_secs(10),
            gas_coins_ttl: Duration::from_secs(3),
            objects_ttl: Duration::from_secs(5),
            community_ttl: Duration::from_secs(10),
            tier_ttl: Duration::from_secs(10),
            blobs_ttl: Duration::from_secs(10),
            faucet_settle_delay: Duration::from_secs(2),
        }
    }
}

impl CachePolicy {
    pub fn ttl_for(&self, family: KeyFamily) -> Duration {
        match family {
            KeyFamily::Addresses => self.addresses_ttl,
            KeyFamily::Environments => self.environments_ttl,
            KeyFamily::GasCoins => self.gas_coins_ttl,
            KeyFamily::Objects => self.objects_ttl,
            KeyFamily::Community => self.community_ttl,
            KeyFamily::Tier => self.tier_ttl,
            KeyFamily::Blobs => self.blobs_ttl,
        }
    }

    /// Same TTL for every resource and no settle delay.
    pub fn uniform(ttl: Duration) -> Self {
        Self {
            addresses_ttl: ttl,
            environments_ttl: ttl,
            gas_coins_ttl: ttl,
            objects_ttl: ttl,
            community_ttl: ttl,
            tier_ttl: ttl,
            blobs_ttl: ttl,
            faucet_settle_delay: Duration::ZERO,
        }
    }
}
