//! Cache key namespace.
//!
//! Every cacheable resource has exactly one variant here. The canonical
//! string form is `<family>` or `<family>:<param>`, where params are
//! canonical 64-digit addresses, so no key's string is a prefix of another
//! family's or another address's key.

use std::fmt;
use suiterm_core::SuiAddress;

/// Separator between a family prefix and its parameter.
pub const SEPARATOR: char = ':';

/// Placeholder parameter for community lookups bound to the active address.
pub const ACTIVE_PLACEHOLDER: &str = "~active";

/// Resource families, one per key prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyFamily {
    Addresses,
    Environments,
    GasCoins,
    Objects,
    Community,
    Tier,
    Blobs,
}

impl KeyFamily {
    pub const ALL: [KeyFamily; 7] = [
        KeyFamily::Addresses,
        KeyFamily::Environments,
        KeyFamily::GasCoins,
        KeyFamily::Objects,
        KeyFamily::Community,
        KeyFamily::Tier,
        KeyFamily::Blobs,
    ];

    /// Literal prefix of every key in this family.
    pub const fn prefix(&self) -> &'static str {
        match self {
            KeyFamily::Addresses => "addresses",
            KeyFamily::Environments => "environments",
            KeyFamily::GasCoins => "gas",
            KeyFamily::Objects => "objects",
            KeyFamily::Community => "community",
            KeyFamily::Tier => "tier",
            KeyFamily::Blobs => "blobs",
        }
    }
}

impl fmt::Display for KeyFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// A cache key for one logical resource.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CacheKey {
    Addresses,
    Environments,
    GasCoins(SuiAddress),
    Objects(SuiAddress),
    /// `None` means "whichever address the bridge considers active".
    CommunityStatus(Option<SuiAddress>),
    TierInfo(SuiAddress),
    /// Walrus blobs owned by an address.
    Blobs(SuiAddress),
}

impl CacheKey {
    pub fn addresses() -> Self {
        Self::Addresses
    }

    pub fn environments() -> Self {
        Self::Environments
    }

    pub fn gas_coins(address: &SuiAddress) -> Self {
        Self::GasCoins(*address)
    }

    pub fn objects(address: &SuiAddress) -> Self {
        Self::Objects(*address)
    }

    pub fn community_status(address: Option<&SuiAddress>) -> Self {
        Self::CommunityStatus(address.copied())
    }

    pub fn tier_info(address: &SuiAddress) -> Self {
        Self::TierInfo(*address)
    }

    pub fn blobs(address: &SuiAddress) -> Self {
        Self::Blobs(*address)
    }

    pub fn family(&self) -> KeyFamily {
        match self {
            Self::Addresses => KeyFamily::Addresses,
            Self::Environments => KeyFamily::Environments,
            Self::GasCoins(_) => KeyFamily::GasCoins,
            Self::Objects(_) => KeyFamily::Objects,
            Self::CommunityStatus(_) => KeyFamily::Community,
            Self::TierInfo(_) => KeyFamily::Tier,
            Self::Blobs(_) => KeyFamily::Blobs,
        }
    }

    /// The address this key is parameterised by, if any.
    pub fn owner(&self) -> Option<&SuiAddress> {
        match self {
            Self::Addresses | Self::Environments => None,
            Self::GasCoins(address)
            | Self::Objects(address)
            | Self::TierInfo(address)
            | Self::Blobs(address) => Some(address),
            Self::CommunityStatus(address) => address.as_ref(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = self.family().prefix();
        match self {
            Self::Addresses | Self::Environments => f.write_str(prefix),
            Self::CommunityStatus(None) => {
                write!(f, "{}{}{}", prefix, SEPARATOR, ACTIVE_PLACEHOLDER)
            }
            _ => match self.owner() {
                Some(address) => write!(f, "{}{}{}", prefix, SEPARATOR, address),
                None => f.write_str(prefix),
            },
        }
    }
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CacheKey({})", self)
    }
}

/// Matcher used for bulk invalidation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyPattern {
    Exact(CacheKey),
    /// Every key of a family, e.g. `community:*`.
    Family(KeyFamily),
    /// Every key parameterised by this address, in any family.
    Owner(SuiAddress),
    All,
}

impl KeyPattern {
    pub fn matches(&self, key: &CacheKey) -> bool {
        match self {
            KeyPattern::Exact(exact) => exact == key,
            KeyPattern::Family(family) => key.family() == *family,
            KeyPattern::Owner(address) => key.owner() == Some(address),
            KeyPattern::All => true,
        }
    }
}

impl From<CacheKey> for KeyPattern {
    fn from(key: CacheKey) -> Self {
        KeyPattern::Exact(key)
    }
}

impl From<KeyFamily> for KeyPattern {
    fn from(family: KeyFamily) -> Self {
        KeyPattern::Family(family)
    }
}

impl fmt::Display for KeyPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPattern::Exact(key) => write!(f, "{}", key),
            KeyPattern::Family(family) => write!(f, "{}{}*", family, SEPARATOR),
            KeyPattern::Owner(address) => write!(f, "*{}{}", SEPARATOR, address),
            KeyPattern::All => f.write_str("*"),
        }
    }
}
