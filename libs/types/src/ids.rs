//! Identifier types for swap participants, registries, assets and trades
//!
//! Party and registry identities use UUID v7, so freshly created addresses
//! sort by creation time. Trade ids are the dense sequence assigned by the
//! trade book.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity of a party, an asset registry, or the swap contract itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(Uuid);

#[allow(clippy::new_without_default)]
impl Address {
    /// Create a fresh address
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create from existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get inner UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an asset within a single registry
///
/// Only meaningful together with the registry address that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(u128);

impl AssetId {
    pub const fn new(id: u128) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u128 {
        self.0
    }
}

impl From<u128> for AssetId {
    fn from(id: u128) -> Self {
        Self(id)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sequential trade identifier
///
/// Assigned by the trade book starting at 0 and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeId(u64);

impl TradeId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// Position of this trade in the append-only book.
    ///
    /// `None` when the id cannot be an index on this platform.
    pub fn as_index(&self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }
}

impl From<u64> for TradeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
