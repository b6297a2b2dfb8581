//! Asset kinds and references
//!
//! A trade side names an asset by (registry, asset id). The kind decides
//! which capability set the registry is queried through.

use crate::ids::{Address, AssetId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Accounting model of an asset registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    /// Exactly one holder per asset id
    Unique,
    /// Holders carry a unit balance per asset id
    Quantified,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Unique => write!(f, "unique"),
            AssetKind::Quantified => write!(f, "quantified"),
        }
    }
}

/// One side of a trade: which registry, which asset, and how it is held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetRef {
    pub registry: Address,
    pub asset_id: AssetId,
    pub kind: AssetKind,
}

impl AssetRef {
    pub fn new(registry: Address, asset_id: AssetId, kind: AssetKind) -> Self {
        Self {
            registry,
            asset_id,
            kind,
        }
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}#{}", self.kind, self.registry, self.asset_id)
    }
}
