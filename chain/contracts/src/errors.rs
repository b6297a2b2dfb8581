//! Contract-specific error types
//!
//! `SwapError` covers the trade lifecycle. `RegistryError` is what an asset
//! registry reports when it refuses a transfer or a query.

use swap_types::ids::{Address, AssetId, TradeId};
use swap_types::numeric::Quantity;
use thiserror::Error;

/// Asset registry errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Asset {asset_id} is not owned by {from}")]
    NotOwner { asset_id: AssetId, from: Address },

    #[error("Operator {operator} is not approved by {owner}")]
    NotApproved { owner: Address, operator: Address },

    #[error("Insufficient balance for asset {asset_id}: required {required}, available {available}")]
    InsufficientBalance {
        asset_id: AssetId,
        required: Quantity,
        available: Quantity,
    },

    #[error("Unknown asset: {asset_id}")]
    UnknownAsset { asset_id: AssetId },

    #[error("Asset already minted: {asset_id}")]
    AssetExists { asset_id: AssetId },

    #[error("Arithmetic overflow in balance calculation")]
    Overflow,

    #[error("Registry transfers are paused")]
    Paused,

    #[error("No registry deployed at {registry}")]
    UnknownRegistry { registry: Address },
}

/// Trade lifecycle errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwapError {
    #[error("Invalid expiry: {expiry_date} must be after current time {now}")]
    InvalidExpiry { expiry_date: i64, now: i64 },

    #[error("Trade {trade_id} expired at {expiry_date} (now {now})")]
    TradeExpired {
        trade_id: TradeId,
        expiry_date: i64,
        now: i64,
    },

    #[error("Trade {trade_id} is not executable")]
    TradeNotExecutable { trade_id: TradeId },

    #[error("Trade not found: {trade_id}")]
    NotFound { trade_id: TradeId },

    #[error("Trade {trade_id} is no longer active")]
    TradeInactive { trade_id: TradeId },

    #[error("Registry {registry} supports neither unique nor quantified assets")]
    UnsupportedRegistry { registry: Address },

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
}
