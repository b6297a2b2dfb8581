//! Shared types for the peer-to-peer swap contract
//!
//! Plain data used on both sides of the contract boundary: identities,
//! quantities, asset references and the trade record itself.
//!
//! # Modules
//! - `ids`: Identifiers (Address, AssetId, TradeId)
//! - `numeric`: Whole-unit quantities for balance-tracked assets
//! - `asset`: Asset kinds and per-side asset references
//! - `trade`: Trade record and derived lifecycle status

pub mod ids;
pub mod numeric;
pub mod asset;
pub mod trade;
