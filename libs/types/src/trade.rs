//! Trade record and derived lifecycle status
//!
//! A trade is immutable after creation except for `active`, which moves
//! from `true` to `false` exactly once (execution or cancellation).
//! Expiry is never stored; it is derived from `expiry_date` and the clock.

use crate::asset::{AssetKind, AssetRef};
use crate::ids::{Address, AssetId, TradeId};
use serde::{Deserialize, Serialize};

/// Lifecycle status as seen at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeStatus {
    /// Open and before expiry
    Active,
    /// Still flagged active but the expiry date has passed (terminal)
    Expired,
    /// Executed or cancelled (terminal)
    Closed,
}

impl TradeStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TradeStatus::Active)
    }
}

/// Proposed exchange of one asset for another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    pub opening_asset_registry: Address,
    pub opening_asset_id: AssetId,
    pub closing_asset_registry: Address,
    pub closing_asset_id: AssetId,
    pub opener: Address,
    /// Unix seconds
    pub expiry_date: i64,
    pub opening_asset_kind: AssetKind,
    pub closing_asset_kind: AssetKind,
    pub active: bool,
}

impl Trade {
    /// Create a new active trade
    pub fn new(
        id: TradeId,
        opener: Address,
        opening: AssetRef,
        closing: AssetRef,
        expiry_date: i64,
    ) -> Self {
        Self {
            id,
            opening_asset_registry: opening.registry,
            opening_asset_id: opening.asset_id,
            closing_asset_registry: closing.registry,
            closing_asset_id: closing.asset_id,
            opener,
            expiry_date,
            opening_asset_kind: opening.kind,
            closing_asset_kind: closing.kind,
            active: true,
        }
    }

    /// The asset the opener offers
    pub fn opening_asset(&self) -> AssetRef {
        AssetRef::new(
            self.opening_asset_registry,
            self.opening_asset_id,
            self.opening_asset_kind,
        )
    }

    /// The asset the opener wants in return
    pub fn closing_asset(&self) -> AssetRef {
        AssetRef::new(
            self.closing_asset_registry,
            self.closing_asset_id,
            self.closing_asset_kind,
        )
    }

    /// `true` once `now` has reached the expiry date
    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.expiry_date
    }

    /// Derived status at `now`
    pub fn status(&self, now: i64) -> TradeStatus {
        if !self.active {
            TradeStatus::Closed
        } else if self.is_expired(now) {
            TradeStatus::Expired
        } else {
            TradeStatus::Active
        }
    }

    /// Flip the trade to its terminal inactive state.
    ///
    /// Returns `false` if the trade was already inactive.
    pub fn close(&mut self) -> bool {
        std::mem::replace(&mut self.active, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_trade(expiry_date: i64) -> Trade {
        Trade::new(
            TradeId::new(0),
            Address::new(),
            AssetRef::new(Address::new(), AssetId::new(420), AssetKind::Unique),
            AssetRef::new(Address::new(), AssetId::new(13), AssetKind::Quantified),
            expiry_date,
        )
    }

    #[test]
    fn test_new_trade_is_active() {
        let trade = sample_trade(1_000);
        assert!(trade.active);
        assert_eq!(trade.status(999), TradeStatus::Active);
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let trade = sample_trade(1_000);
        assert!(!trade.is_expired(999));
        assert!(trade.is_expired(1_000));
        assert_eq!(trade.status(1_000), TradeStatus::Expired);
    }

    #[test]
    fn test_close_is_one_way() {
        let mut trade = sample_trade(1_000);
        assert!(trade.close());
        assert!(!trade.close(), "Second close must report already inactive");
        assert!(!trade.active);
        assert_eq!(trade.status(0), TradeStatus::Closed);
        assert!(trade.status(0).is_terminal());
    }

    #[test]
    fn test_asset_refs_round_trip_fields() {
        let trade = sample_trade(1_000);
        assert_eq!(trade.opening_asset().asset_id, AssetId::new(420));
        assert_eq!(trade.closing_asset().kind, AssetKind::Quantified);
    }

    #[test]
    fn test_trade_serializes_ten_fields() {
        let trade = sample_trade(1_000);
        let value = serde_json::to_value(&trade).unwrap();
        assert_eq!(value.as_object().unwrap().len(), 10);
    }
}
