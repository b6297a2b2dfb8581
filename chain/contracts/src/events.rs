//! Contract events
//!
//! Events are immutable records emitted by the swap contract's mutating
//! operations. Only a call that succeeds emits one.

use serde::{Deserialize, Serialize};
use swap_types::ids::{Address, AssetId, TradeId};
use swap_types::numeric::Quantity;

/// New trade appended to the book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeOpened {
    pub trade_id: TradeId,
    pub opener: Address,
    pub opening_asset_registry: Address,
    pub opening_asset_id: AssetId,
    pub closing_asset_registry: Address,
    pub closing_asset_id: AssetId,
    pub expiry_date: i64,
}

/// Trade withdrawn before expiry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeCancelled {
    pub trade_id: TradeId,
    /// Caller that cancelled; not necessarily the opener
    pub cancelled_by: Address,
    pub cancelled_at: i64,
}

/// Both sides transferred
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeExecuted {
    pub trade_id: TradeId,
    pub opener: Address,
    pub closer: Address,
    /// Units moved on the opening side; zero for unique assets
    pub opening_amount: Quantity,
    /// Units moved on the closing side; zero for unique assets
    pub closing_amount: Quantity,
    pub executed_at: i64,
}

/// Enum wrapper for all contract events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractEvent {
    TradeOpened(TradeOpened),
    TradeCancelled(TradeCancelled),
    TradeExecuted(TradeExecuted),
}

impl ContractEvent {
    /// Trade the event refers to
    pub fn trade_id(&self) -> TradeId {
        match self {
            ContractEvent::TradeOpened(e) => e.trade_id,
            ContractEvent::TradeCancelled(e) => e.trade_id,
            ContractEvent::TradeExecuted(e) => e.trade_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trade_opened_serialization() {
        let event = TradeOpened {
            trade_id: TradeId::new(0),
            opener: Address::new(),
            opening_asset_registry: Address::new(),
            opening_asset_id: AssetId::new(420),
            closing_asset_registry: Address::new(),
            closing_asset_id: AssetId::new(777),
            expiry_date: 1_708_123_456,
        };
        let json = serde_json::to_string(&event).unwrap();
        let deser: TradeOpened = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deser);
    }

    #[test]
    fn test_contract_event_trade_id() {
        let event = ContractEvent::TradeCancelled(TradeCancelled {
            trade_id: TradeId::new(3),
            cancelled_by: Address::new(),
            cancelled_at: 1_000,
        });
        assert_eq!(event.trade_id(), TradeId::new(3));
    }

    #[test]
    fn test_trade_executed_enum_variant() {
        let event = ContractEvent::TradeExecuted(TradeExecuted {
            trade_id: TradeId::new(1),
            opener: Address::new(),
            closer: Address::new(),
            opening_amount: Quantity::ONE,
            closing_amount: Quantity::ONE,
            executed_at: 1_000,
        });
        assert!(matches!(event, ContractEvent::TradeExecuted(_)));
    }
}
