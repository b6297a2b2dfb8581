//! Trade book: append-only store of trade records
//!
//! Trades are stored in opening order and indexed by their id, so the id of
//! the next trade is always the current length. Records are never removed;
//! the only mutation is closing a trade (clearing `active`).

use swap_types::asset::AssetRef;
use swap_types::ids::{Address, TradeId};
use swap_types::trade::Trade;

use crate::errors::SwapError;

#[derive(Debug, Clone, Default)]
pub struct TradeBook {
    trades: Vec<Trade>,
}

impl TradeBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next appended trade will receive.
    pub fn next_id(&self) -> TradeId {
        TradeId::new(self.trades.len() as u64)
    }

    /// Append a new active trade and return its id.
    pub fn append(
        &mut self,
        opener: Address,
        opening: AssetRef,
        closing: AssetRef,
        expiry_date: i64,
    ) -> TradeId {
        let id = self.next_id();
        self.trades
            .push(Trade::new(id, opener, opening, closing, expiry_date));
        id
    }

    pub fn get(&self, trade_id: TradeId) -> Option<&Trade> {
        trade_id.as_index().and_then(|i| self.trades.get(i))
    }

    /// Lookup that reports unknown ids as `NotFound`.
    pub fn find(&self, trade_id: TradeId) -> Result<&Trade, SwapError> {
        self.get(trade_id).ok_or(SwapError::NotFound { trade_id })
    }

    /// Mutable lookup. Only the book's owner may close trades through it.
    pub(crate) fn find_mut(&mut self, trade_id: TradeId) -> Result<&mut Trade, SwapError> {
        trade_id
            .as_index()
            .and_then(|i| self.trades.get_mut(i))
            .ok_or(SwapError::NotFound { trade_id })
    }

    /// Total trades ever opened, regardless of status.
    pub fn count(&self) -> u64 {
        self.trades.len() as u64
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    /// Trades still open for cancellation or execution at `now`.
    pub fn active_at(&self, now: i64) -> impl Iterator<Item = &Trade> {
        self.trades
            .iter()
            .filter(move |t| t.active && !t.is_expired(now))
    }
}
