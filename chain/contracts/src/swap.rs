//! Swap contract: trade lifecycle controller
//!
//! Opens, cancels and executes peer-to-peer trades between two asset
//! registries without ever taking custody. The contract only records trade
//! intent; when a counterparty executes, both assets move directly between
//! the two parties through the registries, with this contract acting as the
//! approved operator.
//!
//! Lifecycle: `open → (execute | cancel)`. Expiry is not a state of its own;
//! a trade whose expiry date has passed simply can no longer be cancelled or
//! executed.
//!
//! Mutating operations are not atomic on their own. A failed second transfer
//! in [`SwapContract::execute_trade`] leaves the first one applied unless the
//! call runs inside a host transaction such as [`crate::ledger::Ledger`].
//! The contract's own state (trade book and event log) only changes after
//! an operation's last fallible step.

use swap_types::asset::{AssetKind, AssetRef};
use swap_types::ids::{Address, AssetId, TradeId};
use swap_types::numeric::Quantity;
use swap_types::trade::{Trade, TradeStatus};
use tracing::{debug, info, warn};

use crate::book::TradeBook;
use crate::config::SwapConfig;
use crate::context::CallContext;
use crate::errors::SwapError;
use crate::events::{ContractEvent, TradeCancelled, TradeExecuted, TradeOpened};
use crate::executability::{self, NotExecutableReason};
use crate::registry::AssetRegistries;

#[derive(Debug, Clone)]
pub struct SwapContract {
    /// Operator address parties approve on their registries
    address: Address,
    dev_fund: Address,
    book: TradeBook,
    /// Emitted events log (append-only)
    events: Vec<ContractEvent>,
}

impl SwapContract {
    pub fn new(config: SwapConfig) -> Self {
        Self {
            address: config.operator.unwrap_or_else(Address::new),
            dev_fund: config.dev_fund,
            book: TradeBook::new(),
            events: Vec::new(),
        }
    }

    /// Address the contract acts under when moving assets.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Configured beneficiary address.
    pub fn dev_fund(&self) -> Address {
        self.dev_fund
    }

    // ───────────────────────── Open ─────────────────────────

    /// Announce a trade: the caller offers the opening asset in exchange
    /// for the closing asset until `expiry_date`.
    ///
    /// Neither ownership nor approval is checked here. A trade over assets
    /// the opener does not (yet) hold is valid but not executable.
    #[allow(clippy::too_many_arguments)]
    pub fn open_new_trade<R: AssetRegistries + ?Sized>(
        &mut self,
        registries: &R,
        ctx: &CallContext,
        opening_registry: Address,
        opening_asset_id: AssetId,
        closing_registry: Address,
        closing_asset_id: AssetId,
        expiry_date: i64,
    ) -> Result<TradeId, SwapError> {
        if expiry_date <= ctx.now {
            return Err(SwapError::InvalidExpiry {
                expiry_date,
                now: ctx.now,
            });
        }

        let opening = AssetRef::new(
            opening_registry,
            opening_asset_id,
            Self::probe_kind(registries, &opening_registry)?,
        );
        let closing = AssetRef::new(
            closing_registry,
            closing_asset_id,
            Self::probe_kind(registries, &closing_registry)?,
        );

        let trade_id = self.book.append(ctx.caller, opening, closing, expiry_date);

        info!(
            %trade_id,
            opener = %ctx.caller,
            opening = %opening,
            closing = %closing,
            expiry_date,
            "Trade opened"
        );

        self.events.push(ContractEvent::TradeOpened(TradeOpened {
            trade_id,
            opener: ctx.caller,
            opening_asset_registry: opening.registry,
            opening_asset_id: opening.asset_id,
            closing_asset_registry: closing.registry,
            closing_asset_id: closing.asset_id,
            expiry_date,
        }));

        Ok(trade_id)
    }

    fn probe_kind<R: AssetRegistries + ?Sized>(
        registries: &R,
        registry: &Address,
    ) -> Result<AssetKind, SwapError> {
        registries
            .kind_of(registry)
            .ok_or(SwapError::UnsupportedRegistry {
                registry: *registry,
            })
    }

    // ───────────────────────── Cancel ─────────────────────────

    /// Withdraw an open trade before its expiry date.
    ///
    /// Any caller may cancel; the canceller is recorded in the event.
    pub fn cancel_trade(
        &mut self,
        ctx: &CallContext,
        trade_id: TradeId,
    ) -> Result<ContractEvent, SwapError> {
        let trade = self.book.find_mut(trade_id)?;

        if trade.is_expired(ctx.now) {
            return Err(SwapError::TradeExpired {
                trade_id,
                expiry_date: trade.expiry_date,
                now: ctx.now,
            });
        }
        if !trade.close() {
            return Err(SwapError::TradeInactive { trade_id });
        }

        info!(
            %trade_id,
            opener = %trade.opener,
            caller = %ctx.caller,
            "Trade cancelled"
        );

        let event = ContractEvent::TradeCancelled(TradeCancelled {
            trade_id,
            cancelled_by: ctx.caller,
            cancelled_at: ctx.now,
        });
        self.events.push(event.clone());
        Ok(event)
    }

    // ───────────────────────── Execute ─────────────────────────

    /// Close a trade as the counterparty: the opening asset moves from the
    /// opener to the caller and the closing asset from the caller to the
    /// opener, then the trade is deactivated.
    ///
    /// Executability is re-checked against live registry state first.
    pub fn execute_trade<R: AssetRegistries + ?Sized>(
        &mut self,
        registries: &mut R,
        ctx: &CallContext,
        trade_id: TradeId,
        opening_amount: Quantity,
        closing_amount: Quantity,
    ) -> Result<ContractEvent, SwapError> {
        if let Some(reason) =
            self.diagnose(&*registries, ctx, trade_id, opening_amount, closing_amount)
        {
            debug!(%trade_id, caller = %ctx.caller, %reason, "Trade not executable");
            return Err(SwapError::TradeNotExecutable { trade_id });
        }

        let trade = self.book.find(trade_id)?.clone();

        self.transfer_side(
            registries,
            trade_id,
            &trade.opening_asset(),
            &trade.opener,
            &ctx.caller,
            opening_amount,
        )?;
        self.transfer_side(
            registries,
            trade_id,
            &trade.closing_asset(),
            &ctx.caller,
            &trade.opener,
            closing_amount,
        )?;

        self.book.find_mut(trade_id)?.close();

        info!(
            %trade_id,
            opener = %trade.opener,
            caller = %ctx.caller,
            %opening_amount,
            %closing_amount,
            "Trade executed"
        );

        let event = ContractEvent::TradeExecuted(TradeExecuted {
            trade_id,
            opener: trade.opener,
            closer: ctx.caller,
            opening_amount: Self::moved_units(trade.opening_asset_kind, opening_amount),
            closing_amount: Self::moved_units(trade.closing_asset_kind, closing_amount),
            executed_at: ctx.now,
        });
        self.events.push(event.clone());
        Ok(event)
    }

    fn transfer_side<R: AssetRegistries + ?Sized>(
        &self,
        registries: &mut R,
        trade_id: TradeId,
        asset: &AssetRef,
        from: &Address,
        to: &Address,
        amount: Quantity,
    ) -> Result<(), SwapError> {
        let mut registry = registries
            .resolve_mut(asset)
            .ok_or(SwapError::TradeNotExecutable { trade_id })?;

        registry
            .transfer(&self.address, from, to, asset.asset_id, amount)
            .map_err(|e| {
                warn!(%trade_id, asset = %asset, error = %e, "Registry rejected transfer");
                SwapError::Registry(e)
            })
    }

    fn moved_units(kind: AssetKind, amount: Quantity) -> Quantity {
        match kind {
            AssetKind::Unique => Quantity::ZERO,
            AssetKind::Quantified => amount,
        }
    }

    // ───────────────────────── Executability ─────────────────────────

    /// Whether `ctx.caller` could execute the trade right now with these
    /// amounts. Never fails; unknown ids are simply not executable.
    pub fn is_trade_executable<R: AssetRegistries + ?Sized>(
        &self,
        registries: &R,
        ctx: &CallContext,
        trade_id: TradeId,
        opening_amount: Quantity,
        closing_amount: Quantity,
    ) -> bool {
        self.diagnose(registries, ctx, trade_id, opening_amount, closing_amount)
            .is_none()
    }

    /// First unmet executability condition, or `None` if executable.
    pub fn diagnose<R: AssetRegistries + ?Sized>(
        &self,
        registries: &R,
        ctx: &CallContext,
        trade_id: TradeId,
        opening_amount: Quantity,
        closing_amount: Quantity,
    ) -> Option<NotExecutableReason> {
        executability::check_trade(
            self.book.get(trade_id),
            registries,
            &self.address,
            ctx,
            opening_amount,
            closing_amount,
        )
        .err()
    }

    // ───────────────────────── Accessors ─────────────────────────

    pub fn get_trade_by_trade_id(&self, trade_id: TradeId) -> Result<&Trade, SwapError> {
        self.book.find(trade_id)
    }

    /// Total trades ever opened, regardless of status.
    pub fn get_trade_count(&self) -> u64 {
        self.book.count()
    }

    pub fn trade_status(&self, trade_id: TradeId, now: i64) -> Result<TradeStatus, SwapError> {
        Ok(self.book.find(trade_id)?.status(now))
    }

    pub fn trades(&self) -> &[Trade] {
        self.book.trades()
    }

    pub fn active_trades(&self, now: i64) -> impl Iterator<Item = &Trade> {
        self.book.active_at(now)
    }

    // ───────────────────────── Events ─────────────────────────

    pub fn events(&self) -> &[ContractEvent] {
        &self.events
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<ContractEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistrySet;

    const NOW: i64 = 1_700_000_000;
    const HOUR: i64 = 3_600;

    struct Fixture {
        swap: SwapContract,
        registries: RegistrySet,
        opener: Address,
        closer: Address,
        nifty: Address,
        soda: Address,
    }

    /// Opener holds nifty#420, closer holds soda#777, nothing approved yet.
    fn setup() -> Fixture {
        let mut registries = RegistrySet::new();
        let opener = Address::new();
        let closer = Address::new();
        let nifty = registries.deploy_unique();
        let soda = registries.deploy_unique();
        registries
            .unique_mut(&nifty)
            .unwrap()
            .mint(opener, AssetId::new(420))
            .unwrap();
        registries
            .unique_mut(&soda)
            .unwrap()
            .mint(closer, AssetId::new(777))
            .unwrap();

        Fixture {
            swap: SwapContract::new(SwapConfig::new(Address::new())),
            registries,
            opener,
            closer,
            nifty,
            soda,
        }
    }

    fn open(f: &mut Fixture, expiry_date: i64) -> Result<TradeId, SwapError> {
        f.swap.open_new_trade(
            &f.registries,
            &CallContext::new(f.opener, NOW),
            f.nifty,
            AssetId::new(420),
            f.soda,
            AssetId::new(777),
            expiry_date,
        )
    }

    fn approve(f: &mut Fixture) {
        let operator = f.swap.address();
        f.registries
            .unique_mut(&f.nifty)
            .unwrap()
            .set_approval_for_all(f.opener, operator, true);
        f.registries
            .unique_mut(&f.soda)
            .unwrap()
            .set_approval_for_all(f.closer, operator, true);
    }

    // ─── Open ───

    #[test]
    fn test_open_assigns_sequential_ids() {
        let mut f = setup();
        assert_eq!(f.swap.get_trade_count(), 0);
        assert_eq!(open(&mut f, NOW + HOUR).unwrap(), TradeId::new(0));
        assert_eq!(open(&mut f, NOW + HOUR).unwrap(), TradeId::new(1));
        assert_eq!(f.swap.get_trade_count(), 2);
    }

    #[test]
    fn test_open_records_kinds_from_registry_probe() {
        let mut f = setup();
        let seen = f.registries.deploy_quantified();
        let id = f
            .swap
            .open_new_trade(
                &f.registries,
                &CallContext::new(f.opener, NOW),
                f.nifty,
                AssetId::new(420),
                seen,
                AssetId::new(13),
                NOW + HOUR,
            )
            .unwrap();

        let trade = f.swap.get_trade_by_trade_id(id).unwrap();
        assert_eq!(trade.opening_asset_kind, AssetKind::Unique);
        assert_eq!(trade.closing_asset_kind, AssetKind::Quantified);
        assert_eq!(trade.opener, f.opener);
        assert!(trade.active);
    }

    #[test]
    fn test_open_rejects_expiry_at_now() {
        let mut f = setup();
        let result = open(&mut f, NOW);
        assert_eq!(
            result,
            Err(SwapError::InvalidExpiry {
                expiry_date: NOW,
                now: NOW
            })
        );
        assert_eq!(f.swap.get_trade_count(), 0);
        assert!(f.swap.events().is_empty());
    }

    #[test]
    fn test_open_rejects_unknown_registry() {
        let mut f = setup();
        let bogus = Address::new();
        let result = f.swap.open_new_trade(
            &f.registries,
            &CallContext::new(f.opener, NOW),
            f.nifty,
            AssetId::new(420),
            bogus,
            AssetId::new(1),
            NOW + HOUR,
        );
        assert_eq!(result, Err(SwapError::UnsupportedRegistry { registry: bogus }));
        assert_eq!(f.swap.get_trade_count(), 0);
    }

    #[test]
    fn test_open_without_holdings_is_not_executable() {
        let mut f = setup();
        let id = open(&mut f, NOW + HOUR).unwrap();
        let ctx = CallContext::new(f.closer, NOW);
        assert!(!f
            .swap
            .is_trade_executable(&f.registries, &ctx, id, Quantity::ZERO, Quantity::ZERO));
        assert_eq!(
            f.swap
                .diagnose(&f.registries, &ctx, id, Quantity::ZERO, Quantity::ZERO),
            Some(NotExecutableReason::OpenerNotApproved)
        );
    }

    // ─── Cancel ───

    #[test]
    fn test_cancel_before_expiry() {
        let mut f = setup();
        let id = open(&mut f, NOW + HOUR).unwrap();
        let event = f
            .swap
            .cancel_trade(&CallContext::new(f.opener, NOW + 1), id)
            .unwrap();
        assert!(matches!(event, ContractEvent::TradeCancelled(_)));
        assert!(!f.swap.get_trade_by_trade_id(id).unwrap().active);
        assert_eq!(f.swap.get_trade_count(), 1);
    }

    #[test]
    fn test_cancel_after_expiry() {
        let mut f = setup();
        let id = open(&mut f, NOW + HOUR).unwrap();
        let result = f
            .swap
            .cancel_trade(&CallContext::new(f.opener, NOW + HOUR), id);
        assert_eq!(
            result,
            Err(SwapError::TradeExpired {
                trade_id: id,
                expiry_date: NOW + HOUR,
                now: NOW + HOUR
            })
        );
        assert!(f.swap.get_trade_by_trade_id(id).unwrap().active);
    }

    #[test]
    fn test_cancel_twice_reports_inactive() {
        let mut f = setup();
        let id = open(&mut f, NOW + HOUR).unwrap();
        let ctx = CallContext::new(f.opener, NOW);
        f.swap.cancel_trade(&ctx, id).unwrap();
        assert_eq!(
            f.swap.cancel_trade(&ctx, id),
            Err(SwapError::TradeInactive { trade_id: id })
        );
    }

    #[test]
    fn test_cancel_unknown_trade() {
        let mut f = setup();
        let result = f
            .swap
            .cancel_trade(&CallContext::new(f.opener, NOW), TradeId::new(9));
        assert_eq!(
            result,
            Err(SwapError::NotFound {
                trade_id: TradeId::new(9)
            })
        );
    }

    #[test]
    fn test_cancel_by_third_party_is_allowed() {
        let mut f = setup();
        let id = open(&mut f, NOW + HOUR).unwrap();
        let stranger = Address::new();
        let event = f
            .swap
            .cancel_trade(&CallContext::new(stranger, NOW), id)
            .unwrap();
        match event {
            ContractEvent::TradeCancelled(e) => assert_eq!(e.cancelled_by, stranger),
            other => panic!("unexpected event {:?}", other),
        }
    }

    // ─── Execute ───

    #[test]
    fn test_execute_swaps_both_assets() {
        let mut f = setup();
        let id = open(&mut f, NOW + HOUR).unwrap();
        approve(&mut f);

        let ctx = CallContext::new(f.closer, NOW + 10);
        f.swap
            .execute_trade(&mut f.registries, &ctx, id, Quantity::ZERO, Quantity::ZERO)
            .unwrap();

        let nifty = f.registries.unique(&f.nifty).unwrap();
        let soda = f.registries.unique(&f.soda).unwrap();
        use crate::registry::UniqueAssetRegistry;
        assert_eq!(nifty.owner_of(AssetId::new(420)), Some(f.closer));
        assert_eq!(soda.owner_of(AssetId::new(777)), Some(f.opener));
        assert_eq!(f.swap.trade_status(id, NOW + 10), Ok(TradeStatus::Closed));
    }

    #[test]
    fn test_execute_not_executable_leaves_state() {
        let mut f = setup();
        let id = open(&mut f, NOW + HOUR).unwrap();

        let ctx = CallContext::new(f.closer, NOW);
        let result =
            f.swap
                .execute_trade(&mut f.registries, &ctx, id, Quantity::ZERO, Quantity::ZERO);
        assert_eq!(result, Err(SwapError::TradeNotExecutable { trade_id: id }));
        assert!(f.swap.get_trade_by_trade_id(id).unwrap().active);
    }

    #[test]
    fn test_execute_twice_fails() {
        let mut f = setup();
        let id = open(&mut f, NOW + HOUR).unwrap();
        approve(&mut f);
        let ctx = CallContext::new(f.closer, NOW);
        f.swap
            .execute_trade(&mut f.registries, &ctx, id, Quantity::ZERO, Quantity::ZERO)
            .unwrap();

        let result =
            f.swap
                .execute_trade(&mut f.registries, &ctx, id, Quantity::ZERO, Quantity::ZERO);
        assert_eq!(result, Err(SwapError::TradeNotExecutable { trade_id: id }));
    }

    #[test]
    fn test_execute_after_cancel_fails() {
        let mut f = setup();
        let id = open(&mut f, NOW + HOUR).unwrap();
        approve(&mut f);
        f.swap
            .cancel_trade(&CallContext::new(f.opener, NOW), id)
            .unwrap();

        let ctx = CallContext::new(f.closer, NOW);
        assert_eq!(
            f.swap
                .diagnose(&f.registries, &ctx, id, Quantity::ZERO, Quantity::ZERO),
            Some(NotExecutableReason::Inactive)
        );
    }

    #[test]
    fn test_unique_sides_report_zero_units() {
        let mut f = setup();
        let id = open(&mut f, NOW + HOUR).unwrap();
        approve(&mut f);
        let ctx = CallContext::new(f.closer, NOW);
        let event = f
            .swap
            .execute_trade(&mut f.registries, &ctx, id, Quantity::new(5), Quantity::new(5))
            .unwrap();
        match event {
            ContractEvent::TradeExecuted(e) => {
                assert_eq!(e.opening_amount, Quantity::ZERO);
                assert_eq!(e.closing_amount, Quantity::ZERO);
                assert_eq!(e.closer, f.closer);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    // ─── Accessors & events ───

    #[test]
    fn test_dev_fund_and_operator_from_config() {
        let dev_fund = Address::new();
        let operator = Address::new();
        let swap = SwapContract::new(SwapConfig::new(dev_fund).with_operator(operator));
        assert_eq!(swap.dev_fund(), dev_fund);
        assert_eq!(swap.address(), operator);
    }

    #[test]
    fn test_unset_operator_gets_fresh_address() {
        let dev_fund = Address::new();
        let a = SwapContract::new(SwapConfig::new(dev_fund));
        let b = SwapContract::new(SwapConfig::new(dev_fund));
        assert_ne!(a.address(), b.address());
        assert_ne!(a.address(), dev_fund);
    }

    #[test]
    fn test_events_in_order_and_drain() {
        let mut f = setup();
        let id = open(&mut f, NOW + HOUR).unwrap();
        f.swap
            .cancel_trade(&CallContext::new(f.opener, NOW), id)
            .unwrap();

        assert_eq!(f.swap.events().len(), 2);
        assert!(matches!(f.swap.events()[0], ContractEvent::TradeOpened(_)));
        let drained = f.swap.drain_events();
        assert_eq!(drained.len(), 2);
        assert!(f.swap.events().is_empty());
    }

    #[test]
    fn test_active_trades_listing() {
        let mut f = setup();
        let a = open(&mut f, NOW + HOUR).unwrap();
        let b = open(&mut f, NOW + 2 * HOUR).unwrap();
        f.swap
            .cancel_trade(&CallContext::new(f.opener, NOW), a)
            .unwrap();

        let active: Vec<TradeId> = f.swap.active_trades(NOW).map(|t| t.id).collect();
        assert_eq!(active, vec![b]);
        assert_eq!(f.swap.trades().len(), 2);
    }
}
