//! Host ledger: clock and atomic commit of serialized calls
//!
//! The swap contract assumes a host that runs every mutating call to
//! completion, one at a time, and either commits all of its effects or none.
//! `Ledger` is that host for in-process use: it owns the contract and the
//! registries and takes `&mut self` for every mutating call.
//!
//! Registry writes are staged on a [`StagedRegistries`] overlay and copied
//! back only when the call succeeds. The contract needs no staging of its
//! own: each of its operations finishes every fallible step before it
//! touches the trade book or the event log.

use std::fmt::Display;
use swap_types::ids::{Address, AssetId, TradeId};
use swap_types::numeric::Quantity;
use swap_types::trade::{Trade, TradeStatus};
use tracing::warn;

use crate::config::SwapConfig;
use crate::context::CallContext;
use crate::errors::{RegistryError, SwapError};
use crate::events::ContractEvent;
use crate::executability::NotExecutableReason;
use crate::registry::{
    QuantifiedAssetRegistry, RegistrySet, StagedRegistries, UniqueAssetRegistry,
};
use crate::swap::SwapContract;

/// Source of ledger time in unix seconds.
pub trait Clock {
    fn now(&self) -> i64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManualClock {
    now: i64,
}

impl ManualClock {
    pub fn new(now: i64) -> Self {
        Self { now }
    }

    /// Start at the current wall-clock time.
    pub fn starting_now() -> Self {
        Self::new(SystemClock.now())
    }

    /// Move forward by `seconds`, saturating at the ends of the `i64` range.
    pub fn advance(&mut self, seconds: i64) {
        self.now = self.now.saturating_add(seconds);
    }

    pub fn set(&mut self, now: i64) {
        self.now = now;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> i64 {
        self.now
    }
}

#[derive(Debug)]
pub struct Ledger<C: Clock = SystemClock> {
    swap: SwapContract,
    registries: RegistrySet,
    clock: C,
}

impl<C: Clock> Ledger<C> {
    /// Deploy the swap contract on an empty ledger.
    pub fn new(config: SwapConfig, clock: C) -> Self {
        Self {
            swap: SwapContract::new(config),
            registries: RegistrySet::new(),
            clock,
        }
    }

    pub fn now(&self) -> i64 {
        self.clock.now()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Run one call as an atomic unit.
    ///
    /// `f` gets the contract and a registry overlay. Overlay writes are
    /// applied on `Ok` and dropped on `Err`. `f` makes at most one contract
    /// call, which leaves the contract untouched when it fails.
    fn transact<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        E: Display,
        F: FnOnce(&mut SwapContract, &mut StagedRegistries<'_>) -> Result<T, E>,
    {
        let mut staged = StagedRegistries::new(&self.registries);
        match f(&mut self.swap, &mut staged) {
            Ok(value) => {
                let writes = staged.into_writes();
                self.registries.apply(writes);
                Ok(value)
            }
            Err(e) => {
                warn!(error = %e, "Transaction reverted");
                Err(e)
            }
        }
    }

    fn context(&self, caller: Address) -> CallContext {
        CallContext::new(caller, self.clock.now())
    }

    // ───────────────────────── Swap calls ─────────────────────────

    pub fn open_new_trade(
        &mut self,
        caller: Address,
        opening_registry: Address,
        opening_asset_id: AssetId,
        closing_registry: Address,
        closing_asset_id: AssetId,
        expiry_date: i64,
    ) -> Result<TradeId, SwapError> {
        let ctx = self.context(caller);
        self.transact(|swap, registries| {
            swap.open_new_trade(
                &*registries,
                &ctx,
                opening_registry,
                opening_asset_id,
                closing_registry,
                closing_asset_id,
                expiry_date,
            )
        })
    }

    pub fn cancel_trade(
        &mut self,
        caller: Address,
        trade_id: TradeId,
    ) -> Result<ContractEvent, SwapError> {
        let ctx = self.context(caller);
        self.transact(|swap, _| swap.cancel_trade(&ctx, trade_id))
    }

    pub fn execute_trade(
        &mut self,
        caller: Address,
        trade_id: TradeId,
        opening_amount: Quantity,
        closing_amount: Quantity,
    ) -> Result<ContractEvent, SwapError> {
        let ctx = self.context(caller);
        self.transact(|swap, registries| {
            swap.execute_trade(
                registries,
                &ctx,
                trade_id,
                opening_amount,
                closing_amount,
            )
        })
    }

    pub fn is_trade_executable(
        &self,
        caller: Address,
        trade_id: TradeId,
        opening_amount: Quantity,
        closing_amount: Quantity,
    ) -> bool {
        let ctx = self.context(caller);
        self.swap.is_trade_executable(
            &self.registries,
            &ctx,
            trade_id,
            opening_amount,
            closing_amount,
        )
    }

    pub fn diagnose(
        &self,
        caller: Address,
        trade_id: TradeId,
        opening_amount: Quantity,
        closing_amount: Quantity,
    ) -> Option<NotExecutableReason> {
        let ctx = self.context(caller);
        self.swap.diagnose(
            &self.registries,
            &ctx,
            trade_id,
            opening_amount,
            closing_amount,
        )
    }

    pub fn get_trade_by_trade_id(&self, trade_id: TradeId) -> Result<&Trade, SwapError> {
        self.swap.get_trade_by_trade_id(trade_id)
    }

    pub fn get_trade_count(&self) -> u64 {
        self.swap.get_trade_count()
    }

    pub fn trade_status(&self, trade_id: TradeId) -> Result<TradeStatus, SwapError> {
        self.swap.trade_status(trade_id, self.clock.now())
    }

    pub fn dev_fund(&self) -> Address {
        self.swap.dev_fund()
    }

    /// Operator address parties must approve on their registries.
    pub fn contract_address(&self) -> Address {
        self.swap.address()
    }

    pub fn swap(&self) -> &SwapContract {
        &self.swap
    }

    pub fn events(&self) -> &[ContractEvent] {
        self.swap.events()
    }

    /// Take every event committed so far, leaving the log empty.
    pub fn drain_events(&mut self) -> Vec<ContractEvent> {
        self.swap.drain_events()
    }

    // ───────────────────────── Registry calls ─────────────────────────

    pub fn registries(&self) -> &RegistrySet {
        &self.registries
    }

    pub fn deploy_unique_registry(&mut self) -> Address {
        self.registries.deploy_unique()
    }

    pub fn deploy_quantified_registry(&mut self) -> Address {
        self.registries.deploy_quantified()
    }

    pub fn mint_unique(
        &mut self,
        registry: Address,
        to: Address,
        asset_id: AssetId,
    ) -> Result<(), RegistryError> {
        self.transact(|_, registries| registries.unique_mut(&registry)?.mint(to, asset_id))
    }

    pub fn mint_quantified(
        &mut self,
        registry: Address,
        to: Address,
        asset_id: AssetId,
        amount: Quantity,
    ) -> Result<(), RegistryError> {
        self.transact(|_, registries| {
            registries
                .quantified_mut(&registry)?
                .mint(to, asset_id, amount)
        })
    }

    /// Grant or revoke blanket operator rights on a registry of either kind.
    pub fn set_approval_for_all(
        &mut self,
        registry: Address,
        owner: Address,
        operator: Address,
        approved: bool,
    ) -> Result<(), RegistryError> {
        self.transact(|_, registries| {
            registries
                .get_mut(&registry)
                .ok_or(RegistryError::UnknownRegistry { registry })?
                .set_approval_for_all(owner, operator, approved);
            Ok(())
        })
    }

    /// Owner moves a unique asset directly, outside any trade.
    pub fn transfer_unique(
        &mut self,
        registry: Address,
        from: Address,
        to: Address,
        asset_id: AssetId,
    ) -> Result<(), RegistryError> {
        self.transact(|_, registries| {
            registries
                .unique_mut(&registry)?
                .transfer(&from, &to, asset_id)
        })
    }

    /// Owner moves quantified units directly, outside any trade.
    pub fn transfer_quantified(
        &mut self,
        registry: Address,
        from: Address,
        to: Address,
        asset_id: AssetId,
        amount: Quantity,
    ) -> Result<(), RegistryError> {
        self.transact(|_, registries| {
            registries
                .quantified_mut(&registry)?
                .transfer(&from, &to, asset_id, amount)
        })
    }

    /// Pause or resume transfers on a registry of either kind.
    pub fn set_registry_paused(
        &mut self,
        registry: Address,
        paused: bool,
    ) -> Result<(), RegistryError> {
        self.transact(|_, registries| {
            registries
                .get_mut(&registry)
                .ok_or(RegistryError::UnknownRegistry { registry })?
                .set_paused(paused);
            Ok(())
        })
    }

    pub fn owner_of(&self, registry: Address, asset_id: AssetId) -> Option<Address> {
        self.registries
            .unique(&registry)
            .ok()
            .and_then(|r| r.owner_of(asset_id))
    }

    /// Number of unique assets `owner` holds in `registry`.
    pub fn unique_balance_of(&self, registry: Address, owner: Address) -> usize {
        self.registries
            .unique(&registry)
            .map(|r| r.balance_of(&owner))
            .unwrap_or(0)
    }

    pub fn balance_of(&self, registry: Address, owner: Address, asset_id: AssetId) -> Quantity {
        self.registries
            .quantified(&registry)
            .map(|r| r.balance_of(&owner, asset_id))
            .unwrap_or(Quantity::ZERO)
    }
}
