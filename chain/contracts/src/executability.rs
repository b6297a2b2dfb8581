//! Executability checks
//!
//! Whether a trade can be executed is never stored. It is derived on every
//! call from the trade record, the clock, and the registries' current view
//! of ownership and operator approval on both sides. An opener who moves
//! the offered asset away makes the trade non-executable without any change
//! to the trade itself.

use serde::{Deserialize, Serialize};
use std::fmt;
use swap_types::asset::AssetRef;
use swap_types::ids::Address;
use swap_types::numeric::Quantity;
use swap_types::trade::Trade;

use crate::context::CallContext;
use crate::registry::AssetRegistries;

/// First unmet executability condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotExecutableReason {
    UnknownTrade,
    Inactive,
    Expired,
    /// A side's registry is gone or no longer offers the recorded kind
    RegistryUnavailable,
    OpenerNotHolding,
    OpenerNotApproved,
    CallerNotHolding,
    CallerNotApproved,
}

impl fmt::Display for NotExecutableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NotExecutableReason::UnknownTrade => "unknown trade",
            NotExecutableReason::Inactive => "trade is no longer active",
            NotExecutableReason::Expired => "trade has expired",
            NotExecutableReason::RegistryUnavailable => "asset registry unavailable",
            NotExecutableReason::OpenerNotHolding => "opener does not hold the opening asset",
            NotExecutableReason::OpenerNotApproved => "opener has not approved the contract",
            NotExecutableReason::CallerNotHolding => "caller does not hold the closing asset",
            NotExecutableReason::CallerNotApproved => "caller has not approved the contract",
        };
        f.write_str(s)
    }
}

/// Holding and approval check for one side of a trade.
fn check_side<R: AssetRegistries + ?Sized>(
    registries: &R,
    asset: &AssetRef,
    holder: &Address,
    operator: &Address,
    amount: Quantity,
    not_holding: NotExecutableReason,
    not_approved: NotExecutableReason,
) -> Result<(), NotExecutableReason> {
    let registry = registries
        .resolve(asset)
        .ok_or(NotExecutableReason::RegistryUnavailable)?;

    if !registry.holds(holder, asset.asset_id, amount) {
        return Err(not_holding);
    }
    if !registry.is_approved_for_all(holder, operator) {
        return Err(not_approved);
    }
    Ok(())
}

/// Evaluate every executability condition for `ctx.caller` closing `trade`.
///
/// `operator` is the swap contract's own address, the one parties approve.
/// `opening_amount` and `closing_amount` only matter for quantified sides.
pub fn check_trade<R: AssetRegistries + ?Sized>(
    trade: Option<&Trade>,
    registries: &R,
    operator: &Address,
    ctx: &CallContext,
    opening_amount: Quantity,
    closing_amount: Quantity,
) -> Result<(), NotExecutableReason> {
    let trade = trade.ok_or(NotExecutableReason::UnknownTrade)?;

    if !trade.active {
        return Err(NotExecutableReason::Inactive);
    }
    if trade.is_expired(ctx.now) {
        return Err(NotExecutableReason::Expired);
    }

    check_side(
        registries,
        &trade.opening_asset(),
        &trade.opener,
        operator,
        opening_amount,
        NotExecutableReason::OpenerNotHolding,
        NotExecutableReason::OpenerNotApproved,
    )?;

    check_side(
        registries,
        &trade.closing_asset(),
        &ctx.caller,
        operator,
        closing_amount,
        NotExecutableReason::CallerNotHolding,
        NotExecutableReason::CallerNotApproved,
    )
}
