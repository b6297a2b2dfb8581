//! Asset registry capabilities consumed by the swap contract
//!
//! The contract never holds assets. It only asks registries who holds what,
//! whether it has been approved as an operator, and asks them to move assets
//! on its behalf. Two capability sets exist, one per [`AssetKind`]:
//!
//! - [`UniqueAssetRegistry`]: one owner per asset id
//! - [`QuantifiedAssetRegistry`]: per-holder unit balances per asset id
//!
//! [`AssetRegistries`] resolves a registry address to one of the two.

pub mod memory;
pub mod set;
pub mod staged;

use swap_types::asset::{AssetKind, AssetRef};
use swap_types::ids::{Address, AssetId};
use swap_types::numeric::Quantity;

use crate::errors::RegistryError;

pub use memory::{MemoryQuantifiedRegistry, MemoryUniqueRegistry};
pub use set::{DeployedRegistry, RegistrySet};
pub use staged::StagedRegistries;

/// Registry where each asset id has exactly one owner.
pub trait UniqueAssetRegistry {
    /// Current owner, or `None` if the asset does not exist.
    fn owner_of(&self, asset_id: AssetId) -> Option<Address>;

    /// Whether `owner` has granted `operator` blanket transfer rights.
    fn is_approved_for_all(&self, owner: &Address, operator: &Address) -> bool;

    /// Move `asset_id` from `from` to `to`, acting as `operator`.
    ///
    /// Fails if `from` is not the owner or `operator` is not authorized.
    fn transfer_from(
        &mut self,
        operator: &Address,
        from: &Address,
        to: &Address,
        asset_id: AssetId,
    ) -> Result<(), RegistryError>;
}

/// Registry where holders carry unit balances per asset id.
pub trait QuantifiedAssetRegistry {
    fn balance_of(&self, owner: &Address, asset_id: AssetId) -> Quantity;

    fn is_approved_for_all(&self, owner: &Address, operator: &Address) -> bool;

    /// Move `amount` units of `asset_id` from `from` to `to`, acting as `operator`.
    ///
    /// Fails on insufficient balance or missing authorization.
    fn transfer_from(
        &mut self,
        operator: &Address,
        from: &Address,
        to: &Address,
        asset_id: AssetId,
        amount: Quantity,
    ) -> Result<(), RegistryError>;
}

/// Read access to a registry of either kind
#[derive(Clone, Copy)]
pub enum RegistryRef<'a> {
    Unique(&'a dyn UniqueAssetRegistry),
    Quantified(&'a dyn QuantifiedAssetRegistry),
}

impl<'a> RegistryRef<'a> {
    pub fn kind(&self) -> AssetKind {
        match self {
            RegistryRef::Unique(_) => AssetKind::Unique,
            RegistryRef::Quantified(_) => AssetKind::Quantified,
        }
    }

    pub fn is_approved_for_all(&self, owner: &Address, operator: &Address) -> bool {
        match self {
            RegistryRef::Unique(r) => r.is_approved_for_all(owner, operator),
            RegistryRef::Quantified(r) => r.is_approved_for_all(owner, operator),
        }
    }

    /// Whether `holder` currently holds the asset.
    ///
    /// Unique assets require exact ownership and ignore `amount`.
    /// Quantified assets require a balance of at least `amount`.
    pub fn holds(&self, holder: &Address, asset_id: AssetId, amount: Quantity) -> bool {
        match self {
            RegistryRef::Unique(r) => r.owner_of(asset_id).as_ref() == Some(holder),
            RegistryRef::Quantified(r) => r.balance_of(holder, asset_id) >= amount,
        }
    }
}

/// Write access to a registry of either kind
pub enum RegistryMut<'a> {
    Unique(&'a mut dyn UniqueAssetRegistry),
    Quantified(&'a mut dyn QuantifiedAssetRegistry),
}

impl<'a> RegistryMut<'a> {
    pub fn kind(&self) -> AssetKind {
        match self {
            RegistryMut::Unique(_) => AssetKind::Unique,
            RegistryMut::Quantified(_) => AssetKind::Quantified,
        }
    }

    /// Transfer one side of a trade. `amount` is ignored for unique assets.
    pub fn transfer(
        &mut self,
        operator: &Address,
        from: &Address,
        to: &Address,
        asset_id: AssetId,
        amount: Quantity,
    ) -> Result<(), RegistryError> {
        match self {
            RegistryMut::Unique(r) => r.transfer_from(operator, from, to, asset_id),
            RegistryMut::Quantified(r) => r.transfer_from(operator, from, to, asset_id, amount),
        }
    }
}

/// Directory of registries reachable by address.
pub trait AssetRegistries {
    fn registry(&self, address: &Address) -> Option<RegistryRef<'_>>;

    fn registry_mut(&mut self, address: &Address) -> Option<RegistryMut<'_>>;

    /// Interface probe: which capability set the registry at `address` offers.
    fn kind_of(&self, address: &Address) -> Option<AssetKind> {
        self.registry(address).map(|r| r.kind())
    }

    /// Resolve a trade side, requiring the registry to still offer the
    /// capability set recorded for that side.
    fn resolve(&self, asset: &AssetRef) -> Option<RegistryRef<'_>> {
        self.registry(&asset.registry)
            .filter(|r| r.kind() == asset.kind)
    }

    /// Mutable counterpart of [`AssetRegistries::resolve`].
    fn resolve_mut(&mut self, asset: &AssetRef) -> Option<RegistryMut<'_>> {
        self.registry_mut(&asset.registry)
            .filter(|r| r.kind() == asset.kind)
    }
}
