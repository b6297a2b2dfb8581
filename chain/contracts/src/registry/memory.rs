//! In-memory asset registries
//!
//! Reference implementations of both registry capability sets, used by the
//! host ledger and the tests. Ownership and balances live in plain maps;
//! every balance change goes through overflow/underflow-checked helpers and
//! a failed transfer leaves the registry untouched.

use std::collections::{HashMap, HashSet};
use swap_types::ids::{Address, AssetId};
use swap_types::numeric::Quantity;

use crate::errors::RegistryError;
use crate::registry::{QuantifiedAssetRegistry, UniqueAssetRegistry};

/// Operator approvals shared by both registry kinds: (owner, operator) pairs.
#[derive(Debug, Clone, Default)]
struct Approvals {
    granted: HashSet<(Address, Address)>,
}

impl Approvals {
    fn set(&mut self, owner: Address, operator: Address, approved: bool) {
        if approved {
            self.granted.insert((owner, operator));
        } else {
            self.granted.remove(&(owner, operator));
        }
    }

    fn is_approved(&self, owner: &Address, operator: &Address) -> bool {
        self.granted.contains(&(*owner, *operator))
    }

    /// Owners may always move their own assets.
    fn authorize(&self, owner: &Address, operator: &Address) -> Result<(), RegistryError> {
        if owner == operator || self.is_approved(owner, operator) {
            Ok(())
        } else {
            Err(RegistryError::NotApproved {
                owner: *owner,
                operator: *operator,
            })
        }
    }
}

/// Transfer pause switch. Queries keep answering while paused.
#[derive(Debug, Clone, Default)]
struct PauseGuard {
    paused: bool,
}

impl PauseGuard {
    fn check(&self) -> Result<(), RegistryError> {
        if self.paused {
            return Err(RegistryError::Paused);
        }
        Ok(())
    }
}

// ───────────────────────── Unique ─────────────────────────

/// One-owner-per-id registry.
#[derive(Debug, Clone, Default)]
pub struct MemoryUniqueRegistry {
    owners: HashMap<AssetId, Address>,
    approvals: Approvals,
    pause_guard: PauseGuard,
}

impl MemoryUniqueRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `asset_id` owned by `to`.
    pub fn mint(&mut self, to: Address, asset_id: AssetId) -> Result<(), RegistryError> {
        if self.owners.contains_key(&asset_id) {
            return Err(RegistryError::AssetExists { asset_id });
        }
        self.owners.insert(asset_id, to);
        Ok(())
    }

    pub fn set_approval_for_all(&mut self, owner: Address, operator: Address, approved: bool) {
        self.approvals.set(owner, operator, approved);
    }

    /// Owner-initiated transfer.
    pub fn transfer(
        &mut self,
        owner: &Address,
        to: &Address,
        asset_id: AssetId,
    ) -> Result<(), RegistryError> {
        self.transfer_from(owner, owner, to, asset_id)
    }

    /// Reject all transfers until unpaused.
    pub fn set_paused(&mut self, paused: bool) {
        self.pause_guard.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.pause_guard.paused
    }

    /// Number of assets held by `owner`.
    pub fn balance_of(&self, owner: &Address) -> usize {
        self.owners.values().filter(|o| *o == owner).count()
    }
}

impl UniqueAssetRegistry for MemoryUniqueRegistry {
    fn owner_of(&self, asset_id: AssetId) -> Option<Address> {
        self.owners.get(&asset_id).copied()
    }

    fn is_approved_for_all(&self, owner: &Address, operator: &Address) -> bool {
        self.approvals.is_approved(owner, operator)
    }

    fn transfer_from(
        &mut self,
        operator: &Address,
        from: &Address,
        to: &Address,
        asset_id: AssetId,
    ) -> Result<(), RegistryError> {
        self.pause_guard.check()?;
        let owner = self
            .owners
            .get_mut(&asset_id)
            .ok_or(RegistryError::UnknownAsset { asset_id })?;

        if *owner != *from {
            return Err(RegistryError::NotOwner {
                asset_id,
                from: *from,
            });
        }
        self.approvals.authorize(from, operator)?;

        *owner = *to;
        Ok(())
    }
}

// ───────────────────────── Quantified ─────────────────────────

/// Per-holder balance registry.
#[derive(Debug, Clone, Default)]
pub struct MemoryQuantifiedRegistry {
    /// holder -> (asset -> units)
    balances: HashMap<Address, HashMap<AssetId, Quantity>>,
    approvals: Approvals,
    pause_guard: PauseGuard,
}

impl MemoryQuantifiedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` new units of `asset_id` to `to`.
    pub fn mint(
        &mut self,
        to: Address,
        asset_id: AssetId,
        amount: Quantity,
    ) -> Result<(), RegistryError> {
        let current = self.balance_of(&to, asset_id);
        let updated = current.checked_add(amount).ok_or(RegistryError::Overflow)?;
        self.set_balance(to, asset_id, updated);
        Ok(())
    }

    pub fn set_approval_for_all(&mut self, owner: Address, operator: Address, approved: bool) {
        self.approvals.set(owner, operator, approved);
    }

    /// Owner-initiated transfer.
    pub fn transfer(
        &mut self,
        owner: &Address,
        to: &Address,
        asset_id: AssetId,
        amount: Quantity,
    ) -> Result<(), RegistryError> {
        self.transfer_from(owner, owner, to, asset_id, amount)
    }

    /// Reject all transfers until unpaused.
    pub fn set_paused(&mut self, paused: bool) {
        self.pause_guard.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.pause_guard.paused
    }

    /// All balances of one holder.
    pub fn holder_balances(&self, holder: &Address) -> Option<&HashMap<AssetId, Quantity>> {
        self.balances.get(holder)
    }

    fn set_balance(&mut self, holder: Address, asset_id: AssetId, amount: Quantity) {
        self.balances
            .entry(holder)
            .or_default()
            .insert(asset_id, amount);
    }
}

impl QuantifiedAssetRegistry for MemoryQuantifiedRegistry {
    fn balance_of(&self, owner: &Address, asset_id: AssetId) -> Quantity {
        self.balances
            .get(owner)
            .and_then(|assets| assets.get(&asset_id))
            .copied()
            .unwrap_or(Quantity::ZERO)
    }

    fn is_approved_for_all(&self, owner: &Address, operator: &Address) -> bool {
        self.approvals.is_approved(owner, operator)
    }

    fn transfer_from(
        &mut self,
        operator: &Address,
        from: &Address,
        to: &Address,
        asset_id: AssetId,
        amount: Quantity,
    ) -> Result<(), RegistryError> {
        self.pause_guard.check()?;
        self.approvals.authorize(from, operator)?;

        let from_balance = self.balance_of(from, asset_id);
        let debited = from_balance
            .checked_sub(amount)
            .ok_or_else(|| RegistryError::InsufficientBalance {
                asset_id,
                required: amount,
                available: from_balance,
            })?;

        if from == to {
            return Ok(());
        }

        // Compute both sides before writing either.
        let credited = self
            .balance_of(to, asset_id)
            .checked_add(amount)
            .ok_or(RegistryError::Overflow)?;

        self.set_balance(*from, asset_id, debited);
        self.set_balance(*to, asset_id, credited);
        Ok(())
    }
}
