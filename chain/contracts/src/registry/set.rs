//! Address-keyed set of deployed in-memory registries
//!
//! `RegistrySet` is the live directory the host ledger hands to the swap
//! contract. Transactions write through a [`StagedRegistries`] overlay and
//! only the registries they touched are copied back on commit.
//!
//! [`StagedRegistries`]: crate::registry::staged::StagedRegistries

use std::collections::HashMap;
use swap_types::asset::AssetKind;
use swap_types::ids::Address;

use crate::errors::RegistryError;
use crate::registry::memory::{MemoryQuantifiedRegistry, MemoryUniqueRegistry};
use crate::registry::{AssetRegistries, RegistryMut, RegistryRef};

/// A registry deployed at some address.
#[derive(Debug, Clone)]
pub enum DeployedRegistry {
    Unique(MemoryUniqueRegistry),
    Quantified(MemoryQuantifiedRegistry),
}

impl DeployedRegistry {
    pub fn kind(&self) -> AssetKind {
        match self {
            DeployedRegistry::Unique(_) => AssetKind::Unique,
            DeployedRegistry::Quantified(_) => AssetKind::Quantified,
        }
    }

    pub fn as_unique(&self) -> Option<&MemoryUniqueRegistry> {
        match self {
            DeployedRegistry::Unique(r) => Some(r),
            DeployedRegistry::Quantified(_) => None,
        }
    }

    pub fn as_unique_mut(&mut self) -> Option<&mut MemoryUniqueRegistry> {
        match self {
            DeployedRegistry::Unique(r) => Some(r),
            DeployedRegistry::Quantified(_) => None,
        }
    }

    pub fn as_quantified(&self) -> Option<&MemoryQuantifiedRegistry> {
        match self {
            DeployedRegistry::Quantified(r) => Some(r),
            DeployedRegistry::Unique(_) => None,
        }
    }

    pub fn as_quantified_mut(&mut self) -> Option<&mut MemoryQuantifiedRegistry> {
        match self {
            DeployedRegistry::Quantified(r) => Some(r),
            DeployedRegistry::Unique(_) => None,
        }
    }

    pub fn set_approval_for_all(&mut self, owner: Address, operator: Address, approved: bool) {
        match self {
            DeployedRegistry::Unique(r) => r.set_approval_for_all(owner, operator, approved),
            DeployedRegistry::Quantified(r) => r.set_approval_for_all(owner, operator, approved),
        }
    }

    pub fn set_paused(&mut self, paused: bool) {
        match self {
            DeployedRegistry::Unique(r) => r.set_paused(paused),
            DeployedRegistry::Quantified(r) => r.set_paused(paused),
        }
    }

    pub(crate) fn view(&self) -> RegistryRef<'_> {
        match self {
            DeployedRegistry::Unique(r) => RegistryRef::Unique(r),
            DeployedRegistry::Quantified(r) => RegistryRef::Quantified(r),
        }
    }

    pub(crate) fn view_mut(&mut self) -> RegistryMut<'_> {
        match self {
            DeployedRegistry::Unique(r) => RegistryMut::Unique(r),
            DeployedRegistry::Quantified(r) => RegistryMut::Quantified(r),
        }
    }
}

/// Error for an address that holds no registry of the requested kind.
pub(crate) fn unknown(registry: &Address) -> RegistryError {
    RegistryError::UnknownRegistry {
        registry: *registry,
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegistrySet {
    registries: HashMap<Address, DeployedRegistry>,
}

impl RegistrySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deploy an empty unique-ownership registry at a fresh address.
    pub fn deploy_unique(&mut self) -> Address {
        self.deploy(DeployedRegistry::Unique(MemoryUniqueRegistry::new()))
    }

    /// Deploy an empty quantified-balance registry at a fresh address.
    pub fn deploy_quantified(&mut self) -> Address {
        self.deploy(DeployedRegistry::Quantified(MemoryQuantifiedRegistry::new()))
    }

    /// Deploy a prepared registry at a fresh address.
    pub fn deploy(&mut self, registry: DeployedRegistry) -> Address {
        let address = Address::new();
        self.registries.insert(address, registry);
        address
    }

    pub fn get(&self, address: &Address) -> Option<&DeployedRegistry> {
        self.registries.get(address)
    }

    pub fn unique(&self, address: &Address) -> Result<&MemoryUniqueRegistry, RegistryError> {
        self.get(address)
            .and_then(DeployedRegistry::as_unique)
            .ok_or_else(|| unknown(address))
    }

    pub fn unique_mut(
        &mut self,
        address: &Address,
    ) -> Result<&mut MemoryUniqueRegistry, RegistryError> {
        self.registries
            .get_mut(address)
            .and_then(DeployedRegistry::as_unique_mut)
            .ok_or_else(|| unknown(address))
    }

    pub fn quantified(
        &self,
        address: &Address,
    ) -> Result<&MemoryQuantifiedRegistry, RegistryError> {
        self.get(address)
            .and_then(DeployedRegistry::as_quantified)
            .ok_or_else(|| unknown(address))
    }

    pub fn quantified_mut(
        &mut self,
        address: &Address,
    ) -> Result<&mut MemoryQuantifiedRegistry, RegistryError> {
        self.registries
            .get_mut(address)
            .and_then(DeployedRegistry::as_quantified_mut)
            .ok_or_else(|| unknown(address))
    }

    /// Replace registries with their committed copies.
    pub(crate) fn apply(&mut self, writes: HashMap<Address, DeployedRegistry>) {
        self.registries.extend(writes);
    }

    pub fn len(&self) -> usize {
        self.registries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registries.is_empty()
    }
}

impl AssetRegistries for RegistrySet {
    fn registry(&self, address: &Address) -> Option<RegistryRef<'_>> {
        self.get(address).map(DeployedRegistry::view)
    }

    fn registry_mut(&mut self, address: &Address) -> Option<RegistryMut<'_>> {
        self.registries.get_mut(address).map(DeployedRegistry::view_mut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swap_types::asset::AssetRef;
    use swap_types::ids::AssetId;

    #[test]
    fn test_deploy_assigns_distinct_addresses() {
        let mut set = RegistrySet::new();
        let a = set.deploy_unique();
        let b = set.deploy_quantified();
        assert_ne!(a, b);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_kind_probe() {
        let mut set = RegistrySet::new();
        let unique = set.deploy_unique();
        let quantified = set.deploy_quantified();
        assert_eq!(set.kind_of(&unique), Some(AssetKind::Unique));
        assert_eq!(set.kind_of(&quantified), Some(AssetKind::Quantified));
        assert_eq!(set.kind_of(&Address::new()), None);
    }

    #[test]
    fn test_typed_accessors_reject_wrong_kind() {
        let mut set = RegistrySet::new();
        let unique = set.deploy_unique();
        assert!(set.unique(&unique).is_ok());
        assert_eq!(
            set.quantified(&unique).unwrap_err(),
            RegistryError::UnknownRegistry { registry: unique }
        );
    }

    #[test]
    fn test_resolve_requires_matching_kind() {
        let mut set = RegistrySet::new();
        let unique = set.deploy_unique();
        let as_unique = AssetRef::new(unique, AssetId::new(1), AssetKind::Unique);
        let as_quantified = AssetRef::new(unique, AssetId::new(1), AssetKind::Quantified);
        assert!(set.resolve(&as_unique).is_some());
        assert!(set.resolve(&as_quantified).is_none());
        assert!(set.resolve_mut(&as_quantified).is_none());
    }
}
