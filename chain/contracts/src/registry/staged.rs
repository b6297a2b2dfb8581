//! Copy-on-write registry overlay for one host transaction
//!
//! Reads fall through to the live [`RegistrySet`]. The first write to a
//! registry copies just that registry into the overlay; later reads and
//! writes in the same transaction see the copy. Committing hands the copies
//! back with [`StagedRegistries::into_writes`]; dropping the overlay
//! discards them.

use std::collections::HashMap;
use swap_types::ids::Address;

use crate::errors::RegistryError;
use crate::registry::memory::{MemoryQuantifiedRegistry, MemoryUniqueRegistry};
use crate::registry::set::{unknown, DeployedRegistry, RegistrySet};
use crate::registry::{AssetRegistries, RegistryMut, RegistryRef};

#[derive(Debug)]
pub struct StagedRegistries<'a> {
    live: &'a RegistrySet,
    writes: HashMap<Address, DeployedRegistry>,
}

impl<'a> StagedRegistries<'a> {
    pub fn new(live: &'a RegistrySet) -> Self {
        Self {
            live,
            writes: HashMap::new(),
        }
    }

    pub fn get(&self, address: &Address) -> Option<&DeployedRegistry> {
        self.writes.get(address).or_else(|| self.live.get(address))
    }

    /// Writable copy of the registry at `address`, made on first access.
    pub fn get_mut(&mut self, address: &Address) -> Option<&mut DeployedRegistry> {
        if !self.writes.contains_key(address) {
            let copy = self.live.get(address)?.clone();
            self.writes.insert(*address, copy);
        }
        self.writes.get_mut(address)
    }

    pub fn unique_mut(
        &mut self,
        address: &Address,
    ) -> Result<&mut MemoryUniqueRegistry, RegistryError> {
        self.get_mut(address)
            .and_then(DeployedRegistry::as_unique_mut)
            .ok_or_else(|| unknown(address))
    }

    pub fn quantified_mut(
        &mut self,
        address: &Address,
    ) -> Result<&mut MemoryQuantifiedRegistry, RegistryError> {
        self.get_mut(address)
            .and_then(DeployedRegistry::as_quantified_mut)
            .ok_or_else(|| unknown(address))
    }

    /// Number of registries copied so far.
    pub fn touched(&self) -> usize {
        self.writes.len()
    }

    pub fn into_writes(self) -> HashMap<Address, DeployedRegistry> {
        self.writes
    }
}

impl AssetRegistries for StagedRegistries<'_> {
    fn registry(&self, address: &Address) -> Option<RegistryRef<'_>> {
        self.get(address).map(DeployedRegistry::view)
    }

    fn registry_mut(&mut self, address: &Address) -> Option<RegistryMut<'_>> {
        self.get_mut(address).map(DeployedRegistry::view_mut)
    }
}
