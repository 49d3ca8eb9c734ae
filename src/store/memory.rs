//! In-memory state store backed by a concurrent map

use super::{StateStore, StoreResult};
use crate::actor::{Address, StateWrite, VertexState};
use dashmap::DashMap;

/// Process-local store; one map entry per actor address
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    states: DashMap<Address, VertexState>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl StateStore for MemoryStateStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn load(&self, address: &Address) -> StoreResult<VertexState> {
        Ok(self
            .states
            .get(address)
            .map(|s| s.value().clone())
            .unwrap_or_default())
    }

    fn commit(&self, address: &Address, writes: &[StateWrite]) -> StoreResult<()> {
        if writes.is_empty() {
            return Ok(());
        }
        // The entry guard holds the shard lock for the whole batch
        self.states.entry(*address).or_default().apply(writes);
        Ok(())
    }

    fn addresses(&self) -> StoreResult<Vec<Address>> {
        let mut addresses: Vec<Address> = self.states.iter().map(|e| *e.key()).collect();
        addresses.sort();
        Ok(addresses)
    }
}
