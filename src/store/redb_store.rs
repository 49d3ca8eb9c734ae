//! Persistent state store using redb
//!
//! Layout: a single table `actor_state` keyed by
//! `"{function}/{key}/{slot}"`, values are JSON-encoded neighbor lists.
//! Each commit is one redb write transaction, so a message's writes are
//! applied together.

use super::{StateStore, StoreError, StoreResult};
use crate::actor::{Address, Slot, StateWrite, VertexState};
use crate::models::NeighborList;
use anyhow::Context;
use redb::ReadableTable;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;

const STATE_TABLE: redb::TableDefinition<&str, &[u8]> = redb::TableDefinition::new("actor_state");

/// File name of the database inside the store directory
pub const STATE_FILE: &str = "state.redb";

/// Durable store; survives restarts of the process
pub struct RedbStateStore {
    db: redb::Database,
    db_path: PathBuf,
}

impl RedbStateStore {
    /// Create or open a store in `dir`
    pub fn open(dir: &Path) -> StoreResult<Self> {
        std::fs::create_dir_all(dir)?;

        // redb uses a single file, not a directory
        let db_path = dir.join(STATE_FILE);
        let db = redb::Database::create(&db_path)?;
        debug!("Opened state store at {}", db_path.display());

        Ok(Self { db, db_path })
    }

    /// Like [`open`](Self::open), with the path in the error chain
    pub fn open_with_context(dir: &Path) -> anyhow::Result<Self> {
        Self::open(dir).with_context(|| format!("Failed to open state store in {}", dir.display()))
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn slot_key(address: &Address, slot: Slot) -> String {
        format!("{}/{}", address, slot)
    }

    fn split_key(key: &str) -> StoreResult<(Address, Slot)> {
        let corrupt = || StoreError::CorruptKey(key.to_string());
        let (address, slot) = key.rsplit_once('/').ok_or_else(corrupt)?;
        let slot = Slot::from_name(slot).ok_or_else(corrupt)?;
        let address = address.parse::<Address>().map_err(|_| corrupt())?;
        Ok((address, slot))
    }
}

impl StateStore for RedbStateStore {
    fn name(&self) -> &str {
        "redb"
    }

    fn load(&self, address: &Address) -> StoreResult<VertexState> {
        let read_txn = self.db.begin_read()?;

        let table = match read_txn.open_table(STATE_TABLE) {
            Ok(t) => t,
            // Nothing committed yet
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(VertexState::new()),
            Err(e) => return Err(e.into()),
        };

        let mut state = VertexState::new();
        for slot in Slot::ALL {
            let key = Self::slot_key(address, slot);
            if let Some(value) = table.get(key.as_str())? {
                let list: NeighborList = serde_json::from_slice(value.value())?;
                state.set(slot, list);
            }
        }

        Ok(state)
    }

    fn commit(&self, address: &Address, writes: &[StateWrite]) -> StoreResult<()> {
        if writes.is_empty() {
            return Ok(());
        }

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(STATE_TABLE)?;
            for write in writes {
                let key = Self::slot_key(address, write.slot);
                let value = serde_json::to_vec(&write.value)?;
                table.insert(key.as_str(), value.as_slice())?;
            }
        }
        write_txn.commit()?;

        Ok(())
    }

    fn addresses(&self) -> StoreResult<Vec<Address>> {
        let read_txn = self.db.begin_read()?;

        let table = match read_txn.open_table(STATE_TABLE) {
            Ok(t) => t,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut addresses = BTreeSet::new();
        for entry in table.iter()? {
            let (key, _) = entry?;
            let (address, _) = Self::split_key(key.value())?;
            addresses.insert(address);
        }

        Ok(addresses.into_iter().collect())
    }
}

#[cfg(test)]
mod key_tests {
    use super::*;

    #[test]
    fn test_slot_key_round_trip() {
        let address = Address::time_window(5, -1, 9);
        let key = RedbStateStore::slot_key(&address, Slot::OutNeighbors);
        assert_eq!(key, "timeWindow/5@[-1,9]/outNeighbors");
        assert_eq!(RedbStateStore::split_key(&key).unwrap(), (address, Slot::OutNeighbors));
    }

    #[test]
    fn test_split_key_rejects_unknown_slot() {
        assert!(matches!(
            RedbStateStore::split_key("outEdges/1/sideNeighbors"),
            Err(StoreError::CorruptKey(_))
        ));
    }
}
