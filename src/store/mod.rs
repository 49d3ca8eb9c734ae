//! Durable per-actor key-value storage
//!
//! Each actor's state is three named slots. Stores only ever see whole-slot
//! replacements, grouped per message so a batch lands together or not at all.
//!
//! - [`MemoryStateStore`]: concurrent in-process map, nothing survives the process
//! - [`RedbStateStore`]: one redb file, one write transaction per batch

mod memory;
mod redb_store;

pub use memory::MemoryStateStore;
pub use redb_store::RedbStateStore;

use crate::actor::{Address, StateWrite, VertexState};
use thiserror::Error;

/// Errors raised by state stores
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to open state database: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("State transaction failed: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("State table unavailable: {0}")]
    Table(#[from] redb::TableError),

    #[error("State storage failure: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Failed to commit state: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Failed to encode or decode slot value: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt state key: {0:?}")]
    CorruptKey(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Common interface for actor state stores
pub trait StateStore: Send + Sync {
    /// Short backend name (for logging)
    fn name(&self) -> &str;

    /// Current state of an actor; never-written actors read as empty
    fn load(&self, address: &Address) -> StoreResult<VertexState>;

    /// Persist every write of one message atomically
    fn commit(&self, address: &Address, writes: &[StateWrite]) -> StoreResult<()>;

    /// Every address with at least one stored slot, sorted
    fn addresses(&self) -> StoreResult<Vec<Address>>;

    /// Addresses whose key belongs to `vertex`
    fn addresses_for_vertex(&self, vertex: crate::models::VertexId) -> StoreResult<Vec<Address>> {
        Ok(self
            .addresses()?
            .into_iter()
            .filter(|a| a.vertex() == vertex)
            .collect())
    }
}

#[cfg(test)]
mod tests;
