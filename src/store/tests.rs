use super::*;
use crate::actor::{Slot, StateWrite};
use crate::models::{NeighborEntry, NeighborList};
use tempfile::tempdir;

fn list(pairs: &[(i32, i64)]) -> NeighborList {
    pairs.iter().map(|&(id, ts)| NeighborEntry::new(id, ts)).collect()
}

fn exercise_basic_operations(store: &dyn StateStore) {
    let address = Address::out_edges(1);

    // Absent state reads as empty
    assert!(store.load(&address).expect("load").is_empty());
    assert!(store.addresses().expect("addresses").is_empty());

    store
        .commit(&address, &[StateWrite::new(Slot::OutNeighbors, list(&[(5, 10)]))])
        .expect("commit");

    let state = store.load(&address).expect("load");
    assert_eq!(state.out_neighbors(), &list(&[(5, 10)]));
    assert!(state.in_neighbors().is_empty());
    assert_eq!(store.addresses().expect("addresses"), vec![address]);
}

fn exercise_batch_commit(store: &dyn StateStore) {
    let address = Address::two_hop(1);
    let writes = [
        StateWrite::new(Slot::InNeighbors, list(&[(2, 1), (3, 2)])),
        StateWrite::new(Slot::OutNeighbors, list(&[(2, 1)])),
        StateWrite::new(Slot::TwoHopNeighbors, list(&[(2, 1)])),
    ];
    store.commit(&address, &writes).expect("commit");

    let state = store.load(&address).expect("load");
    for write in &writes {
        assert_eq!(state.get(write.slot), &write.value);
    }

    // Later batches replace whole slots and leave the others alone
    store
        .commit(&address, &[StateWrite::new(Slot::InNeighbors, list(&[(9, 9)]))])
        .expect("commit");
    let state = store.load(&address).expect("load");
    assert_eq!(state.in_neighbors(), &list(&[(9, 9)]));
    assert_eq!(state.two_hop_neighbors(), &list(&[(2, 1)]));
}

fn exercise_isolation(store: &dyn StateStore) {
    let a = Address::time_window(1, 0, 10);
    let b = Address::time_window(1, 0, 20);
    let c = Address::out_edges(1);

    store
        .commit(&a, &[StateWrite::new(Slot::OutNeighbors, list(&[(2, 5)]))])
        .expect("commit");

    assert!(store.load(&b).expect("load").is_empty());
    assert!(store.load(&c).expect("load").is_empty());

    store
        .commit(&c, &[StateWrite::new(Slot::OutNeighbors, list(&[(3, 6)]))])
        .expect("commit");
    store
        .commit(&Address::in_edges(2), &[StateWrite::new(Slot::InNeighbors, list(&[(1, 6)]))])
        .expect("commit");

    let for_one = store.addresses_for_vertex(1).expect("addresses");
    assert_eq!(for_one.len(), 2);
    assert!(for_one.contains(&a));
    assert!(for_one.contains(&c));
}

#[test]
fn test_memory_basic_operations() {
    exercise_basic_operations(&MemoryStateStore::new());
}

#[test]
fn test_memory_batch_commit() {
    exercise_batch_commit(&MemoryStateStore::new());
}

#[test]
fn test_memory_isolation() {
    exercise_isolation(&MemoryStateStore::new());
}

#[test]
fn test_memory_empty_commit_creates_nothing() {
    let store = MemoryStateStore::new();
    store.commit(&Address::out_edges(1), &[]).expect("commit");
    assert!(store.is_empty());
}

#[test]
fn test_redb_basic_operations() {
    let dir = tempdir().expect("create temp dir");
    let store = RedbStateStore::open(dir.path()).expect("open store");
    exercise_basic_operations(&store);
}

#[test]
fn test_redb_batch_commit() {
    let dir = tempdir().expect("create temp dir");
    let store = RedbStateStore::open(dir.path()).expect("open store");
    exercise_batch_commit(&store);
}

#[test]
fn test_redb_isolation() {
    let dir = tempdir().expect("create temp dir");
    let store = RedbStateStore::open(dir.path()).expect("open store");
    exercise_isolation(&store);
}

#[test]
fn test_redb_persistence() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("state");

    // Create and commit
    {
        let store = RedbStateStore::open(&path).expect("create store");
        store
            .commit(
                &Address::in_edges(4),
                &[StateWrite::new(Slot::InNeighbors, list(&[(1, 3), (2, 3)]))],
            )
            .expect("commit");
        // Explicit drop to release lock before reopening
        drop(store);
    }

    // Reopen and verify
    {
        let store = RedbStateStore::open(&path).expect("reopen store");
        let state = store.load(&Address::in_edges(4)).expect("load");
        assert_eq!(state.in_neighbors(), &list(&[(1, 3), (2, 3)]));
        assert!(store.path().ends_with("state.redb"));
    }
}
