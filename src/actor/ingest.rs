//! Edge ingestion: sorted insert of one edge into one actor's adjacency list

use super::state::{Effects, Slot, VertexState};
use crate::models::{Edge, NeighborEntry, NeighborList, VertexId};
use tracing::debug;

/// Which endpoint of an edge the receiving actor records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeRole {
    /// Actor keyed by `src` records `(dst, ts)`
    Outgoing,
    /// Actor keyed by `dst` records `(src, ts)`
    Incoming,
}

impl EdgeRole {
    pub fn entry(&self, edge: &Edge) -> NeighborEntry {
        match self {
            EdgeRole::Outgoing => NeighborEntry::new(edge.dst, edge.timestamp),
            EdgeRole::Incoming => NeighborEntry::new(edge.src, edge.timestamp),
        }
    }

    /// Vertex that owns the list this role writes to
    pub fn owner(&self, edge: &Edge) -> VertexId {
        match self {
            EdgeRole::Outgoing => edge.src,
            EdgeRole::Incoming => edge.dst,
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            EdgeRole::Outgoing => "outgoing",
            EdgeRole::Incoming => "incoming",
        }
    }
}

/// Copy of `state[slot]` with the edge's entry inserted at its timestamp position
pub fn updated_list(state: &VertexState, slot: Slot, role: EdgeRole, edge: &Edge) -> NeighborList {
    let mut list = state.get(slot).clone();
    list.insert_sorted(role.entry(edge));
    list
}

/// Apply one edge event to one adjacency list.
///
/// The full list is rewritten as a single slot write. Redelivery of the same
/// edge inserts it again.
pub fn ingest_edge(state: &VertexState, slot: Slot, role: EdgeRole, edge: &Edge) -> Effects {
    let list = updated_list(state, slot, role, edge);

    debug!(
        "vertex {} currently has these {} neighbors: {}",
        role.owner(edge),
        role.describe(),
        list
    );

    Effects::none().write(slot, list)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(state: &mut VertexState, slot: Slot, role: EdgeRole, edge: Edge) {
        let effects = ingest_edge(state, slot, role, &edge);
        assert!(effects.egress.is_none());
        state.apply(&effects.writes);
    }

    #[test]
    fn test_outgoing_role_records_destination() {
        let mut state = VertexState::new();
        apply(&mut state, Slot::OutNeighbors, EdgeRole::Outgoing, Edge::new(1, 5, 10));
        assert_eq!(state.out_neighbors().neighbor_ids(), vec![5]);
        assert!(state.in_neighbors().is_empty());
    }

    #[test]
    fn test_incoming_role_records_source() {
        let mut state = VertexState::new();
        apply(&mut state, Slot::InNeighbors, EdgeRole::Incoming, Edge::new(2, 1, 1));
        apply(&mut state, Slot::InNeighbors, EdgeRole::Incoming, Edge::new(3, 1, 2));
        assert_eq!(state.in_neighbors().neighbor_ids(), vec![2, 3]);
        assert_eq!(state.in_neighbors().timestamps(), vec![1, 2]);
    }

    #[test]
    fn test_single_write_per_event() {
        let state = VertexState::new();
        let effects = ingest_edge(&state, Slot::OutNeighbors, EdgeRole::Outgoing, &Edge::new(1, 2, 3));
        assert_eq!(effects.writes.len(), 1);
        assert_eq!(effects.writes[0].slot, Slot::OutNeighbors);
    }

    #[test]
    fn test_input_state_is_not_mutated() {
        let state = VertexState::new();
        let _ = ingest_edge(&state, Slot::OutNeighbors, EdgeRole::Outgoing, &Edge::new(1, 2, 3));
        assert!(state.is_empty());
    }

    #[test]
    fn test_replay_duplicates_entry() {
        let mut state = VertexState::new();
        let edge = Edge::new(1, 9, 4);
        apply(&mut state, Slot::OutNeighbors, EdgeRole::Outgoing, edge);
        apply(&mut state, Slot::OutNeighbors, EdgeRole::Outgoing, edge);
        assert_eq!(state.out_neighbors().len(), 2);
        assert_eq!(state.out_neighbors().neighbor_ids(), vec![9, 9]);
    }
}
