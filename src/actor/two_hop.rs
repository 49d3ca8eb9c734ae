//! Two-hop candidate aggregation
//!
//! Built entirely from the actor's own state. For every bridge vertex found
//! in the in-neighbor list, the actor's own out-neighbor list stands in for
//! the bridge's out-neighbors; no remote actor is read. The candidate list is
//! never deduplicated.

use super::address::Address;
use super::egress::format_result;
use super::ingest::{updated_list, EdgeRole};
use super::state::{Effects, Slot, VertexState};
use crate::models::{Edge, VertexId};
use tracing::debug;

/// Update path, run on every edge event delivered to a two-hop actor.
///
/// 1. Sorted-insert `(edge.src, ts)` into the in-neighbor list.
/// 2. For each in-neighbor `(src2, ts2)` with `src2 != edge.src`, sorted-insert
///    `(src2, ts2)` into the out-neighbor list, then append the whole current
///    out-neighbor list to the two-hop list.
///
/// Out-neighbor and two-hop slots are only written when at least one bridge
/// qualified.
pub fn on_edge(state: &VertexState, edge: &Edge) -> Effects {
    let in_neighbors = updated_list(state, Slot::InNeighbors, EdgeRole::Incoming, edge);
    let mut out_neighbors = state.out_neighbors().clone();
    let mut two_hop = state.two_hop_neighbors().clone();
    let mut bridges = 0usize;

    for bridge in in_neighbors.iter().filter(|e| e.neighbor_id != edge.src) {
        out_neighbors.insert_sorted(*bridge);
        two_hop.extend_from(&out_neighbors);
        bridges += 1;
        debug!("current twoHop neighbors: {}", two_hop);
    }

    debug!(
        vertex = edge.dst,
        bridges,
        two_hop_len = two_hop.len(),
        "Two-hop update applied"
    );

    let effects = Effects::none().write(Slot::InNeighbors, in_neighbors);
    if bridges == 0 {
        return effects;
    }
    effects
        .write(Slot::OutNeighbors, out_neighbors)
        .write(Slot::TwoHopNeighbors, two_hop)
}

/// Query path: the stored candidate list, verbatim.
pub fn query(address: &Address, vertex_id: VertexId, state: &VertexState) -> Effects {
    Effects::none().emit(format_result(address, vertex_id, state.two_hop_neighbors()))
}
