//! Point queries: serve an adjacency list exactly as stored

use super::address::Address;
use super::egress::format_result;
use super::state::{Effects, Slot, VertexState};
use crate::models::VertexId;
use tracing::debug;

/// Answer an out-edge, in-edge or time-window query from `slot`.
///
/// No filtering, ranking or truncation. A time-window actor's range is part
/// of its address and is not applied to the entries it holds. Missing state
/// yields an empty list, never an error.
pub fn point_query(address: &Address, vertex_id: VertexId, state: &VertexState, slot: Slot) -> Effects {
    let result = state.get(slot);
    debug!(address = %address, entries = result.len(), "Serving point query");
    Effects::none().emit(format_result(address, vertex_id, result))
}
