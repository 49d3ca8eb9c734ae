//! Egress formatting: turn a query result into the outbound record

use super::address::{Address, FunctionType};
use crate::models::{EgressRecord, NeighborList, VertexId};

pub const OUTGOING_EDGES: &str = "outgoing-edges";
pub const INCOMING_EDGES: &str = "incoming-edges";
pub const TWO_HOP_RECOMMENDATION: &str = "TwoHop-Recommendation";

/// Build the egress record for a result served by the actor at `address`.
///
/// `vertex_id` is the id named in the query message.
pub fn format_result(address: &Address, vertex_id: VertexId, result: &NeighborList) -> EgressRecord {
    match address.function {
        // Window instances share the out-edges wording; the range stays in the address
        FunctionType::OutEdges | FunctionType::TimeWindow => EgressRecord::new(
            OUTGOING_EDGES,
            format!("The outgoing edges of vertex {} are {}", vertex_id, result),
        ),
        FunctionType::InEdges => EgressRecord::new(
            INCOMING_EDGES,
            format!("The incoming edges of vertex {} are {}", vertex_id, result),
        ),
        FunctionType::TwoHop => EgressRecord::new(
            TWO_HOP_RECOMMENDATION,
            format!(
                "Recommended node connection for vertex {} are {}",
                vertex_id, result
            ),
        ),
    }
}
