//! Handler contract and the four vertex function types
//!
//! A function receives the actor's current state and one message and returns
//! the [`Effects`] to apply. It never touches storage or the sink itself; the
//! runtime commits the writes and forwards the egress record.

use super::address::{Address, FunctionType};
use super::ingest::{ingest_edge, EdgeRole};
use super::message::Message;
use super::query::point_query;
use super::state::{Effects, Slot, VertexState};
use super::two_hop;
use tracing::warn;

/// Common interface for vertex function types
pub trait VertexFunction: Send + Sync {
    fn function_type(&self) -> FunctionType;

    /// Process one message for the actor at `address`
    fn handle(&self, address: &Address, state: &VertexState, message: &Message) -> Effects;
}

/// Out-edge adjacency of the keyed vertex
pub struct OutEdgesFn;

/// In-edge adjacency of the keyed vertex
pub struct InEdgesFn;

/// Out-edge adjacency held by one `(vertex, start, end)` instance
pub struct TimeWindowFn;

/// In-edges, bridged out-edges and two-hop candidates of the keyed vertex
pub struct TwoHopFn;

impl VertexFunction for OutEdgesFn {
    fn function_type(&self) -> FunctionType {
        FunctionType::OutEdges
    }

    fn handle(&self, address: &Address, state: &VertexState, message: &Message) -> Effects {
        match message {
            Message::EdgeEvent(edge) => {
                ingest_edge(state, Slot::OutNeighbors, EdgeRole::Outgoing, edge)
            }
            Message::OutEdgesQuery { vertex_id } => {
                point_query(address, *vertex_id, state, Slot::OutNeighbors)
            }
            Message::InEdgesQuery { .. }
            | Message::TimeWindowQuery { .. }
            | Message::TwoHopQuery { .. } => unsupported(address, message),
        }
    }
}

impl VertexFunction for InEdgesFn {
    fn function_type(&self) -> FunctionType {
        FunctionType::InEdges
    }

    fn handle(&self, address: &Address, state: &VertexState, message: &Message) -> Effects {
        match message {
            Message::EdgeEvent(edge) => {
                ingest_edge(state, Slot::InNeighbors, EdgeRole::Incoming, edge)
            }
            Message::InEdgesQuery { vertex_id } => {
                point_query(address, *vertex_id, state, Slot::InNeighbors)
            }
            Message::OutEdgesQuery { .. }
            | Message::TimeWindowQuery { .. }
            | Message::TwoHopQuery { .. } => unsupported(address, message),
        }
    }
}

impl VertexFunction for TimeWindowFn {
    fn function_type(&self) -> FunctionType {
        FunctionType::TimeWindow
    }

    fn handle(&self, address: &Address, state: &VertexState, message: &Message) -> Effects {
        match message {
            // The window range is not checked here: whatever edges reach this
            // instance are kept.
            Message::EdgeEvent(edge) => {
                ingest_edge(state, Slot::OutNeighbors, EdgeRole::Outgoing, edge)
            }
            Message::TimeWindowQuery { vertex_id } => {
                point_query(address, *vertex_id, state, Slot::OutNeighbors)
            }
            Message::OutEdgesQuery { .. }
            | Message::InEdgesQuery { .. }
            | Message::TwoHopQuery { .. } => unsupported(address, message),
        }
    }
}

impl VertexFunction for TwoHopFn {
    fn function_type(&self) -> FunctionType {
        FunctionType::TwoHop
    }

    fn handle(&self, address: &Address, state: &VertexState, message: &Message) -> Effects {
        match message {
            Message::EdgeEvent(edge) => two_hop::on_edge(state, edge),
            Message::TwoHopQuery { vertex_id } => two_hop::query(address, *vertex_id, state),
            Message::OutEdgesQuery { .. }
            | Message::InEdgesQuery { .. }
            | Message::TimeWindowQuery { .. } => unsupported(address, message),
        }
    }
}

/// Messages a function type does not understand are dropped without effects
fn unsupported(address: &Address, message: &Message) -> Effects {
    warn!(
        address = %address,
        kind = message.kind(),
        "Message kind not handled by this function type, ignoring"
    );
    Effects::none()
}

static OUT_EDGES: OutEdgesFn = OutEdgesFn;
static IN_EDGES: InEdgesFn = InEdgesFn;
static TIME_WINDOW: TimeWindowFn = TimeWindowFn;
static TWO_HOP: TwoHopFn = TwoHopFn;

/// Resolve the handler for a function type
pub fn function_for(function: FunctionType) -> &'static dyn VertexFunction {
    match function {
        FunctionType::OutEdges => &OUT_EDGES,
        FunctionType::InEdges => &IN_EDGES,
        FunctionType::TimeWindow => &TIME_WINDOW,
        FunctionType::TwoHop => &TWO_HOP,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Edge;

    #[test]
    fn test_function_for_matches_type() {
        for function in FunctionType::ALL {
            assert_eq!(function_for(function).function_type(), function);
        }
    }

    #[test]
    fn test_out_edges_ingest_then_query() {
        let address = Address::out_edges(1);
        let function = function_for(address.function);
        let mut state = VertexState::new();

        for edge in [Edge::new(1, 5, 10), Edge::new(1, 7, 5), Edge::new(1, 9, 10)] {
            let effects = function.handle(&address, &state, &Message::EdgeEvent(edge));
            state.apply(&effects.writes);
        }

        let effects = function.handle(&address, &state, &Message::OutEdgesQuery { vertex_id: 1 });
        assert_eq!(
            effects.egress.unwrap().message,
            "The outgoing edges of vertex 1 are [(7,5), (9,10), (5,10)]"
        );
    }

    #[test]
    fn test_in_edges_records_source() {
        let address = Address::in_edges(1);
        let effects = function_for(address.function).handle(
            &address,
            &VertexState::new(),
            &Message::EdgeEvent(Edge::new(4, 1, 2)),
        );
        assert_eq!(effects.written(Slot::InNeighbors).unwrap().neighbor_ids(), vec![4]);
    }

    #[test]
    fn test_unsupported_kind_has_no_effects() {
        let address = Address::out_edges(1);
        let effects = function_for(address.function).handle(
            &address,
            &VertexState::new(),
            &Message::TwoHopQuery { vertex_id: 1 },
        );
        assert!(effects.is_empty());
    }

    #[test]
    fn test_every_query_kind_on_empty_actor() {
        let cases = [
            (Address::out_edges(8), Message::OutEdgesQuery { vertex_id: 8 }),
            (Address::in_edges(8), Message::InEdgesQuery { vertex_id: 8 }),
            (Address::time_window(8, 0, 1), Message::TimeWindowQuery { vertex_id: 8 }),
            (Address::two_hop(8), Message::TwoHopQuery { vertex_id: 8 }),
        ];
        for (address, message) in cases {
            let effects = function_for(address.function).handle(&address, &VertexState::new(), &message);
            let record = effects.egress.expect("query must emit");
            assert!(record.message.ends_with("[]"), "{}", record.message);
            assert!(effects.writes.is_empty());
        }
    }
}
