//! Messages delivered to vertex actors

use super::address::Address;
use crate::models::{Edge, VertexId};

/// Every message kind an actor can receive.
///
/// Edge events carry no direction: the role (out, in, window, two-hop) is
/// decided by the function type of the address they are delivered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    EdgeEvent(Edge),
    OutEdgesQuery { vertex_id: VertexId },
    InEdgesQuery { vertex_id: VertexId },
    /// The range lives in the receiving actor's address, not in the message
    TimeWindowQuery { vertex_id: VertexId },
    TwoHopQuery { vertex_id: VertexId },
}

impl Message {
    pub fn kind(&self) -> &'static str {
        match self {
            Message::EdgeEvent(_) => "EdgeEvent",
            Message::OutEdgesQuery { .. } => "OutEdgesQuery",
            Message::InEdgesQuery { .. } => "InEdgesQuery",
            Message::TimeWindowQuery { .. } => "TimeWindowQuery",
            Message::TwoHopQuery { .. } => "TwoHopQuery",
        }
    }
}

/// A message bound to the actor that must process it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope {
    pub address: Address,
    pub message: Message,
}

impl Envelope {
    pub fn new(address: Address, message: Message) -> Self {
        Self { address, message }
    }
}
