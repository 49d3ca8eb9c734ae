//! Per-vertex actors
//!
//! One logical actor exists per `(function type, key)` [`Address`]. Each owns
//! a private [`VertexState`] with three slots (`outNeighbors`, `inNeighbors`,
//! `twoHopNeighbors`) and processes its messages one at a time. Functions are
//! pure with respect to storage: they map `(state, message)` to [`Effects`].
//!
//! ```text
//!  EdgeEvent ──► outEdges/src   ──► ingest  ──► outNeighbors
//!            ──► inEdges/dst    ──► ingest  ──► inNeighbors
//!            ──► twoHop/dst     ──► two_hop ──► inNeighbors, outNeighbors, twoHopNeighbors
//!            ──► timeWindow/src@[s,e] ──► ingest ──► outNeighbors
//!  *Query    ──► query / two_hop::query ──► egress record
//! ```

pub mod address;
pub mod egress;
pub mod function;
pub mod ingest;
pub mod message;
pub mod query;
pub mod state;
pub mod two_hop;

pub use address::{ActorKey, Address, AddressParseError, FunctionType};
pub use function::{function_for, VertexFunction};
pub use message::{Envelope, Message};
pub use state::{Effects, Slot, StateWrite, VertexState};
