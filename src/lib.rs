//! vertex-actors - per-vertex durable actors over a timestamped edge stream
//!
//! Every vertex is served by a small set of actors, one per function type:
//! outgoing edges, incoming edges, time-window outgoing edges and two-hop
//! candidates. Each actor keeps timestamp-sorted neighbor lists, updates them
//! as edges arrive and answers point queries with an egress record.
//!
//! The crate is split into:
//! - [`models`]: vertex ids, edges, sorted neighbor lists
//! - [`actor`]: addresses, messages, state and the vertex functions
//! - [`store`]: durable per-actor state ([`store::RedbStateStore`]) and an in-memory twin
//! - [`router`]: fans inbound records out to actor addresses
//! - [`runtime`]: delivers envelopes in per-actor order and forwards egress
//! - [`wire`]: JSON-lines ingress and egress codec
//! - [`config`]: `vertex-actors.toml` settings

pub mod actor;
pub mod config;
pub mod models;
pub mod router;
pub mod runtime;
pub mod store;
pub mod wire;
