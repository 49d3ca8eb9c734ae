//! Actor addressing: `(function type, partition key)`
//!
//! Every address names one logical actor instance with its own private state.
//! Time-window actors extend the key with the `[start, end]` range, so each
//! distinct range is a distinct instance.

use crate::models::{Timestamp, VertexId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Handler type half of an address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FunctionType {
    /// Stores `(dst, ts)` for edges leaving the keyed vertex
    OutEdges,
    /// Stores `(src, ts)` for edges entering the keyed vertex
    InEdges,
    /// Out-edge store scoped to one `(vertex, start, end)` instance
    TimeWindow,
    /// In-edge store plus the two-hop candidate list
    TwoHop,
}

impl FunctionType {
    pub const ALL: [FunctionType; 4] = [
        FunctionType::OutEdges,
        FunctionType::InEdges,
        FunctionType::TimeWindow,
        FunctionType::TwoHop,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FunctionType::OutEdges => "outEdges",
            FunctionType::InEdges => "inEdges",
            FunctionType::TimeWindow => "timeWindow",
            FunctionType::TwoHop => "twoHop",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Partition-key half of an address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActorKey {
    Vertex(VertexId),
    Window {
        vertex: VertexId,
        start: Timestamp,
        end: Timestamp,
    },
}

impl ActorKey {
    pub fn vertex(&self) -> VertexId {
        match *self {
            ActorKey::Vertex(v) => v,
            ActorKey::Window { vertex, .. } => vertex,
        }
    }
}

impl fmt::Display for ActorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActorKey::Vertex(v) => write!(f, "{}", v),
            ActorKey::Window { vertex, start, end } => write!(f, "{}@[{},{}]", vertex, start, end),
        }
    }
}

impl FromStr for ActorKey {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || AddressParseError(s.to_string());

        match s.split_once('@') {
            None => s.parse().map(ActorKey::Vertex).map_err(|_| bad()),
            Some((vertex, range)) => {
                let range = range
                    .strip_prefix('[')
                    .and_then(|r| r.strip_suffix(']'))
                    .ok_or_else(bad)?;
                let (start, end) = range.split_once(',').ok_or_else(bad)?;
                Ok(ActorKey::Window {
                    vertex: vertex.parse().map_err(|_| bad())?,
                    start: start.trim().parse().map_err(|_| bad())?,
                    end: end.trim().parse().map_err(|_| bad())?,
                })
            }
        }
    }
}

/// Routing key identifying one actor instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address {
    pub function: FunctionType,
    pub key: ActorKey,
}

impl Address {
    pub fn new(function: FunctionType, key: ActorKey) -> Self {
        Self { function, key }
    }

    pub fn out_edges(vertex: VertexId) -> Self {
        Self::new(FunctionType::OutEdges, ActorKey::Vertex(vertex))
    }

    pub fn in_edges(vertex: VertexId) -> Self {
        Self::new(FunctionType::InEdges, ActorKey::Vertex(vertex))
    }

    pub fn two_hop(vertex: VertexId) -> Self {
        Self::new(FunctionType::TwoHop, ActorKey::Vertex(vertex))
    }

    pub fn time_window(vertex: VertexId, start: Timestamp, end: Timestamp) -> Self {
        Self::new(
            FunctionType::TimeWindow,
            ActorKey::Window { vertex, start, end },
        )
    }

    pub fn vertex(&self) -> VertexId {
        self.key.vertex()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.function, self.key)
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (function, key) = s
            .split_once('/')
            .ok_or_else(|| AddressParseError(s.to_string()))?;
        let function =
            FunctionType::from_name(function).ok_or_else(|| AddressParseError(s.to_string()))?;
        Ok(Address::new(function, key.parse()?))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid actor address: {0:?}")]
pub struct AddressParseError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_parse() {
        for address in [
            Address::out_edges(1),
            Address::in_edges(-4),
            Address::two_hop(7),
            Address::time_window(3, 0, 100),
            Address::time_window(3, -10, -1),
        ] {
            let text = address.to_string();
            assert_eq!(text.parse::<Address>().unwrap(), address, "{}", text);
        }
        assert_eq!(Address::time_window(3, 0, 100).to_string(), "timeWindow/3@[0,100]");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("outEdges".parse::<Address>().is_err());
        assert!("sideways/1".parse::<Address>().is_err());
        assert!("outEdges/x".parse::<Address>().is_err());
        assert!("timeWindow/1@0,100".parse::<Address>().is_err());
    }

    #[test]
    fn test_window_ranges_are_distinct_instances() {
        assert_ne!(Address::time_window(1, 0, 10), Address::time_window(1, 0, 11));
        assert_eq!(
            Address::time_window(1, 0, 10).key,
            ActorKey::Window { vertex: 1, start: 0, end: 10 }
        );
    }
}
