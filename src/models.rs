//! Core data model shared by every vertex actor
//!
//! Edges arrive as ingestion events; each actor keeps its view of them as
//! [`NeighborList`]s ordered by timestamp. Results leave the system as
//! [`EgressRecord`]s.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Graph vertex identifier; also the actor partition key.
pub type VertexId = i32;

/// Edge timestamp. Never validated: any value and any arrival order is accepted.
pub type Timestamp = i64;

/// A directed, timestamped edge as it arrives on the ingestion stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub src: VertexId,
    pub dst: VertexId,
    pub timestamp: Timestamp,
}

impl Edge {
    pub fn new(src: VertexId, dst: VertexId, timestamp: Timestamp) -> Self {
        Self {
            src,
            dst,
            timestamp,
        }
    }
}

/// One neighbor of a vertex, as seen from that vertex's actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeighborEntry {
    pub neighbor_id: VertexId,
    pub timestamp: Timestamp,
}

impl NeighborEntry {
    pub fn new(neighbor_id: VertexId, timestamp: Timestamp) -> Self {
        Self {
            neighbor_id,
            timestamp,
        }
    }
}

impl fmt::Display for NeighborEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.neighbor_id, self.timestamp)
    }
}

/// Ordered sequence of neighbor entries owned by a single actor.
///
/// Adjacency lists keep ascending timestamp order through [`insert_sorted`];
/// the two-hop list is built with [`extend_from`] and carries no ordering
/// guarantee across appended runs.
///
/// [`insert_sorted`]: NeighborList::insert_sorted
/// [`extend_from`]: NeighborList::extend_from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NeighborList(Vec<NeighborEntry>);

impl NeighborList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Binary-search position for a new entry with `timestamp`.
    ///
    /// An exact timestamp match returns the probed entry's index, so the new
    /// entry lands in front of it and the existing one shifts right. Otherwise
    /// the index is the boundary that keeps the list ascending.
    pub fn insertion_index(&self, timestamp: Timestamp) -> usize {
        // Inclusive bounds: `right` goes to -1 when the new entry is the smallest.
        let mut left: isize = 0;
        let mut right: isize = self.0.len() as isize - 1;
        let mut index: isize = 0;

        while left <= right {
            let mid = left + (right - left) / 2;
            let probe = self.0[mid as usize].timestamp;
            if probe == timestamp {
                index = mid;
                break;
            } else if probe < timestamp {
                left = mid + 1;
                index = left;
            } else {
                right = mid - 1;
            }
        }

        index as usize
    }

    /// Insert an entry at its timestamp position. Ties are kept, never merged.
    pub fn insert_sorted(&mut self, entry: NeighborEntry) -> usize {
        let index = self.insertion_index(entry.timestamp);
        self.0.insert(index, entry);
        index
    }

    /// Append every entry of `other`, preserving its order.
    pub fn extend_from(&mut self, other: &NeighborList) {
        self.0.extend_from_slice(&other.0);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NeighborEntry> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn timestamps(&self) -> Vec<Timestamp> {
        self.0.iter().map(|e| e.timestamp).collect()
    }

    pub fn neighbor_ids(&self) -> Vec<VertexId> {
        self.0.iter().map(|e| e.neighbor_id).collect()
    }

    /// True when timestamps never decrease.
    pub fn is_sorted_by_timestamp(&self) -> bool {
        self.0.windows(2).all(|w| w[0].timestamp <= w[1].timestamp)
    }
}

impl From<Vec<NeighborEntry>> for NeighborList {
    fn from(entries: Vec<NeighborEntry>) -> Self {
        Self(entries)
    }
}

impl FromIterator<NeighborEntry> for NeighborList {
    fn from_iter<I: IntoIterator<Item = NeighborEntry>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a NeighborList {
    type Item = &'a NeighborEntry;
    type IntoIter = std::slice::Iter<'a, NeighborEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for NeighborList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, entry) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", entry)?;
        }
        write!(f, "]")
    }
}

/// Externally observable result of a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EgressRecord {
    pub label: String,
    pub message: String,
}

impl EgressRecord {
    pub fn new(label: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(entries: &[(VertexId, Timestamp)]) -> NeighborList {
        entries
            .iter()
            .map(|&(id, ts)| NeighborEntry::new(id, ts))
            .collect()
    }

    #[test]
    fn test_insert_into_empty_list() {
        let mut neighbors = NeighborList::new();
        assert_eq!(neighbors.insert_sorted(NeighborEntry::new(5, 10)), 0);
        assert_eq!(neighbors.len(), 1);
    }

    #[test]
    fn test_insert_keeps_ascending_order() {
        let mut neighbors = NeighborList::new();
        for (id, ts) in [(1, 30), (2, 10), (3, 20), (4, 40), (5, 0), (6, 25)] {
            neighbors.insert_sorted(NeighborEntry::new(id, ts));
            assert!(neighbors.is_sorted_by_timestamp(), "unsorted: {}", neighbors);
        }
        assert_eq!(neighbors.timestamps(), vec![0, 10, 20, 25, 30, 40]);
    }

    #[test]
    fn test_tie_inserts_in_front_of_probed_entry() {
        let mut neighbors = list(&[(5, 10)]);
        neighbors.insert_sorted(NeighborEntry::new(7, 5));
        neighbors.insert_sorted(NeighborEntry::new(9, 10));

        // mid=0 (ts 5) moves right, mid=1 (ts 10) is an exact hit at index 1
        assert_eq!(neighbors, list(&[(7, 5), (9, 10), (5, 10)]));
    }

    #[test]
    fn test_duplicates_are_never_merged() {
        let mut neighbors = NeighborList::new();
        for _ in 0..4 {
            neighbors.insert_sorted(NeighborEntry::new(2, 7));
        }
        assert_eq!(neighbors.len(), 4);
        assert!(neighbors.iter().all(|e| *e == NeighborEntry::new(2, 7)));
    }

    #[test]
    fn test_insertion_index_boundaries() {
        let neighbors = list(&[(1, 10), (2, 20), (3, 30)]);
        assert_eq!(neighbors.insertion_index(5), 0);
        assert_eq!(neighbors.insertion_index(15), 1);
        assert_eq!(neighbors.insertion_index(20), 1);
        assert_eq!(neighbors.insertion_index(35), 3);
    }

    #[test]
    fn test_negative_timestamps_accepted() {
        let mut neighbors = NeighborList::new();
        neighbors.insert_sorted(NeighborEntry::new(1, 0));
        neighbors.insert_sorted(NeighborEntry::new(2, -5));
        neighbors.insert_sorted(NeighborEntry::new(3, i64::MIN));
        neighbors.insert_sorted(NeighborEntry::new(4, i64::MAX));
        assert_eq!(neighbors.timestamps(), vec![i64::MIN, -5, 0, i64::MAX]);
    }

    #[test]
    fn test_display_matches_egress_rendering() {
        assert_eq!(NeighborList::new().to_string(), "[]");
        assert_eq!(list(&[(7, 5), (5, 10)]).to_string(), "[(7,5), (5,10)]");
    }

    #[test]
    fn test_serialized_form() {
        let json = serde_json::to_string(&list(&[(3, 2)])).unwrap();
        assert_eq!(json, r#"[{"neighborId":3,"timestamp":2}]"#);
    }
}
