//! Per-actor state record and the effect batch a handler returns

use crate::models::{EgressRecord, NeighborList};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named persisted slot of an actor's state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Slot {
    OutNeighbors,
    InNeighbors,
    TwoHopNeighbors,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::OutNeighbors, Slot::InNeighbors, Slot::TwoHopNeighbors];

    pub fn name(&self) -> &'static str {
        match self {
            Slot::OutNeighbors => "outNeighbors",
            Slot::InNeighbors => "inNeighbors",
            Slot::TwoHopNeighbors => "twoHopNeighbors",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Private state of one actor. Absent slots read as empty lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexState {
    out_neighbors: NeighborList,
    in_neighbors: NeighborList,
    two_hop_neighbors: NeighborList,
}

impl VertexState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: Slot) -> &NeighborList {
        match slot {
            Slot::OutNeighbors => &self.out_neighbors,
            Slot::InNeighbors => &self.in_neighbors,
            Slot::TwoHopNeighbors => &self.two_hop_neighbors,
        }
    }

    pub fn set(&mut self, slot: Slot, value: NeighborList) {
        match slot {
            Slot::OutNeighbors => self.out_neighbors = value,
            Slot::InNeighbors => self.in_neighbors = value,
            Slot::TwoHopNeighbors => self.two_hop_neighbors = value,
        }
    }

    pub fn with(mut self, slot: Slot, value: NeighborList) -> Self {
        self.set(slot, value);
        self
    }

    pub fn out_neighbors(&self) -> &NeighborList {
        &self.out_neighbors
    }

    pub fn in_neighbors(&self) -> &NeighborList {
        &self.in_neighbors
    }

    pub fn two_hop_neighbors(&self) -> &NeighborList {
        &self.two_hop_neighbors
    }

    pub fn is_empty(&self) -> bool {
        Slot::ALL.iter().all(|&s| self.get(s).is_empty())
    }

    /// Apply a committed write batch in order
    pub fn apply(&mut self, writes: &[StateWrite]) {
        for write in writes {
            self.set(write.slot, write.value.clone());
        }
    }
}

/// Whole-slot replacement produced by a handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateWrite {
    pub slot: Slot,
    pub value: NeighborList,
}

impl StateWrite {
    pub fn new(slot: Slot, value: NeighborList) -> Self {
        Self { slot, value }
    }
}

/// Everything one message produces: slot writes committed together, plus at
/// most one egress record sent after the commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Effects {
    pub writes: Vec<StateWrite>,
    pub egress: Option<EgressRecord>,
}

impl Effects {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn write(mut self, slot: Slot, value: NeighborList) -> Self {
        self.writes.push(StateWrite::new(slot, value));
        self
    }

    pub fn emit(mut self, record: EgressRecord) -> Self {
        self.egress = Some(record);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty() && self.egress.is_none()
    }

    /// The value this batch writes to `slot`, if any
    pub fn written(&self, slot: Slot) -> Option<&NeighborList> {
        self.writes
            .iter()
            .rev()
            .find(|w| w.slot == slot)
            .map(|w| &w.value)
    }
}
