//! Ingress routing: one inbound record to its addressed envelopes

use crate::actor::{Address, Envelope, Message};
use crate::config::RoutingConfig;
use crate::models::Timestamp;
use crate::wire::IngressRecord;
use serde::{Deserialize, Serialize};

/// A configured `[start, end]` time-window instance range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(Timestamp, Timestamp)", into = "(Timestamp, Timestamp)")]
pub struct TimeWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl From<(Timestamp, Timestamp)> for TimeWindow {
    fn from((start, end): (Timestamp, Timestamp)) -> Self {
        Self { start, end }
    }
}

impl From<TimeWindow> for (Timestamp, Timestamp) {
    fn from(w: TimeWindow) -> Self {
        (w.start, w.end)
    }
}

/// Fans edge events out to every actor role and points queries at one actor
#[derive(Debug, Clone)]
pub struct Router {
    windows: Vec<TimeWindow>,
    two_hop: bool,
    time_window: bool,
}

impl Router {
    pub fn new(windows: Vec<TimeWindow>) -> Self {
        Self {
            windows,
            two_hop: true,
            time_window: true,
        }
    }

    pub fn from_config(config: &RoutingConfig) -> Self {
        Self {
            windows: config.time_windows.clone(),
            two_hop: config.two_hop,
            time_window: config.time_window,
        }
    }

    pub fn windows(&self) -> &[TimeWindow] {
        &self.windows
    }

    /// Addressed envelopes for one record.
    ///
    /// An edge goes to `outEdges/src`, `inEdges/dst`, `twoHop/dst` and to the
    /// `timeWindow/src@[s,e]` instance of every configured window. Window
    /// membership is not decided here by timestamp: every window instance
    /// receives every edge of its vertex.
    pub fn route(&self, record: &IngressRecord) -> Vec<Envelope> {
        match *record {
            IngressRecord::Edge(edge) => {
                let message = Message::EdgeEvent(edge);
                let mut envelopes = vec![
                    Envelope::new(Address::out_edges(edge.src), message),
                    Envelope::new(Address::in_edges(edge.dst), message),
                ];
                if self.two_hop {
                    envelopes.push(Envelope::new(Address::two_hop(edge.dst), message));
                }
                if self.time_window {
                    envelopes.extend(self.windows.iter().map(|w| {
                        Envelope::new(Address::time_window(edge.src, w.start, w.end), message)
                    }));
                }
                envelopes
            }
            IngressRecord::OutEdgesQuery { vertex_id } => vec![Envelope::new(
                Address::out_edges(vertex_id),
                Message::OutEdgesQuery { vertex_id },
            )],
            IngressRecord::InEdgesQuery { vertex_id } => vec![Envelope::new(
                Address::in_edges(vertex_id),
                Message::InEdgesQuery { vertex_id },
            )],
            IngressRecord::TimeWindowQuery {
                vertex_id,
                start,
                end,
            } => vec![Envelope::new(
                Address::time_window(vertex_id, start, end),
                Message::TimeWindowQuery { vertex_id },
            )],
            IngressRecord::TwoHopQuery { vertex_id } => vec![Envelope::new(
                Address::two_hop(vertex_id),
                Message::TwoHopQuery { vertex_id },
            )],
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
