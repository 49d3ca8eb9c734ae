//! JSON-lines wire format for inbound records and outbound egress
//!
//! Inbound records are internally tagged by `type`:
//!
//! ```text
//! {"type":"edge","src":1,"dst":2,"timestamp":10}
//! {"type":"outEdgesQuery","vertexId":1}
//! {"type":"inEdgesQuery","vertexId":2}
//! {"type":"timeWindowQuery","vertexId":1,"start":0,"end":100}
//! {"type":"twoHopQuery","vertexId":1}
//! ```
//!
//! Anything that fails to decode stops here as a [`WireError`]; handlers
//! only ever see well-formed messages.

use crate::models::{EgressRecord, Edge, Timestamp, VertexId};
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use thiserror::Error;

/// One decoded inbound record, before routing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum IngressRecord {
    Edge(Edge),
    OutEdgesQuery {
        #[serde(rename = "vertexId")]
        vertex_id: VertexId,
    },
    InEdgesQuery {
        #[serde(rename = "vertexId")]
        vertex_id: VertexId,
    },
    TimeWindowQuery {
        #[serde(rename = "vertexId")]
        vertex_id: VertexId,
        start: Timestamp,
        end: Timestamp,
    },
    TwoHopQuery {
        #[serde(rename = "vertexId")]
        vertex_id: VertexId,
    },
}

/// Errors at the deserialization boundary
#[derive(Error, Debug)]
pub enum WireError {
    #[error("line {line}: malformed record: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode egress record: {0}")]
    Encode(#[source] serde_json::Error),
}

impl WireError {
    /// 1-based input line of a decode failure
    pub fn line(&self) -> Option<usize> {
        match self {
            WireError::Malformed { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Decode one line. Blank lines and `#` comments yield `Ok(None)`.
pub fn decode_line(line_number: usize, line: &str) -> Result<Option<IngressRecord>, WireError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|source| WireError::Malformed {
            line: line_number,
            source,
        })
}

/// Stream records from a reader, one result per non-skipped line
pub fn read_records<R: BufRead>(reader: R) -> impl Iterator<Item = Result<IngressRecord, WireError>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(index, line)| match line {
            Ok(text) => decode_line(index + 1, &text).transpose(),
            Err(e) => Some(Err(WireError::Io(e))),
        })
}

/// Encode an egress record as a single JSON line (no trailing newline)
pub fn encode_egress(record: &EgressRecord) -> Result<String, WireError> {
    serde_json::to_string(record).map_err(WireError::Encode)
}
