//! Query command - deliver one query against the stored state

use super::QueryKind;
use anyhow::{Context, Result};
use std::sync::Arc;
use vertex_actors::config::Config;
use vertex_actors::models::{Timestamp, VertexId};
use vertex_actors::runtime::MemorySink;
use vertex_actors::wire::{encode_egress, IngressRecord};

pub fn run(
    config: &Config,
    kind: QueryKind,
    vertex: VertexId,
    start: Option<Timestamp>,
    end: Option<Timestamp>,
) -> Result<()> {
    let record = match kind {
        QueryKind::Out => IngressRecord::OutEdgesQuery { vertex_id: vertex },
        QueryKind::In => IngressRecord::InEdgesQuery { vertex_id: vertex },
        QueryKind::TwoHop => IngressRecord::TwoHopQuery { vertex_id: vertex },
        QueryKind::Window => IngressRecord::TimeWindowQuery {
            vertex_id: vertex,
            start: start.context("--start is required for window queries")?,
            end: end.context("--end is required for window queries")?,
        },
    };

    // Printed here rather than appended to the configured egress sink
    let runtime = super::build_runtime(config, Arc::new(MemorySink::new()))?;
    let egress = runtime
        .query(&record)?
        .context("Query produced no result")?;

    println!("{}", encode_egress(&egress)?);
    Ok(())
}
