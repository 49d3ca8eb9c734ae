//! CLI command definitions and handlers

mod init;
mod query;
mod run;
mod state;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use vertex_actors::config::{Config, StoreBackend};
use vertex_actors::models::{Timestamp, VertexId};
use vertex_actors::router::Router;
use vertex_actors::runtime::{EgressSink, JsonLinesSink, Runtime};
use vertex_actors::store::{MemoryStateStore, RedbStateStore, StateStore};

/// Parse and validate workers count (1-64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > 64 {
        Err("workers cannot exceed 64".to_string())
    } else {
        Ok(n)
    }
}

/// vertex-actors - per-vertex actors over a timestamped edge stream
#[derive(Parser, Debug)]
#[command(name = "vertex-actors")]
#[command(
    version,
    about = "Per-vertex durable actors over a timestamped directed edge stream",
    long_about = "vertex-actors keeps, for every vertex, timestamp-sorted lists of its \
outgoing and incoming neighbors plus an approximate two-hop list, and answers point \
queries against them.\n\n\
Input is JSON lines on a file or stdin; results are JSON lines on stdout or a file.",
    after_help = "\
Examples:
  vertex-actors init                         Write vertex-actors.toml
  vertex-actors run edges.jsonl              Ingest edges and answer queries
  cat stream.jsonl | vertex-actors run       Read records from stdin
  vertex-actors query out 1                  Outgoing edges of vertex 1
  vertex-actors query window 1 --start 0 --end 100
  vertex-actors state 1                      Dump stored state for vertex 1"
)]
pub struct Cli {
    /// Config file (default: ./vertex-actors.toml, then the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// State directory (overrides [store] path)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Keep state in memory for this process only
    #[arg(long, global = true)]
    pub memory: bool,

    /// Number of worker shards (1-64)
    #[arg(long, global = true, value_parser = parse_workers)]
    pub workers: Option<usize>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a vertex-actors.toml with the default settings
    Init {
        /// Directory to write into
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Stream JSON-lines records through the actors
    #[command(after_help = "\
Record types (one JSON object per line):
  {\"type\":\"edge\",\"src\":1,\"dst\":2,\"timestamp\":10}
  {\"type\":\"outEdgesQuery\",\"vertexId\":1}
  {\"type\":\"inEdgesQuery\",\"vertexId\":2}
  {\"type\":\"twoHopQuery\",\"vertexId\":2}
  {\"type\":\"timeWindowQuery\",\"vertexId\":1,\"start\":0,\"end\":100}

Blank lines and lines starting with # are ignored.")]
    Run {
        /// Input file (default: stdin)
        input: Option<PathBuf>,

        /// Abort on the first malformed record
        #[arg(long)]
        strict: bool,

        /// Write egress records here instead of the configured sink
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Ask one actor for its current result
    Query {
        #[arg(value_enum)]
        kind: QueryKind,

        vertex: VertexId,

        /// Window start (window queries)
        #[arg(long, required_if_eq("kind", "window"))]
        start: Option<Timestamp>,

        /// Window end (window queries)
        #[arg(long, required_if_eq("kind", "window"))]
        end: Option<Timestamp>,
    },

    /// Print every stored slot of every actor keyed by VERTEX
    State {
        vertex: VertexId,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Out,
    In,
    TwoHop,
    Window,
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let config = effective_config(&cli)?;

    match cli.command {
        Commands::Init { path, force } => init::run(&path, force),
        Commands::Run {
            input,
            strict,
            output,
        } => run::run(&config, input.as_deref(), strict, output.as_deref()),
        Commands::Query {
            kind,
            vertex,
            start,
            end,
        } => {
            require_durable_store(&config, "query")?;
            query::run(&config, kind, vertex, start, end)
        }
        Commands::State { vertex, json } => {
            require_durable_store(&config, "state")?;
            state::run(&config, vertex, json)
        }
    }
}

/// File config plus global flag overrides
fn effective_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(path) = &cli.store {
        config.store.path = path.clone();
    }
    if cli.memory {
        config.store.backend = StoreBackend::Memory;
    }
    if let Some(workers) = cli.workers {
        config.runtime.workers = workers;
    }
    Ok(config)
}

/// `query` and `state` only read what earlier runs persisted
fn require_durable_store(config: &Config, command: &str) -> Result<()> {
    if config.store.backend == StoreBackend::Memory {
        anyhow::bail!(
            "`{}` reads persisted state, but the memory store starts empty in every process; \
             drop --memory or set [store] backend = \"redb\"",
            command
        );
    }
    Ok(())
}

fn open_store(config: &Config) -> Result<Arc<dyn StateStore>> {
    Ok(match config.store.backend {
        StoreBackend::Memory => Arc::new(MemoryStateStore::new()),
        StoreBackend::Redb => Arc::new(RedbStateStore::open_with_context(&config.store.path)?),
    })
}

fn open_sink(config: &Config, output: Option<&Path>) -> Result<Arc<dyn EgressSink>> {
    let target = match output {
        Some(path) => Some(path.to_path_buf()),
        None if config.egress.sink == "stdout" => None,
        None => Some(PathBuf::from(&config.egress.sink)),
    };
    Ok(match target {
        None => Arc::new(JsonLinesSink::stdout()),
        Some(path) => Arc::new(
            JsonLinesSink::append_to(&path)
                .with_context(|| format!("Failed to open egress file {}", path.display()))?,
        ),
    })
}

fn build_runtime(config: &Config, sink: Arc<dyn EgressSink>) -> Result<Runtime> {
    let store = open_store(config)?;
    Ok(Runtime::new(store, sink, Router::from_config(&config.routing)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_rejected_for_reads() {
        let mut config = Config::default();
        assert!(require_durable_store(&config, "query").is_ok());

        config.store.backend = StoreBackend::Memory;
        let err = require_durable_store(&config, "state").unwrap_err();
        assert!(err.to_string().contains("--memory"));
    }

    #[test]
    fn test_parse_workers() {
        assert_eq!(parse_workers("4"), Ok(4));
        assert!(parse_workers("0").is_err());
        assert!(parse_workers("65").is_err());
        assert!(parse_workers("x").is_err());
    }

    #[test]
    fn test_window_query_requires_range() {
        assert!(Cli::try_parse_from(["vertex-actors", "query", "window", "1"]).is_err());
        let cli = Cli::try_parse_from([
            "vertex-actors", "query", "window", "1", "--start", "0", "--end", "10",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Query {
                kind: QueryKind::Window,
                vertex: 1,
                start: Some(0),
                end: Some(10)
            }
        ));
    }

    #[test]
    fn test_global_overrides() {
        let cli = Cli::try_parse_from(["vertex-actors", "state", "3", "--memory", "--workers", "2"])
            .unwrap();
        assert!(cli.memory);
        assert_eq!(cli.workers, Some(2));
    }

    #[test]
    fn test_two_hop_kind_name() {
        let cli = Cli::try_parse_from(["vertex-actors", "query", "two-hop", "5"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Query {
                kind: QueryKind::TwoHop,
                ..
            }
        ));
    }
}
