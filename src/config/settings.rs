//! Runtime settings for vertex-actors
//!
//! Loaded from, in order of priority:
//! 1. Environment variables (`VERTEX_ACTORS_STORE_PATH`, `VERTEX_ACTORS_WORKERS`)
//! 2. `vertex-actors.toml` in the working directory (or an explicit `--config`)
//! 3. `~/.config/vertex-actors/config.toml`
//!
//! CLI flags are applied on top by the binary.
//!
//! # Configuration Format
//!
//! ```toml
//! [store]
//! backend = "redb"          # or "memory"
//! path = ".vertex-actors"
//!
//! [runtime]
//! workers = 4
//! channel_capacity = 1024
//!
//! [routing]
//! time_windows = [[0, 100], [100, 200]]
//! two_hop = true
//! time_window = true
//!
//! [egress]
//! sink = "stdout"           # or a file path
//! ```

use crate::router::TimeWindow;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name looked up in the working directory
pub const CONFIG_FILE: &str = "vertex-actors.toml";

/// Example written by `vertex-actors init`
pub const EXAMPLE_CONFIG: &str = r#"# vertex-actors configuration

[store]
# Where actor state lives: "redb" (durable) or "memory" (process lifetime only)
backend = "redb"
# Directory holding state.redb
path = ".vertex-actors"

[runtime]
# Worker shards; messages for one actor always run on the same shard
workers = 4
# Envelopes buffered per shard before the reader blocks
channel_capacity = 1024

[routing]
# Each [start, end] pair is a separate time-window actor per source vertex.
# Every edge of that vertex is delivered to every window instance.
time_windows = []
two_hop = true
time_window = true

[egress]
# "stdout" or a file path (JSON lines, appended)
sink = "stdout"
"#;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub runtime: RuntimeConfig,

    #[serde(default)]
    pub routing: RoutingConfig,

    #[serde(default)]
    pub egress: EgressConfig,
}

/// State store backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    #[default]
    Redb,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Redb,
            path: PathBuf::from(".vertex-actors"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub workers: usize,
    pub channel_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            channel_capacity: 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub time_windows: Vec<TimeWindow>,
    /// Deliver edge events to two-hop actors
    pub two_hop: bool,
    /// Deliver edge events to time-window actors
    pub time_window: bool,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            time_windows: Vec::new(),
            two_hop: true,
            time_window: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EgressConfig {
    pub sink: String,
}

impl Default for EgressConfig {
    fn default() -> Self {
        Self {
            sink: "stdout".to_string(),
        }
    }
}

impl Config {
    /// Load config from all sources.
    ///
    /// An explicit path must exist and parse. Implicit locations fall back
    /// to defaults with a warning when they fail to parse.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => load_toml_config(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => load_implicit_config(Path::new(".")),
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Environment variables override file values
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("VERTEX_ACTORS_STORE_PATH") {
            self.store.path = PathBuf::from(path);
        }
        if let Ok(workers) = std::env::var("VERTEX_ACTORS_WORKERS") {
            match workers.parse::<usize>() {
                Ok(n) if n > 0 => self.runtime.workers = n,
                _ => warn!("Ignoring invalid VERTEX_ACTORS_WORKERS={:?}", workers),
            }
        }
    }

    /// Get the user config path (~/.config/vertex-actors/config.toml)
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("vertex-actors").join("config.toml"))
    }
}

/// Look in `dir`, then the user config directory; defaults if neither loads
pub fn load_implicit_config(dir: &Path) -> Config {
    let candidates = std::iter::once(dir.join(CONFIG_FILE)).chain(Config::user_config_path());

    for path in candidates {
        if !path.exists() {
            continue;
        }
        match load_toml_config(&path) {
            Ok(config) => {
                debug!("Loaded config from {}", path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", path.display(), e);
            }
        }
    }

    debug!("No config found, using defaults");
    Config::default()
}

/// Load configuration from a TOML file
fn load_toml_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.store.backend, StoreBackend::Redb);
        assert_eq!(config.runtime.workers, 4);
        assert!(config.routing.two_hop);
        assert!(config.routing.time_windows.is_empty());
        assert_eq!(config.egress.sink, "stdout");
    }

    #[test]
    fn test_example_config_parses() {
        let config: Config = toml::from_str(EXAMPLE_CONFIG).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
[store]
backend = "memory"

[routing]
time_windows = [[0, 100], [100, 200]]
"#,
        )
        .unwrap();
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.store.path, PathBuf::from(".vertex-actors"));
        assert_eq!(config.routing.time_windows.len(), 2);
        assert_eq!(config.routing.time_windows[1], TimeWindow { start: 100, end: 200 });
        assert!(config.routing.time_window);
        assert_eq!(config.runtime.channel_capacity, 1024);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn test_implicit_invalid_file_falls_back() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[store\nbroken").unwrap();
        let config = load_implicit_config(dir.path());
        assert_eq!(config.runtime, RuntimeConfig::default());
    }

    #[test]
    fn test_implicit_file_in_dir_is_used() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[runtime]\nworkers = 2\n").unwrap();
        assert_eq!(load_implicit_config(dir.path()).runtime.workers, 2);
    }
}
