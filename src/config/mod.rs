//! Configuration module for vertex-actors
//!
//! This module handles:
//! - Store backend and location
//! - Runtime sharding
//! - Ingress routing (time-window instances, role toggles)
//! - Egress sink selection

mod settings;

pub use settings::{
    load_implicit_config,
    Config,
    EgressConfig,
    RoutingConfig,
    RuntimeConfig,
    StoreBackend,
    StoreConfig,
    CONFIG_FILE,
    EXAMPLE_CONFIG,
};
