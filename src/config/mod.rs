//! Configuration module for Espi-Watch
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every field has a default, so a missing section falls back to the public
//! listing server and the standard checkpoint location.
//!
//! # Example
//!
//! ```no_run
//! use espi_watch::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("espi-watch.toml")).unwrap();
//! println!("Checkpoint stored at: {}", config.checkpoint.path);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CheckpointConfig, Config, FetchConfig, ListingConfig, MalformedRowPolicy, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{load_config, parse_config};
