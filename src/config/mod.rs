//! Configuration module for Sumi-Scrape
//!
//! This module handles loading TOML configuration files, layering
//! command-line overrides on top, and validating the result once before
//! the crawler is constructed.
//!
//! # Example
//!
//! ```no_run
//! use sumi_scrape::config::{resolve_config, PartialConfig};
//! use std::path::Path;
//!
//! let config = resolve_config(Some(Path::new("scrape.toml")), PartialConfig::default()).unwrap();
//! println!("Scraper will stop after {} pages", config.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, LogLevel, PartialConfig, DEFAULT_FILE_NAME, DEFAULT_MAX_DEPTH, DEFAULT_OUTPUT_DIR,
};

// Re-export parser and validation functions
pub use parser::{load_config, load_config_file, parse_sublinks, resolve_config};
pub use validation::{build_config, validate};
