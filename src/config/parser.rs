use crate::config::types::{Config, PartialConfig};
use crate::config::validation::build_config;
use crate::ConfigError;
use std::path::Path;

/// Loads unvalidated configuration values from a TOML file
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(PartialConfig)` - Successfully read and parsed values
/// * `Err(ConfigError)` - Failed to read or parse the file
pub fn load_config_file(path: &Path) -> Result<PartialConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let partial: PartialConfig = toml::from_str(&content)?;
    Ok(partial)
}

/// Loads and validates a configuration file on its own
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sumi_scrape::config::load_config;
///
/// let config = load_config(Path::new("scrape.toml")).unwrap();
/// println!("Max depth: {}", config.max_depth);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    build_config(load_config_file(path)?)
}

/// Resolves the effective configuration from an optional file and overrides
///
/// Values set in `overrides` (typically command-line flags) take precedence
/// over values read from the file. The result is validated.
pub fn resolve_config(
    file: Option<&Path>,
    overrides: PartialConfig,
) -> Result<Config, ConfigError> {
    let base = match file {
        Some(path) => load_config_file(path)?,
        None => PartialConfig::default(),
    };
    build_config(base.merge(overrides))
}

/// Splits a comma-separated sublink list, dropping blank entries
///
/// ```
/// use sumi_scrape::config::parse_sublinks;
///
/// assert_eq!(parse_sublinks("docs, api ,,"), vec!["docs", "api"]);
/// assert!(parse_sublinks("").is_empty());
/// ```
pub fn parse_sublinks(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
