use crate::config::types::{
    Config, LogLevel, PartialConfig, DEFAULT_FILE_NAME, DEFAULT_MAX_DEPTH, DEFAULT_OUTPUT_DIR,
};
use crate::ConfigError;
use std::path::{Path, PathBuf};
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_base_url(&config.url)?;
    validate_output(config)?;
    validate_max_depth(i64::from(config.max_depth))?;
    validate_selector(config.target_selector.as_deref())?;
    Ok(())
}

/// Builds a validated [`Config`] from unvalidated values, applying defaults
pub fn build_config(partial: PartialConfig) -> Result<Config, ConfigError> {
    let url = partial
        .url
        .ok_or_else(|| ConfigError::Validation("URL is required".to_string()))?;

    let max_depth = validate_max_depth(partial.max_depth.unwrap_or(DEFAULT_MAX_DEPTH.into()))?;

    let log_level = match partial.log_level {
        Some(level) => level.parse::<LogLevel>()?,
        None => LogLevel::default(),
    };

    let sublinks = partial
        .sublinks
        .unwrap_or_default()
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let config = Config {
        url,
        file_name: partial
            .file_name
            .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string()),
        output_dir: partial
            .output_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
        sublinks,
        sub_path: partial.sub_path.unwrap_or_default(),
        max_depth,
        target_selector: partial.target_selector,
        log_level,
    };

    validate(&config)?;
    Ok(config)
}

/// Validates the base URL: required, http(s) scheme, parseable
fn validate_base_url(url: &str) -> Result<(), ConfigError> {
    if url.is_empty() {
        return Err(ConfigError::Validation("URL is required".to_string()));
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "URL must start with http:// or https://, got '{}'",
            url
        )));
    }

    Url::parse(url).map_err(|e| ConfigError::InvalidUrl(format!("'{}': {}", url, e)))?;

    Ok(())
}

/// Validates output locations
fn validate_output(config: &Config) -> Result<(), ConfigError> {
    if config.file_name.is_empty() {
        return Err(ConfigError::Validation(
            "file_name cannot be empty".to_string(),
        ));
    }

    // The markdown conversion writes a sibling `.md` file next to the capture.
    if Path::new(&config.file_name)
        .extension()
        .is_some_and(|ext| ext == "md")
    {
        return Err(ConfigError::Validation(format!(
            "file_name '{}' would collide with the markdown output",
            config.file_name
        )));
    }

    if config.output_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the depth ceiling and narrows it to `u32`
fn validate_max_depth(max_depth: i64) -> Result<u32, ConfigError> {
    if max_depth < 1 {
        return Err(ConfigError::Validation(format!(
            "max_depth must be at least 1, got {}",
            max_depth
        )));
    }

    u32::try_from(max_depth).map_err(|_| {
        ConfigError::Validation(format!("max_depth is too large, got {}", max_depth))
    })
}

/// A configured selector must carry a name
fn validate_selector(selector: Option<&str>) -> Result<(), ConfigError> {
    if let Some(selector) = selector {
        if selector.trim().is_empty() {
            return Err(ConfigError::Validation(
                "target_selector cannot be empty when given".to_string(),
            ));
        }
    }
    Ok(())
}
