use crate::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Default name of the HTML capture file
pub const DEFAULT_FILE_NAME: &str = "output.html";

/// Default directory for all output files
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Default traversal ceiling
pub const DEFAULT_MAX_DEPTH: u32 = 10;

/// Validated configuration for a scrape run
///
/// Instances produced by [`crate::config::resolve_config`] are already
/// validated. Hand-built instances should go through [`crate::config::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the site; relative paths are appended to it verbatim
    pub url: String,

    /// Name of the HTML capture file inside `output_dir`
    pub file_name: String,

    /// Directory receiving the capture, markdown and selector data files
    pub output_dir: PathBuf,

    /// Substrings a discovered link must contain (empty = accept all)
    pub sublinks: Vec<String>,

    /// Starting path, seeded into the frontier
    pub sub_path: String,

    /// Maximum number of successfully processed pages
    pub max_depth: u32,

    /// Optional selector for text extraction (`.class`, `#id` or `tag`)
    pub target_selector: Option<String>,

    /// Log verbosity
    pub log_level: LogLevel,
}

impl Config {
    /// Creates a configuration for `url` with every other field defaulted
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            file_name: DEFAULT_FILE_NAME.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            sublinks: Vec::new(),
            sub_path: String::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            target_selector: None,
            log_level: LogLevel::Info,
        }
    }

    /// Full path of the HTML capture file
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.file_name)
    }
}

/// Log verbosity accepted by the configuration surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// Returns the configuration spelling of this level
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }

    /// Returns the `tracing` filter level for this verbosity
    pub fn filter_level(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warn",
            Self::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEBUG" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "WARNING" => Ok(Self::Warning),
            "ERROR" => Ok(Self::Error),
            other => Err(ConfigError::InvalidLogLevel(other.to_string())),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unvalidated configuration values from a TOML file or the command line
///
/// Every field is optional so that a file can provide a base and explicit
/// command-line flags can override it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PartialConfig {
    pub url: Option<String>,
    pub file_name: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub sublinks: Option<Vec<String>>,
    pub sub_path: Option<String>,
    pub max_depth: Option<i64>,
    pub target_selector: Option<String>,
    pub log_level: Option<String>,
}

impl PartialConfig {
    /// Layers `overrides` on top of `self`; set fields in `overrides` win
    pub fn merge(self, overrides: PartialConfig) -> PartialConfig {
        PartialConfig {
            url: overrides.url.or(self.url),
            file_name: overrides.file_name.or(self.file_name),
            output_dir: overrides.output_dir.or(self.output_dir),
            sublinks: overrides.sublinks.or(self.sublinks),
            sub_path: overrides.sub_path.or(self.sub_path),
            max_depth: overrides.max_depth.or(self.max_depth),
            target_selector: overrides.target_selector.or(self.target_selector),
            log_level: overrides.log_level.or(self.log_level),
        }
    }
}
