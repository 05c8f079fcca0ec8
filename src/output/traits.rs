//! Output traits and types
//!
//! This module defines the sink and converter interfaces the coordinator
//! writes through, plus the summary returned at the end of a run.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to convert {path}: {message}")]
    Convert { path: PathBuf, message: String },
}

impl OutputError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Append-only target receiving every fetched page
pub trait PrimarySink {
    /// Appends raw page bytes
    fn append(&mut self, data: &[u8]) -> OutputResult<()>;

    /// Location of the accumulated output
    fn path(&self) -> &Path;
}

/// Append-only target receiving selector-extracted text
pub trait SelectorSink {
    /// Writes the header for `selector`, once per run
    fn initialize(&mut self, selector: &str) -> OutputResult<()>;

    /// Appends one record of text extracted from `url`
    fn append(&mut self, selector: &str, url: &str, data: &str) -> OutputResult<()>;
}

/// Whole-document transform applied to the primary output after the run
#[async_trait]
pub trait Converter: Send + Sync {
    /// Converts the document at `source`, returning the path written
    async fn convert(&self, source: &Path) -> OutputResult<PathBuf>;
}

/// Summary of a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Pages fetched and persisted
    pub processed: u64,

    /// Final traversal depth
    pub depth: u32,

    /// Configured depth ceiling
    pub max_depth: u32,

    /// Entries ever admitted to the frontier
    pub visited: usize,

    /// Entries still queued when the run stopped
    pub queued: usize,

    /// Entries skipped as external
    pub skipped_external: u64,

    /// Entries abandoned after an error
    pub failed: u64,

    /// Pages whose configured selector yielded data
    pub extracted: u64,

    /// Pages that fell back to the body
    pub fallback_extracted: u64,

    /// Markdown file written at the end, if conversion succeeded
    pub converted_path: Option<PathBuf>,

    /// Whether the run stopped on cancellation
    pub cancelled: bool,
}

impl CrawlSummary {
    /// Creates a new empty crawl summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries that reached the fetch stage
    pub fn attempted(&self) -> u64 {
        self.processed + self.failed
    }

    /// Returns the success rate as a percentage of attempted entries
    pub fn success_rate(&self) -> f64 {
        let attempted = self.attempted();
        if attempted == 0 {
            return 0.0;
        }
        (self.processed as f64 / attempted as f64) * 100.0
    }

    /// True if the run stopped because the depth ceiling was reached
    pub fn hit_depth_limit(&self) -> bool {
        self.depth >= self.max_depth
    }
}
