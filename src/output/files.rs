//! File-backed sinks
//!
//! The primary sink is truncated when it is opened and then only appended to.
//! Selector data goes to `data_<selector>.txt` next to it, one header per run
//! followed by one delimited record per page.

use crate::output::traits::{OutputError, OutputResult, PrimarySink, SelectorSink};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Width of the `=` rule around each record header
const RULE_WIDTH: usize = 80;

/// Primary sink appending raw page bytes to one file
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    /// Creates (or truncates) the file at `path`, creating parent directories
    pub fn create(path: impl Into<PathBuf>) -> OutputResult<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| OutputError::io(parent, e))?;
        }

        File::create(&path).map_err(|e| OutputError::io(&path, e))?;
        tracing::debug!("Initialized HTML file: {}", path.display());

        Ok(Self { path })
    }
}

impl PrimarySink for FileSink {
    fn append(&mut self, data: &[u8]) -> OutputResult<()> {
        append_to(&self.path, data)?;
        tracing::debug!("Wrote {} bytes to {}", data.len(), self.path.display());
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

/// Selector sink writing one `data_<selector>.txt` per selector
#[derive(Debug)]
pub struct SelectorFileSink {
    dir: PathBuf,
}

impl SelectorFileSink {
    /// Creates a sink writing into `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the data file for `selector`
    pub fn data_path(&self, selector: &str) -> PathBuf {
        let safe: String = selector
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        self.dir.join(format!("data_{}.txt", safe))
    }
}

impl SelectorSink for SelectorFileSink {
    fn initialize(&mut self, selector: &str) -> OutputResult<()> {
        fs::create_dir_all(&self.dir).map_err(|e| OutputError::io(&self.dir, e))?;

        let path = self.data_path(selector);
        let header = format_header(selector, chrono::Local::now().naive_local());
        fs::write(&path, header).map_err(|e| OutputError::io(&path, e))?;

        tracing::debug!("Initialized data file: {}", path.display());
        Ok(())
    }

    fn append(&mut self, selector: &str, url: &str, data: &str) -> OutputResult<()> {
        let path = self.data_path(selector);
        append_to(&path, format_record(url, data).as_bytes())?;

        tracing::debug!(
            "Wrote {} chars of extracted data to {}",
            data.len(),
            path.display()
        );
        Ok(())
    }
}

/// Header written once when a selector file is initialized
pub fn format_header(selector: &str, started_at: chrono::NaiveDateTime) -> String {
    format!(
        "Extracted data for selector '{}'\nStarted at: {}\n\n",
        selector,
        started_at.format("%Y-%m-%d %H:%M:%S")
    )
}

/// One delimited record for text extracted from `url`
pub fn format_record(url: &str, data: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!("\n{rule}\nPAGE: {url}\n{rule}\n\n{data}\n")
}

fn append_to(path: &Path, data: &[u8]) -> OutputResult<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| OutputError::io(path, e))?;
    file.write_all(data).map_err(|e| OutputError::io(path, e))
}
