//! Markdown conversion of the HTML capture
//!
//! After a run the accumulated HTML capture is rendered to markdown-flavoured
//! text and written next to it with the extension swapped to `.md`.

use crate::output::traits::{Converter, OutputError, OutputResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Default line width for rendered text
pub const DEFAULT_WIDTH: usize = 100;

/// Converts the HTML capture to markdown with `html2text`
#[derive(Debug, Clone)]
pub struct MarkdownConverter {
    width: usize,
}

impl Default for MarkdownConverter {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH)
    }
}

impl MarkdownConverter {
    /// Creates a converter wrapping lines at `width` columns
    pub fn new(width: usize) -> Self {
        Self { width }
    }
}

#[async_trait]
impl Converter for MarkdownConverter {
    async fn convert(&self, source: &Path) -> OutputResult<PathBuf> {
        tracing::info!("Converting {} to markdown", source.display());

        let target = markdown_path(source)?;
        let html = tokio::fs::read(source)
            .await
            .map_err(|e| OutputError::io(source, e))?;

        let markdown = render_markdown(&html, self.width);

        tokio::fs::write(&target, markdown)
            .await
            .map_err(|e| OutputError::io(&target, e))?;

        tracing::info!("Markdown conversion saved to {}", target.display());
        Ok(target)
    }
}

/// Renders HTML bytes as markdown-flavoured text
pub fn render_markdown(html: &[u8], width: usize) -> String {
    html2text::from_read(html, width)
}

/// Sibling path of `source` with the extension swapped to `.md`
pub fn markdown_path(source: &Path) -> OutputResult<PathBuf> {
    let target = source.with_extension("md");
    if target == source {
        return Err(OutputError::Convert {
            path: source.to_path_buf(),
            message: "source already has the .md extension".to_string(),
        });
    }
    Ok(target)
}
