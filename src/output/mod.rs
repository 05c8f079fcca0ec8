//! Output module for persisting scrape results
//!
//! This module handles:
//! - Appending fetched pages to the HTML capture file
//! - Writing selector-extracted text to per-selector data files
//! - Converting the capture to markdown once the run ends
//! - Summarizing the run

mod files;
mod markdown;
pub mod stats;
mod traits;

pub use files::{format_header, format_record, FileSink, SelectorFileSink};
pub use markdown::{markdown_path, render_markdown, MarkdownConverter};
pub use stats::{format_summary, print_summary};
pub use traits::{
    Converter, CrawlSummary, OutputError, OutputResult, PrimarySink, SelectorSink,
};
