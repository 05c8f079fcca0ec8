//! Extraction module for parsed pages
//!
//! This module contains:
//! - The narrow document interface the extractor depends on
//! - An adapter implementing it over `scraper`
//! - Selector classification
//! - Link and selector-text extraction

mod document;
mod extractor;
mod selector;

pub use document::{DocumentError, DocumentTree, HtmlDocument, Query};
pub use extractor::{
    collapse_whitespace, usable_text, Extractor, DEFAULT_CONTENT_CLASS, FALLBACK_SELECTOR,
};
pub use selector::{ExtractionTarget, SelectorKind};
