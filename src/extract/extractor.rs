//! Link and selector-text extraction
//!
//! This module pulls two things out of a parsed page:
//! - every `href` of every `<a>` element, unfiltered and in document order
//! - the text addressed by a class, id or tag selector, with special handling
//!   for `<main>` so that site chrome does not leak into the result

use crate::extract::document::{DocumentError, DocumentTree, Query};
use crate::extract::selector::{ExtractionTarget, SelectorKind};
use once_cell::sync::Lazy;
use regex::Regex;

/// Selector tried when the configured one yields nothing usable
pub const FALLBACK_SELECTOR: &str = "body";

/// Class marking the canonical content region inside `<main>`
pub const DEFAULT_CONTENT_CLASS: &str = "td-content";

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Extracts links and selector-targeted text from a [`DocumentTree`]
#[derive(Debug, Clone)]
pub struct Extractor {
    content_class: String,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(DEFAULT_CONTENT_CLASS)
    }
}

impl Extractor {
    /// Creates an extractor preferring `content_class` inside `<main>`
    pub fn new(content_class: impl Into<String>) -> Self {
        Self {
            content_class: content_class.into(),
        }
    }

    /// Returns every non-empty `href` on `<a>` elements, in document order
    ///
    /// No resolution or filtering happens here; relative paths, fragments and
    /// foreign schemes are returned exactly as written.
    pub fn extract_links<D: DocumentTree>(&self, doc: &D) -> Vec<String> {
        let anchors = match doc.find_all(&Query::Tag("a".to_string())) {
            Ok(anchors) => anchors,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to query anchors");
                return Vec::new();
            }
        };

        let links: Vec<String> = anchors
            .into_iter()
            .filter_map(|node| doc.attribute(node, "href"))
            .filter(|href| !href.is_empty())
            .collect();

        tracing::debug!("Extracted {} links from HTML", links.len());
        links
    }

    /// Extracts the text addressed by `selector`
    ///
    /// # Returns
    ///
    /// * `Some(text)` - a match was found; for class and id selectors the text
    ///   may be empty when nothing matched
    /// * `None` - a tag selector matched no element, or the query failed
    ///
    /// Callers should treat `None` and blank text alike as "no data".
    /// Extraction may detach navigation nodes from `doc`.
    pub fn extract_by_selector<D: DocumentTree>(
        &self,
        doc: &mut D,
        selector: &str,
    ) -> Option<String> {
        let target = ExtractionTarget::new(selector);

        match self.try_extract(doc, &target) {
            Ok(data) => data,
            Err(e) => {
                tracing::error!(
                    selector = %selector,
                    error = %e,
                    "Error extracting data with selector"
                );
                None
            }
        }
    }

    fn try_extract<D: DocumentTree>(
        &self,
        doc: &mut D,
        target: &ExtractionTarget,
    ) -> Result<Option<String>, DocumentError> {
        match target.kind() {
            SelectorKind::Class => {
                let texts: Vec<String> = doc
                    .find_all(&target.query())?
                    .into_iter()
                    .map(|node| doc.text_content(node, true))
                    .collect();
                Ok(Some(texts.join("\n")))
            }
            SelectorKind::Id => {
                let text = doc
                    .find(&target.query())?
                    .map(|node| doc.text_content(node, true))
                    .unwrap_or_default();
                Ok(Some(text))
            }
            SelectorKind::Tag => {
                let Some(element) = doc.find(&target.query())? else {
                    tracing::warn!(selector = %target, "No element found for selector");
                    return Ok(None);
                };

                tracing::debug!(
                    "Found element {} with {} chars of text",
                    target.name(),
                    doc.text_content(element, false).len()
                );

                let text = if target.name() == "main" {
                    self.extract_from_main(doc, element)?
                } else {
                    doc.text_content(element, true)
                };

                let cleaned = collapse_whitespace(&text);
                tracing::debug!("Extracted {} chars after cleaning", cleaned.len());
                Ok(Some(cleaned))
            }
        }
    }

    /// Text of a `<main>` element without navigation chrome
    ///
    /// A nested content `<div>` wins outright. Otherwise a breadcrumb `<nav>`
    /// is detached before the whole element is read.
    fn extract_from_main<D: DocumentTree>(
        &self,
        doc: &mut D,
        main: D::Node,
    ) -> Result<String, DocumentError> {
        let content_query = Query::TagWithClass {
            tag: "div".to_string(),
            class: self.content_class.clone(),
        };

        if let Some(content) = doc.find_in(main, &content_query)? {
            tracing::debug!("Found {} div, extracting from there", self.content_class);
            return Ok(doc.text_content(content, true));
        }

        let breadcrumb_query = Query::TagWithAttr {
            tag: "nav".to_string(),
            name: "aria-label".to_string(),
            value: "breadcrumb".to_string(),
        };

        if let Some(breadcrumb) = doc.find_in(main, &breadcrumb_query)? {
            doc.remove(breadcrumb);
        }

        Ok(doc.text_content(main, true))
    }
}

/// Returns the trimmed text if it carries anything besides whitespace
pub fn usable_text(data: Option<&str>) -> Option<&str> {
    data.map(str::trim).filter(|s| !s.is_empty())
}

/// Collapses every whitespace run to one space and trims the ends
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}
