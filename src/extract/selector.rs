use crate::extract::document::Query;
use std::fmt;

/// The three selector shapes understood by the extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectorKind {
    /// `.name`
    Class,
    /// `#name`
    Id,
    /// bare tag name
    Tag,
}

impl SelectorKind {
    /// Classifies a selector by its leading character
    ///
    /// ```
    /// use sumi_scrape::extract::SelectorKind;
    ///
    /// assert_eq!(SelectorKind::classify(".foo"), SelectorKind::Class);
    /// assert_eq!(SelectorKind::classify("#foo"), SelectorKind::Id);
    /// assert_eq!(SelectorKind::classify("foo"), SelectorKind::Tag);
    /// ```
    pub fn classify(selector: &str) -> Self {
        if selector.starts_with('.') {
            Self::Class
        } else if selector.starts_with('#') {
            Self::Id
        } else {
            Self::Tag
        }
    }
}

impl fmt::Display for SelectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Class => "class",
            Self::Id => "id",
            Self::Tag => "tag",
        };
        f.write_str(name)
    }
}

/// A classified extraction selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionTarget {
    selector: String,
    kind: SelectorKind,
}

impl ExtractionTarget {
    pub fn new(selector: impl Into<String>) -> Self {
        let selector = selector.into();
        let kind = SelectorKind::classify(&selector);
        Self { selector, kind }
    }

    /// The selector as configured
    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn kind(&self) -> SelectorKind {
        self.kind
    }

    /// The selector with its `.` or `#` prefix stripped
    pub fn name(&self) -> &str {
        match self.kind {
            SelectorKind::Class => self.selector.strip_prefix('.').unwrap_or(&self.selector),
            SelectorKind::Id => self.selector.strip_prefix('#').unwrap_or(&self.selector),
            SelectorKind::Tag => &self.selector,
        }
    }

    /// The document query matching this selector
    pub fn query(&self) -> Query {
        let name = self.name().to_string();
        match self.kind {
            SelectorKind::Class => Query::Class(name),
            SelectorKind::Id => Query::Id(name),
            SelectorKind::Tag => Query::Tag(name),
        }
    }
}

impl fmt::Display for ExtractionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.selector)
    }
}
