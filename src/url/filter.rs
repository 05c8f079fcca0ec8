use once_cell::sync::Lazy;
use regex::Regex;

/// Matches an absolute http(s) scheme at the start of a link
static SCHEME_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://").expect("valid scheme regex"));

/// Link admission policy for a single run
///
/// Holds the substring allow-list applied to discovered links and the base
/// URL used both for the in-domain check and to resolve relative paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkFilter {
    sublink_patterns: Vec<String>,
    base_url: String,
}

impl LinkFilter {
    /// Creates a filter from the configured patterns and base URL
    pub fn new(sublink_patterns: Vec<String>, base_url: impl Into<String>) -> Self {
        Self {
            sublink_patterns,
            base_url: base_url.into(),
        }
    }

    /// The configured substring patterns
    pub fn sublink_patterns(&self) -> &[String] {
        &self.sublink_patterns
    }

    /// The configured base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Keeps the links that contain at least one sublink pattern
    ///
    /// With no patterns configured every link passes untouched, empty strings
    /// included. Otherwise empty links are dropped and matching is plain
    /// case-sensitive substring containment.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_scrape::url::LinkFilter;
    ///
    /// let filter = LinkFilter::new(vec!["docs".to_string()], "https://example.com");
    /// let links = vec!["/docs/a".to_string(), "/blog/b".to_string(), String::new()];
    /// assert_eq!(filter.filter_by_sublinks(links), vec!["/docs/a".to_string()]);
    /// ```
    pub fn filter_by_sublinks(&self, links: Vec<String>) -> Vec<String> {
        if self.sublink_patterns.is_empty() {
            return links;
        }

        links
            .into_iter()
            .filter(|link| {
                !link.is_empty()
                    && self
                        .sublink_patterns
                        .iter()
                        .any(|pattern| link.contains(pattern.as_str()))
            })
            .collect()
    }

    /// Returns true if the link belongs to the crawled site
    ///
    /// Absolute http(s) links must contain the base URL. Anything without a
    /// scheme prefix is a relative path and is always accepted.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_scrape::url::LinkFilter;
    ///
    /// let filter = LinkFilter::new(vec![], "example.com");
    /// assert!(filter.is_in_domain("https://example.com/x"));
    /// assert!(filter.is_in_domain("/relative/x"));
    /// assert!(!filter.is_in_domain("https://other.com/x"));
    /// ```
    pub fn is_in_domain(&self, link: &str) -> bool {
        if has_scheme_prefix(link) && !link.contains(self.base_url.as_str()) {
            tracing::debug!(link = %link, "Filtering out external domain");
            return false;
        }
        true
    }

    /// Resolves a frontier entry to an absolute URL
    ///
    /// Entries that already carry `http://` or `https://` anywhere are returned
    /// unchanged. Anything else is appended to the base URL as-is, without
    /// normalizing slashes or encoding.
    pub fn resolve(&self, path: &str) -> String {
        if path.contains("https://") || path.contains("http://") {
            return path.to_string();
        }
        format!("{}{}", self.base_url, path)
    }
}

/// Returns true if `link` starts with `http://` or `https://`
pub fn has_scheme_prefix(link: &str) -> bool {
    SCHEME_PREFIX.is_match(link)
}
