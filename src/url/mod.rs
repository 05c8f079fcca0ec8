//! URL handling module for Sumi-Scrape
//!
//! This module decides which discovered links are admitted into the frontier
//! (substring allow-list), which dequeued entries belong to the crawled site
//! (domain check), and how frontier entries become absolute URLs.

mod filter;

pub use filter::{has_scheme_prefix, LinkFilter};
