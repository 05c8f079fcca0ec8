//! HTTP fetcher implementation
//!
//! This module handles every network request the scraper makes:
//! - Building an HTTP client with an identifying user agent
//! - GET requests returning the raw response body
//! - Classifying transport failures
//!
//! There is no retry: any failure is reported once and the caller abandons
//! the URL.

use crate::FetchError;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("sumi-scrape/", env!("CARGO_PKG_VERSION"));

/// Maximum redirect hops followed for one request
const MAX_REDIRECTS: usize = 10;

/// Retrieves the raw body of a URL
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Builds an HTTP client with the scraper's defaults
///
/// # Example
///
/// ```no_run
/// use sumi_scrape::crawler::build_http_client;
///
/// let client = build_http_client().unwrap();
/// ```
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`Fetcher`] backed by a `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a client from [`build_http_client`]
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client()?))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        tracing::info!("Fetching URL: {}", url);

        let parsed = url::Url::parse(url)?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(FetchError::from_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;

        tracing::debug!("Successfully fetched {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }
}
