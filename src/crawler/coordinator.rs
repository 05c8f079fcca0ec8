//! Crawler coordinator - main scrape orchestration logic
//!
//! This module contains the depth-bounded scrape loop. Each iteration:
//! 1. Pops one entry from the frontier
//! 2. Skips it if it points outside the site
//! 3. Fetches the page and appends the raw bytes to the capture file
//! 4. Parses the page, queues newly discovered links
//! 5. Optionally extracts selector text, falling back to the body
//!
//! A failing URL is logged and abandoned; it never stops the run. When the
//! frontier drains, the depth budget is spent, or the run is cancelled, the
//! capture is converted to markdown exactly once.

use crate::config::{validate, Config};
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::frontier::Frontier;
use crate::extract::{usable_text, ExtractionTarget, Extractor, HtmlDocument, FALLBACK_SELECTOR};
use crate::output::{
    Converter, CrawlSummary, FileSink, MarkdownConverter, PrimarySink, SelectorFileSink,
    SelectorSink,
};
use crate::state::{RunPhase, TraversalState};
use crate::url::LinkFilter;
use crate::ScrapeError;
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// Coordinator wired with the production collaborators
pub type DefaultCoordinator =
    Coordinator<HttpFetcher, FileSink, SelectorFileSink, MarkdownConverter>;

/// Main scrape coordinator
///
/// Owns the frontier and traversal counters for the whole run. The fetcher,
/// sinks and converter are supplied by the caller.
pub struct Coordinator<F, P, S, C> {
    fetcher: F,
    primary: P,
    selector_sink: S,
    converter: C,
    frontier: Frontier,
    filter: LinkFilter,
    extractor: Extractor,
    target: Option<ExtractionTarget>,
    seed: String,
    state: TraversalState,
    extracted: u64,
    fallback_extracted: u64,
    cancel: CancellationToken,
}

impl DefaultCoordinator {
    /// Creates a coordinator with HTTP fetching and file output
    ///
    /// The capture file is created (or truncated) here.
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(ScrapeError)` - Invalid configuration, or output could not be created
    pub fn from_config(config: &Config) -> Result<Self, ScrapeError> {
        validate(config)?;

        let fetcher = HttpFetcher::new()?;
        let primary = FileSink::create(config.output_path())?;
        let selector_sink = SelectorFileSink::new(&config.output_dir);

        Ok(Coordinator::new(
            config,
            fetcher,
            primary,
            selector_sink,
            MarkdownConverter::default(),
        ))
    }
}

impl<F, P, S, C> Coordinator<F, P, S, C>
where
    F: Fetcher,
    P: PrimarySink,
    S: SelectorSink,
    C: Converter,
{
    /// Creates a coordinator from a validated configuration and collaborators
    pub fn new(config: &Config, fetcher: F, primary: P, selector_sink: S, converter: C) -> Self {
        Self {
            fetcher,
            primary,
            selector_sink,
            converter,
            frontier: Frontier::new(),
            filter: LinkFilter::new(config.sublinks.clone(), config.url.clone()),
            extractor: Extractor::default(),
            target: config.target_selector.as_deref().map(ExtractionTarget::new),
            seed: config.sub_path.clone(),
            state: TraversalState::new(config.max_depth),
            extracted: 0,
            fallback_extracted: 0,
            cancel: CancellationToken::new(),
        }
    }

    /// Replaces the extractor (for a different content marker class)
    pub fn with_extractor(mut self, extractor: Extractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Replaces the cancellation token
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// A handle that stops the run at the top of the next iteration
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn state(&self) -> &TraversalState {
        &self.state
    }

    /// Runs the scrape to completion
    ///
    /// Per-URL failures are logged and skipped. An error is only returned if
    /// the coordinator is run twice.
    pub async fn run(&mut self) -> Result<CrawlSummary, ScrapeError> {
        let span = tracing::info_span!("crawl", base_url = %self.filter.base_url());
        self.run_loop().instrument(span).await
    }

    async fn run_loop(&mut self) -> Result<CrawlSummary, ScrapeError> {
        self.state.transition(RunPhase::Running)?;

        tracing::info!("Starting web scraper");
        tracing::info!(
            "Configuration: URL={}, File={}, Max depth={}",
            self.filter.base_url(),
            self.primary.path().display(),
            self.state.max_depth()
        );
        tracing::info!("Sublinks filter: {:?}", self.filter.sublink_patterns());
        tracing::info!("Starting path: {}", self.seed);
        tracing::info!(
            "Target selector: {}",
            self.target
                .as_ref()
                .map(ExtractionTarget::selector)
                .unwrap_or("none")
        );

        if let Some(target) = &self.target {
            if let Err(e) = self.selector_sink.initialize(target.selector()) {
                tracing::warn!("Could not initialize data file: {}", e);
            }
        }

        self.frontier.add_links([self.seed.clone()]);
        tracing::info!("Initial queue size: {}", self.frontier.queue_size());

        let mut cancelled = false;

        loop {
            if self.cancel.is_cancelled() {
                tracing::info!("Cancellation requested, stopping");
                cancelled = true;
                break;
            }

            if !self.frontier.has_links() {
                tracing::info!("Frontier is empty, scrape complete");
                break;
            }

            if !self.state.has_budget() {
                tracing::info!(
                    "Reached maximum depth ({}), stopping",
                    self.state.max_depth()
                );
                break;
            }

            let Some(next_path) = self.frontier.get_next() else {
                break;
            };
            tracing::debug!("Next path to process: {}", next_path);

            if !self.filter.is_in_domain(&next_path) {
                tracing::info!("Skipping external domain: {}", next_path);
                self.state.record_skipped();
                self.state.transition(RunPhase::Running)?;
                continue;
            }

            let next_url = self.filter.resolve(&next_path);
            tracing::info!(
                "Processing URL {}/{}: {}",
                self.state.depth() + 1,
                self.state.max_depth(),
                next_url
            );

            match self.process_url(&next_url).await {
                Ok(()) => {
                    self.state.record_success();

                    let processed = self.state.total_processed();
                    if processed % 5 == 0 || self.state.depth() == 1 {
                        tracing::info!(
                            processed,
                            queue = self.frontier.queue_size(),
                            visited = self.frontier.visited_size(),
                            "Progress"
                        );
                    }
                }
                Err(e) => {
                    tracing::error!(url = %next_url, error = %e, "Failed to process URL");
                    self.state.record_failure();
                }
            }

            self.state.transition(RunPhase::Running)?;
        }

        self.state.transition(RunPhase::Draining)?;

        tracing::info!("Converting HTML to Markdown");
        let converted_path = match self.converter.convert(self.primary.path()).await {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::error!("Failed to convert to markdown: {}", e);
                None
            }
        };

        self.state.transition(RunPhase::Done)?;

        tracing::info!(
            "Scraping complete. Processed {} URLs, visited {}, final queue size: {}",
            self.state.total_processed(),
            self.frontier.visited_size(),
            self.frontier.queue_size()
        );

        Ok(CrawlSummary {
            processed: self.state.total_processed(),
            depth: self.state.depth(),
            max_depth: self.state.max_depth(),
            visited: self.frontier.visited_size(),
            queued: self.frontier.queue_size(),
            skipped_external: self.state.skipped_external(),
            failed: self.state.failed(),
            extracted: self.extracted,
            fallback_extracted: self.fallback_extracted,
            converted_path,
            cancelled,
        })
    }

    /// Processes a single URL
    ///
    /// The raw page is persisted before anything can fail on its content.
    /// Any error returned here abandons the URL.
    async fn process_url(&mut self, url: &str) -> Result<(), ScrapeError> {
        tracing::debug!("Processing URL: {}", url);

        self.state.transition(RunPhase::Fetching)?;
        let body = self
            .fetcher
            .fetch(url)
            .await
            .map_err(|source| ScrapeError::Fetch {
                url: url.to_string(),
                source,
            })?;

        self.state.transition(RunPhase::Persisting)?;
        self.primary.append(&body)?;

        self.state.transition(RunPhase::Parsing)?;
        let mut document = HtmlDocument::parse(&body).map_err(|e| ScrapeError::Parse {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        self.state.transition(RunPhase::Extracting)?;
        let links = self.extractor.extract_links(&document);
        tracing::info!("Found {} links on page", links.len());
        self.enqueue_links(links);

        if let Some(target) = self.target.clone() {
            self.extract_target(&mut document, url, &target)?;
        }

        Ok(())
    }

    /// Applies the sublink and domain policy and queues what survives
    fn enqueue_links(&mut self, links: Vec<String>) {
        tracing::debug!("Processing {} total links", links.len());

        let admitted: Vec<String> = self
            .filter
            .filter_by_sublinks(links)
            .into_iter()
            .filter(|link| self.filter.is_in_domain(link))
            .collect();
        tracing::info!("After filtering: {} links match criteria", admitted.len());

        let added = self.frontier.add_links(admitted);
        tracing::info!(
            "Added {} new links. Queue size: {}, Total visited: {}",
            added,
            self.frontier.queue_size(),
            self.frontier.visited_size()
        );
    }

    /// Extracts the configured selector, falling back to the body
    fn extract_target(
        &mut self,
        document: &mut HtmlDocument,
        url: &str,
        target: &ExtractionTarget,
    ) -> Result<(), ScrapeError> {
        let selector = target.selector();

        let data = self.extractor.extract_by_selector(document, selector);
        if let Some(text) = usable_text(data.as_deref()) {
            self.state.transition(RunPhase::Persisting)?;
            self.selector_sink.append(selector, url, text)?;
            self.extracted += 1;
            return Ok(());
        }

        tracing::warn!("No data found for selector: {} on {}", selector, url);

        let fallback = self
            .extractor
            .extract_by_selector(document, FALLBACK_SELECTOR);
        if let Some(text) = usable_text(fallback.as_deref()) {
            self.state.transition(RunPhase::Persisting)?;
            self.selector_sink.append(selector, url, text)?;
            self.fallback_extracted += 1;
        } else {
            tracing::warn!("No data found in body either for {}", url);
        }

        Ok(())
    }
}

/// Runs a complete scrape with the production collaborators
///
/// Ctrl-C cancels the run at the next iteration boundary; the capture is
/// still converted. A second Ctrl-C exits the process immediately.
///
/// # Example
///
/// ```no_run
/// use sumi_scrape::config::Config;
/// use sumi_scrape::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut config = Config::new("https://example.com");
/// config.sub_path = "/docs".to_string();
/// let summary = run_crawl(&config).await?;
/// println!("processed {} pages", summary.processed);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config) -> Result<CrawlSummary, ScrapeError> {
    let mut coordinator = DefaultCoordinator::from_config(config)?;

    let token = coordinator.cancellation_token();
    let watcher = tokio::spawn(async move {
        if watch_interrupts(token, tokio::signal::ctrl_c).await {
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
    });

    let result = coordinator.run().await;
    watcher.abort();
    result
}

/// Conventional exit status after SIGINT
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Cancels `token` on the first interrupt
///
/// Returns true once a second interrupt arrives, false if the signal source
/// fails.
async fn watch_interrupts<I, Fut>(token: CancellationToken, mut next_interrupt: I) -> bool
where
    I: FnMut() -> Fut,
    Fut: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = next_interrupt().await {
        tracing::warn!("Could not listen for interrupts: {}", e);
        return false;
    }
    tracing::warn!("Received interrupt, finishing current page (interrupt again to abort)");
    token.cancel();

    match next_interrupt().await {
        Ok(()) => {
            tracing::error!("Second interrupt, aborting");
            true
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{OutputError, OutputResult};
    use crate::FetchError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    const BASE: &str = "https://example.com";

    #[derive(Clone, Default)]
    struct FakeFetcher {
        pages: HashMap<String, Result<Vec<u8>, u16>>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl FakeFetcher {
        fn page(mut self, path: &str, html: &str) -> Self {
            self.pages
                .insert(format!("{}{}", BASE, path), Ok(html.as_bytes().to_vec()));
            self
        }

        fn raw(mut self, path: &str, bytes: &[u8]) -> Self {
            self.pages
                .insert(format!("{}{}", BASE, path), Ok(bytes.to_vec()));
            self
        }

        fn failing(mut self, path: &str, status: u16) -> Self {
            self.pages.insert(format!("{}{}", BASE, path), Err(status));
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Fetcher for FakeFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            self.calls.lock().unwrap().push(url.to_string());
            match self.pages.get(url) {
                Some(Ok(body)) => Ok(body.clone()),
                Some(Err(status)) => Err(FetchError::Http { status: *status }),
                None => Err(FetchError::Http { status: 404 }),
            }
        }
    }

    #[derive(Clone)]
    struct MemorySink {
        data: Arc<Mutex<Vec<u8>>>,
        path: PathBuf,
        fail: bool,
    }

    impl MemorySink {
        fn new() -> Self {
            Self {
                data: Arc::default(),
                path: PathBuf::from("memory/output.html"),
                fail: false,
            }
        }

        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.data.lock().unwrap()).into_owned()
        }
    }

    impl PrimarySink for MemorySink {
        fn append(&mut self, data: &[u8]) -> OutputResult<()> {
            if self.fail {
                return Err(OutputError::io(
                    &self.path,
                    std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
                ));
            }
            self.data.lock().unwrap().extend_from_slice(data);
            Ok(())
        }

        fn path(&self) -> &Path {
            &self.path
        }
    }

    #[derive(Clone, Default)]
    struct MemorySelectorSink {
        headers: Arc<Mutex<Vec<String>>>,
        records: Arc<Mutex<Vec<(String, String, String)>>>,
        fail_init: bool,
        fail_append: bool,
    }

    fn read_only_error(selector: &str) -> OutputError {
        OutputError::io(
            Path::new(selector),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        )
    }

    impl SelectorSink for MemorySelectorSink {
        fn initialize(&mut self, selector: &str) -> OutputResult<()> {
            if self.fail_init {
                return Err(read_only_error(selector));
            }
            self.headers.lock().unwrap().push(selector.to_string());
            Ok(())
        }

        fn append(&mut self, selector: &str, url: &str, data: &str) -> OutputResult<()> {
            if self.fail_append {
                return Err(read_only_error(selector));
            }
            self.records.lock().unwrap().push((
                selector.to_string(),
                url.to_string(),
                data.to_string(),
            ));
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct CountingConverter {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl Converter for CountingConverter {
        async fn convert(&self, source: &Path) -> OutputResult<PathBuf> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(OutputError::Convert {
                    path: source.to_path_buf(),
                    message: "converter unavailable".to_string(),
                });
            }
            Ok(source.with_extension("md"))
        }
    }

    fn create_test_config(sub_path: &str, max_depth: u32) -> Config {
        let mut config = Config::new(BASE);
        config.sub_path = sub_path.to_string();
        config.max_depth = max_depth;
        config
    }

    struct Harness {
        coordinator: Coordinator<FakeFetcher, MemorySink, MemorySelectorSink, CountingConverter>,
        fetcher: FakeFetcher,
        primary: MemorySink,
        selector: MemorySelectorSink,
        converter: CountingConverter,
    }

    fn harness(config: &Config, fetcher: FakeFetcher) -> Harness {
        harness_with(config, fetcher, MemorySink::new(), CountingConverter::default())
    }

    fn harness_with(
        config: &Config,
        fetcher: FakeFetcher,
        primary: MemorySink,
        converter: CountingConverter,
    ) -> Harness {
        harness_from_parts(config, fetcher, primary, MemorySelectorSink::default(), converter)
    }

    fn harness_from_parts(
        config: &Config,
        fetcher: FakeFetcher,
        primary: MemorySink,
        selector: MemorySelectorSink,
        converter: CountingConverter,
    ) -> Harness {
        let coordinator = Coordinator::new(
            config,
            fetcher.clone(),
            primary.clone(),
            selector.clone(),
            converter.clone(),
        );
        Harness {
            coordinator,
            fetcher,
            primary,
            selector,
            converter,
        }
    }

    fn links_page(links: &[&str]) -> String {
        let anchors: String = links
            .iter()
            .map(|l| format!(r#"<a href="{}">link</a>"#, l))
            .collect();
        format!("<html><body>{}</body></html>", anchors)
    }

    #[tokio::test]
    async fn test_end_to_end_depth_two() {
        let fetcher = FakeFetcher::default()
            .page("/start", &links_page(&["/a", "https://elsewhere.com/b", "/c"]))
            .page("/a", "<html><body>A</body></html>")
            .page("/c", "<html><body>C</body></html>");
        let config = create_test_config("/start", 2);
        let mut h = harness(&config, fetcher);

        let summary = h.coordinator.run().await.unwrap();

        assert_eq!(summary.depth, 2);
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.queued, 1);
        assert!(!h.coordinator.frontier().is_visited("https://elsewhere.com/b"));
        assert_eq!(
            h.fetcher.calls(),
            vec!["https://example.com/start", "https://example.com/a"]
        );
        assert_eq!(h.coordinator.frontier().queued().collect::<Vec<_>>(), vec!["/c"]);
        assert_eq!(h.converter.calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.coordinator.state().phase(), RunPhase::Done);
    }

    #[tokio::test]
    async fn test_depth_one_leaves_links_queued() {
        let fetcher = FakeFetcher::default()
            .page("/", &links_page(&["/1", "/2", "/3", "/4", "/5"]));
        let config = create_test_config("/", 1);
        let mut h = harness(&config, fetcher);

        let summary = h.coordinator.run().await.unwrap();

        assert_eq!(summary.processed, 1);
        assert_eq!(summary.depth, 1);
        assert_eq!(summary.queued, 5);
        assert_eq!(h.fetcher.calls().len(), 1);
        assert!(summary.hit_depth_limit());
    }

    #[tokio::test]
    async fn test_failed_url_does_not_stop_run() {
        let fetcher = FakeFetcher::default()
            .page("/start", &links_page(&["/a", "/b"]))
            .failing("/a", 500)
            .page("/b", "<html><body>B</body></html>");
        let config = create_test_config("/start", 10);
        let mut h = harness(&config, fetcher);

        let summary = h.coordinator.run().await.unwrap();

        assert_eq!(h.fetcher.calls().len(), 3);
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.depth, 2);
        assert_eq!(h.converter.calls.load(Ordering::SeqCst), 1);
        assert!(h.primary.contents().contains("B"));
    }

    #[tokio::test]
    async fn test_failures_do_not_consume_depth_budget() {
        let fetcher = FakeFetcher::default()
            .page("/start", &links_page(&["/bad1", "/bad2", "/good"]))
            .failing("/bad1", 503)
            .failing("/bad2", 404)
            .page("/good", "<p>ok</p>");
        let config = create_test_config("/start", 2);
        let mut h = harness(&config, fetcher);

        let summary = h.coordinator.run().await.unwrap();

        assert_eq!(summary.processed, 2);
        assert_eq!(summary.failed, 2);
        assert_eq!(h.fetcher.calls().last().unwrap(), "https://example.com/good");
    }

    #[tokio::test]
    async fn test_external_seed_is_skipped_without_budget() {
        let config = create_test_config("https://other.com/x", 1);
        let mut h = harness(&config, FakeFetcher::default());

        let summary = h.coordinator.run().await.unwrap();

        assert_eq!(summary.skipped_external, 1);
        assert_eq!(summary.depth, 0);
        assert!(h.fetcher.calls().is_empty());
        assert_eq!(h.converter.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_absolute_in_domain_links_are_followed() {
        let fetcher = FakeFetcher::default()
            .page("/", &links_page(&["https://example.com/abs"]))
            .page("/abs", "<p>abs</p>");
        let config = create_test_config("/", 5);
        let mut h = harness(&config, fetcher);

        h.coordinator.run().await.unwrap();

        assert_eq!(
            h.fetcher.calls(),
            vec!["https://example.com/", "https://example.com/abs"]
        );
    }

    #[tokio::test]
    async fn test_sublink_filter_limits_frontier() {
        let fetcher = FakeFetcher::default()
            .page("/docs", &links_page(&["/docs/a", "/blog/b", "/docs/c"]))
            .page("/docs/a", "<p>a</p>")
            .page("/docs/c", "<p>c</p>");
        let mut config = create_test_config("/docs", 10);
        config.sublinks = vec!["docs".to_string()];
        let mut h = harness(&config, fetcher);

        let summary = h.coordinator.run().await.unwrap();

        assert_eq!(summary.processed, 3);
        assert!(!h.coordinator.frontier().is_visited("/blog/b"));
    }

    #[tokio::test]
    async fn test_links_are_not_revisited() {
        let fetcher = FakeFetcher::default()
            .page("/", &links_page(&["/a", "/"]))
            .page("/a", &links_page(&["/", "/a"]));
        let config = create_test_config("/", 10);
        let mut h = harness(&config, fetcher);

        let summary = h.coordinator.run().await.unwrap();

        assert_eq!(summary.processed, 2);
        assert_eq!(summary.visited, 2);
        assert_eq!(h.fetcher.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_raw_bytes_appended_in_processing_order() {
        let fetcher = FakeFetcher::default()
            .page("/", &links_page(&["/two"]))
            .page("/two", "<p>second page</p>");
        let config = create_test_config("/", 10);
        let mut h = harness(&config, fetcher);

        h.coordinator.run().await.unwrap();

        let contents = h.primary.contents();
        let first = contents.find("href=\"/two\"").unwrap();
        let second = contents.find("second page").unwrap();
        assert!(first < second);
    }

    #[tokio::test]
    async fn test_parse_failure_after_persist_abandons_url() {
        let fetcher = FakeFetcher::default().raw("/", b"<p>caf\xe9</p>");
        let config = create_test_config("/", 3);
        let mut h = harness(&config, fetcher);

        let summary = h.coordinator.run().await.unwrap();

        assert_eq!(summary.depth, 0);
        assert_eq!(summary.failed, 1);
        assert!(h.primary.contents().contains("<p>caf"));
    }

    #[tokio::test]
    async fn test_primary_sink_failure_abandons_url() {
        let fetcher = FakeFetcher::default().page("/", &links_page(&["/a"]));
        let config = create_test_config("/", 3);
        let mut primary = MemorySink::new();
        primary.fail = true;
        let mut h = harness_with(&config, fetcher, primary, CountingConverter::default());

        let summary = h.coordinator.run().await.unwrap();

        assert_eq!(summary.depth, 0);
        assert_eq!(summary.failed, 1);
        // Links are never extracted from an unpersisted page.
        assert_eq!(summary.visited, 1);
    }

    #[tokio::test]
    async fn test_convert_failure_is_not_fatal() {
        let fetcher = FakeFetcher::default().page("/", "<p>x</p>");
        let config = create_test_config("/", 1);
        let converter = CountingConverter {
            fail: true,
            ..Default::default()
        };
        let mut h = harness_with(&config, fetcher, MemorySink::new(), converter);

        let summary = h.coordinator.run().await.unwrap();

        assert_eq!(summary.processed, 1);
        assert!(summary.converted_path.is_none());
        assert_eq!(h.converter.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_selector_data_is_persisted() {
        let fetcher = FakeFetcher::default().page(
            "/",
            r#"<html><body><div class="content">  Useful   text </div></body></html>"#,
        );
        let mut config = create_test_config("/", 1);
        config.target_selector = Some(".content".to_string());
        let mut h = harness(&config, fetcher);

        let summary = h.coordinator.run().await.unwrap();

        assert_eq!(summary.extracted, 1);
        assert_eq!(*h.selector.headers.lock().unwrap(), vec![".content"]);
        let records = h.selector.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].0, ".content");
        assert_eq!(records[0].1, "https://example.com/");
        assert_eq!(records[0].2, "Useful   text");
    }

    #[tokio::test]
    async fn test_selector_falls_back_to_body() {
        let fetcher = FakeFetcher::default().page(
            "/",
            "<html><body><p>Body   only</p></body></html>",
        );
        let mut config = create_test_config("/", 1);
        config.target_selector = Some("article".to_string());
        let mut h = harness(&config, fetcher);

        let summary = h.coordinator.run().await.unwrap();

        assert_eq!(summary.extracted, 0);
        assert_eq!(summary.fallback_extracted, 1);
        let records = h.selector.records.lock().unwrap();
        assert_eq!(records[0].0, "article");
        assert_eq!(records[0].2, "Body only");
    }

    #[tokio::test]
    async fn test_selector_nothing_found_still_counts_page() {
        let fetcher = FakeFetcher::default().page("/", "<html><body>   </body></html>");
        let mut config = create_test_config("/", 1);
        config.target_selector = Some("#missing".to_string());
        let mut h = harness(&config, fetcher);

        let summary = h.coordinator.run().await.unwrap();

        assert_eq!(summary.processed, 1);
        assert!(h.selector.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_selector_append_failure_abandons_url() {
        let fetcher = FakeFetcher::default()
            .page("/", r#"<div class="content">data</div><a href="/next">n</a>"#);
        let mut config = create_test_config("/", 3);
        config.target_selector = Some(".content".to_string());
        let selector = MemorySelectorSink {
            fail_append: true,
            ..Default::default()
        };
        let mut h = harness_from_parts(
            &config,
            fetcher,
            MemorySink::new(),
            selector,
            CountingConverter::default(),
        );

        let summary = h.coordinator.run().await.unwrap();

        assert_eq!(summary.depth, 0);
        assert_eq!(summary.processed, 0);
        // "/" fails on the record write, "/next" is missing upstream
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.extracted, 0);
        assert!(h.primary.contents().contains("data"));
        assert_eq!(h.converter.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_selector_init_failure_only_warns() {
        let fetcher = FakeFetcher::default().page("/", r#"<div class="content">data</div>"#);
        let mut config = create_test_config("/", 3);
        config.target_selector = Some(".content".to_string());
        let selector = MemorySelectorSink {
            fail_init: true,
            ..Default::default()
        };
        let mut h = harness_from_parts(
            &config,
            fetcher,
            MemorySink::new(),
            selector,
            CountingConverter::default(),
        );

        let summary = h.coordinator.run().await.unwrap();

        assert_eq!(summary.processed, 1);
        assert_eq!(summary.depth, 1);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.extracted, 1);
        assert!(h.selector.headers.lock().unwrap().is_empty());
        assert_eq!(h.selector.records.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_no_selector_no_header() {
        let fetcher = FakeFetcher::default().page("/", "<p>x</p>");
        let config = create_test_config("/", 1);
        let mut h = harness(&config, fetcher);

        h.coordinator.run().await.unwrap();

        assert!(h.selector.headers.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_before_start_still_converts() {
        let fetcher = FakeFetcher::default().page("/", "<p>x</p>");
        let config = create_test_config("/", 5);
        let mut h = harness(&config, fetcher);

        h.coordinator.cancellation_token().cancel();
        let summary = h.coordinator.run().await.unwrap();

        assert!(summary.cancelled);
        assert_eq!(summary.processed, 0);
        assert_eq!(summary.queued, 1);
        assert!(h.fetcher.calls().is_empty());
        assert_eq!(h.converter.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_run_twice_is_rejected() {
        let fetcher = FakeFetcher::default().page("/", "<p>x</p>");
        let config = create_test_config("/", 1);
        let mut h = harness(&config, fetcher);

        h.coordinator.run().await.unwrap();
        let second = h.coordinator.run().await;

        assert!(matches!(
            second,
            Err(ScrapeError::InvalidTransition {
                from: RunPhase::Done,
                to: RunPhase::Running
            })
        ));
    }

    fn interrupt_source(
        notify: Arc<tokio::sync::Notify>,
    ) -> impl FnMut() -> std::pin::Pin<Box<dyn Future<Output = std::io::Result<()>> + Send>> {
        move || {
            let notify = notify.clone();
            Box::pin(async move {
                notify.notified().await;
                Ok(())
            })
        }
    }

    #[tokio::test]
    async fn test_first_interrupt_cancels_second_aborts() {
        let notify = Arc::new(tokio::sync::Notify::new());
        let token = CancellationToken::new();

        notify.notify_one();
        let watcher = tokio::spawn(watch_interrupts(
            token.clone(),
            interrupt_source(notify.clone()),
        ));

        tokio::time::timeout(std::time::Duration::from_secs(5), token.cancelled())
            .await
            .expect("first interrupt cancels the run");
        assert!(!watcher.is_finished());

        notify.notify_one();
        let forced = tokio::time::timeout(std::time::Duration::from_secs(5), watcher)
            .await
            .expect("second interrupt ends the watcher")
            .unwrap();
        assert!(forced);
    }

    #[tokio::test]
    async fn test_interrupt_source_failure_does_not_cancel() {
        let token = CancellationToken::new();

        let forced = watch_interrupts(token.clone(), || async {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "no signal handler"))
        })
        .await;

        assert!(!forced);
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_from_config_rejects_invalid_config() {
        let config = create_test_config("/", 0);
        assert!(matches!(
            DefaultCoordinator::from_config(&config),
            Err(ScrapeError::Config(_))
        ));
    }
}
