//! Crawl scheduler: one URL at a time
//!
//! `Scheduler::crawl` runs the full per-URL sequence on the URL's canonical
//! form:
//! 1. Acquire a permit from the global admission gate
//! 2. Reject depths beyond the configured maximum
//! 3. Atomically claim the URL in the dedup store, or serve/skip it
//! 4. Fetch the body under a deadline
//! 5. Extract words and links
//! 6. Publish the result to the sink
//! 7. Select the links worth crawling next
//! 8. Mark the URL resolved
//!
//! The permit is held for the whole sequence and released on every exit path.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::Fetcher;
use crate::extract::{extract_links, word_frequency};
use crate::output::PageResult;
use crate::store::{page_state, ClaimOutcome, DedupStore, PageRecord};
use crate::url::normalize_url;
use crate::{CrawlError, CrawlResult};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};

/// A URL waiting to be crawled at a given depth
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CrawlTask {
    pub url: String,
    pub depth: u32,
}

impl CrawlTask {
    pub fn new(url: impl Into<String>, depth: u32) -> Self {
        Self {
            url: url.into(),
            depth,
        }
    }

    /// A seed task, at depth 0
    pub fn seed(url: impl Into<String>) -> Self {
        Self::new(url, 0)
    }
}

/// How a successful crawl invocation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// The page was fetched, published, and resolved
    Fetched {
        /// Total counted words on the page
        word_count: usize,
        /// Links extracted from the page, before filtering
        links_found: usize,
        /// Links selected for crawling at `depth + 1`
        next: Vec<CrawlTask>,
    },

    /// The URL was already resolved; its cached result was published again
    Cached,

    /// Another invocation holds the claim; nothing was published
    InFlight,
}

/// Scheduler settings
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// A fetch at depth d is allowed iff d <= max_depth
    pub max_depth: u32,

    /// Capacity of the admission gate when the scheduler creates its own
    pub max_concurrent_fetches: usize,

    /// Deadline applied to every fetch
    pub fetch_timeout: Duration,

    /// Delete the claim after a failed fetch instead of stranding it
    pub release_claim_on_failure: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::from(&CrawlerConfig::default())
    }
}

impl From<&CrawlerConfig> for SchedulerConfig {
    fn from(config: &CrawlerConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            max_concurrent_fetches: config.max_concurrent_fetches as usize,
            fetch_timeout: config.fetch_timeout(),
            release_claim_on_failure: config.release_claim_on_failure,
        }
    }
}

/// Runs crawl invocations against shared collaborators
///
/// Cloning is cheap: clones share the fetcher, store, sink, and gate.
pub struct Scheduler<F> {
    fetcher: Arc<F>,
    store: Arc<dyn DedupStore>,
    sink: mpsc::Sender<PageResult>,
    gate: Arc<Semaphore>,
    config: SchedulerConfig,
}

impl<F> Clone for Scheduler<F> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            store: Arc::clone(&self.store),
            sink: self.sink.clone(),
            gate: Arc::clone(&self.gate),
            config: self.config.clone(),
        }
    }
}

impl<F: Fetcher> Scheduler<F> {
    /// Creates a scheduler with its own admission gate
    ///
    /// # Arguments
    ///
    /// * `fetcher` - The fetch capability
    /// * `store` - The dedup store shared by every invocation of the run
    /// * `sink` - Where page results are published
    /// * `config` - Depth, concurrency, and deadline settings
    pub fn new(
        fetcher: Arc<F>,
        store: Arc<dyn DedupStore>,
        sink: mpsc::Sender<PageResult>,
        config: SchedulerConfig,
    ) -> Self {
        let gate = Arc::new(Semaphore::new(config.max_concurrent_fetches.max(1)));

        Self {
            fetcher,
            store,
            sink,
            gate,
            config,
        }
    }

    /// Replaces the admission gate, e.g. to share one across schedulers
    pub fn with_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = gate;
        self
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Crawls one URL at the given depth
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlOutcome)` - Fetched, served from cache, or skipped as in flight
    /// * `Err(CrawlError::TooDeep)` - `depth` exceeds the maximum; nothing fetched
    /// * `Err(CrawlError::BadRequest | BadBody)` - The URL is malformed or the
    ///   fetch failed; nothing published
    pub async fn crawl(&self, url: &str, depth: u32) -> CrawlResult<CrawlOutcome> {
        let key = normalize_url(url).map_err(|e| CrawlError::BadRequest {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        let url = key.as_str();

        tracing::debug!(url = %url, depth, "Waiting for admission");
        let _permit = self
            .gate
            .acquire()
            .await
            .map_err(|_| CrawlError::GateClosed)?;

        if depth > self.config.max_depth {
            return Err(CrawlError::TooDeep {
                url: url.to_string(),
                depth,
                max_depth: self.config.max_depth,
            });
        }

        match self.store.claim(url)? {
            ClaimOutcome::Claimed => {}
            ClaimOutcome::Existing(record) if record.state().has_result() => {
                tracing::debug!(url = %url, "URL is already in cache");
                let cached = record.word_frequency.unwrap_or_default();
                self.publish(PageResult::new(url, cached)).await?;
                return Ok(CrawlOutcome::Cached);
            }
            ClaimOutcome::Existing(_) => {
                tracing::debug!(url = %url, "URL is currently being crawled");
                return Ok(CrawlOutcome::InFlight);
            }
        }

        tracing::info!(url = %url, depth, "Fetching");
        let body = match tokio::time::timeout(self.config.fetch_timeout, self.fetcher.fetch(url))
            .await
        {
            Ok(Ok(body)) => body,
            Ok(Err(e)) => return Err(self.fail(e.into_crawl_error(url))),
            Err(_) => {
                return Err(self.fail(CrawlError::BadRequest {
                    url: url.to_string(),
                    message: format!(
                        "fetch exceeded deadline of {:?}",
                        self.config.fetch_timeout
                    ),
                }))
            }
        };

        let frequencies = word_frequency(&body);
        let links = extract_links(&body, url);
        let word_count: usize = frequencies.values().sum();
        let links_found = links.len();

        let published = self
            .publish(PageResult::new(url, frequencies.clone()))
            .await;

        let next = match published {
            Ok(()) => self.select_next(links, depth)?,
            Err(_) => Vec::new(),
        };

        self.store.put(PageRecord::resolved(url, frequencies))?;
        published?;

        tracing::debug!(
            url = %url,
            depth,
            word_count,
            links_found,
            queued = next.len(),
            "Page resolved"
        );

        Ok(CrawlOutcome::Fetched {
            word_count,
            links_found,
            next,
        })
    }

    /// Picks the links to crawl at `depth + 1`
    ///
    /// A link qualifies if the next depth is within the limit, the store has no
    /// record for it, and it did not already appear earlier on the page.
    fn select_next(&self, links: Vec<String>, depth: u32) -> CrawlResult<Vec<CrawlTask>> {
        let next_depth = match depth.checked_add(1) {
            Some(d) if d <= self.config.max_depth => d,
            _ => return Ok(Vec::new()),
        };

        let mut seen = HashSet::new();
        let mut next = Vec::new();
        for link in links {
            if !seen.insert(link.clone()) {
                continue;
            }
            if !page_state(&*self.store, &link)?.is_fetchable() {
                continue;
            }
            next.push(CrawlTask::new(link, next_depth));
        }

        Ok(next)
    }

    async fn publish(&self, result: PageResult) -> CrawlResult<()> {
        let url = result.url.clone();
        self.sink
            .send(result)
            .await
            .map_err(|_| CrawlError::SinkClosed { url })
    }

    /// Settles the claim of a failed fetch and hands the error back
    ///
    /// The claim stays in place unless `release_claim_on_failure` is set, so by
    /// default the URL is not fetched again during this run. Reporting the
    /// failure is left to the caller.
    fn fail(&self, error: CrawlError) -> CrawlError {
        if let CrawlError::BadRequest { url, .. } | CrawlError::BadBody { url, .. } = &error {
            if self.config.release_claim_on_failure {
                if let Err(e) = self.store.delete(url) {
                    tracing::warn!(url = %url, "Could not release claim: {}", e);
                }
            }
        }

        error
    }
}
