//! Crawler module for page fetching and fan-out
//!
//! This module contains the core crawling logic, including:
//! - The `Fetcher` capability and its HTTP implementation
//! - The `Scheduler`, which crawls a single URL under the admission gate
//! - The `Coordinator`, which drives the frontier until no work is left

mod coordinator;
mod fetcher;
mod scheduler;

#[cfg(test)]
pub(crate) mod test_support;

pub use coordinator::{Coordinator, CrawlReport};
pub use fetcher::{build_http_client, FetchError, Fetcher, HttpFetcher};
pub use scheduler::{CrawlOutcome, CrawlTask, Scheduler, SchedulerConfig};

use crate::config::Config;
use crate::output::{CrawlSummary, ResultCollector};
use crate::store::{DedupStore, MemoryStore};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Runs a complete crawl from the configured seeds
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP fetcher
/// 2. Create a fresh dedup store and the result sink
/// 3. Crawl every seed at depth 0 and follow links up to the maximum depth
/// 4. Collect the published results into a summary
///
/// # Returns
///
/// * `Ok((CrawlSummary, CrawlReport))` - Results and per-invocation counts
/// * `Err(RippleError)` - The client or the collector could not be set up
pub async fn run_crawl(config: &Config) -> crate::Result<(CrawlSummary, CrawlReport)> {
    let scheduler_config = SchedulerConfig::from(&config.crawler);
    let fetcher = HttpFetcher::from_config(&config.user_agent, scheduler_config.fetch_timeout)?;

    run_crawl_with(Arc::new(fetcher), config).await
}

/// Runs a crawl with a caller-supplied fetcher
pub async fn run_crawl_with<F: Fetcher + 'static>(
    fetcher: Arc<F>,
    config: &Config,
) -> crate::Result<(CrawlSummary, CrawlReport)> {
    let store: Arc<dyn DedupStore> = Arc::new(MemoryStore::new());
    let (sink, receiver) = mpsc::channel(config.crawler.result_buffer.max(1));
    let collector = ResultCollector::spawn(receiver);

    let scheduler = Scheduler::new(
        fetcher,
        store,
        sink,
        SchedulerConfig::from(&config.crawler),
    );
    let coordinator = Coordinator::new(scheduler);
    let report = coordinator.run(config.seeds.iter().cloned()).await;

    // Closes the last sender so the collector can finish.
    drop(coordinator);
    let summary = collector.finish().await?;

    Ok((summary, report))
}
