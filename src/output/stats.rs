//! Result collection and statistics display
//!
//! The collector is the single consumer of the result sink. It runs as its
//! own task so that publishing scheduler invocations only ever wait on the
//! channel's capacity, never on summary bookkeeping.

use crate::crawler::CrawlReport;
use crate::output::traits::{CrawlSummary, OutputError, OutputResult, PageResult};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Number of words listed by `print_statistics`
const TOP_WORDS_SHOWN: usize = 20;

/// Background task draining the result sink into a `CrawlSummary`
pub struct ResultCollector {
    handle: JoinHandle<CrawlSummary>,
}

impl ResultCollector {
    /// Spawns the collector on the current tokio runtime
    ///
    /// The task ends once every sender of the channel has been dropped.
    pub fn spawn(mut receiver: mpsc::Receiver<PageResult>) -> Self {
        let handle = tokio::spawn(async move {
            let mut summary = CrawlSummary::new();
            while let Some(result) = receiver.recv().await {
                tracing::debug!(
                    url = %result.url,
                    words = result.total_words(),
                    "Result received"
                );
                summary.record(&result);
            }
            summary.finish();
            summary
        });

        Self { handle }
    }

    /// Waits for the sink to close and returns the summary
    pub async fn finish(self) -> OutputResult<CrawlSummary> {
        self.handle
            .await
            .map_err(|e| OutputError::Collector(e.to_string()))
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(summary: &CrawlSummary, report: &CrawlReport) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Pages fetched: {}", report.fetched);
    println!("  Cached results served: {}", report.cached);
    println!("  Skipped (already in flight): {}", report.in_flight);
    println!("  Unique pages with results: {}", summary.unique_pages());
    println!("  Distinct words: {}", summary.distinct_words());
    println!("  Total words: {}", summary.total_words());
    println!();

    if report.failures() > 0 || report.too_deep > 0 {
        println!("Terminations:");
        println!("  Too deep: {}", report.too_deep);
        println!("  Bad request: {}", report.bad_request);
        println!("  Bad body: {}", report.bad_body);
        println!("  Other: {}", report.other_errors);
        println!();
    }

    let top = summary.top_words(TOP_WORDS_SHOWN);
    if !top.is_empty() {
        println!("Top Words:");
        for (word, count) in top {
            println!("  {:<20} {}", word, count);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} fetches)",
        report.success_rate(),
        report.fetched,
        report.fetched + report.bad_request + report.bad_body
    );
}
