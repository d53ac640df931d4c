//! Crawler coordinator - fan-out of crawl tasks
//!
//! The coordinator owns the frontier queue and a `JoinSet` of running crawl
//! invocations. It never keeps more invocations alive than the admission gate
//! has permits, so links discovered on dense pages wait in the queue as plain
//! `(url, depth)` pairs instead of as blocked tasks.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::scheduler::{CrawlOutcome, CrawlTask, Scheduler};
use crate::{CrawlError, CrawlResult};
use std::collections::VecDeque;
use std::time::Instant;
use tokio::task::JoinSet;

/// Joined tasks between two progress log lines
const PROGRESS_INTERVAL: u64 = 10;

/// Per-run counts of how crawl invocations ended
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    pub seeds: u64,
    pub fetched: u64,
    pub cached: u64,
    pub in_flight: u64,
    pub too_deep: u64,
    pub bad_request: u64,
    pub bad_body: u64,
    /// Store, sink, gate, and task failures
    pub other_errors: u64,
    /// Deepest depth at which a page was fetched
    pub max_depth_reached: u32,
}

impl CrawlReport {
    /// Counts one invocation's result
    pub fn record(&mut self, task: &CrawlTask, result: &CrawlResult<CrawlOutcome>) {
        match result {
            Ok(CrawlOutcome::Fetched { .. }) => {
                self.fetched += 1;
                self.max_depth_reached = self.max_depth_reached.max(task.depth);
            }
            Ok(CrawlOutcome::Cached) => self.cached += 1,
            Ok(CrawlOutcome::InFlight) => self.in_flight += 1,
            Err(CrawlError::TooDeep { .. }) => self.too_deep += 1,
            Err(CrawlError::BadRequest { .. }) => self.bad_request += 1,
            Err(CrawlError::BadBody { .. }) => self.bad_body += 1,
            Err(_) => self.other_errors += 1,
        }
    }

    /// Failed invocations, excluding expected depth terminations
    pub fn failures(&self) -> u64 {
        self.bad_request + self.bad_body + self.other_errors
    }

    /// Share of attempted fetches that succeeded, as a percentage
    pub fn success_rate(&self) -> f64 {
        let attempted = self.fetched + self.bad_request + self.bad_body;
        if attempted == 0 {
            return 0.0;
        }
        (self.fetched as f64 / attempted as f64) * 100.0
    }
}

/// Main crawler coordinator structure
pub struct Coordinator<F> {
    scheduler: Scheduler<F>,
    max_in_flight: usize,
}

impl<F: Fetcher + 'static> Coordinator<F> {
    /// Creates a coordinator keeping `max_concurrent_fetches` invocations alive
    ///
    /// The cap is read from the scheduler's config, which sizes the gate
    /// `Scheduler::new` creates. A scheduler given a different gate through
    /// `Scheduler::with_gate` needs `with_max_in_flight` set to that gate's
    /// capacity.
    pub fn new(scheduler: Scheduler<F>) -> Self {
        let max_in_flight = scheduler.config().max_concurrent_fetches.max(1);
        Self {
            scheduler,
            max_in_flight,
        }
    }

    /// Overrides how many crawl invocations may be alive at once
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    /// Crawls from the given seeds until no work is left
    ///
    /// Each invocation is an independent unit of failure: errors are logged
    /// and counted, and the remaining branches keep going.
    pub async fn run<I, S>(&self, seeds: I) -> CrawlReport
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut frontier: VecDeque<CrawlTask> = seeds.into_iter().map(CrawlTask::seed).collect();
        let mut report = CrawlReport {
            seeds: frontier.len() as u64,
            ..CrawlReport::default()
        };
        let mut running: JoinSet<(CrawlTask, CrawlResult<CrawlOutcome>)> = JoinSet::new();
        let start_time = Instant::now();
        let mut joined_tasks: u64 = 0;

        tracing::info!("Starting crawl with {} seed URLs", report.seeds);

        loop {
            while running.len() < self.max_in_flight {
                let Some(task) = frontier.pop_front() else {
                    break;
                };
                let scheduler = self.scheduler.clone();
                running.spawn(async move {
                    let result = scheduler.crawl(&task.url, task.depth).await;
                    (task, result)
                });
            }

            let Some(joined) = running.join_next().await else {
                break;
            };

            joined_tasks += 1;

            match joined {
                Ok((task, result)) => {
                    report.record(&task, &result);
                    match result {
                        Ok(CrawlOutcome::Fetched { next, .. }) => frontier.extend(next),
                        Ok(_) => {}
                        Err(e) if e.is_expected() => {
                            tracing::debug!(url = %task.url, depth = task.depth, "{}", e);
                        }
                        Err(e) => {
                            tracing::error!(url = %task.url, depth = task.depth, "Error crawling: {}", e);
                        }
                    }
                }
                Err(e) => {
                    tracing::error!("Crawl task failed to complete: {}", e);
                    report.other_errors += 1;
                }
            }

            if is_progress_tick(joined_tasks) {
                let elapsed = start_time.elapsed();
                tracing::info!(
                    "Progress: {} pages fetched, {} queued, {} running, {:.2} pages/sec",
                    report.fetched,
                    frontier.len(),
                    running.len(),
                    report.fetched as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
                );
            }
        }

        tracing::info!(
            "Crawl completed: {} pages fetched, {} failures in {:?}",
            report.fetched,
            report.failures(),
            start_time.elapsed()
        );

        report
    }
}

/// True once per `PROGRESS_INTERVAL` joined tasks, whatever their outcome
fn is_progress_tick(joined_tasks: u64) -> bool {
    joined_tasks > 0 && joined_tasks % PROGRESS_INTERVAL == 0
}
