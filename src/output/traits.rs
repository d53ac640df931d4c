//! Output types
//!
//! This module defines the result records published by the scheduler and
//! the summary the result collector folds them into.

use crate::extract::WordFrequency;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Result collector failed: {0}")]
    Collector(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Word counts for one crawled page, as sent through the result sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    /// The page URL
    pub url: String,

    /// Lowercase word -> count
    pub word_frequency: WordFrequency,
}

impl PageResult {
    pub fn new(url: impl Into<String>, word_frequency: WordFrequency) -> Self {
        Self {
            url: url.into(),
            word_frequency,
        }
    }

    /// Total number of counted words on the page
    pub fn total_words(&self) -> usize {
        self.word_frequency.values().sum()
    }
}

/// Aggregate of every result received during a crawl
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Results received, including cached results published again
    pub results_received: u64,

    /// Results for a URL that had already been received
    pub repeated_results: u64,

    /// Unique URL -> total counted words on that page
    pub pages: BTreeMap<String, usize>,

    /// Word counts summed over unique pages
    pub word_totals: HashMap<String, u64>,
}

impl Default for CrawlSummary {
    fn default() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            results_received: 0,
            repeated_results: 0,
            pages: BTreeMap::new(),
            word_totals: HashMap::new(),
        }
    }
}

impl CrawlSummary {
    /// Creates a new empty crawl summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one result into the summary
    ///
    /// A URL's words are only counted the first time its result arrives, so a
    /// cached result published again does not inflate the totals.
    pub fn record(&mut self, result: &PageResult) {
        self.results_received += 1;

        if self.pages.contains_key(&result.url) {
            self.repeated_results += 1;
            return;
        }

        self.pages.insert(result.url.clone(), result.total_words());
        for (word, count) in &result.word_frequency {
            *self.word_totals.entry(word.clone()).or_insert(0) += *count as u64;
        }
    }

    /// Stamps the finish time
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn unique_pages(&self) -> usize {
        self.pages.len()
    }

    pub fn total_words(&self) -> u64 {
        self.word_totals.values().sum()
    }

    pub fn distinct_words(&self) -> usize {
        self.word_totals.len()
    }

    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    /// Returns the `n` most frequent words, ties broken alphabetically
    pub fn top_words(&self, n: usize) -> Vec<(String, u64)> {
        let mut words: Vec<(String, u64)> = self
            .word_totals
            .iter()
            .map(|(word, count)| (word.clone(), *count))
            .collect();
        words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        words.truncate(n);
        words
    }
}
