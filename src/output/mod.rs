//! Output module for crawl results
//!
//! The scheduler publishes one `PageResult` per page into a bounded channel.
//! This module provides the consumer side:
//! - `ResultCollector`, which drains the channel into a `CrawlSummary`
//! - Statistics printing for the CLI
//! - Markdown summary generation

mod markdown;
mod stats;
mod traits;

pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use stats::{print_statistics, ResultCollector};
pub use traits::{CrawlSummary, OutputError, OutputResult, PageResult};
