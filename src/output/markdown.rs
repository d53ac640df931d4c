//! Markdown summary generation
//!
//! This module generates a human-readable markdown summary of a crawl:
//! run timing, outcome counts, top words, and per-page word totals.

use crate::crawler::CrawlReport;
use crate::output::traits::{CrawlSummary, OutputError, OutputResult};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const TOP_WORDS_LISTED: usize = 50;

/// Generates a markdown summary from crawl statistics
///
/// # Arguments
///
/// * `summary` - The aggregated crawl results
/// * `report` - Per-invocation outcome counts
/// * `output_path` - Path where the markdown file should be written
pub fn generate_markdown_summary(
    summary: &CrawlSummary,
    report: &CrawlReport,
    output_path: &Path,
) -> OutputResult<()> {
    let markdown = format_markdown_summary(summary, report);

    let mut file = File::create(output_path).map_err(|e| {
        OutputError::Write(format!("cannot create {}: {}", output_path.display(), e))
    })?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl summary as markdown
pub fn format_markdown_summary(summary: &CrawlSummary, report: &CrawlReport) -> String {
    let mut md = String::new();

    md.push_str("# Word-Ripple Crawl Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!(
        "- **Started**: {}\n",
        summary.started_at.to_rfc3339()
    ));
    if let Some(finished) = &summary.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished.to_rfc3339()));
    }
    if let Some(duration) = summary.duration_seconds() {
        md.push_str(&format!("- **Duration**: {} seconds\n", duration));
    }
    md.push_str(&format!("- **Seeds**: {}\n\n", report.seeds));

    // Outcomes
    md.push_str("## Outcomes\n\n");
    md.push_str("| Outcome | Count |\n");
    md.push_str("|---------|-------|\n");
    md.push_str(&format!("| Fetched | {} |\n", report.fetched));
    md.push_str(&format!("| Cached | {} |\n", report.cached));
    md.push_str(&format!("| In flight elsewhere | {} |\n", report.in_flight));
    md.push_str(&format!("| Too deep | {} |\n", report.too_deep));
    md.push_str(&format!("| Bad request | {} |\n", report.bad_request));
    md.push_str(&format!("| Bad body | {} |\n", report.bad_body));
    md.push_str(&format!("| Other errors | {} |\n\n", report.other_errors));

    // Words
    md.push_str("## Top Words\n\n");
    let top = summary.top_words(TOP_WORDS_LISTED);
    if top.is_empty() {
        md.push_str("_No words counted._\n\n");
    } else {
        md.push_str("| Word | Count |\n");
        md.push_str("|------|-------|\n");
        for (word, count) in top {
            md.push_str(&format!("| {} | {} |\n", word, count));
        }
        md.push('\n');
    }

    // Pages
    md.push_str(&format!("## Pages ({})\n\n", summary.unique_pages()));
    for (url, words) in &summary.pages {
        md.push_str(&format!("- {} ({} words)\n", url, words));
    }

    md
}
