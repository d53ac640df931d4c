//! HTML extraction for crawled pages
//!
//! This module turns a fetched body into the two things the scheduler needs:
//! - Word frequencies from the page's text nodes
//! - Absolute URLs from the page's anchors

mod links;
mod text;

pub use links::extract_links;
pub use text::{count_words, extract_text, is_valid_word, word_frequency};

use std::collections::HashMap;

/// Mapping from lowercase word to occurrence count
pub type WordFrequency = HashMap<String, usize>;
