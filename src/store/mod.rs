//! Dedup store for crawl state and cached results
//!
//! This module holds the only shared mutable state of a crawl run:
//! - `PageRecord`, the per-URL claim marker and result cache entry
//! - `DedupStore`, the trait every scheduler invocation talks to
//! - `MemoryStore`, the in-process `RwLock<HashMap>` implementation

mod memory;
mod traits;

pub use memory::MemoryStore;
pub use traits::{ClaimOutcome, DedupStore, StoreError, StoreResult};

use crate::extract::WordFrequency;
use crate::state::PageState;

/// Crawl state and result for one URL
///
/// Records are never mutated in place. Each write replaces the previous value
/// stored under the same URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    /// Absolute URL; the identity key
    pub url: String,

    /// Word counts; `None` until the fetch completes
    pub word_frequency: Option<WordFrequency>,

    /// True while the fetch is in flight (or after it failed and the claim was kept)
    pub claimed: bool,
}

impl PageRecord {
    /// Creates the placeholder inserted when a fetch is admitted
    pub fn claimed(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            word_frequency: None,
            claimed: true,
        }
    }

    /// Creates the final record written once extraction completes
    pub fn resolved(url: impl Into<String>, word_frequency: WordFrequency) -> Self {
        Self {
            url: url.into(),
            word_frequency: Some(word_frequency),
            claimed: false,
        }
    }

    pub fn state(&self) -> PageState {
        if self.claimed {
            PageState::Claimed
        } else {
            PageState::Resolved
        }
    }
}

/// Returns the state of `url` as seen by `store`
pub fn page_state(store: &dyn DedupStore, url: &str) -> StoreResult<PageState> {
    Ok(store
        .get(url)?
        .map(|record| record.state())
        .unwrap_or(PageState::Unseen))
}
