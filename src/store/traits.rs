//! Store traits and error types
//!
//! This module defines the trait interface for dedup store backends and
//! associated error types.

use crate::store::PageRecord;
use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Operation not supported by this store: {0}")]
    Unsupported(&'static str),

    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Result of an atomic get-or-claim
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The URL was absent; a claimed placeholder was inserted for the caller
    Claimed,

    /// The URL already had a record; nothing was written
    Existing(PageRecord),
}

/// Trait for dedup store implementations
///
/// One store instance is shared by every scheduler invocation of a run, so
/// implementations must be safe to call concurrently from many tasks.
pub trait DedupStore: Send + Sync {
    /// Looks up the record for a URL without blocking on other readers
    fn get(&self, url: &str) -> StoreResult<Option<PageRecord>>;

    /// Inserts or overwrites the record keyed by `record.url`
    fn put(&self, record: PageRecord) -> StoreResult<()>;

    /// Claims a URL if it has no record yet
    ///
    /// The lookup and the insert of `PageRecord::claimed(url)` happen in one
    /// critical section, so for any URL at most one caller ever observes
    /// `ClaimOutcome::Claimed`.
    fn claim(&self, url: &str) -> StoreResult<ClaimOutcome>;

    /// Removes the record for a URL
    fn delete(&self, url: &str) -> StoreResult<()> {
        let _ = url;
        Err(StoreError::Unsupported("delete"))
    }

    /// Removes every record
    fn reset_all(&self) -> StoreResult<()> {
        Err(StoreError::Unsupported("reset_all"))
    }

    /// Returns true if the URL has any record, claimed or resolved
    fn contains(&self, url: &str) -> StoreResult<bool> {
        Ok(self.get(url)?.is_some())
    }

    /// Number of records held
    fn len(&self) -> StoreResult<usize>;

    fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}
