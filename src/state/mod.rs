//! State module for tracking crawl progress
//!
//! Every URL moves through `Unseen -> Claimed -> Resolved`. The state is not
//! stored on its own; it is derived from what the dedup store holds for the URL.

mod page_state;

pub use page_state::PageState;
