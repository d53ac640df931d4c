//! URL handling module for Word-Ripple
//!
//! Every URL is reduced to one canonical string before it touches the dedup
//! store, so a seed and a discovered link naming the same page share a key.

mod normalize;

pub use normalize::{canonical_form, normalize_url};
