/// Page state definitions for tracking crawl progress
///
/// A URL only ever moves forward: `Unseen -> Claimed -> Resolved`. There is no
/// transition back to `Unseen` except through an explicit store reset or an
/// opt-in claim release after a failed fetch.
use std::fmt;

/// Represents the current state of a URL in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    /// No record exists for the URL
    Unseen,

    /// A fetch was admitted; it is in flight, or it failed and the claim was kept
    Claimed,

    /// The fetch completed and word frequencies are cached
    Resolved,
}

impl PageState {
    /// Returns true if a fetch may still be started for a URL in this state
    pub fn is_fetchable(&self) -> bool {
        matches!(self, Self::Unseen)
    }

    /// Returns true if a cached result can be served for this state
    pub fn has_result(&self) -> bool {
        matches!(self, Self::Resolved)
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: PageState) -> bool {
        matches!(
            (self, next),
            (Self::Unseen, Self::Claimed) | (Self::Claimed, Self::Resolved)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unseen => "unseen",
            Self::Claimed => "claimed",
            Self::Resolved => "resolved",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
