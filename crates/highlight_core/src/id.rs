//! Process-unique identifiers for highlights.
//!
//! The id is written to the highlight element's `data-highlight-id` attribute,
//! so a pointer event on rendered content maps back to its record with one
//! attribute read and one map lookup.

use std::borrow::Borrow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque string identifier of a highlight within a [`HighlightStore`](crate::HighlightStore).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HighlightId(String);

impl HighlightId {
    /// Wrap an existing identifier, e.g. one read back from the DOM.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Allocate a fresh `"{prefix}-{n}"` id, unique for the lifetime of the process.
    pub fn generate(prefix: &str) -> Self {
        let n = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        Self(format!("{prefix}-{n}"))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HighlightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HighlightId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for HighlightId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl Borrow<str> for HighlightId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
