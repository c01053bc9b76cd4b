//! Scn - Totally ordered point in the committed-change timeline
//!
//! Every committed change in the source database is ordered by a
//! monotonically increasing system change number. The snapshot offset,
//! the start position of every in-flight transaction, and the first
//! change covered by a redo log segment are all expressed as SCNs.
//!
//! This is a pure type: construction, access, comparison. An unknown
//! SCN is `Option<Scn>` at the boundary that failed to produce it,
//! never a sentinel value inside this type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A totally ordered, opaque system change number.
///
/// Comparisons never wrap: the underlying representation is a plain
/// unsigned integer and ordering is the derived integer ordering.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scn(u64);

impl Scn {
    /// Creates an SCN with the given value.
    #[inline]
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying value.
    ///
    /// Exists for serialization and display; callers should not depend
    /// on the representation beyond its total order.
    #[inline]
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Returns whether a recorded position is at or before a desired one.
    ///
    /// This is the history-position comparison used when replaying
    /// schema history against a resume point. Equal positions count as
    /// "at or before".
    #[inline]
    pub fn is_at_or_before(&self, desired: Scn) -> bool {
        *self <= desired
    }
}

impl fmt::Display for Scn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
