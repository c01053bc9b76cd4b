//! Offset resolution error types
//!
//! Either a complete, consistent snapshot offset is produced or the
//! call fails with one of these; no partial results escape.

use thiserror::Error;

use crate::db::DbError;

/// Result type for offset resolution.
pub type OffsetResult<T> = Result<T, OffsetError>;

/// Failures during snapshot offset resolution.
#[derive(Debug, Error)]
pub enum OffsetError {
    /// The database never produced a current SCN.
    #[error("failed to resolve current SCN")]
    CurrentScnUnresolved,

    /// A stabilization loop hit its configured attempt bound while the
    /// observed value was still in transition.
    #[error("current SCN failed to stabilize after {attempts} attempts")]
    StabilizationExceeded {
        /// The configured bound that was exhausted.
        attempts: u32,
    },

    /// A query inside the boundary log scan failed; the scan produces
    /// one failure category regardless of which statement broke.
    #[error("failed to resolve snapshot offset")]
    ResolutionFailed {
        /// The underlying database failure.
        #[source]
        source: DbError,
    },

    /// A query outside the log scan failed; re-raised as-is.
    #[error(transparent)]
    Database(#[from] DbError),
}

impl OffsetError {
    /// Wraps a scan-phase database failure into the single
    /// resolution-failure category.
    pub fn resolution_failed(source: DbError) -> Self {
        OffsetError::ResolutionFailed { source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_resolution_failure_carries_cause() {
        let err = OffsetError::resolution_failed(DbError::new("ORA-00257: archiver stuck"));
        assert_eq!(err.to_string(), "failed to resolve snapshot offset");
        let source = err.source().expect("cause preserved");
        assert!(source.to_string().contains("ORA-00257"));
    }

    #[test]
    fn test_database_errors_pass_through() {
        let err = OffsetError::from(DbError::new("ORA-00942: table or view does not exist"));
        assert!(err.to_string().contains("ORA-00942"));
    }

    #[test]
    fn test_stabilization_bound_named_in_message() {
        let err = OffsetError::StabilizationExceeded { attempts: 5 };
        assert!(err.to_string().contains("5 attempts"));
    }
}
