//! Database collaborator boundary
//!
//! Offset resolution never builds vendor SQL itself; it speaks to the
//! database through the [`DatabaseSession`] trait in terms of the logical
//! queries it needs: current SCN, the open-transaction view, the log
//! catalog, and the mining-session commands. A driver-backed
//! implementation owns the query text; tests script the trait directly.
//!
//! Every call is a blocking round trip on the calling thread. A session
//! is a scoped resource: `close` must be called on every outcome path.

#[cfg(test)]
pub(crate) mod mock;

use std::time::Duration;

use thiserror::Error;

use crate::redo::LogFile;
use crate::scn::Scn;
use crate::txid::TransactionId;

/// Result type for database collaborator calls.
pub type DbResult<T> = Result<T, DbError>;

/// Marker carried by the vendor error raised when a mining session is
/// ended twice. Ending an already-ended session is a no-op, not a fault.
const MINING_SESSION_CLOSED_MARKER: &str = "ORA-01307";

/// A failure reported by the database collaborator.
///
/// The message is the vendor diagnostic verbatim; classification of the
/// one benign teardown case is by message content, since the vendor
/// reports it through the same channel as real faults.
#[derive(Debug, Clone, Error)]
#[error("database error: {message}")]
pub struct DbError {
    message: String,
}

impl DbError {
    /// Creates an error carrying the vendor diagnostic.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the vendor diagnostic.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns whether this is the "mining session already closed"
    /// condition, which teardown treats as success.
    pub fn is_mining_session_closed(&self) -> bool {
        self.message
            .to_uppercase()
            .contains(MINING_SESSION_CLOSED_MARKER)
    }
}

/// Which deployment-level view a status or catalog query addresses.
///
/// On a multi-instance cluster the instance-local views are not
/// synchronized across members, so every query here must go to the
/// cluster-wide equivalents instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryScope {
    /// Instance-local views; single-instance deployments.
    Instance,
    /// Cluster-wide views; multi-instance deployments.
    ClusterWide,
}

/// One consistent read of the current SCN joined with the live
/// open-transaction view.
///
/// Produced by a single statement so the SCN and the transaction rows
/// observe the same instant. `current_scn` is `None` when the database
/// reported no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionViewSnapshot {
    /// Current SCN observed by the joined query.
    pub current_scn: Option<Scn>,
    /// Open transactions whose start precedes `current_scn`, with their
    /// start SCNs.
    pub transactions: Vec<(TransactionId, Scn)>,
}

/// A transaction-start marker record read from a mining session.
///
/// `scn` is the position at which the marker itself is visible in the
/// log; `start_scn` is the transaction's start position, absent when
/// the source column was blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartMarker {
    /// Identity of the transaction that started.
    pub transaction_id: TransactionId,
    /// Start position of the transaction, if recorded.
    pub start_scn: Option<Scn>,
    /// Log position of the marker record.
    pub scn: Scn,
}

/// Blocking access to one database session.
///
/// The logical queries below are the contract; their SQL text is the
/// implementor's concern. Methods taking a [`QueryScope`] must address
/// cluster-wide views when given [`QueryScope::ClusterWide`].
pub trait DatabaseSession {
    /// Reads the database's current SCN, or `None` if it reported none.
    fn current_scn(&mut self, scope: QueryScope) -> DbResult<Option<Scn>>;

    /// Returns whether two SCNs map to the same wall-clock timestamp
    /// bucket in the database's SCN-to-time mapping.
    fn scn_timestamps_match(&mut self, first: Scn, second: Scn) -> DbResult<bool>;

    /// Reads the current SCN joined with the open-transaction view in
    /// one statement.
    fn transaction_view_snapshot(&mut self, scope: QueryScope)
        -> DbResult<TransactionViewSnapshot>;

    /// Returns the SCN of the most recent schema-defining change to a
    /// captured table, or `None` when unavailable.
    fn latest_ddl_scn(&mut self) -> DbResult<Option<Scn>>;

    /// Returns the oldest SCN still covered by retained log segments
    /// within the retention window, at the given archive destination.
    fn oldest_scn_in_logs(
        &mut self,
        retention: Option<Duration>,
        destination: Option<&str>,
    ) -> DbResult<Option<Scn>>;

    /// Lists log segments whose range covers or follows `since`, subject
    /// to the retention window and, when `archive_only` is set, excluding
    /// the live segment. Order is unspecified; callers sort.
    fn log_files_since(
        &mut self,
        since: Option<Scn>,
        retention: Option<Duration>,
        archive_only: bool,
        destination: Option<&str>,
    ) -> DbResult<Vec<LogFile>>;

    /// Registers a log file with the pending mining session.
    fn add_mining_log_file(&mut self, file_name: &str) -> DbResult<()>;

    /// Starts a mining session over the registered files.
    fn start_mining_session(&mut self) -> DbResult<()>;

    /// Ends the mining session.
    ///
    /// Implementations report the vendor's already-closed diagnostic as
    /// an error; the caller classifies it via
    /// [`DbError::is_mining_session_closed`].
    fn end_mining_session(&mut self) -> DbResult<()>;

    /// Reads all transaction-start marker records visible to the open
    /// mining session. Window filtering is the caller's concern.
    fn transaction_start_markers(&mut self) -> DbResult<Vec<StartMarker>>;

    /// Resets the session from a pluggable-database scope to the root
    /// container. Mining commands are not valid inside a sub-container.
    fn reset_to_root_container(&mut self) -> DbResult<()>;

    /// Releases the session.
    fn close(&mut self) -> DbResult<()>;
}

/// Opens additional sessions against the same database.
///
/// Offset resolution opens a second session for its mining commands so
/// the commits and rollbacks those commands issue cannot invalidate
/// save points held by the surrounding snapshot's session.
pub trait SessionFactory {
    /// Session type produced by this factory.
    type Session: DatabaseSession;

    /// Opens a new, independent session.
    fn open_session(&self) -> DbResult<Self::Session>;
}
