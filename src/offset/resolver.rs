//! SnapshotOffsetResolver - Orchestrates the snapshot-to-streaming handoff
//!
//! Resolution sequence:
//!
//! 1. Reference SCN of the most recent schema-defining change, if any.
//! 2. Mode branch: SKIP stabilizes the current SCN directly; the view
//!    modes read it through the open-transaction view, which stabilizes
//!    internally.
//! 3. No current SCN is fatal.
//! 4. A second, independent session is opened for the mining commands.
//!    Mining commits and rollbacks would invalidate the save points the
//!    surrounding bulk snapshot holds on its own session, and the
//!    commands are not valid inside a pluggable-database scope, so the
//!    session resets to the root container when one is configured.
//! 5. VIEW_AND_LOG extends the pending set from the log on that session.
//! 6. The immutable offset is assembled.
//!
//! The secondary session is released on every outcome path.

use std::collections::BTreeMap;

use crate::config::{CaptureConfig, TransactionBoundaryMode};
use crate::db::{DatabaseSession, SessionFactory};
use crate::observe::OffsetObserver;

use super::errors::{OffsetError, OffsetResult};
use super::pending::PendingTransactionTracker;
use super::snapshot_offset::SnapshotOffset;
use super::stabilizer::SequenceNumberStabilizer;

/// Resolves the logically consistent point the streaming phase resumes
/// from, together with the transactions in flight at that point.
pub struct SnapshotOffsetResolver<'a> {
    config: &'a CaptureConfig,
}

impl<'a> SnapshotOffsetResolver<'a> {
    /// Creates a resolver over the given capture configuration.
    pub fn new(config: &'a CaptureConfig) -> Self {
        Self { config }
    }

    /// Resolves the snapshot offset.
    ///
    /// `session` is the surrounding snapshot's session and is only read
    /// through; the mining stage runs on a fresh session from `factory`.
    /// Either a complete offset is returned or the call fails; no
    /// partial result escapes.
    pub fn resolve<S, F>(
        &self,
        session: &mut S,
        factory: &F,
        observer: &mut dyn OffsetObserver,
    ) -> OffsetResult<SnapshotOffset>
    where
        S: DatabaseSession,
        F: SessionFactory,
    {
        let reference = session.latest_ddl_scn()?;
        observer.boundary_mode_selected(self.config.boundary_mode);

        let tracker = PendingTransactionTracker::new(self.config);
        let (current, mut pending) = match self.config.boundary_mode {
            TransactionBoundaryMode::Skip => {
                let stabilizer = SequenceNumberStabilizer::new(&self.config.stabilization);
                let current =
                    stabilizer.stabilize(session, self.config.query_scope(), reference)?;
                (current, BTreeMap::new())
            }
            TransactionBoundaryMode::TransactionViewOnly
            | TransactionBoundaryMode::TransactionViewAndLog => {
                tracker.discover_from_view(session, reference, observer)?
            }
        };
        let current = current.ok_or(OffsetError::CurrentScnUnresolved)?;

        let mut mining = factory.open_session()?;
        let mut outcome: OffsetResult<()> = Ok(());
        if self.config.pluggable_database.is_some() {
            outcome = mining.reset_to_root_container().map_err(OffsetError::from);
        }
        if outcome.is_ok()
            && self.config.boundary_mode == TransactionBoundaryMode::TransactionViewAndLog
        {
            outcome = tracker.discover_from_log(&mut mining, current, &mut pending, observer);
        }
        let released = mining.close();
        outcome?;
        released?;

        if pending.is_empty() && self.config.boundary_mode != TransactionBoundaryMode::Skip {
            observer.no_pending_transactions();
        }
        let offset = SnapshotOffset::new(current, pending);
        observer.offset_resolved(&offset);
        Ok(offset)
    }
}
