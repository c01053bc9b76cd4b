//! Progress observation for offset resolution
//!
//! The resolver reports what it is doing and what it finds to a
//! caller-supplied observer instead of a process-wide logger, so a
//! connector embedding several capture tasks can attribute output to
//! the right task. All methods default to no-ops; implement only what
//! you care about.

use crate::config::TransactionBoundaryMode;
use crate::offset::SnapshotOffset;
use crate::scn::Scn;
use crate::txid::TransactionId;

/// Which discovery path reported an in-flight transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoverySource {
    /// The live open-transaction view.
    TransactionView,
    /// A scan of the redo log itself.
    RedoLog,
}

/// Receives progress and discovery events during offset resolution.
#[allow(unused_variables)]
pub trait OffsetObserver {
    /// The resolver selected its discovery strategy.
    fn boundary_mode_selected(&mut self, mode: TransactionBoundaryMode) {}

    /// A log scan is about to mine the given number of segments.
    fn log_scan_started(&mut self, file_count: usize) {}

    /// An in-flight transaction was discovered.
    fn pending_transaction(&mut self, id: &TransactionId, start_scn: Scn, source: DiscoverySource) {}

    /// Discovery finished with no in-flight transactions.
    fn no_pending_transactions(&mut self) {}

    /// Resolution completed with the given offset.
    fn offset_resolved(&mut self, offset: &SnapshotOffset) {}
}

/// Observer that discards all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl OffsetObserver for NullObserver {}

/// Observer that forwards events to the `tracing` ecosystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl OffsetObserver for TracingObserver {
    fn boundary_mode_selected(&mut self, mode: TransactionBoundaryMode) {
        match mode {
            TransactionBoundaryMode::Skip => {
                tracing::info!("no in-progress transactions will be captured");
            }
            TransactionBoundaryMode::TransactionViewOnly => {
                tracing::info!(
                    "skipping transaction logs for resolving snapshot offset, \
                     only using the transaction view"
                );
            }
            TransactionBoundaryMode::TransactionViewAndLog => {
                tracing::info!(
                    "consulting the transaction view and transaction logs for \
                     resolving snapshot offset"
                );
            }
        }
    }

    fn log_scan_started(&mut self, file_count: usize) {
        tracing::info!(file_count, "querying transaction logs, please wait");
    }

    fn pending_transaction(&mut self, id: &TransactionId, start_scn: Scn, source: DiscoverySource) {
        tracing::info!(
            transaction_id = %id,
            start_scn = %start_scn,
            source = ?source,
            "found in-progress transaction"
        );
    }

    fn no_pending_transactions(&mut self) {
        tracing::info!("found no in-progress transactions");
    }

    fn offset_resolved(&mut self, offset: &SnapshotOffset) {
        tracing::info!(
            scn = %offset.scn(),
            pending = offset.pending_transactions().len(),
            "snapshot offset resolved"
        );
    }
}
