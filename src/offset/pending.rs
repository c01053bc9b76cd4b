//! In-flight transaction discovery
//!
//! Two discovery paths feed the pending-transaction set, merged with
//! first-seen-wins semantics:
//!
//! - The live open-transaction view: fast, read together with the
//!   current SCN in one statement, but transiently empty or incomplete
//!   while transactions are racing the read.
//! - The redo log itself: authoritative but slower, mined through a
//!   temporary server-side session over the minimal per-thread segment
//!   set.
//!
//! The view runs first and owns the current SCN; the log scan only adds
//! transactions the view missed and never overwrites a view-sourced
//! start position.

use std::collections::BTreeMap;

use crate::config::CaptureConfig;
use crate::db::{DatabaseSession, DbResult};
use crate::observe::{DiscoverySource, OffsetObserver};
use crate::redo::{LogFile, LogFileSelector};
use crate::scn::Scn;
use crate::txid::TransactionId;

use super::errors::{OffsetError, OffsetResult};
use super::stabilizer::SequenceNumberStabilizer;

/// Discovers the transactions in flight at the snapshot point.
pub struct PendingTransactionTracker<'a> {
    config: &'a CaptureConfig,
}

impl<'a> PendingTransactionTracker<'a> {
    /// Creates a tracker over the given capture configuration.
    pub fn new(config: &'a CaptureConfig) -> Self {
        Self { config }
    }

    /// Reads the current SCN and the open-transaction view as one
    /// consistent observation.
    ///
    /// The joined statement and the timestamp-bucket check are separate
    /// round trips, so the whole read repeats under the stabilization
    /// condition until two consecutive observations agree and the SCN
    /// has left the reference's timestamp bucket. Only the accepted
    /// observation contributes transactions.
    pub fn discover_from_view<S: DatabaseSession>(
        &self,
        session: &mut S,
        reference: Option<Scn>,
        observer: &mut dyn OffsetObserver,
    ) -> OffsetResult<(Option<Scn>, BTreeMap<TransactionId, Scn>)> {
        let stabilizer = SequenceNumberStabilizer::new(&self.config.stabilization);
        let scope = self.config.query_scope();

        let mut previous: Option<Scn> = None;
        let mut attempts: u32 = 0;
        loop {
            let snapshot = session.transaction_view_snapshot(scope)?;
            let current = snapshot.current_scn;
            if !SequenceNumberStabilizer::in_transition(session, reference, previous, current)? {
                let mut pending = BTreeMap::new();
                for (id, start_scn) in snapshot.transactions {
                    if !pending.contains_key(&id) {
                        observer.pending_transaction(
                            &id,
                            start_scn,
                            DiscoverySource::TransactionView,
                        );
                        pending.insert(id, start_scn);
                    }
                }
                return Ok((current, pending));
            }
            previous = current;
            stabilizer.next_attempt(&mut attempts)?;
        }
    }

    /// Extends `pending` with transactions found by mining the redo log
    /// around `current_scn`.
    ///
    /// The mining session is torn down on every path. A teardown that
    /// reports the session as already closed counts as success; any
    /// other teardown failure, like any failure inside the scan itself,
    /// surfaces as a single resolution-failure error carrying the cause.
    pub fn discover_from_log<S: DatabaseSession>(
        &self,
        session: &mut S,
        current_scn: Scn,
        pending: &mut BTreeMap<TransactionId, Scn>,
        observer: &mut dyn OffsetObserver,
    ) -> OffsetResult<()> {
        let selector = LogFileSelector::new(self.config);
        let oldest = session.oldest_scn_in_logs(
            self.config.archive_log_retention,
            self.config.archive_destination_name.as_deref(),
        )?;
        let log_files = selector.select(session, oldest)?;
        if log_files.is_empty() {
            return Ok(());
        }

        let search_set = LogFileSelector::reduce_to_search_set(&log_files);
        observer.log_scan_started(search_set.len());

        let scan = Self::scan_start_markers(session, &search_set, current_scn, pending, observer);
        let teardown = match session.end_mining_session() {
            Err(err) if err.is_mining_session_closed() => Ok(()),
            other => other,
        };
        teardown.map_err(OffsetError::resolution_failed)?;
        scan.map_err(OffsetError::resolution_failed)
    }

    fn scan_start_markers<S: DatabaseSession>(
        session: &mut S,
        search_set: &[LogFile],
        current_scn: Scn,
        pending: &mut BTreeMap<TransactionId, Scn>,
        observer: &mut dyn OffsetObserver,
    ) -> DbResult<()> {
        for file in search_set {
            session.add_mining_log_file(&file.file_name)?;
        }
        session.start_mining_session()?;

        for marker in session.transaction_start_markers()? {
            let Some(start_scn) = marker.start_scn else {
                // Blank start column: the marker carries no usable
                // position, skip the row.
                continue;
            };
            // The start bound is inclusive: a transaction whose start
            // marker sits exactly at the snapshot SCN is still in
            // flight there and must be caught.
            if marker.scn >= current_scn && start_scn <= current_scn {
                if !pending.contains_key(&marker.transaction_id) {
                    observer.pending_transaction(
                        &marker.transaction_id,
                        start_scn,
                        DiscoverySource::RedoLog,
                    );
                    pending.insert(marker.transaction_id, start_scn);
                }
            }
        }
        Ok(())
    }
}
