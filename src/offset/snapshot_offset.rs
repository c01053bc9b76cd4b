//! SnapshotOffset - Resolved handoff point between snapshot and streaming
//!
//! The resolved offset is the single source of truth the streaming phase
//! resumes from: the SCN the bulk snapshot is consistent with, and every
//! transaction known to be in flight at that SCN, each with its start
//! position. Constructed once per resolution, immutable afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::scn::Scn;
use crate::txid::TransactionId;

/// The resolved (SCN, in-flight transaction set) pair seeding the
/// streaming phase.
///
/// `snapshot_scn` equals `scn` at construction; both are carried because
/// the streaming phase advances its resume SCN while the snapshot SCN
/// stays fixed for the lifetime of the capture task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotOffset {
    scn: Scn,
    snapshot_scn: Scn,
    pending_transactions: BTreeMap<TransactionId, Scn>,
}

impl SnapshotOffset {
    /// Builds the offset from a resolved SCN and the merged in-flight
    /// transaction set.
    pub fn new(scn: Scn, pending_transactions: BTreeMap<TransactionId, Scn>) -> Self {
        Self {
            scn,
            snapshot_scn: scn,
            pending_transactions,
        }
    }

    /// Returns the resume SCN for the streaming phase.
    pub fn scn(&self) -> Scn {
        self.scn
    }

    /// Returns the SCN the bulk snapshot is consistent with.
    pub fn snapshot_scn(&self) -> Scn {
        self.snapshot_scn
    }

    /// Returns the transactions in flight at the snapshot point, keyed
    /// by transaction id with their start SCNs.
    pub fn pending_transactions(&self) -> &BTreeMap<TransactionId, Scn> {
        &self.pending_transactions
    }
}
