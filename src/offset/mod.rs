//! Snapshot offset resolution
//!
//! This module provides:
//! - `SequenceNumberStabilizer` - Settles the current SCN away from a
//!   recent schema change
//! - `PendingTransactionTracker` - Discovers in-flight transactions via
//!   the transaction view and the redo log
//! - `SnapshotOffsetResolver` - Orchestrates both into the handoff point
//! - `SnapshotOffset` - The resolved, immutable result
//! - `OffsetError` - The resolution failure taxonomy

mod errors;
mod pending;
mod resolver;
mod snapshot_offset;
mod stabilizer;

pub use errors::{OffsetError, OffsetResult};
pub use pending::PendingTransactionTracker;
pub use resolver::SnapshotOffsetResolver;
pub use snapshot_offset::SnapshotOffset;
pub use stabilizer::SequenceNumberStabilizer;
