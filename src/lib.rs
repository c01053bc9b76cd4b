//! redomine - Snapshot-to-streaming offset resolution for redo-log CDC
//!
//! A change-data-capture task takes a bulk snapshot of current data at
//! some instant, then streams the transaction log from that instant on.
//! Transactions that began before the snapshot point and commit after it
//! belong to neither phase by default; this crate resolves the handoff
//! point so they are neither lost nor double-applied: a stabilized
//! current SCN plus the set of transactions in flight at that SCN.
//!
//! The database is an external collaborator behind the
//! [`db::DatabaseSession`] trait; this crate owns the resolution logic,
//! not the vendor SQL.

pub mod config;
pub mod db;
pub mod observe;
pub mod offset;
pub mod redo;
pub mod scn;
pub mod txid;

pub use config::{CaptureConfig, TransactionBoundaryMode};
pub use offset::{OffsetError, OffsetResult, SnapshotOffset, SnapshotOffsetResolver};
pub use scn::Scn;
pub use txid::TransactionId;
