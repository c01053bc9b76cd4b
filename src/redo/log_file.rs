//! LogFile - Descriptor of one redo log segment
//!
//! Each redo thread of the database writes its own series of segments,
//! ordered within the thread by a sequence ordinal. At most one segment
//! per thread is current (unsealed); the rest are archived.

use crate::scn::Scn;

/// One log segment as reported by the log catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    /// Redo thread that writes this segment.
    pub thread: u32,
    /// Position of this segment within its thread's series.
    pub sequence: u64,
    /// Whether this is the thread's live, unsealed segment.
    pub current: bool,
    /// Path or name the mining session registers the segment by.
    pub file_name: String,
    /// First change covered by this segment.
    pub first_change_scn: Scn,
}

impl LogFile {
    /// Creates a segment descriptor.
    pub fn new(
        thread: u32,
        sequence: u64,
        current: bool,
        file_name: impl Into<String>,
        first_change_scn: Scn,
    ) -> Self {
        Self {
            thread,
            sequence,
            current,
            file_name: file_name.into(),
            first_change_scn,
        }
    }
}
