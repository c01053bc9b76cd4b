//! Log segment selection for the boundary scan
//!
//! Mining every retained segment to find transactions straddling the
//! snapshot point would be wasteful: a transaction still open at the
//! snapshot SCN has its start marker either in a thread's current
//! segment or in the archived segment sealed immediately before it.
//! The selector therefore narrows the catalog result to at most two
//! segments per redo thread before any mining happens.

use std::collections::BTreeMap;

use crate::config::CaptureConfig;
use crate::db::{DatabaseSession, DbResult};
use crate::scn::Scn;

use super::LogFile;

/// Selects the log segments a boundary scan has to mine.
pub struct LogFileSelector<'a> {
    config: &'a CaptureConfig,
}

impl<'a> LogFileSelector<'a> {
    /// Creates a selector over the given capture configuration.
    pub fn new(config: &'a CaptureConfig) -> Self {
        Self { config }
    }

    /// Queries the catalog for segments covering or following `since`,
    /// sorted ascending by sequence ordinal.
    ///
    /// The configured retention window, archive destination, and
    /// archive-only flag bound the catalog query itself.
    pub fn select<S: DatabaseSession>(
        &self,
        session: &mut S,
        since: Option<Scn>,
    ) -> DbResult<Vec<LogFile>> {
        let mut files = session.log_files_since(
            since,
            self.config.archive_log_retention,
            self.config.archive_log_only_mode,
            self.config.archive_destination_name.as_deref(),
        )?;
        files.sort_by_key(|file| file.sequence);
        Ok(files)
    }

    /// Reduces a catalog result to the minimal per-thread search set.
    ///
    /// For each redo thread whose most-advanced segment is the current
    /// one: the current segment, plus the archived segment with the
    /// highest sequence ordinal strictly below it, if one exists. A
    /// thread without a current segment has no active log presence to
    /// search and contributes nothing.
    pub fn reduce_to_search_set(all_log_files: &[LogFile]) -> Vec<LogFile> {
        let mut per_thread: BTreeMap<u32, Vec<&LogFile>> = BTreeMap::new();
        for file in all_log_files {
            per_thread.entry(file.thread).or_default().push(file);
        }

        let mut search_set = Vec::new();
        for files in per_thread.values() {
            let Some(current) = files
                .iter()
                .filter(|file| file.current)
                .max_by_key(|file| file.sequence)
            else {
                continue;
            };
            search_set.push((*current).clone());

            let prior_archived = files
                .iter()
                .filter(|file| file.sequence < current.sequence)
                .max_by_key(|file| file.sequence);
            if let Some(file) = prior_archived {
                search_set.push((*file).clone());
            }
        }
        search_set
    }
}
