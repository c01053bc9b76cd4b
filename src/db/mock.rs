//! Scripted database collaborator for unit tests
//!
//! Sessions share one scripted state cell so a test can stage responses
//! up front and assert call counts and resource lifecycles afterwards.
//! Sample queues repeat their last element once drained, matching a
//! quiescent database that keeps answering the same thing.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use crate::redo::LogFile;
use crate::scn::Scn;

use super::{
    DatabaseSession, DbError, DbResult, QueryScope, SessionFactory, StartMarker,
    TransactionViewSnapshot,
};

/// Scripted responses and observed calls.
#[derive(Default)]
pub(crate) struct State {
    pub current_scn_samples: VecDeque<Option<Scn>>,
    pub current_scn_error: Option<DbError>,
    pub timestamp_matches: VecDeque<bool>,
    pub view_snapshots: VecDeque<TransactionViewSnapshot>,
    pub view_error: Option<DbError>,
    pub latest_ddl_scn: Option<Scn>,
    pub oldest_log_scn: Option<Scn>,
    pub log_files: Vec<LogFile>,
    pub start_markers: Vec<StartMarker>,
    pub marker_error: Option<DbError>,
    pub end_session_error: Option<DbError>,
    pub open_error: Option<DbError>,

    pub current_scn_calls: usize,
    pub timestamp_calls: usize,
    pub view_calls: usize,
    pub marker_calls: usize,
    pub catalog_calls: usize,
    pub added_files: Vec<String>,
    pub sessions_started: usize,
    pub sessions_ended: usize,
    pub sessions_opened: usize,
    pub sessions_closed: usize,
    pub container_resets: usize,
    pub last_scope: Option<QueryScope>,
    pub last_catalog_archive_only: Option<bool>,
    pub mining_active: bool,
}

fn next_sample<T: Clone>(queue: &mut VecDeque<T>) -> Option<T> {
    if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().cloned()
    }
}

/// Factory handing out sessions over the shared scripted state.
#[derive(Clone)]
pub(crate) struct ScriptedDatabase {
    state: Rc<RefCell<State>>,
}

impl ScriptedDatabase {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(State::default())),
        }
    }

    /// Runs a closure against the scripted state.
    pub fn state<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        f(&mut self.state.borrow_mut())
    }
}

impl SessionFactory for ScriptedDatabase {
    type Session = ScriptedSession;

    fn open_session(&self) -> DbResult<ScriptedSession> {
        let mut state = self.state.borrow_mut();
        if let Some(err) = state.open_error.take() {
            return Err(err);
        }
        state.sessions_opened += 1;
        Ok(ScriptedSession {
            state: Rc::clone(&self.state),
        })
    }
}

/// One scripted session.
pub(crate) struct ScriptedSession {
    state: Rc<RefCell<State>>,
}

impl DatabaseSession for ScriptedSession {
    fn current_scn(&mut self, scope: QueryScope) -> DbResult<Option<Scn>> {
        let mut state = self.state.borrow_mut();
        state.current_scn_calls += 1;
        state.last_scope = Some(scope);
        if let Some(err) = &state.current_scn_error {
            return Err(err.clone());
        }
        Ok(next_sample(&mut state.current_scn_samples).flatten())
    }

    fn scn_timestamps_match(&mut self, _first: Scn, _second: Scn) -> DbResult<bool> {
        let mut state = self.state.borrow_mut();
        state.timestamp_calls += 1;
        Ok(state.timestamp_matches.pop_front().unwrap_or(false))
    }

    fn transaction_view_snapshot(
        &mut self,
        scope: QueryScope,
    ) -> DbResult<TransactionViewSnapshot> {
        let mut state = self.state.borrow_mut();
        state.view_calls += 1;
        state.last_scope = Some(scope);
        if let Some(err) = &state.view_error {
            return Err(err.clone());
        }
        Ok(next_sample(&mut state.view_snapshots).unwrap_or(TransactionViewSnapshot {
            current_scn: None,
            transactions: Vec::new(),
        }))
    }

    fn latest_ddl_scn(&mut self) -> DbResult<Option<Scn>> {
        Ok(self.state.borrow().latest_ddl_scn)
    }

    fn oldest_scn_in_logs(
        &mut self,
        _retention: Option<Duration>,
        _destination: Option<&str>,
    ) -> DbResult<Option<Scn>> {
        Ok(self.state.borrow().oldest_log_scn)
    }

    fn log_files_since(
        &mut self,
        _since: Option<Scn>,
        _retention: Option<Duration>,
        archive_only: bool,
        _destination: Option<&str>,
    ) -> DbResult<Vec<LogFile>> {
        let mut state = self.state.borrow_mut();
        state.catalog_calls += 1;
        state.last_catalog_archive_only = Some(archive_only);
        Ok(state.log_files.clone())
    }

    fn add_mining_log_file(&mut self, file_name: &str) -> DbResult<()> {
        self.state.borrow_mut().added_files.push(file_name.to_string());
        Ok(())
    }

    fn start_mining_session(&mut self) -> DbResult<()> {
        let mut state = self.state.borrow_mut();
        state.sessions_started += 1;
        state.mining_active = true;
        Ok(())
    }

    fn end_mining_session(&mut self) -> DbResult<()> {
        let mut state = self.state.borrow_mut();
        state.sessions_ended += 1;
        state.mining_active = false;
        if let Some(err) = state.end_session_error.take() {
            return Err(err);
        }
        Ok(())
    }

    fn transaction_start_markers(&mut self) -> DbResult<Vec<StartMarker>> {
        let mut state = self.state.borrow_mut();
        state.marker_calls += 1;
        if let Some(err) = state.marker_error.take() {
            return Err(err);
        }
        Ok(state.start_markers.clone())
    }

    fn reset_to_root_container(&mut self) -> DbResult<()> {
        self.state.borrow_mut().container_resets += 1;
        Ok(())
    }

    fn close(&mut self) -> DbResult<()> {
        self.state.borrow_mut().sessions_closed += 1;
        Ok(())
    }
}
