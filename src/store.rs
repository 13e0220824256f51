//! The board store: in-memory state plus its persistence gateway.
//!
//! `dispatch` applies a command and then persists best-effort. A failed
//! save never fails the mutation; it is logged, remembered, and reported
//! by `flush` so the process boundary can surface it. No retries.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::board::{self, BoardState, Command};
use crate::error::{Error, Result};
use crate::query;
use crate::storage::Storage;
use crate::task::Task;

#[derive(Debug)]
pub struct BoardStore {
    storage: Storage,
    state: BoardState,
    persist_error: Option<String>,
}

impl BoardStore {
    /// Open the board in `board_dir`. Missing or unreadable slots seed
    /// their defaults; the directory itself materializes on first write.
    pub fn open(board_dir: PathBuf) -> Self {
        let storage = Storage::new(board_dir);
        let state = storage.load_state();
        Self {
            storage,
            state,
            persist_error: None,
        }
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Apply one command. Validation and integrity errors propagate and
    /// leave the state untouched. Persistence failures do not fail the
    /// dispatch: the state keeps the mutation and the failure waits for
    /// `flush`.
    pub fn dispatch(&mut self, command: Command, now: DateTime<Utc>) -> Result<&BoardState> {
        let next = board::apply(&self.state, command, now)?;
        self.state = next;
        match self.storage.save_state(&self.state) {
            Ok(()) => self.persist_error = None,
            Err(err) => {
                warn!(error = %err, "board save failed, keeping the change in memory");
                self.persist_error = Some(err.to_string());
            }
        }
        Ok(&self.state)
    }

    /// Report persistence health: the last save failure, if any. Does not
    /// retry the write.
    pub fn flush(&self) -> Result<()> {
        match &self.persist_error {
            Some(message) => Err(Error::Persistence(message.clone())),
            None => Ok(()),
        }
    }

    /// The filtered, sorted task view using the stored settings.
    pub fn derived_tasks(&self, now: DateTime<Utc>) -> Vec<Task> {
        query::derive(
            &self.state.tasks,
            &self.state.filters,
            self.state.sort_by,
            now,
        )
    }
}
