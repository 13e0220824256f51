//! Storage layer for taskdeck
//!
//! All state lives in one board directory as six independent JSON slot
//! files. Each slot loads on its own and falls back to its seeded default
//! when missing or unreadable; every state change rewrites all six.
//!
//! # Directory Structure
//!
//! ```text
//! <board-dir>/
//!   tasks.json          # Array of tasks
//!   columns.json        # Column id -> column (title + ordered task ids)
//!   column_order.json   # Display order of column ids
//!   categories.json     # Array of categories
//!   filters.json        # Stored filter settings
//!   sort_by.json        # Stored sort spec
//!   config.toml         # Optional settings (see the config module)
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use crate::board::{self, BoardState};
use crate::error::Result;
use crate::query::{Filters, SortSpec};

pub const TASKS_FILE: &str = "tasks.json";
pub const COLUMNS_FILE: &str = "columns.json";
pub const COLUMN_ORDER_FILE: &str = "column_order.json";
pub const CATEGORIES_FILE: &str = "categories.json";
pub const FILTERS_FILE: &str = "filters.json";
pub const SORT_BY_FILE: &str = "sort_by.json";

/// Storage manager for one board directory
#[derive(Debug, Clone)]
pub struct Storage {
    board_dir: PathBuf,
}

impl Storage {
    pub fn new(board_dir: PathBuf) -> Self {
        Self { board_dir }
    }

    // =========================================================================
    // Path accessors
    // =========================================================================

    pub fn board_dir(&self) -> &Path {
        &self.board_dir
    }

    pub fn tasks_file(&self) -> PathBuf {
        self.board_dir.join(TASKS_FILE)
    }

    pub fn columns_file(&self) -> PathBuf {
        self.board_dir.join(COLUMNS_FILE)
    }

    pub fn column_order_file(&self) -> PathBuf {
        self.board_dir.join(COLUMN_ORDER_FILE)
    }

    pub fn categories_file(&self) -> PathBuf {
        self.board_dir.join(CATEGORIES_FILE)
    }

    pub fn filters_file(&self) -> PathBuf {
        self.board_dir.join(FILTERS_FILE)
    }

    pub fn sort_by_file(&self) -> PathBuf {
        self.board_dir.join(SORT_BY_FILE)
    }

    // =========================================================================
    // Board state
    // =========================================================================

    /// Load the whole board. Slots are independent: a missing or unreadable
    /// slot falls back to its seeded default without failing the others.
    pub fn load_state(&self) -> BoardState {
        BoardState {
            tasks: self.load_slot(&self.tasks_file(), Vec::new),
            columns: self.load_slot(&self.columns_file(), board::default_columns),
            column_order: self.load_slot(&self.column_order_file(), board::default_column_order),
            categories: self.load_slot(&self.categories_file(), board::default_categories),
            filters: self.load_slot(&self.filters_file(), Filters::default),
            sort_by: self.load_slot(&self.sort_by_file(), SortSpec::default),
        }
    }

    /// Persist the whole board: every slot is rewritten in full, each one
    /// atomically.
    pub fn save_state(&self, state: &BoardState) -> Result<()> {
        self.write_json(&self.tasks_file(), &state.tasks)?;
        self.write_json(&self.columns_file(), &state.columns)?;
        self.write_json(&self.column_order_file(), &state.column_order)?;
        self.write_json(&self.categories_file(), &state.categories)?;
        self.write_json(&self.filters_file(), &state.filters)?;
        self.write_json(&self.sort_by_file(), &state.sort_by)?;
        Ok(())
    }

    fn load_slot<T, F>(&self, path: &Path, default: F) -> T
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        match self.read_json(path) {
            Ok(value) => value,
            Err(err) => {
                if path.exists() {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "slot unreadable, falling back to defaults"
                    );
                }
                default()
            }
        }
    }

    // =========================================================================
    // File I/O helpers (atomic writes for safety)
    // =========================================================================

    /// Write JSON data atomically (write to temp, then rename)
    pub fn write_json<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        self.write_atomic(path, json.as_bytes())
    }

    /// Read JSON data from a file
    pub fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let content = fs::read_to_string(path)?;
        let data: T = serde_json::from_str(&content)?;
        Ok(data)
    }

    /// Write data atomically using temp file + rename, so a crashed write
    /// never leaves a half-written slot behind.
    pub fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("tmp");

        let mut file = File::create(&temp_path)?;
        file.write_all(data)?;
        file.sync_all()?;

        fs::rename(&temp_path, path)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Command;
    use crate::task::TaskDraft;
    use chrono::Utc;
    use tempfile::TempDir;

    fn storage_in(temp: &TempDir) -> Storage {
        Storage::new(temp.path().join("board"))
    }

    fn state_with_task(title: &str) -> BoardState {
        let draft = TaskDraft {
            title: title.to_string(),
            ..TaskDraft::default()
        };
        board::apply(&BoardState::initial(), Command::AddTask(draft), Utc::now()).unwrap()
    }

    #[test]
    fn test_slot_paths() {
        let temp = TempDir::new().unwrap();
        let storage = storage_in(&temp);

        assert_eq!(storage.tasks_file(), storage.board_dir().join("tasks.json"));
        assert_eq!(
            storage.column_order_file(),
            storage.board_dir().join("column_order.json")
        );
        assert_eq!(
            storage.sort_by_file(),
            storage.board_dir().join("sort_by.json")
        );
    }

    #[test]
    fn test_load_state_defaults_when_board_is_missing() {
        let temp = TempDir::new().unwrap();
        let storage = storage_in(&temp);

        let state = storage.load_state();
        assert_eq!(state, BoardState::initial());
    }

    #[test]
    fn test_save_state_writes_all_slots() {
        let temp = TempDir::new().unwrap();
        let storage = storage_in(&temp);

        storage.save_state(&BoardState::initial()).unwrap();

        assert!(storage.tasks_file().exists());
        assert!(storage.columns_file().exists());
        assert!(storage.column_order_file().exists());
        assert!(storage.categories_file().exists());
        assert!(storage.filters_file().exists());
        assert!(storage.sort_by_file().exists());
    }

    #[test]
    fn test_state_round_trips() {
        let temp = TempDir::new().unwrap();
        let storage = storage_in(&temp);

        let state = state_with_task("Persisted");
        storage.save_state(&state).unwrap();

        let loaded = storage.load_state();
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_corrupt_slot_falls_back_without_touching_others() {
        let temp = TempDir::new().unwrap();
        let storage = storage_in(&temp);

        let state = state_with_task("Survivor");
        storage.save_state(&state).unwrap();
        fs::write(storage.tasks_file(), "not json").unwrap();

        let loaded = storage.load_state();
        assert!(loaded.tasks.is_empty());
        // Columns still reference the lost task id; they loaded unchanged.
        assert_eq!(loaded.columns, state.columns);
        assert_eq!(loaded.categories, state.categories);
    }

    #[test]
    fn test_atomic_write_replaces_and_leaves_no_temp() {
        let temp = TempDir::new().unwrap();
        let storage = storage_in(&temp);
        let path = storage.board_dir().join("probe.json");

        storage.write_atomic(&path, b"first").unwrap();
        storage.write_atomic(&path, b"second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_tasks_slot_keeps_wire_field_names() {
        let temp = TempDir::new().unwrap();
        let storage = storage_in(&temp);

        storage.save_state(&state_with_task("Wire format")).unwrap();
        let raw = fs::read_to_string(storage.tasks_file()).unwrap();
        assert!(raw.contains("\"createdAt\""));
        assert!(raw.contains("\"dueDate\""));

        let columns = fs::read_to_string(storage.columns_file()).unwrap();
        assert!(columns.contains("\"taskIds\""));
    }
}
