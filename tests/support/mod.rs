use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

pub struct TestBoard {
    dir: TempDir,
}

impl TestBoard {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// The board directory handed to the CLI. It does not exist until the
    /// first mutating command saves state.
    pub fn board_dir(&self) -> PathBuf {
        self.dir.path().join("board")
    }

    pub fn write_config(&self, contents: &str) -> std::io::Result<PathBuf> {
        fs::create_dir_all(self.board_dir())?;
        let path = self.board_dir().join("config.toml");
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn write_slot(&self, name: &str, contents: &str) -> std::io::Result<PathBuf> {
        fs::create_dir_all(self.board_dir())?;
        let path = self.board_dir().join(name);
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn read_slot(&self, name: &str) -> Value {
        let path = self.board_dir().join(name);
        let contents = fs::read_to_string(&path).expect("slot file");
        serde_json::from_str(&contents).expect("slot json")
    }

    pub fn slot_exists(&self, name: &str) -> bool {
        self.board_dir().join(name).exists()
    }
}

pub fn taskdeck_cmd() -> Command {
    Command::cargo_bin("taskdeck").expect("binary")
}
