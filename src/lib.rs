//! taskdeck - Task Board Library
//!
//! This library provides the core functionality for the taskdeck CLI tool,
//! keeping a personal kanban board on disk.
//!
//! # Core Concepts
//!
//! - **Tasks**: Titled items with priority, due date, category, and tags
//! - **Columns**: Ordered board lanes holding task ids, last lane counts as done
//! - **Categories**: Named color-coded labels tasks can point at
//! - **Filters and Sort**: A saved view applied when listing the board
//! - **Statistics**: Completion, trend, and reminder derivations
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `config.toml`
//! - `error`: Error types and result aliases
//! - `board`: Board state and the commands that evolve it
//! - `task`: Task, priority, and category types
//! - `query`: Saved filters, sort order, and list derivation
//! - `stats`: Summary, productivity, trend, and reminder math
//! - `storage`: Slot-file persistence under the board directory
//! - `store`: In-memory state plus its persistence gateway

pub mod board;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod query;
pub mod stats;
pub mod storage;
pub mod store;
pub mod task;

pub use error::{Error, Result};
