//! Command-line interface for taskdeck
//!
//! This module defines the CLI structure using clap derive macros.
//! Each subcommand is defined in its own submodule.

use clap::{Parser, Subcommand};

use crate::error::Result;

mod board;
mod category;
mod filter;
mod sort;
mod stats;
mod task;

/// taskdeck - a local task board
///
/// A CLI that keeps a single-user task board as plain JSON files:
/// columns, categories, saved filters, a saved sort order, and
/// productivity stats derived from them.
#[derive(Parser, Debug)]
#[command(name = "taskdeck")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the board directory (defaults to the platform data dir)
    #[arg(long, global = true, env = "TASKDECK_BOARD")]
    pub board: Option<std::path::PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a task to the board
    Add {
        /// Task title
        title: String,

        /// Longer description
        #[arg(long)]
        description: Option<String>,

        /// Priority: low, medium, high (default from config)
        #[arg(long)]
        priority: Option<String>,

        /// Due date: YYYY-MM-DD, RFC 3339, "today", or "tomorrow"
        #[arg(long)]
        due: Option<String>,

        /// Category id
        #[arg(long)]
        category: Option<String>,

        /// Tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// List tasks through the saved filters and sort order
    List {
        /// Ignore the saved filters (still sorted)
        #[arg(long)]
        all: bool,
    },

    /// Show one task
    Show {
        /// Task id (unique prefixes accepted)
        id: String,
    },

    /// Edit task fields
    Edit {
        /// Task id (unique prefixes accepted)
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New priority: low, medium, high
        #[arg(long)]
        priority: Option<String>,

        /// New due date
        #[arg(long)]
        due: Option<String>,

        /// Remove the due date
        #[arg(long)]
        clear_due: bool,

        /// New category id
        #[arg(long)]
        category: Option<String>,

        /// Remove the category
        #[arg(long)]
        clear_category: bool,

        /// Replace the tag list (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Mark a task completed
    Done {
        /// Task id (unique prefixes accepted)
        id: String,
    },

    /// Reopen a completed task
    Reopen {
        /// Task id (unique prefixes accepted)
        id: String,
    },

    /// Delete a task (succeeds even if the id is unknown)
    Delete {
        /// Task id (unique prefixes accepted)
        id: String,
    },

    /// Move a task to another column
    Move {
        /// Task id (unique prefixes accepted)
        id: String,

        /// Destination column (id or title)
        #[arg(long)]
        to: String,

        /// Position within the destination column (0-based; default: end)
        #[arg(long)]
        position: Option<usize>,
    },

    /// Show the board: columns in display order with their tasks
    Board,

    /// Category management
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Saved filter management
    #[command(subcommand)]
    Filter(FilterCommands),

    /// Sort order management
    #[command(subcommand)]
    Sort(SortCommands),

    /// Board summary and productivity metrics
    Stats,

    /// Daily created/completed counts over a trailing window
    Trend {
        /// Days to cover (default from config)
        #[arg(long)]
        days: Option<usize>,
    },

    /// Overdue and upcoming tasks
    Reminders,
}

/// Category subcommands
#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// Add a category
    Add {
        /// Category name
        name: String,

        /// Display color
        #[arg(long, default_value = "#4caf50")]
        color: String,
    },

    /// List categories
    List,

    /// Edit a category
    Edit {
        /// Category id or name
        id: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New display color
        #[arg(long)]
        color: Option<String>,
    },

    /// Delete a category; its tasks keep running without one
    Delete {
        /// Category id or name
        id: String,
    },
}

/// Filter subcommands
#[derive(Subcommand, Debug)]
pub enum FilterCommands {
    /// Update the saved filters (unset flags keep their current value)
    Set {
        /// Substring to match in titles and descriptions
        #[arg(long)]
        search: Option<String>,

        /// Priority to keep (repeatable)
        #[arg(long = "priority")]
        priorities: Vec<String>,

        /// Category id to keep (repeatable)
        #[arg(long = "category")]
        categories: Vec<String>,

        /// Due window: today, week, overdue
        #[arg(long)]
        due: Option<String>,

        /// Remove the due window
        #[arg(long)]
        clear_due: bool,
    },

    /// Reset all filters
    Clear,

    /// Show the saved filters
    Show,
}

/// Sort subcommands
#[derive(Subcommand, Debug)]
pub enum SortCommands {
    /// Set the sort order
    Set {
        /// Sort field: title, due-date, priority, created-at
        field: String,

        /// Direction: asc, desc
        #[arg(long, default_value = "asc")]
        direction: String,
    },

    /// Show the sort order
    Show,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Add {
                title,
                description,
                priority,
                due,
                category,
                tags,
            } => task::run_add(task::AddOptions {
                title,
                description,
                priority,
                due,
                category,
                tags,
                board: self.board,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::List { all } => task::run_list(task::ListOptions {
                all,
                board: self.board,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Show { id } => task::run_show(task::ShowOptions {
                id,
                board: self.board,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Edit {
                id,
                title,
                description,
                priority,
                due,
                clear_due,
                category,
                clear_category,
                tags,
            } => task::run_edit(task::EditOptions {
                id,
                title,
                description,
                priority,
                due,
                clear_due,
                category,
                clear_category,
                tags,
                board: self.board,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Done { id } => task::run_done(task::CompletionOptions {
                id,
                board: self.board,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Reopen { id } => task::run_reopen(task::CompletionOptions {
                id,
                board: self.board,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Delete { id } => task::run_delete(task::DeleteOptions {
                id,
                board: self.board,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Move { id, to, position } => task::run_move(task::MoveOptions {
                id,
                to,
                position,
                board: self.board,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Board => board::run(board::BoardOptions {
                board: self.board,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Category(cmd) => match cmd {
                CategoryCommands::Add { name, color } => {
                    category::run_add(category::AddOptions {
                        name,
                        color,
                        board: self.board,
                        json: self.json,
                        quiet: self.quiet,
                    })
                }
                CategoryCommands::List => category::run_list(category::ListOptions {
                    board: self.board,
                    json: self.json,
                    quiet: self.quiet,
                }),
                CategoryCommands::Edit { id, name, color } => {
                    category::run_edit(category::EditOptions {
                        id,
                        name,
                        color,
                        board: self.board,
                        json: self.json,
                        quiet: self.quiet,
                    })
                }
                CategoryCommands::Delete { id } => {
                    category::run_delete(category::DeleteOptions {
                        id,
                        board: self.board,
                        json: self.json,
                        quiet: self.quiet,
                    })
                }
            },
            Commands::Filter(cmd) => match cmd {
                FilterCommands::Set {
                    search,
                    priorities,
                    categories,
                    due,
                    clear_due,
                } => filter::run_set(filter::SetOptions {
                    search,
                    priorities,
                    categories,
                    due,
                    clear_due,
                    board: self.board,
                    json: self.json,
                    quiet: self.quiet,
                }),
                FilterCommands::Clear => filter::run_clear(filter::ClearOptions {
                    board: self.board,
                    json: self.json,
                    quiet: self.quiet,
                }),
                FilterCommands::Show => filter::run_show(filter::ShowOptions {
                    board: self.board,
                    json: self.json,
                    quiet: self.quiet,
                }),
            },
            Commands::Sort(cmd) => match cmd {
                SortCommands::Set { field, direction } => {
                    sort::run_set(sort::SetOptions {
                        field,
                        direction,
                        board: self.board,
                        json: self.json,
                        quiet: self.quiet,
                    })
                }
                SortCommands::Show => sort::run_show(sort::ShowOptions {
                    board: self.board,
                    json: self.json,
                    quiet: self.quiet,
                }),
            },
            Commands::Stats => stats::run_overview(stats::OverviewOptions {
                board: self.board,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Trend { days } => stats::run_trend(stats::TrendOptions {
                days,
                board: self.board,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Reminders => stats::run_reminders(stats::RemindersOptions {
                board: self.board,
                json: self.json,
                quiet: self.quiet,
            }),
        }
    }
}

/// Resolve the board directory: a flag/env override, or the platform
/// data dir.
pub(crate) fn resolve_board_dir(board: Option<std::path::PathBuf>) -> Result<std::path::PathBuf> {
    if let Some(dir) = board {
        return Ok(dir);
    }
    directories::ProjectDirs::from("", "", "taskdeck")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            crate::error::Error::OperationFailed(
                "no usable data directory; pass --board or set TASKDECK_BOARD".to_string(),
            )
        })
}
