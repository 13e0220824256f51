//! taskdeck filter command implementations.

use std::path::PathBuf;

use chrono::Utc;

use crate::board::Command;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::query::{DueFilter, Filters, FiltersPatch};
use crate::store::BoardStore;
use crate::task::Priority;

pub struct SetOptions {
    pub search: Option<String>,
    pub priorities: Vec<String>,
    pub categories: Vec<String>,
    pub due: Option<String>,
    pub clear_due: bool,
    pub board: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ClearOptions {
    pub board: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ShowOptions {
    pub board: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub fn run_set(options: SetOptions) -> Result<()> {
    let board_dir = super::resolve_board_dir(options.board)?;
    let mut store = BoardStore::open(board_dir);
    let now = Utc::now();

    if options.due.is_some() && options.clear_due {
        return Err(Error::InvalidArgument(
            "cannot combine --due with --clear-due".to_string(),
        ));
    }
    let nothing = options.search.is_none()
        && options.priorities.is_empty()
        && options.categories.is_empty()
        && options.due.is_none()
        && !options.clear_due;
    if nothing {
        return Err(Error::InvalidArgument(
            "filter set requires at least one filter flag".to_string(),
        ));
    }

    let mut priorities = Vec::new();
    for value in &options.priorities {
        priorities.push(value.parse::<Priority>()?);
    }
    let due = match options.due.as_deref() {
        Some(value) => Some(value.parse::<DueFilter>()?),
        None => None,
    };

    let patch = FiltersPatch {
        search_term: options.search,
        priority: if priorities.is_empty() {
            None
        } else {
            Some(priorities)
        },
        category: if options.categories.is_empty() {
            None
        } else {
            Some(options.categories)
        },
        due_date: if options.clear_due {
            Some(None)
        } else {
            due.map(Some)
        },
    };
    store.dispatch(Command::SetFilters(patch), now)?;
    store.flush()?;

    let matching = store.derived_tasks(now).len();
    let filters = store.state().filters.clone();

    let mut human = HumanOutput::new("Filters updated");
    push_filter_summaries(&mut human, &filters);
    human.push_summary("Matching tasks", matching.to_string());

    let output = FiltersOutput { filters, matching };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "filter set",
        &output,
        Some(&human),
    )
}

pub fn run_clear(options: ClearOptions) -> Result<()> {
    let board_dir = super::resolve_board_dir(options.board)?;
    let mut store = BoardStore::open(board_dir);
    let now = Utc::now();

    store.dispatch(Command::ClearFilters, now)?;
    store.flush()?;

    let matching = store.derived_tasks(now).len();
    let filters = store.state().filters.clone();

    let mut human = HumanOutput::new("Filters cleared");
    human.push_summary("Matching tasks", matching.to_string());

    let output = FiltersOutput { filters, matching };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "filter clear",
        &output,
        Some(&human),
    )
}

pub fn run_show(options: ShowOptions) -> Result<()> {
    let board_dir = super::resolve_board_dir(options.board)?;
    let store = BoardStore::open(board_dir);
    let now = Utc::now();

    let matching = store.derived_tasks(now).len();
    let filters = store.state().filters.clone();

    let mut human = HumanOutput::new("Saved filters");
    push_filter_summaries(&mut human, &filters);
    human.push_summary("Matching tasks", matching.to_string());

    let output = FiltersOutput { filters, matching };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "filter show",
        &output,
        Some(&human),
    )
}

fn push_filter_summaries(human: &mut HumanOutput, filters: &Filters) {
    if filters.is_empty() {
        human.push_summary("Filters", "none");
        return;
    }
    if !filters.search_term.is_empty() {
        human.push_summary("Search", filters.search_term.clone());
    }
    if !filters.priority.is_empty() {
        human.push_summary(
            "Priorities",
            filters
                .priority
                .iter()
                .map(|priority| priority.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        );
    }
    if !filters.category.is_empty() {
        human.push_summary("Categories", filters.category.join(", "));
    }
    if let Some(due) = filters.due_date {
        human.push_summary("Due window", due.to_string());
    }
}

#[derive(serde::Serialize)]
struct FiltersOutput {
    filters: Filters,
    matching: usize,
}
