//! taskdeck category command implementations.

use std::path::PathBuf;

use chrono::Utc;

use crate::board::{BoardState, Command};
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::store::BoardStore;
use crate::task::{Category, CategoryDraft, CategoryPatch};

pub struct AddOptions {
    pub name: String,
    pub color: String,
    pub board: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ListOptions {
    pub board: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct EditOptions {
    pub id: String,
    pub name: Option<String>,
    pub color: Option<String>,
    pub board: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct DeleteOptions {
    pub id: String,
    pub board: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let board_dir = super::resolve_board_dir(options.board)?;
    let mut store = BoardStore::open(board_dir);
    let now = Utc::now();

    let draft = CategoryDraft {
        name: options.name,
        color: options.color,
    };
    store.dispatch(Command::AddCategory(draft), now)?;

    // AddCategory appends, so the new entry is the last one.
    let category = match store.state().categories.last() {
        Some(category) => category.clone(),
        None => {
            return Err(Error::OperationFailed(
                "no category recorded after add".to_string(),
            ))
        }
    };
    store.flush()?;

    let output = CategoryOutput {
        category: category.clone(),
    };

    let mut human = HumanOutput::new("Category added");
    human.push_summary("ID", category.id.as_str());
    human.push_summary("Name", category.name.as_str());
    human.push_summary("Color", category.color.as_str());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "category add",
        &output,
        Some(&human),
    )
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let board_dir = super::resolve_board_dir(options.board)?;
    let store = BoardStore::open(board_dir);
    let state = store.state();

    let output = CategoryListOutput {
        total: state.categories.len(),
        categories: state.categories.clone(),
    };

    let mut human = HumanOutput::new("Categories");
    human.push_summary("Total", state.categories.len().to_string());
    for category in &state.categories {
        let used = state
            .tasks
            .iter()
            .filter(|task| task.category.as_deref() == Some(category.id.as_str()))
            .count();
        human.push_detail(format!(
            "{} {} ({}, {} tasks)",
            category.id, category.name, category.color, used
        ));
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "category list",
        &output,
        Some(&human),
    )
}

pub fn run_edit(options: EditOptions) -> Result<()> {
    let board_dir = super::resolve_board_dir(options.board)?;
    let mut store = BoardStore::open(board_dir);
    let now = Utc::now();

    if options.name.is_none() && options.color.is_none() {
        return Err(Error::InvalidArgument(
            "category edit requires --name or --color".to_string(),
        ));
    }

    let id = resolve_category(store.state(), &options.id)?.id.clone();
    let patch = CategoryPatch {
        id: id.clone(),
        name: options.name,
        color: options.color,
    };
    store.dispatch(Command::UpdateCategory(patch), now)?;

    let category = store.state().category(&id).cloned().ok_or_else(|| {
        Error::OperationFailed(format!("category '{id}' missing after update"))
    })?;
    store.flush()?;

    let output = CategoryOutput {
        category: category.clone(),
    };

    let mut human = HumanOutput::new("Category updated");
    human.push_summary("ID", category.id.as_str());
    human.push_summary("Name", category.name.as_str());
    human.push_summary("Color", category.color.as_str());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "category edit",
        &output,
        Some(&human),
    )
}

pub fn run_delete(options: DeleteOptions) -> Result<()> {
    let board_dir = super::resolve_board_dir(options.board)?;
    let mut store = BoardStore::open(board_dir);
    let now = Utc::now();

    // Deleting an unknown id is a no-op, so only name ambiguity blocks.
    let id = match resolve_category(store.state(), &options.id) {
        Ok(category) => category.id.clone(),
        Err(Error::NotFound(_)) => options.id.trim().to_string(),
        Err(err) => return Err(err),
    };
    let removed = store.state().category(&id).is_some();
    let detached = store
        .state()
        .tasks
        .iter()
        .filter(|task| task.category.as_deref() == Some(id.as_str()))
        .count();

    store.dispatch(Command::DeleteCategory { id: id.clone() }, now)?;
    store.flush()?;

    let output = CategoryDeletedOutput {
        id: id.clone(),
        removed,
        tasks_detached: detached,
    };

    let mut human = HumanOutput::new(if removed {
        "Category deleted"
    } else {
        "Category already absent"
    });
    human.push_summary("ID", id);
    if detached > 0 {
        human.push_summary("Tasks detached", detached.to_string());
    }
    if !removed {
        human.push_warning("no category with this id was on the board");
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "category delete",
        &output,
        Some(&human),
    )
}

/// Find a category by exact id or case-insensitive name.
fn resolve_category<'a>(state: &'a BoardState, reference: &str) -> Result<&'a Category> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidArgument(
            "category id cannot be empty".to_string(),
        ));
    }
    if let Some(category) = state.category(trimmed) {
        return Ok(category);
    }
    let lowered = trimmed.to_lowercase();
    let matches: Vec<&Category> = state
        .categories
        .iter()
        .filter(|category| category.name.to_lowercase() == lowered)
        .collect();
    match matches.len() {
        0 => Err(Error::NotFound(format!("category '{trimmed}'"))),
        1 => Ok(matches[0]),
        _ => Err(Error::InvalidArgument(format!(
            "ambiguous category '{}': {}",
            trimmed,
            matches
                .iter()
                .map(|category| category.id.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}

#[derive(serde::Serialize)]
struct CategoryOutput {
    category: Category,
}

#[derive(serde::Serialize)]
struct CategoryListOutput {
    total: usize,
    categories: Vec<Category>,
}

#[derive(serde::Serialize)]
struct CategoryDeletedOutput {
    id: String,
    removed: bool,
    tasks_detached: usize,
}
