//! Board state and the command transition.
//!
//! `apply` is the single mutation path: it takes the current state plus one
//! command and returns the next state. Errors leave the caller's state
//! untouched. Column reorders are validated as a full partition of the task
//! set before they replace the columns mapping.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::query::{Filters, FiltersPatch, SortSpec};
use crate::task::{Category, CategoryDraft, CategoryPatch, Task, TaskDraft, TaskPatch};

/// A workflow column: an ordered list of task ids under a title.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub task_ids: Vec<String>,
}

/// The whole board. Slots persist independently; see the storage module.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardState {
    pub tasks: Vec<Task>,
    pub columns: BTreeMap<String, Column>,
    pub column_order: Vec<String>,
    pub categories: Vec<Category>,
    pub filters: Filters,
    pub sort_by: SortSpec,
}

impl BoardState {
    /// The seeded empty board: three workflow columns and four categories.
    pub fn initial() -> Self {
        Self {
            tasks: Vec::new(),
            columns: default_columns(),
            column_order: default_column_order(),
            categories: default_categories(),
            filters: Filters::default(),
            sort_by: SortSpec::default(),
        }
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// The column currently holding `task_id`, if any.
    pub fn column_of_task(&self, task_id: &str) -> Option<&Column> {
        self.columns
            .values()
            .find(|column| column.task_ids.iter().any(|id| id == task_id))
    }
}

pub fn default_columns() -> BTreeMap<String, Column> {
    let mut columns = BTreeMap::new();
    for (id, title) in [
        ("column-1", "To Do"),
        ("column-2", "In Progress"),
        ("column-3", "Done"),
    ] {
        columns.insert(
            id.to_string(),
            Column {
                id: id.to_string(),
                title: title.to_string(),
                task_ids: Vec::new(),
            },
        );
    }
    columns
}

pub fn default_column_order() -> Vec<String> {
    vec![
        "column-1".to_string(),
        "column-2".to_string(),
        "column-3".to_string(),
    ]
}

pub fn default_categories() -> Vec<Category> {
    [
        ("cat-1", "Work", "#4caf50"),
        ("cat-2", "Personal", "#2196f3"),
        ("cat-3", "Study", "#ff9800"),
        ("cat-4", "Health", "#f44336"),
    ]
    .into_iter()
    .map(|(id, name, color)| Category {
        id: id.to_string(),
        name: name.to_string(),
        color: color.to_string(),
    })
    .collect()
}

/// One board mutation.
#[derive(Debug, Clone)]
pub enum Command {
    AddTask(TaskDraft),
    UpdateTask(TaskPatch),
    DeleteTask { id: String },
    ReorderColumns { columns: BTreeMap<String, Column> },
    AddCategory(CategoryDraft),
    UpdateCategory(CategoryPatch),
    DeleteCategory { id: String },
    SetFilters(FiltersPatch),
    ClearFilters,
    SetSort(SortSpec),
}

/// Apply one command to the board, returning the next state.
pub fn apply(state: &BoardState, command: Command, now: DateTime<Utc>) -> Result<BoardState> {
    let mut next = state.clone();
    match command {
        Command::AddTask(draft) => add_task(&mut next, draft, now)?,
        Command::UpdateTask(patch) => update_task(&mut next, patch)?,
        Command::DeleteTask { id } => delete_task(&mut next, &id),
        Command::ReorderColumns { columns } => reorder_columns(&mut next, columns)?,
        Command::AddCategory(draft) => add_category(&mut next, draft)?,
        Command::UpdateCategory(patch) => update_category(&mut next, patch)?,
        Command::DeleteCategory { id } => delete_category(&mut next, &id),
        Command::SetFilters(patch) => set_filters(&mut next, patch),
        Command::ClearFilters => next.filters = Filters::default(),
        Command::SetSort(spec) => next.sort_by = spec,
    }
    Ok(next)
}

fn add_task(state: &mut BoardState, draft: TaskDraft, now: DateTime<Utc>) -> Result<()> {
    let title = draft.title.trim();
    if title.is_empty() {
        return Err(Error::Validation("task title cannot be empty".to_string()));
    }

    // New tasks land in the first column of the display order.
    let column_id = state
        .column_order
        .first()
        .cloned()
        .ok_or_else(|| Error::Structural("board has no columns".to_string()))?;

    let task = Task {
        id: Uuid::new_v4().to_string(),
        title: title.to_string(),
        description: draft.description,
        priority: draft.priority.unwrap_or_default(),
        due_date: draft.due_date,
        category: draft.category,
        tags: draft.tags,
        created_at: now,
        completed_at: None,
        completed: false,
    };
    let task_id = task.id.clone();

    let column = state.columns.get_mut(&column_id).ok_or_else(|| {
        Error::Structural(format!("column order references missing column '{column_id}'"))
    })?;
    column.task_ids.push(task_id);
    state.tasks.push(task);
    Ok(())
}

fn update_task(state: &mut BoardState, patch: TaskPatch) -> Result<()> {
    if let Some(title) = &patch.title {
        if title.trim().is_empty() {
            return Err(Error::Validation("task title cannot be empty".to_string()));
        }
    }

    let task = state
        .tasks
        .iter_mut()
        .find(|task| task.id == patch.id)
        .ok_or_else(|| Error::NotFound(format!("task '{}'", patch.id)))?;

    if let Some(title) = patch.title {
        task.title = title.trim().to_string();
    }
    if let Some(description) = patch.description {
        task.description = description;
    }
    if let Some(priority) = patch.priority {
        task.priority = priority;
    }
    if let Some(due_date) = patch.due_date {
        task.due_date = due_date;
    }
    if let Some(category) = patch.category {
        task.category = category;
    }
    if let Some(tags) = patch.tags {
        task.tags = tags;
    }
    if let Some(completed) = patch.completed {
        task.completed = completed;
    }
    if let Some(completed_at) = patch.completed_at {
        task.completed_at = completed_at;
    }
    Ok(())
}

fn delete_task(state: &mut BoardState, id: &str) {
    state.tasks.retain(|task| task.id != id);
    for column in state.columns.values_mut() {
        column.task_ids.retain(|task_id| task_id != id);
    }
}

fn reorder_columns(state: &mut BoardState, columns: BTreeMap<String, Column>) -> Result<()> {
    validate_column_partition(state, &columns)?;
    state.columns = columns;
    Ok(())
}

/// The reordered columns must cover exactly the current column set and hold
/// every task exactly once.
fn validate_column_partition(
    state: &BoardState,
    columns: &BTreeMap<String, Column>,
) -> Result<()> {
    for key in state.columns.keys() {
        if !columns.contains_key(key) {
            return Err(Error::Structural(format!("reorder must keep column '{key}'")));
        }
    }
    for (key, column) in columns {
        if !state.columns.contains_key(key) {
            return Err(Error::Structural(format!("unknown column '{key}'")));
        }
        if column.id != *key {
            return Err(Error::Structural(format!(
                "column '{}' carries mismatched id '{}'",
                key, column.id
            )));
        }
    }

    let known: HashSet<&str> = state.tasks.iter().map(|task| task.id.as_str()).collect();
    let mut seen: HashSet<&str> = HashSet::new();
    for (key, column) in columns {
        for task_id in &column.task_ids {
            if !known.contains(task_id.as_str()) {
                return Err(Error::Structural(format!(
                    "column '{key}' references unknown task '{task_id}'"
                )));
            }
            if !seen.insert(task_id.as_str()) {
                return Err(Error::Structural(format!(
                    "task '{task_id}' appears in more than one place"
                )));
            }
        }
    }
    if seen.len() != state.tasks.len() {
        let missing = state
            .tasks
            .iter()
            .find(|task| !seen.contains(task.id.as_str()))
            .map(|task| task.id.clone())
            .unwrap_or_default();
        return Err(Error::Structural(format!(
            "task '{missing}' is missing from the reordered columns"
        )));
    }
    Ok(())
}

fn add_category(state: &mut BoardState, draft: CategoryDraft) -> Result<()> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(Error::Validation("category name cannot be empty".to_string()));
    }
    state.categories.push(Category {
        id: format!("cat-{}", Uuid::new_v4()),
        name: name.to_string(),
        color: draft.color,
    });
    Ok(())
}

fn update_category(state: &mut BoardState, patch: CategoryPatch) -> Result<()> {
    if let Some(name) = &patch.name {
        if name.trim().is_empty() {
            return Err(Error::Validation("category name cannot be empty".to_string()));
        }
    }

    let category = state
        .categories
        .iter_mut()
        .find(|category| category.id == patch.id)
        .ok_or_else(|| Error::NotFound(format!("category '{}'", patch.id)))?;

    if let Some(name) = patch.name {
        category.name = name.trim().to_string();
    }
    if let Some(color) = patch.color {
        category.color = color;
    }
    Ok(())
}

fn delete_category(state: &mut BoardState, id: &str) {
    state.categories.retain(|category| category.id != id);
    for task in &mut state.tasks {
        if task.category.as_deref() == Some(id) {
            task.category = None;
        }
    }
}

fn set_filters(state: &mut BoardState, patch: FiltersPatch) {
    if let Some(search_term) = patch.search_term {
        state.filters.search_term = search_term;
    }
    if let Some(priority) = patch.priority {
        state.filters.priority = priority;
    }
    if let Some(category) = patch.category {
        state.filters.category = category;
    }
    if let Some(due_date) = patch.due_date {
        state.filters.due_date = due_date;
    }
}
