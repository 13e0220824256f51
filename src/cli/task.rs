//! taskdeck task command implementations.

use std::path::PathBuf;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use crate::board::{BoardState, Command};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::query::{self, Filters};
use crate::store::BoardStore;
use crate::task::{Priority, Task, TaskDraft, TaskPatch};

pub struct AddOptions {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub due: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub board: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ListOptions {
    pub all: bool,
    pub board: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ShowOptions {
    pub id: String,
    pub board: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct EditOptions {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub due: Option<String>,
    pub clear_due: bool,
    pub category: Option<String>,
    pub clear_category: bool,
    pub tags: Vec<String>,
    pub board: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct CompletionOptions {
    pub id: String,
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

pub struct MoveOptions {
    pub id: String,
    pub to: String,
    pub position: Option<usize>,
    pub board: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let board_dir = super::resolve_board_dir(options.board)?;
    let config = Config::load_from_board(&board_dir);
    let mut store = BoardStore::open(board_dir);
    let now = Utc::now();

    let priority = match options.priority.as_deref() {
        Some(value) => value.parse()?,
        None => config.default_priority,
    };
    let due_date = match options.due.as_deref() {
        Some(value) => Some(parse_due(value, now)?),
        None => None,
    };

    let draft = TaskDraft {
        title: options.title,
        description: options.description.unwrap_or_default(),
        priority: Some(priority),
        due_date,
        category: options.category,
        tags: options.tags,
    };
    store.dispatch(Command::AddTask(draft), now)?;

    // AddTask appends, so the new entry is the last one.
    let task = match store.state().tasks.last() {
        Some(task) => task.clone(),
        None => {
            return Err(Error::OperationFailed(
                "no task recorded after add".to_string(),
            ))
        }
    };
    let column = store
        .state()
        .column_of_task(&task.id)
        .map(|column| column.title.clone());
    store.flush()?;

    let output = TaskAddedOutput {
        id: task.id.clone(),
        priority: task.priority,
        column: column.clone(),
    };

    let mut human = HumanOutput::new("Task added");
    human.push_summary("ID", short_id(&task.id));
    human.push_summary("Title", task.title.as_str());
    human.push_summary("Priority", task.priority.to_string());
    if let Some(due) = task.due_date {
        human.push_summary("Due", due_label(due, now));
    }
    if let Some(column) = column {
        human.push_summary("Column", column);
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "add",
        &output,
        Some(&human),
    )
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let board_dir = super::resolve_board_dir(options.board)?;
    let store = BoardStore::open(board_dir);
    let now = Utc::now();
    let state = store.state();

    let filters = if options.all {
        Filters::default()
    } else {
        state.filters.clone()
    };
    let tasks = query::derive(&state.tasks, &filters, state.sort_by, now);

    let output = TaskListOutput {
        total: tasks.len(),
        tasks: tasks.clone(),
    };

    let mut human = HumanOutput::new("Tasks");
    human.push_summary("Total", tasks.len().to_string());
    if !options.all {
        let hidden = state.tasks.len().saturating_sub(tasks.len());
        if hidden > 0 {
            human.push_summary("Hidden by filters", hidden.to_string());
        }
    }
    for task in &tasks {
        human.push_detail(task_line(task, now));
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "list",
        &output,
        Some(&human),
    )
}

pub fn run_show(options: ShowOptions) -> Result<()> {
    let board_dir = super::resolve_board_dir(options.board)?;
    let store = BoardStore::open(board_dir);
    let now = Utc::now();

    let task = resolve_task(store.state(), &options.id)?.clone();
    let column = store
        .state()
        .column_of_task(&task.id)
        .map(|column| ColumnRefOutput {
            id: column.id.clone(),
            title: column.title.clone(),
        });

    let mut human = HumanOutput::new("Task");
    human.push_summary("ID", task.id.as_str());
    human.push_summary("Title", task.title.as_str());
    human.push_summary("Priority", task.priority.to_string());
    if let Some(column) = &column {
        human.push_summary("Column", column.title.as_str());
    }
    if let Some(due) = task.due_date {
        human.push_summary("Due", due_label(due, now));
    }
    if let Some(category_id) = &task.category {
        let name = store
            .state()
            .category(category_id)
            .map(|category| category.name.clone())
            .unwrap_or_else(|| category_id.clone());
        human.push_summary("Category", name);
    }
    if !task.tags.is_empty() {
        human.push_summary("Tags", task.tags.join(", "));
    }
    human.push_summary("Completed", if task.completed { "yes" } else { "no" });
    human.push_summary(
        "Created",
        task.created_at.format("%Y-%m-%d %H:%M").to_string(),
    );
    if !task.description.is_empty() {
        human.push_detail(task.description.clone());
    }

    let output = TaskDetailOutput { task, column };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "show",
        &output,
        Some(&human),
    )
}

pub fn run_edit(options: EditOptions) -> Result<()> {
    let board_dir = super::resolve_board_dir(options.board)?;
    let mut store = BoardStore::open(board_dir);
    let now = Utc::now();

    if options.due.is_some() && options.clear_due {
        return Err(Error::InvalidArgument(
            "cannot combine --due with --clear-due".to_string(),
        ));
    }
    if options.category.is_some() && options.clear_category {
        return Err(Error::InvalidArgument(
            "cannot combine --category with --clear-category".to_string(),
        ));
    }
    let no_changes = options.title.is_none()
        && options.description.is_none()
        && options.priority.is_none()
        && options.due.is_none()
        && !options.clear_due
        && options.category.is_none()
        && !options.clear_category
        && options.tags.is_empty();
    if no_changes {
        return Err(Error::InvalidArgument(
            "task edit requires at least one field flag".to_string(),
        ));
    }

    let id = resolve_task(store.state(), &options.id)?.id.clone();
    let mut patch = TaskPatch::for_task(id.clone());
    patch.title = options.title;
    patch.description = options.description;
    patch.priority = match options.priority.as_deref() {
        Some(value) => Some(value.parse()?),
        None => None,
    };
    patch.due_date = if options.clear_due {
        Some(None)
    } else {
        match options.due.as_deref() {
            Some(value) => Some(Some(parse_due(value, now)?)),
            None => None,
        }
    };
    patch.category = if options.clear_category {
        Some(None)
    } else {
        options.category.map(Some)
    };
    if !options.tags.is_empty() {
        patch.tags = Some(options.tags);
    }

    store.dispatch(Command::UpdateTask(patch), now)?;
    let task = store.state().task(&id).cloned().ok_or_else(|| {
        Error::OperationFailed(format!("task '{id}' missing after update"))
    })?;
    let column = store
        .state()
        .column_of_task(&id)
        .map(|column| ColumnRefOutput {
            id: column.id.clone(),
            title: column.title.clone(),
        });
    store.flush()?;

    let mut human = HumanOutput::new("Task updated");
    human.push_summary("ID", short_id(&task.id));
    human.push_summary("Title", task.title.as_str());
    human.push_summary("Priority", task.priority.to_string());
    if let Some(due) = task.due_date {
        human.push_summary("Due", due_label(due, now));
    }

    let output = TaskDetailOutput { task, column };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "edit",
        &output,
        Some(&human),
    )
}

pub fn run_done(options: CompletionOptions) -> Result<()> {
    let board_dir = super::resolve_board_dir(options.board)?;
    let mut store = BoardStore::open(board_dir);
    let now = Utc::now();

    let (id, already_done) = {
        let task = resolve_task(store.state(), &options.id)?;
        (task.id.clone(), task.completed)
    };

    let mut patch = TaskPatch::for_task(id.clone());
    patch.completed = Some(true);
    patch.completed_at = Some(Some(now));
    store.dispatch(Command::UpdateTask(patch), now)?;

    let task = store.state().task(&id).cloned().ok_or_else(|| {
        Error::OperationFailed(format!("task '{id}' missing after update"))
    })?;
    store.flush()?;

    let output = TaskCompletionOutput {
        id: task.id.clone(),
        completed: task.completed,
        completed_at: task.completed_at,
    };

    let mut human = HumanOutput::new("Task completed");
    human.push_summary("ID", short_id(&task.id));
    human.push_summary("Title", task.title.as_str());
    if already_done {
        human.push_warning("task was already completed");
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "done",
        &output,
        Some(&human),
    )
}

pub fn run_reopen(options: CompletionOptions) -> Result<()> {
    let board_dir = super::resolve_board_dir(options.board)?;
    let mut store = BoardStore::open(board_dir);
    let now = Utc::now();

    let (id, was_done) = {
        let task = resolve_task(store.state(), &options.id)?;
        (task.id.clone(), task.completed)
    };

    let mut patch = TaskPatch::for_task(id.clone());
    patch.completed = Some(false);
    patch.completed_at = Some(None);
    store.dispatch(Command::UpdateTask(patch), now)?;

    let task = store.state().task(&id).cloned().ok_or_else(|| {
        Error::OperationFailed(format!("task '{id}' missing after update"))
    })?;
    store.flush()?;

    let output = TaskCompletionOutput {
        id: task.id.clone(),
        completed: task.completed,
        completed_at: task.completed_at,
    };

    let mut human = HumanOutput::new("Task reopened");
    human.push_summary("ID", short_id(&task.id));
    human.push_summary("Title", task.title.as_str());
    if !was_done {
        human.push_warning("task was not completed");
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "reopen",
        &output,
        Some(&human),
    )
}

pub fn run_delete(options: DeleteOptions) -> Result<()> {
    let board_dir = super::resolve_board_dir(options.board)?;
    let mut store = BoardStore::open(board_dir);
    let now = Utc::now();

    // Deleting an unknown id is a no-op, so only prefix ambiguity blocks.
    let id = match resolve_task(store.state(), &options.id) {
        Ok(task) => task.id.clone(),
        Err(Error::NotFound(_)) => options.id.trim().to_string(),
        Err(err) => return Err(err),
    };
    let removed = store.state().task(&id).is_some();

    store.dispatch(Command::DeleteTask { id: id.clone() }, now)?;
    store.flush()?;

    let output = TaskDeletedOutput {
        id: id.clone(),
        removed,
    };

    let mut human = HumanOutput::new(if removed {
        "Task deleted"
    } else {
        "Task already absent"
    });
    human.push_summary("ID", short_id(&id));
    if !removed {
        human.push_warning("no task with this id was on the board");
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "delete",
        &output,
        Some(&human),
    )
}

pub fn run_move(options: MoveOptions) -> Result<()> {
    let board_dir = super::resolve_board_dir(options.board)?;
    let mut store = BoardStore::open(board_dir);
    let now = Utc::now();

    let id = resolve_task(store.state(), &options.id)?.id.clone();
    let target_id = resolve_column(store.state(), &options.to)?;

    let state = store.state();
    let source = state
        .column_of_task(&id)
        .map(|column| (column.id.clone(), column.title.clone()));
    let mut columns = state.columns.clone();
    for column in columns.values_mut() {
        column.task_ids.retain(|task_id| task_id != &id);
    }
    let target = columns
        .get_mut(&target_id)
        .ok_or_else(|| Error::NotFound(format!("column '{target_id}'")))?;
    let end = target.task_ids.len();
    // Positions past the end append.
    let index = options.position.unwrap_or(end).min(end);
    target.task_ids.insert(index, id.clone());
    let target_title = target.title.clone();

    store.dispatch(Command::ReorderColumns { columns }, now)?;
    store.flush()?;

    let output = TaskMovedOutput {
        id: id.clone(),
        from: source.as_ref().map(|(source_id, _)| source_id.clone()),
        to: target_id,
        position: index,
    };

    let mut human = HumanOutput::new("Task moved");
    human.push_summary("ID", short_id(&id));
    if let Some((_, source_title)) = source {
        human.push_summary("From", source_title);
    }
    human.push_summary("To", target_title);
    human.push_summary("Position", index.to_string());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "move",
        &output,
        Some(&human),
    )
}

/// Find a task by exact id or unique id prefix.
pub(super) fn resolve_task<'a>(state: &'a BoardState, reference: &str) -> Result<&'a Task> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidArgument("task id cannot be empty".to_string()));
    }
    if let Some(task) = state.task(trimmed) {
        return Ok(task);
    }
    let matches: Vec<&Task> = state
        .tasks
        .iter()
        .filter(|task| task.id.starts_with(trimmed))
        .collect();
    match matches.len() {
        0 => Err(Error::NotFound(format!("task '{trimmed}'"))),
        1 => Ok(matches[0]),
        _ => Err(Error::InvalidArgument(format!(
            "ambiguous task id '{}': {}",
            trimmed,
            matches
                .iter()
                .map(|task| short_id(&task.id))
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}

/// Find a column by exact id or case-insensitive title.
fn resolve_column(state: &BoardState, reference: &str) -> Result<String> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidArgument(
            "column id cannot be empty".to_string(),
        ));
    }
    if state.columns.contains_key(trimmed) {
        return Ok(trimmed.to_string());
    }
    let lowered = trimmed.to_lowercase();
    let matches: Vec<_> = state
        .columns
        .values()
        .filter(|column| column.title.to_lowercase() == lowered)
        .collect();
    match matches.len() {
        0 => Err(Error::NotFound(format!("column '{trimmed}'"))),
        1 => Ok(matches[0].id.clone()),
        _ => Err(Error::InvalidArgument(format!(
            "ambiguous column '{}': {}",
            trimmed,
            matches
                .iter()
                .map(|column| column.id.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}

/// Accepts RFC 3339 timestamps, plain dates (midnight UTC), and the
/// words "today"/"tomorrow".
pub(super) fn parse_due(value: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    let today = now.date_naive();
    match trimmed.to_lowercase().as_str() {
        "today" => Ok(today.and_time(NaiveTime::MIN).and_utc()),
        "tomorrow" => Ok((today + Duration::days(1)).and_time(NaiveTime::MIN).and_utc()),
        _ => Err(Error::InvalidArgument(format!(
            "invalid due date '{trimmed}': must be YYYY-MM-DD, RFC 3339, today, or tomorrow"
        ))),
    }
}

/// Compact human label for a due date.
pub(super) fn due_label(due: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let today = now.date_naive();
    let date = due.date_naive();
    if date == today {
        "today".to_string()
    } else if date == today + Duration::days(1) {
        "tomorrow".to_string()
    } else {
        date.format("%Y-%m-%d").to_string()
    }
}

/// First eight characters of an id, for human-facing lines.
pub(super) fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// One-line task rendering shared by the list and board views.
pub(super) fn task_line(task: &Task, now: DateTime<Utc>) -> String {
    let mut line = format!(
        "[{}] {} {}",
        task.priority,
        short_id(&task.id),
        task.title
    );
    if let Some(due) = task.due_date {
        line.push_str(&format!(" (due {})", due_label(due, now)));
    }
    if task.completed {
        line.push_str(" (done)");
    }
    line
}

#[derive(serde::Serialize)]
struct TaskAddedOutput {
    id: String,
    priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    column: Option<String>,
}

#[derive(serde::Serialize)]
struct TaskListOutput {
    total: usize,
    tasks: Vec<Task>,
}

#[derive(serde::Serialize)]
struct ColumnRefOutput {
    id: String,
    title: String,
}

#[derive(serde::Serialize)]
struct TaskDetailOutput {
    task: Task,
    #[serde(skip_serializing_if = "Option::is_none")]
    column: Option<ColumnRefOutput>,
}

#[derive(serde::Serialize)]
struct TaskCompletionOutput {
    id: String,
    completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    completed_at: Option<DateTime<Utc>>,
}

#[derive(serde::Serialize)]
struct TaskDeletedOutput {
    id: String,
    removed: bool,
}

#[derive(serde::Serialize)]
struct TaskMovedOutput {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<String>,
    to: String,
    position: usize,
}
