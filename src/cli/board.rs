//! taskdeck board view.

use std::path::PathBuf;

use chrono::Utc;

use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::store::BoardStore;
use crate::task::Task;

pub struct BoardOptions {
    pub board: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub fn run(options: BoardOptions) -> Result<()> {
    let board_dir = super::resolve_board_dir(options.board)?;
    let store = BoardStore::open(board_dir);
    let now = Utc::now();
    let state = store.state();

    let mut columns = Vec::new();
    for column_id in &state.column_order {
        let column = match state.columns.get(column_id) {
            Some(column) => column,
            None => continue,
        };
        // Ids without a backing task are skipped, not rendered as holes.
        let tasks: Vec<Task> = column
            .task_ids
            .iter()
            .filter_map(|task_id| state.task(task_id).cloned())
            .collect();
        columns.push(BoardColumnOutput {
            id: column.id.clone(),
            title: column.title.clone(),
            tasks,
        });
    }

    let total: usize = columns.iter().map(|column| column.tasks.len()).sum();
    let output = BoardOutput { columns };

    let mut human = HumanOutput::new("Board");
    human.push_summary("Columns", output.columns.len().to_string());
    human.push_summary("Tasks", total.to_string());
    for column in &output.columns {
        human.push_detail(format!("{} ({})", column.title, column.tasks.len()));
        for task in &column.tasks {
            human.push_detail(format!("  {}", super::task::task_line(task, now)));
        }
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "board",
        &output,
        Some(&human),
    )
}

#[derive(serde::Serialize)]
struct BoardColumnOutput {
    id: String,
    title: String,
    tasks: Vec<Task>,
}

#[derive(serde::Serialize)]
struct BoardOutput {
    columns: Vec<BoardColumnOutput>,
}
