//! taskdeck sort command implementations.

use std::path::PathBuf;

use chrono::Utc;

use crate::board::Command;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::query::SortSpec;
use crate::store::BoardStore;

pub struct SetOptions {
    pub field: String,
    pub direction: String,
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

    let spec = SortSpec {
        field: options.field.parse()?,
        direction: options.direction.parse()?,
    };
    store.dispatch(Command::SetSort(spec), now)?;
    store.flush()?;

    let mut human = HumanOutput::new("Sort order updated");
    human.push_summary("Field", spec.field.to_string());
    human.push_summary("Direction", spec.direction.to_string());

    let output = SortOutput { sort: spec };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "sort set",
        &output,
        Some(&human),
    )
}

pub fn run_show(options: ShowOptions) -> Result<()> {
    let board_dir = super::resolve_board_dir(options.board)?;
    let store = BoardStore::open(board_dir);

    let spec = store.state().sort_by;

    let mut human = HumanOutput::new("Sort order");
    human.push_summary("Field", spec.field.to_string());
    human.push_summary("Direction", spec.direction.to_string());

    let output = SortOutput { sort: spec };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "sort show",
        &output,
        Some(&human),
    )
}

#[derive(serde::Serialize)]
struct SortOutput {
    sort: SortSpec,
}
