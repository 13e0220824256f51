//! taskdeck stats, trend, and reminders implementations.

use std::path::PathBuf;

use chrono::Utc;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::stats::{
    self, BoardSummary, CategoryShare, ColumnProgress, CompletionTrend, ProductivityMetrics,
};
use crate::store::BoardStore;
use crate::task::Task;

pub struct OverviewOptions {
    pub board: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct TrendOptions {
    pub days: Option<usize>,
    pub board: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct RemindersOptions {
    pub board: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub fn run_overview(options: OverviewOptions) -> Result<()> {
    let board_dir = super::resolve_board_dir(options.board)?;
    let config = Config::load_from_board(&board_dir);
    let store = BoardStore::open(board_dir);
    let now = Utc::now();
    let state = store.state();

    let summary = stats::board_summary(&state.tasks, config.upcoming_days, now);
    let productivity = stats::productivity(&state.tasks, now);
    let categories = stats::category_distribution(&state.tasks, &state.categories);
    let columns = stats::column_progress(&state.columns, &state.column_order);

    let mut human = HumanOutput::new("Board stats");
    human.push_summary("Tasks", summary.total_tasks.to_string());
    human.push_summary("Completed", summary.completed_tasks.to_string());
    human.push_summary("High priority", summary.high_priority_tasks.to_string());
    human.push_summary(
        "Upcoming deadlines",
        summary.upcoming_deadlines.to_string(),
    );
    human.push_summary(
        "Completion rate",
        format!("{}%", productivity.completion_rate),
    );
    human.push_summary(
        "High priority completion",
        format!("{}%", productivity.high_priority_completion),
    );
    human.push_summary(
        "Avg completion days",
        productivity.avg_completion_days.to_string(),
    );
    human.push_summary("Efficiency", format!("{:.1}/day", productivity.efficiency));
    human.push_summary("Forecast days", productivity.forecast_days.to_string());
    human.push_summary(
        "Productivity score",
        productivity.productivity_score.to_string(),
    );
    for share in &categories {
        human.push_detail(format!(
            "{}: {} tasks ({}%)",
            share.name, share.tasks, share.percentage
        ));
    }
    for column in &columns.columns {
        human.push_detail(format!("{}: {} tasks", column.title, column.tasks));
    }

    let output = StatsOutput {
        summary,
        productivity,
        categories,
        columns,
    };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "stats",
        &output,
        Some(&human),
    )
}

pub fn run_trend(options: TrendOptions) -> Result<()> {
    let board_dir = super::resolve_board_dir(options.board)?;
    let config = Config::load_from_board(&board_dir);
    let store = BoardStore::open(board_dir);
    let now = Utc::now();

    let days = options.days.unwrap_or(config.trend_days);
    if days == 0 || days > 365 {
        return Err(Error::InvalidArgument(
            "days must be between 1 and 365".to_string(),
        ));
    }

    let trend = stats::completion_trend(&store.state().tasks, days, now);

    let mut human = HumanOutput::new("Completion trend");
    human.push_summary("Window", format!("{} days", trend.window_days));
    human.push_summary("Created", trend.total_created.to_string());
    human.push_summary("Completed", trend.total_completed.to_string());
    human.push_summary("Completion rate", format!("{}%", trend.completion_rate));
    for point in &trend.points {
        human.push_detail(format!(
            "{}: {} created, {} completed",
            point.date, point.created, point.completed
        ));
    }

    let output = TrendOutput { trend };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "trend",
        &output,
        Some(&human),
    )
}

pub fn run_reminders(options: RemindersOptions) -> Result<()> {
    let board_dir = super::resolve_board_dir(options.board)?;
    let config = Config::load_from_board(&board_dir);
    let store = BoardStore::open(board_dir);
    let now = Utc::now();
    let state = store.state();

    let overdue: Vec<Task> = stats::overdue_tasks(&state.tasks, now)
        .into_iter()
        .cloned()
        .collect();
    let upcoming: Vec<Task> = stats::upcoming_tasks(&state.tasks, config.upcoming_days, now)
        .into_iter()
        .cloned()
        .collect();

    let mut human = HumanOutput::new("Reminders");
    human.push_summary("Overdue", overdue.len().to_string());
    human.push_summary(
        "Upcoming",
        format!("{} (next {} days)", upcoming.len(), config.upcoming_days),
    );
    for task in &overdue {
        human.push_detail(format!("overdue: {}", super::task::task_line(task, now)));
    }
    for task in &upcoming {
        human.push_detail(format!("upcoming: {}", super::task::task_line(task, now)));
    }
    if overdue.is_empty() && upcoming.is_empty() {
        human.push_detail("nothing due");
    }

    let output = RemindersOutput {
        overdue_total: overdue.len(),
        upcoming_total: upcoming.len(),
        overdue,
        upcoming,
    };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "reminders",
        &output,
        Some(&human),
    )
}

#[derive(serde::Serialize)]
struct StatsOutput {
    summary: BoardSummary,
    productivity: ProductivityMetrics,
    categories: Vec<CategoryShare>,
    columns: ColumnProgress,
}

#[derive(serde::Serialize)]
struct TrendOutput {
    trend: CompletionTrend,
}

#[derive(serde::Serialize)]
struct RemindersOutput {
    overdue_total: usize,
    upcoming_total: usize,
    overdue: Vec<Task>,
    upcoming: Vec<Task>,
}
