use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::board::Column;
use crate::task::{Category, Priority, Task};

#[derive(Debug, Clone, Serialize)]
pub struct BoardSummary {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub high_priority_tasks: usize,
    pub upcoming_deadlines: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductivityMetrics {
    /// Completed share of all tasks, rounded percent.
    pub completion_rate: u32,
    /// Completed share of high-priority tasks, rounded percent.
    pub high_priority_completion: u32,
    /// Mean whole days from creation to completion across completed tasks.
    pub avg_completion_days: i64,
    /// Completions per day over the trailing 30 days, one decimal.
    pub efficiency: f64,
    /// Days to clear the remaining tasks at the current efficiency.
    pub forecast_days: i64,
    /// Weighted composite of the rates above, 0-100.
    pub productivity_score: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub created: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletionTrend {
    pub window_days: usize,
    pub points: Vec<TrendPoint>,
    pub total_created: usize,
    pub total_completed: usize,
    pub completion_rate: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryShare {
    pub id: String,
    pub name: String,
    pub color: String,
    pub tasks: usize,
    pub percentage: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnCount {
    pub id: String,
    pub title: String,
    pub tasks: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnProgress {
    pub columns: Vec<ColumnCount>,
    pub total: usize,
    pub completion_rate: u32,
}

/// Headline counts for the board overview.
pub fn board_summary(tasks: &[Task], upcoming_days: i64, now: DateTime<Utc>) -> BoardSummary {
    BoardSummary {
        total_tasks: tasks.len(),
        completed_tasks: tasks.iter().filter(|task| task.completed).count(),
        high_priority_tasks: tasks
            .iter()
            .filter(|task| task.priority == Priority::High)
            .count(),
        upcoming_deadlines: upcoming_tasks(tasks, upcoming_days, now).len(),
    }
}

pub fn productivity(tasks: &[Task], now: DateTime<Utc>) -> ProductivityMetrics {
    if tasks.is_empty() {
        return ProductivityMetrics {
            completion_rate: 0,
            high_priority_completion: 0,
            avg_completion_days: 0,
            efficiency: 0.0,
            forecast_days: 0,
            productivity_score: 0,
        };
    }

    let completed: Vec<&Task> = tasks.iter().filter(|task| task.completed).collect();
    let completion_rate = ratio_pct(completed.len(), tasks.len());

    let high_priority = tasks
        .iter()
        .filter(|task| task.priority == Priority::High)
        .count();
    let completed_high = tasks
        .iter()
        .filter(|task| task.priority == Priority::High && task.completed)
        .count();
    let high_priority_completion = if high_priority == 0 {
        0
    } else {
        ratio_pct(completed_high, high_priority)
    };

    let avg_completion_days = if completed.is_empty() {
        0
    } else {
        let total_days: i64 = completed
            .iter()
            .map(|task| {
                let finished = task.completed_at.unwrap_or(now);
                (finished - task.created_at).num_days().max(0)
            })
            .sum();
        (total_days as f64 / completed.len() as f64).round() as i64
    };

    // Throughput over the trailing 30 days; only dated completions count.
    let cutoff = now - Duration::days(30);
    let recent_completed = completed
        .iter()
        .filter(|task| task.completed_at.map(|at| at >= cutoff).unwrap_or(false))
        .count();
    let efficiency = round1(recent_completed as f64 / 30.0);

    let remaining = tasks.len() - completed.len();
    let forecast_days = if efficiency > 0.0 {
        (remaining as f64 / efficiency).ceil() as i64
    } else {
        0
    };

    let throughput_score = (efficiency * 20.0).min(100.0);
    let productivity_score = (completion_rate as f64 * 0.4
        + high_priority_completion as f64 * 0.3
        + throughput_score * 0.3)
        .round() as u32;

    ProductivityMetrics {
        completion_rate,
        high_priority_completion,
        avg_completion_days,
        efficiency,
        forecast_days,
        productivity_score,
    }
}

/// Created/completed counts per UTC calendar day over the trailing window,
/// oldest day first. Completions without a timestamp count as completed now.
pub fn completion_trend(tasks: &[Task], window_days: usize, now: DateTime<Utc>) -> CompletionTrend {
    let today = now.date_naive();
    let mut points = Vec::with_capacity(window_days);
    for offset in (0..window_days).rev() {
        let day = today - Duration::days(offset as i64);
        let created = tasks
            .iter()
            .filter(|task| task.created_at.date_naive() == day)
            .count();
        let completed = tasks
            .iter()
            .filter(|task| task.completed && task.completed_at.unwrap_or(now).date_naive() == day)
            .count();
        points.push(TrendPoint {
            date: day,
            created,
            completed,
        });
    }

    let total_created: usize = points.iter().map(|point| point.created).sum();
    let total_completed: usize = points.iter().map(|point| point.completed).sum();
    let completion_rate = if total_created == 0 {
        0
    } else {
        ratio_pct(total_completed, total_created)
    };

    CompletionTrend {
        window_days,
        points,
        total_created,
        total_completed,
        completion_rate,
    }
}

/// Task count and rounded percentage per category, in category order.
pub fn category_distribution(tasks: &[Task], categories: &[Category]) -> Vec<CategoryShare> {
    categories
        .iter()
        .map(|category| {
            let count = tasks
                .iter()
                .filter(|task| task.category.as_deref() == Some(category.id.as_str()))
                .count();
            let percentage = if tasks.is_empty() {
                0
            } else {
                ratio_pct(count, tasks.len())
            };
            CategoryShare {
                id: category.id.clone(),
                name: category.name.clone(),
                color: category.color.clone(),
                tasks: count,
                percentage,
            }
        })
        .collect()
}

/// Per-column task counts in display order. The completion rate treats the
/// last column as the terminal stage.
pub fn column_progress(columns: &BTreeMap<String, Column>, column_order: &[String]) -> ColumnProgress {
    let counts: Vec<ColumnCount> = column_order
        .iter()
        .filter_map(|id| columns.get(id))
        .map(|column| ColumnCount {
            id: column.id.clone(),
            title: column.title.clone(),
            tasks: column.task_ids.len(),
        })
        .collect();

    let total: usize = counts.iter().map(|count| count.tasks).sum();
    let done = counts.last().map(|count| count.tasks).unwrap_or(0);
    let completion_rate = if total == 0 { 0 } else { ratio_pct(done, total) };

    ColumnProgress {
        columns: counts,
        total,
        completion_rate,
    }
}

/// Overdue means due in the past on an earlier calendar day, and not done.
pub fn is_overdue(task: &Task, now: DateTime<Utc>) -> bool {
    match task.due_date {
        Some(due) if !task.completed => due < now && due.date_naive() != now.date_naive(),
        _ => false,
    }
}

pub fn overdue_tasks<'a>(tasks: &'a [Task], now: DateTime<Utc>) -> Vec<&'a Task> {
    tasks.iter().filter(|task| is_overdue(task, now)).collect()
}

/// Incomplete tasks due within the window, both ends inclusive.
pub fn upcoming_tasks<'a>(
    tasks: &'a [Task],
    window_days: i64,
    now: DateTime<Utc>,
) -> Vec<&'a Task> {
    let end = now + Duration::days(window_days);
    tasks
        .iter()
        .filter(|task| {
            if task.completed {
                return false;
            }
            match task.due_date {
                Some(due) => due >= now && due <= end,
                None => false,
            }
        })
        .collect()
}

fn ratio_pct(part: usize, whole: usize) -> u32 {
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
