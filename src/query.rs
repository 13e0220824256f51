//! Filter and sort engine for the task list.
//!
//! `derive` is pure: it takes the raw task slice plus the stored filter and
//! sort settings and returns a freshly allocated, filtered, sorted list.
//! Day-bucket boundaries come from the UTC calendar day of `now`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::task::{Priority, Task};

/// Due-date bucket filter. All boundaries are half-open day ranges
/// anchored at the start of the current UTC day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DueFilter {
    Today,
    Week,
    Overdue,
}

impl FromStr for DueFilter {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "today" => Ok(DueFilter::Today),
            "week" => Ok(DueFilter::Week),
            "overdue" => Ok(DueFilter::Overdue),
            other => Err(Error::InvalidArgument(format!(
                "invalid due filter '{other}': must be today, week, or overdue"
            ))),
        }
    }
}

impl fmt::Display for DueFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DueFilter::Today => "today",
            DueFilter::Week => "week",
            DueFilter::Overdue => "overdue",
        };
        write!(f, "{label}")
    }
}

/// Stored filter settings. Empty collections mean "no filtering on this
/// dimension"; they are combined with AND.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    #[serde(default)]
    pub search_term: String,
    #[serde(default)]
    pub priority: Vec<Priority>,
    #[serde(default)]
    pub category: Vec<String>,
    #[serde(default)]
    pub due_date: Option<DueFilter>,
}

impl Filters {
    pub fn is_empty(&self) -> bool {
        self.search_term.is_empty()
            && self.priority.is_empty()
            && self.category.is_empty()
            && self.due_date.is_none()
    }
}

/// Partial update for the stored filters. `None` keeps the current value;
/// the nested option on `due_date` distinguishes "set bucket" from
/// "clear bucket".
#[derive(Debug, Clone, Default)]
pub struct FiltersPatch {
    pub search_term: Option<String>,
    pub priority: Option<Vec<Priority>>,
    pub category: Option<Vec<String>>,
    pub due_date: Option<Option<DueFilter>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Title,
    #[default]
    DueDate,
    Priority,
    CreatedAt,
}

impl FromStr for SortField {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let normalized: String = value
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|ch| *ch != '-' && *ch != '_')
            .collect();
        match normalized.as_str() {
            "title" => Ok(SortField::Title),
            "duedate" => Ok(SortField::DueDate),
            "priority" => Ok(SortField::Priority),
            "createdat" => Ok(SortField::CreatedAt),
            _ => Err(Error::InvalidArgument(format!(
                "invalid sort field '{}': must be title, due-date, priority, or created-at",
                value.trim()
            ))),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SortField::Title => "title",
            SortField::DueDate => "due-date",
            SortField::Priority => "priority",
            SortField::CreatedAt => "created-at",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(Error::InvalidArgument(format!(
                "invalid sort direction '{other}': must be asc or desc"
            ))),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SortSpec {
    #[serde(default)]
    pub field: SortField,
    #[serde(default)]
    pub direction: SortDirection,
}

/// Filter then sort. Applies, in order: search term, priority set,
/// category set, due-date bucket; then a stable sort by the spec.
pub fn derive(tasks: &[Task], filters: &Filters, sort: SortSpec, now: DateTime<Utc>) -> Vec<Task> {
    let mut out: Vec<Task> = tasks.to_vec();

    if !filters.search_term.is_empty() {
        let term = filters.search_term.to_lowercase();
        out.retain(|task| {
            task.title.to_lowercase().contains(&term)
                || task.description.to_lowercase().contains(&term)
        });
    }

    if !filters.priority.is_empty() {
        out.retain(|task| filters.priority.contains(&task.priority));
    }

    if !filters.category.is_empty() {
        // A task without a category never matches an active category filter.
        out.retain(|task| {
            task.category
                .as_ref()
                .map(|category| filters.category.contains(category))
                .unwrap_or(false)
        });
    }

    if let Some(bucket) = filters.due_date {
        let day_start = start_of_day(now);
        out.retain(|task| match task.due_date {
            Some(due) => matches_bucket(due, bucket, day_start),
            None => false,
        });
    }

    out.sort_by(|a, b| compare_tasks(a, b, sort));
    out
}

fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}

fn matches_bucket(due: DateTime<Utc>, bucket: DueFilter, day_start: DateTime<Utc>) -> bool {
    match bucket {
        DueFilter::Today => due >= day_start && due < day_start + Duration::days(1),
        DueFilter::Week => due >= day_start && due < day_start + Duration::days(7),
        DueFilter::Overdue => due < day_start,
    }
}

fn compare_tasks(a: &Task, b: &Task, sort: SortSpec) -> Ordering {
    let ordering = match sort.field {
        SortField::Title => compare_titles(&a.title, &b.title),
        SortField::DueDate => {
            // Tasks without a due date sort last regardless of direction.
            return match (a.due_date, b.due_date) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(left), Some(right)) => directed(left.cmp(&right), sort.direction),
            };
        }
        SortField::Priority => a.priority.rank().cmp(&b.priority.rank()),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
    };
    directed(ordering, sort.direction)
}

fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(text: &str) -> DateTime<Utc> {
        text.parse().expect("timestamp")
    }

    fn task(id: &str, title: &str) -> Task {
        Task {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            priority: Priority::Medium,
            due_date: None,
            category: None,
            tags: Vec::new(),
            created_at: at("2026-08-01T08:00:00Z"),
            completed_at: None,
            completed: false,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 20, 12, 0, 0).single().expect("now")
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|task| task.id.as_str()).collect()
    }

    #[test]
    fn empty_filters_keep_every_task() {
        let tasks = vec![task("a", "Alpha"), task("b", "Beta"), task("c", "Gamma")];
        let out = derive(&tasks, &Filters::default(), SortSpec::default(), now());

        // A permutation of the input: every task exactly once.
        assert_eq!(out.len(), tasks.len());
        for task in &tasks {
            assert_eq!(out.iter().filter(|t| t.id == task.id).count(), 1);
        }
    }

    #[test]
    fn search_matches_title_and_description() {
        let mut report = task("a", "Write report");
        report.description = "quarterly numbers".to_string();
        let other = task("b", "Walk dog");
        let tasks = vec![report, other];

        let filters = Filters {
            search_term: "REPORT".to_string(),
            ..Filters::default()
        };
        assert_eq!(ids(&derive(&tasks, &filters, SortSpec::default(), now())), ["a"]);

        let filters = Filters {
            search_term: "quarterly".to_string(),
            ..Filters::default()
        };
        assert_eq!(ids(&derive(&tasks, &filters, SortSpec::default(), now())), ["a"]);
    }

    #[test]
    fn priority_filter_keeps_selected_levels() {
        let mut high = task("a", "High");
        high.priority = Priority::High;
        let mut low = task("b", "Low");
        low.priority = Priority::Low;
        let tasks = vec![high, low];

        let filters = Filters {
            priority: vec![Priority::High],
            ..Filters::default()
        };
        assert_eq!(ids(&derive(&tasks, &filters, SortSpec::default(), now())), ["a"]);
    }

    #[test]
    fn category_filter_never_matches_uncategorized_tasks() {
        let mut work = task("a", "Work item");
        work.category = Some("cat-1".to_string());
        let bare = task("b", "No category");
        let tasks = vec![work, bare];

        let filters = Filters {
            category: vec!["cat-1".to_string()],
            ..Filters::default()
        };
        assert_eq!(ids(&derive(&tasks, &filters, SortSpec::default(), now())), ["a"]);
    }

    #[test]
    fn due_buckets_use_day_boundaries() {
        let mut today = task("today", "Due today");
        today.due_date = Some(at("2026-08-20T23:00:00Z"));
        let mut tomorrow = task("tomorrow", "Due tomorrow");
        tomorrow.due_date = Some(at("2026-08-21T00:00:00Z"));
        let mut in_six_days = task("six", "Due in six days");
        in_six_days.due_date = Some(at("2026-08-26T09:00:00Z"));
        let mut in_seven_days = task("seven", "Due in a week");
        in_seven_days.due_date = Some(at("2026-08-27T00:00:00Z"));
        let mut yesterday = task("late", "Overdue");
        yesterday.due_date = Some(at("2026-08-19T23:59:59Z"));
        let undated = task("none", "No due date");
        let tasks = vec![today, tomorrow, in_six_days, in_seven_days, yesterday, undated];

        let filter_with = |bucket| Filters {
            due_date: Some(bucket),
            ..Filters::default()
        };

        assert_eq!(
            ids(&derive(&tasks, &filter_with(DueFilter::Today), SortSpec::default(), now())),
            ["today"]
        );
        assert_eq!(
            ids(&derive(&tasks, &filter_with(DueFilter::Week), SortSpec::default(), now())),
            ["today", "tomorrow", "six"]
        );
        assert_eq!(
            ids(&derive(&tasks, &filter_with(DueFilter::Overdue), SortSpec::default(), now())),
            ["late"]
        );
    }

    #[test]
    fn undated_tasks_sort_last_in_both_directions() {
        let mut dated = task("dated", "Dated");
        dated.due_date = Some(at("2026-08-22T10:00:00Z"));
        let undated = task("undated", "Undated");
        let tasks = vec![undated, dated];

        let asc = SortSpec {
            field: SortField::DueDate,
            direction: SortDirection::Asc,
        };
        assert_eq!(ids(&derive(&tasks, &Filters::default(), asc, now())), ["dated", "undated"]);

        let desc = SortSpec {
            field: SortField::DueDate,
            direction: SortDirection::Desc,
        };
        assert_eq!(ids(&derive(&tasks, &Filters::default(), desc, now())), ["dated", "undated"]);
    }

    #[test]
    fn desc_reverses_dated_ordering() {
        let mut early = task("early", "Early");
        early.due_date = Some(at("2026-08-21T10:00:00Z"));
        let mut late = task("late", "Late");
        late.due_date = Some(at("2026-08-25T10:00:00Z"));
        let tasks = vec![early, late];

        let desc = SortSpec {
            field: SortField::DueDate,
            direction: SortDirection::Desc,
        };
        assert_eq!(ids(&derive(&tasks, &Filters::default(), desc, now())), ["late", "early"]);
    }

    #[test]
    fn priority_sort_is_stable_for_ties() {
        let mut first = task("first", "First");
        first.priority = Priority::Medium;
        let mut second = task("second", "Second");
        second.priority = Priority::Medium;
        let mut third = task("third", "Third");
        third.priority = Priority::High;
        let tasks = vec![first, second, third];

        let asc = SortSpec {
            field: SortField::Priority,
            direction: SortDirection::Asc,
        };
        assert_eq!(
            ids(&derive(&tasks, &Filters::default(), asc, now())),
            ["first", "second", "third"]
        );

        // Ties keep input order under the reversed direction too.
        let desc = SortSpec {
            field: SortField::Priority,
            direction: SortDirection::Desc,
        };
        assert_eq!(
            ids(&derive(&tasks, &Filters::default(), desc, now())),
            ["third", "first", "second"]
        );
    }

    #[test]
    fn title_sort_is_case_insensitive() {
        let tasks = vec![task("b", "banana"), task("a", "Apple"), task("c", "cherry")];
        let spec = SortSpec {
            field: SortField::Title,
            direction: SortDirection::Asc,
        };
        assert_eq!(ids(&derive(&tasks, &Filters::default(), spec, now())), ["a", "b", "c"]);
    }

    #[test]
    fn derive_is_idempotent_on_its_own_output() {
        let mut one = task("one", "One");
        one.due_date = Some(at("2026-08-23T10:00:00Z"));
        let mut two = task("two", "Two");
        two.due_date = Some(at("2026-08-21T10:00:00Z"));
        let tasks = vec![one, two];

        let first = derive(&tasks, &Filters::default(), SortSpec::default(), now());
        let second = derive(&first, &Filters::default(), SortSpec::default(), now());
        assert_eq!(first, second);
    }

    #[test]
    fn sort_field_parses_flexible_spellings() {
        assert_eq!("due-date".parse::<SortField>().expect("ok"), SortField::DueDate);
        assert_eq!("dueDate".parse::<SortField>().expect("ok"), SortField::DueDate);
        assert_eq!("created_at".parse::<SortField>().expect("ok"), SortField::CreatedAt);
        assert!("deadline".parse::<SortField>().is_err());
    }

    #[test]
    fn filters_serialize_with_wire_field_names() {
        let filters = Filters {
            search_term: "x".to_string(),
            due_date: Some(DueFilter::Week),
            ..Filters::default()
        };
        let json = serde_json::to_value(&filters).expect("serialize");
        assert_eq!(json["searchTerm"], "x");
        assert_eq!(json["dueDate"], "week");
    }

    #[test]
    fn sort_spec_default_is_due_date_ascending() {
        let spec = SortSpec::default();
        assert_eq!(spec.field, SortField::DueDate);
        assert_eq!(spec.direction, SortDirection::Asc);
    }
}
