//! Presentation helpers: task ordering, progress and due date labels.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;

use crate::profile::validation::DUE_DATE_FORMAT;
use crate::profile::{Garden, Task};

/// Tasks in display order: by status (unwhacked first), then by due date with
/// undated tasks last. Ties keep their stored order.
pub fn sorted_tasks(tasks: &[Task]) -> Vec<&Task> {
    let mut sorted: Vec<&Task> = tasks.iter().collect();
    sorted.sort_by(|a, b| {
        a.status
            .rank()
            .cmp(&b.status.rank())
            .then_with(|| compare_due(a.due_date.as_deref(), b.due_date.as_deref()))
    });
    sorted
}

fn compare_due(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a.and_then(parse_due), b.and_then(parse_due)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn parse_due(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DUE_DATE_FORMAT).ok()
}

/// Whacked versus total tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub whacked: usize,
    pub total: usize,
}

impl Progress {
    pub fn of_garden(garden: &Garden) -> Self {
        Self {
            whacked: garden.whacked_count(),
            total: garden.tasks.len(),
        }
    }

    pub fn of_gardens(gardens: &[Garden]) -> Self {
        gardens.iter().map(Self::of_garden).fold(Self::default(), |acc, p| Self {
            whacked: acc.whacked + p.whacked,
            total: acc.total + p.total,
        })
    }

    /// Rounded down, 0 for an empty garden.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            0
        } else {
            (self.whacked * 100 / self.total) as u8
        }
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.whacked == self.total
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} moles whacked", self.whacked, self.total)
    }
}

/// Due date relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueLabel {
    Overdue(i64),
    Today,
    Tomorrow,
    /// Two to seven days out.
    InDays(i64),
    On(NaiveDate),
}

impl DueLabel {
    /// `None` when the task has no due date or it does not parse.
    pub fn for_date(due: Option<&str>, today: NaiveDate) -> Option<Self> {
        let date = parse_due(due?)?;
        let days = date.signed_duration_since(today).num_days();
        Some(match days {
            d if d < 0 => DueLabel::Overdue(-d),
            0 => DueLabel::Today,
            1 => DueLabel::Tomorrow,
            2..=7 => DueLabel::InDays(days),
            _ => DueLabel::On(date),
        })
    }

    pub fn is_overdue(&self) -> bool {
        matches!(self, DueLabel::Overdue(_))
    }
}

impl fmt::Display for DueLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DueLabel::Overdue(1) => write!(f, "1 day overdue"),
            DueLabel::Overdue(days) => write!(f, "{} days overdue", days),
            DueLabel::Today => write!(f, "Due today"),
            DueLabel::Tomorrow => write!(f, "Due tomorrow"),
            DueLabel::InDays(days) => write!(f, "Due in {} days", days),
            DueLabel::On(date) => write!(f, "{}", date.format("%b %-d")),
        }
    }
}
