//! Canonical profile models.
//!
//! These types serialize to the current persisted layout of a profile
//! document. Anything read from storage goes through the normalizer before it
//! becomes one of these.

use serde::{Deserialize, Serialize};

use crate::serde_utils::double_option;

/// Progress of a single task ("mole").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Unwhacked,
    InWhacking,
    Whacked,
}

impl TaskStatus {
    /// All statuses in display order.
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Unwhacked,
        TaskStatus::InWhacking,
        TaskStatus::Whacked,
    ];

    /// Position in the display order. Only used for sorting, never enforced.
    pub fn rank(self) -> u8 {
        match self {
            TaskStatus::Unwhacked => 0,
            TaskStatus::InWhacking => 1,
            TaskStatus::Whacked => 2,
        }
    }

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Unwhacked => "Unwhacked",
            TaskStatus::InWhacking => "In Progress",
            TaskStatus::Whacked => "Whacked",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Unwhacked => write!(f, "unwhacked"),
            TaskStatus::InWhacking => write!(f, "in-whacking"),
            TaskStatus::Whacked => write!(f, "whacked"),
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unwhacked" => Ok(TaskStatus::Unwhacked),
            "in-whacking" => Ok(TaskStatus::InWhacking),
            "whacked" => Ok(TaskStatus::Whacked),
            _ => Err(format!(
                "Invalid task status: {}. Use: unwhacked, in-whacking, whacked",
                s
            )),
        }
    }
}

/// A single trackable item, owned by exactly one garden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: TaskStatus,
    /// Calendar date (`YYYY-MM-DD`). Always serialized, `null` when unset.
    pub due_date: Option<String>,
    pub created_at: String,
}

/// A named collection of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Garden {
    pub name: String,
    pub tasks: Vec<Task>,
}

impl Garden {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tasks: Vec::new(),
        }
    }

    /// Number of tasks marked whacked.
    pub fn whacked_count(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Whacked)
            .count()
    }

    pub fn find_task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }
}

/// The per-user record of gardens and tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub email: String,
    pub username: String,
    pub gardens: Vec<Garden>,
}

impl Profile {
    /// A freshly signed up profile with no gardens.
    pub fn new(email: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            username: username.into(),
            gardens: Vec::new(),
        }
    }

    /// Garden by exact name.
    pub fn garden(&self, name: &str) -> Option<&Garden> {
        self.gardens.iter().find(|g| g.name == name)
    }

    /// Total number of tasks across all gardens.
    pub fn task_count(&self) -> usize {
        self.gardens.iter().map(|g| g.tasks.len()).sum()
    }

    /// Total number of whacked tasks across all gardens.
    pub fn whacked_count(&self) -> usize {
        self.gardens.iter().map(Garden::whacked_count).sum()
    }
}

/// Identity uid → username record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsernameMapping {
    pub username: String,
}

/// Input for creating a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub name: String,
    pub description: String,
    pub due_date: Option<String>,
}

/// Partial task update. Unset fields are left alone.
///
/// `due_date` distinguishes "leave as is" (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<String>>,
}

impl TaskUpdate {
    /// Only change the status.
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.due_date.is_none()
    }

    /// Merge the set fields into `target`. `id` and `created_at` never change.
    pub fn merge_into(self, target: &mut Task) {
        if let Some(name) = self.name {
            target.name = name;
        }
        if let Some(description) = self.description {
            target.description = description;
        }
        if let Some(status) = self.status {
            target.status = status;
        }
        if let Some(due_date) = self.due_date {
            target.due_date = due_date;
        }
    }
}

/// Unvalidated task input as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub name: String,
    pub description: String,
    /// Empty or missing means no due date.
    pub due_date: Option<String>,
}

/// Where a newly spotted task should go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GardenTarget {
    /// An existing garden, matched by exact name.
    Existing(String),
    /// Create this garden first, then add the task to it.
    New(String),
}
