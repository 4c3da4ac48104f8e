//! Caller-side input validation.
//!
//! Everything here runs before any store call. A failed check never reaches
//! persistence; its message is meant to be shown next to the form field.

use chrono::NaiveDate;
use miette::Diagnostic;
use thiserror::Error;

use crate::profile::{Garden, NewTask, TaskDraft, TaskUpdate};

pub const USERNAME_MIN_LEN: usize = 3;
pub const TASK_NAME_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 500;
pub const GARDEN_NAME_MAX_LEN: usize = 50;

/// Due dates are calendar dates.
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Input rejected before reaching the store.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please give this mole a name.")]
    #[diagnostic(code(whack::validation::empty_task_name))]
    EmptyTaskName,

    #[error("Please enter a garden name.")]
    #[diagnostic(code(whack::validation::empty_garden_name))]
    EmptyGardenName,

    #[error("Please select or create a garden.")]
    #[diagnostic(code(whack::validation::missing_garden))]
    MissingGarden,

    #[error("A garden with this name already exists!")]
    #[diagnostic(code(whack::validation::duplicate_garden))]
    DuplicateGarden { name: String },

    #[error("{field} must be at most {max} characters.")]
    #[diagnostic(code(whack::validation::too_long))]
    TooLong { field: &'static str, max: usize },

    #[error("Username must be at least 3 characters.")]
    #[diagnostic(code(whack::validation::username_too_short))]
    UsernameTooShort,

    #[error("Username can only contain letters, numbers, and underscores.")]
    #[diagnostic(code(whack::validation::username_invalid))]
    UsernameInvalidChars,

    #[error("This username is already taken.")]
    #[diagnostic(code(whack::validation::username_taken))]
    UsernameTaken { username: String },

    #[error("Please enter a due date as YYYY-MM-DD.")]
    #[diagnostic(code(whack::validation::invalid_due_date))]
    InvalidDueDate { value: String },
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Usernames are 3+ characters of `[A-Za-z0-9_]`.
pub fn validate_username(username: &str) -> ValidationResult<()> {
    if username.chars().count() < USERNAME_MIN_LEN {
        return Err(ValidationError::UsernameTooShort);
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(ValidationError::UsernameInvalidChars);
    }
    Ok(())
}

/// Check a new garden name against the existing ones. Returns the trimmed name.
///
/// Collisions are case-insensitive: "work" clashes with "Work".
pub fn validate_new_garden(name: &str, existing: &[Garden]) -> ValidationResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyGardenName);
    }
    check_len("Garden name", name, GARDEN_NAME_MAX_LEN)?;

    let lowered = name.to_lowercase();
    if existing.iter().any(|g| g.name.to_lowercase() == lowered) {
        return Err(ValidationError::DuplicateGarden {
            name: name.to_string(),
        });
    }
    Ok(name.to_string())
}

/// Returns the trimmed task name.
pub fn validate_task_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyTaskName);
    }
    check_len("Mole name", name, TASK_NAME_MAX_LEN)?;
    Ok(name.to_string())
}

/// Returns the trimmed description.
pub fn validate_description(description: &str) -> ValidationResult<String> {
    let description = description.trim();
    check_len("Details", description, DESCRIPTION_MAX_LEN)?;
    Ok(description.to_string())
}

/// Blank means no due date; anything else must be `YYYY-MM-DD`.
pub fn validate_due_date(due_date: Option<&str>) -> ValidationResult<Option<String>> {
    match due_date.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, DUE_DATE_FORMAT)
            .map(|date| Some(date.format(DUE_DATE_FORMAT).to_string()))
            .map_err(|_| ValidationError::InvalidDueDate {
                value: value.to_string(),
            }),
    }
}

/// Turn a draft into a task ready for `add_task`.
pub fn validate_draft(draft: &TaskDraft) -> ValidationResult<NewTask> {
    Ok(NewTask {
        name: validate_task_name(&draft.name)?,
        description: validate_description(&draft.description)?,
        due_date: validate_due_date(draft.due_date.as_deref())?,
    })
}

/// Validate and trim the fields an edit sets.
pub fn validate_update(update: TaskUpdate) -> ValidationResult<TaskUpdate> {
    let name = update.name.as_deref().map(validate_task_name).transpose()?;
    let description = update
        .description
        .as_deref()
        .map(validate_description)
        .transpose()?;
    let due_date = match update.due_date {
        Some(Some(value)) => Some(validate_due_date(Some(&value))?),
        other => other,
    };

    Ok(TaskUpdate {
        name,
        description,
        status: update.status,
        due_date,
    })
}

fn check_len(field: &'static str, value: &str, max: usize) -> ValidationResult<()> {
    if value.chars().count() > max {
        Err(ValidationError::TooLong { field, max })
    } else {
        Ok(())
    }
}
