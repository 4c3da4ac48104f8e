//! Tests for caller-side validation.

use crate::profile::validation::*;
use crate::profile::{Garden, TaskDraft, TaskStatus, TaskUpdate};

#[test]
fn username_rules() {
    assert!(validate_username("mole_hunter_42").is_ok());
    assert_eq!(validate_username("ab"), Err(ValidationError::UsernameTooShort));
    assert_eq!(
        validate_username("mole hunter"),
        Err(ValidationError::UsernameInvalidChars)
    );
    assert_eq!(
        validate_username("mole-hunter"),
        Err(ValidationError::UsernameInvalidChars)
    );
    assert_eq!(
        validate_username("mölé"),
        Err(ValidationError::UsernameInvalidChars)
    );
}

#[test]
fn username_messages_are_friendly() {
    assert_eq!(
        ValidationError::UsernameTooShort.to_string(),
        "Username must be at least 3 characters."
    );
    assert_eq!(
        ValidationError::UsernameInvalidChars.to_string(),
        "Username can only contain letters, numbers, and underscores."
    );
}

#[test]
fn new_garden_is_trimmed() {
    assert_eq!(validate_new_garden("  Work  ", &[]).unwrap(), "Work");
}

#[test]
fn new_garden_rejects_blank() {
    assert_eq!(
        validate_new_garden("   ", &[]),
        Err(ValidationError::EmptyGardenName)
    );
}

#[test]
fn new_garden_collision_is_case_insensitive() {
    let existing = vec![Garden::new("Work")];

    let err = validate_new_garden("work", &existing).unwrap_err();

    assert_eq!(
        err,
        ValidationError::DuplicateGarden {
            name: "work".to_string()
        }
    );
    assert_eq!(err.to_string(), "A garden with this name already exists!");
}

#[test]
fn new_garden_rejects_long_names() {
    let name = "g".repeat(GARDEN_NAME_MAX_LEN + 1);

    assert_eq!(
        validate_new_garden(&name, &[]),
        Err(ValidationError::TooLong {
            field: "Garden name",
            max: GARDEN_NAME_MAX_LEN
        })
    );
}

#[test]
fn task_name_limits() {
    assert_eq!(validate_task_name(" Pay bills ").unwrap(), "Pay bills");
    assert_eq!(validate_task_name(""), Err(ValidationError::EmptyTaskName));
    assert!(validate_task_name(&"x".repeat(TASK_NAME_MAX_LEN)).is_ok());
    assert!(validate_task_name(&"x".repeat(TASK_NAME_MAX_LEN + 1)).is_err());
}

#[test]
fn description_limit() {
    assert_eq!(validate_description("").unwrap(), "");
    assert!(validate_description(&"d".repeat(DESCRIPTION_MAX_LEN)).is_ok());
    assert_eq!(
        validate_description(&"d".repeat(DESCRIPTION_MAX_LEN + 1)),
        Err(ValidationError::TooLong {
            field: "Details",
            max: DESCRIPTION_MAX_LEN
        })
    );
}

#[test]
fn due_date_parsing() {
    assert_eq!(validate_due_date(None).unwrap(), None);
    assert_eq!(validate_due_date(Some("  ")).unwrap(), None);
    assert_eq!(
        validate_due_date(Some("2025-01-01")).unwrap(),
        Some("2025-01-01".to_string())
    );
    assert!(matches!(
        validate_due_date(Some("01/01/2025")),
        Err(ValidationError::InvalidDueDate { .. })
    ));
    assert!(validate_due_date(Some("2025-02-30")).is_err());
}

#[test]
fn draft_becomes_new_task() {
    let draft = TaskDraft {
        name: "  Pay bills ".to_string(),
        description: " electricity ".to_string(),
        due_date: Some("2025-01-01".to_string()),
    };

    let task = validate_draft(&draft).unwrap();

    assert_eq!(task.name, "Pay bills");
    assert_eq!(task.description, "electricity");
    assert_eq!(task.due_date.as_deref(), Some("2025-01-01"));
}

#[test]
fn update_validation_keeps_clear_and_status() {
    let update = TaskUpdate {
        name: Some(" Renamed ".to_string()),
        description: None,
        status: Some(TaskStatus::Whacked),
        due_date: Some(None),
    };

    let validated = validate_update(update).unwrap();

    assert_eq!(validated.name.as_deref(), Some("Renamed"));
    assert_eq!(validated.status, Some(TaskStatus::Whacked));
    assert_eq!(validated.due_date, Some(None));
}

#[test]
fn update_validation_rejects_blank_name() {
    let update = TaskUpdate {
        name: Some("   ".to_string()),
        ..TaskUpdate::default()
    };

    assert_eq!(validate_update(update), Err(ValidationError::EmptyTaskName));
}
