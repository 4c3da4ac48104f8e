//! Tests for profile document normalization.

use serde_json::{Value, json};

use crate::profile::normalize::{DocumentShape, NormalizeError, classify, normalize};
use crate::profile::TaskStatus;

fn renormalize(profile: &crate::profile::Profile) -> bool {
    let value = serde_json::to_value(profile).unwrap();
    normalize(value).unwrap().must_persist
}

#[test]
fn legacy_flat_list_is_migrated_to_empty_gardens() {
    let raw = json!({
        "email": "mole@garden.io",
        "username": "mole_hunter",
        "tasks": [
            {"id": 1, "name": "old task", "completed": true},
            {"id": 2, "name": "another", "completed": false}
        ]
    });

    let normalized = normalize(raw).unwrap();

    assert!(normalized.must_persist);
    assert!(normalized.profile.gardens.is_empty());
    assert_eq!(normalized.profile.email, "mole@garden.io");
    assert_eq!(normalized.profile.username, "mole_hunter");
}

#[test]
fn legacy_flat_list_normalization_is_idempotent() {
    let raw = json!({"email": "a@b.co", "username": "abc", "tasks": []});

    let first = normalize(raw).unwrap();
    assert!(first.must_persist);

    assert!(!renormalize(&first.profile));
}

#[test]
fn classify_reports_discarded_legacy_tasks() {
    let raw = json!({"email": "a@b.co", "username": "abc", "tasks": [{}, {}, {}]});

    match classify(raw).unwrap() {
        DocumentShape::LegacyFlatList(doc) => assert_eq!(doc.discarded_tasks, 3),
        other => panic!("expected legacy shape, got {}", other.name()),
    }
}

#[test]
fn tasks_next_to_gardens_is_not_legacy() {
    let raw = json!({"email": "a@b.co", "username": "abc", "tasks": [{}], "gardens": []});

    let shape = classify(raw).unwrap();

    assert_eq!(shape.name(), "canonical");
}

#[test]
fn missing_gardens_defaults_to_empty_without_rewrite() {
    let raw = json!({"email": "a@b.co", "username": "abc"});

    let normalized = normalize(raw).unwrap();

    assert!(normalized.profile.gardens.is_empty());
    assert!(!normalized.must_persist);
}

#[test]
fn completed_true_becomes_whacked() {
    let raw = json!({
        "email": "a@b.co",
        "username": "abc",
        "gardens": [{"name": "Work", "tasks": [
            {"id": "1", "name": "done thing", "completed": true, "dueDate": null, "createdAt": "x"}
        ]}]
    });

    let normalized = normalize(raw).unwrap();

    assert!(normalized.must_persist);
    assert_eq!(
        normalized.profile.gardens[0].tasks[0].status,
        TaskStatus::Whacked
    );
}

#[test]
fn completed_false_becomes_unwhacked() {
    let raw = json!({
        "email": "a@b.co",
        "username": "abc",
        "gardens": [{"name": "Work", "tasks": [
            {"id": "1", "name": "open thing", "completed": false, "dueDate": null}
        ]}]
    });

    let normalized = normalize(raw).unwrap();

    assert!(normalized.must_persist);
    assert_eq!(
        normalized.profile.gardens[0].tasks[0].status,
        TaskStatus::Unwhacked
    );
}

#[test]
fn existing_status_wins_over_completed_flag() {
    let raw = json!({
        "email": "a@b.co",
        "username": "abc",
        "gardens": [{"name": "Work", "tasks": [
            {"id": "1", "name": "t", "completed": true, "status": "in-whacking", "dueDate": null}
        ]}]
    });

    let normalized = normalize(raw).unwrap();

    assert!(!normalized.must_persist);
    assert_eq!(
        normalized.profile.gardens[0].tasks[0].status,
        TaskStatus::InWhacking
    );
}

#[test]
fn missing_status_defaults_to_unwhacked() {
    let raw = json!({
        "email": "a@b.co",
        "username": "abc",
        "gardens": [{"name": "Work", "tasks": [
            {"id": "1", "name": "t", "dueDate": "2025-01-01"}
        ]}]
    });

    let normalized = normalize(raw).unwrap();

    assert!(normalized.must_persist);
    let task = &normalized.profile.gardens[0].tasks[0];
    assert_eq!(task.status, TaskStatus::Unwhacked);
    assert_eq!(task.due_date.as_deref(), Some("2025-01-01"));
}

#[test]
fn absent_due_date_is_set_to_null_and_flagged() {
    let raw = json!({
        "email": "a@b.co",
        "username": "abc",
        "gardens": [{"name": "Work", "tasks": [
            {"id": "1", "name": "t", "status": "whacked"}
        ]}]
    });

    let normalized = normalize(raw).unwrap();

    assert!(normalized.must_persist);
    assert_eq!(normalized.profile.gardens[0].tasks[0].due_date, None);

    let rewritten = serde_json::to_value(&normalized.profile).unwrap();
    assert_eq!(rewritten["gardens"][0]["tasks"][0]["dueDate"], Value::Null);
}

#[test]
fn explicit_null_due_date_is_canonical() {
    let raw = json!({
        "email": "a@b.co",
        "username": "abc",
        "gardens": [{"name": "Work", "tasks": [
            {"id": "1", "name": "t", "description": "", "status": "unwhacked",
             "dueDate": null, "createdAt": "2025-01-01T00:00:00.000Z"}
        ]}]
    });

    let normalized = normalize(raw.clone()).unwrap();

    assert!(!normalized.must_persist);
    assert_eq!(serde_json::to_value(&normalized.profile).unwrap(), raw);
}

#[test]
fn partially_migrated_output_renormalizes_clean() {
    let raw = json!({
        "email": "a@b.co",
        "username": "abc",
        "gardens": [
            {"name": "Work", "tasks": [
                {"id": 1700000000000u64, "name": "a", "completed": true},
                {"id": "1700000000001", "name": "b", "status": "whacked", "dueDate": null}
            ]},
            {"name": "Empty"}
        ]
    });

    let normalized = normalize(raw).unwrap();

    assert!(normalized.must_persist);
    let work = &normalized.profile.gardens[0];
    assert_eq!(work.tasks[0].id, "1700000000000");
    assert_eq!(work.tasks[0].description, "");
    assert!(normalized.profile.gardens[1].tasks.is_empty());
    assert!(!renormalize(&normalized.profile));
}

#[test]
fn garden_order_is_preserved() {
    let raw = json!({
        "email": "a@b.co",
        "username": "abc",
        "gardens": [
            {"name": "Zebra", "tasks": []},
            {"name": "Apple", "tasks": []},
            {"name": "Mango", "tasks": []}
        ]
    });

    let names: Vec<String> = normalize(raw)
        .unwrap()
        .profile
        .gardens
        .into_iter()
        .map(|g| g.name)
        .collect();

    assert_eq!(names, vec!["Zebra", "Apple", "Mango"]);
}

#[test]
fn non_object_document_is_invalid() {
    let result = normalize(json!(["not", "a", "profile"]));

    match result {
        Err(NormalizeError::InvalidDocument { message }) => {
            assert!(message.contains("an array"), "unexpected message: {}", message);
        }
        other => panic!("expected InvalidDocument, got {:?}", other),
    }
}

#[test]
fn unknown_status_defaults_to_unwhacked_and_is_flagged() {
    let raw = json!({
        "email": "a@b.co",
        "username": "abc",
        "gardens": [{"name": "Work", "tasks": [
            {"id": "1", "name": "t", "status": "done", "dueDate": null},
            {"id": "2", "name": "u", "status": "whacked", "dueDate": null}
        ]}]
    });

    assert!(matches!(
        classify(raw.clone()).unwrap(),
        DocumentShape::PartiallyMigrated(_)
    ));

    let normalized = normalize(raw).unwrap();
    let tasks = &normalized.profile.gardens[0].tasks;
    assert!(normalized.must_persist);
    assert_eq!(tasks[0].status, TaskStatus::Unwhacked);
    assert_eq!(tasks[1].status, TaskStatus::Whacked);
    assert!(!renormalize(&normalized.profile));
}

#[test]
fn unknown_status_keeps_legacy_completed_flag() {
    let raw = json!({
        "gardens": [{"name": "Work", "tasks": [
            {"id": "1", "name": "t", "status": 3, "completed": true, "dueDate": null}
        ]}]
    });

    let normalized = normalize(raw).unwrap();

    assert_eq!(
        normalized.profile.gardens[0].tasks[0].status,
        TaskStatus::Whacked
    );
}

#[test]
fn task_without_id_gets_a_generated_one() {
    let raw = json!({
        "gardens": [
            {"name": "Home", "tasks": []},
            {"name": "Work", "tasks": [
                {"id": "1", "name": "keep", "status": "unwhacked", "dueDate": null},
                {"name": "lost id", "status": "unwhacked", "dueDate": null},
                {"id": {"oops": true}, "name": "bad id", "status": "unwhacked", "dueDate": null}
            ]}
        ]
    });

    let normalized = normalize(raw).unwrap();
    let ids: Vec<&str> = normalized.profile.gardens[1]
        .tasks
        .iter()
        .map(|t| t.id.as_str())
        .collect();

    assert!(normalized.must_persist);
    assert_eq!(ids, vec!["1", "restored-2-2", "restored-2-3"]);
}

#[test]
fn garden_without_name_gets_a_placeholder() {
    let raw = json!({
        "gardens": [
            {"name": "Work", "tasks": []},
            {"tasks": [{"id": "1", "name": "t", "status": "unwhacked", "dueDate": null}]}
        ]
    });

    let normalized = normalize(raw).unwrap();

    assert!(normalized.must_persist);
    assert_eq!(normalized.profile.gardens[1].name, "Garden 2");
    assert_eq!(normalized.profile.gardens[1].tasks.len(), 1);
}

#[test]
fn malformed_garden_list_is_still_invalid() {
    let raw = json!({"email": "a@b.co", "username": "abc", "gardens": "Work"});

    assert!(matches!(
        normalize(raw),
        Err(NormalizeError::InvalidDocument { .. })
    ));
}
