//! Tests for document store error types.

use crate::db::{DbError, DbResult};

#[test]
fn not_found_error_displays_correctly() {
    let err = DbError::NotFound {
        collection: "profiles".to_string(),
        key: "mole_hunter".to_string(),
    };
    assert_eq!(err.to_string(), "Document not found: profiles/mole_hunter");
}

#[test]
fn invalid_data_error_displays_correctly() {
    let err = DbError::InvalidData {
        message: "document must be a JSON object".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Invalid data: document must be a JSON object"
    );
}

#[test]
fn database_error_displays_correctly() {
    let err = DbError::Database {
        message: "disk I/O error".to_string(),
    };
    assert_eq!(err.to_string(), "Database error: disk I/O error");
}

#[test]
fn migration_error_displays_correctly() {
    let err = DbError::Migration {
        message: "failed to apply migration 0001".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Migration error: failed to apply migration 0001"
    );
}

#[test]
fn connection_error_displays_correctly() {
    let err = DbError::Connection {
        message: "unable to open database".to_string(),
    };
    assert_eq!(err.to_string(), "Connection error: unable to open database");
}

#[test]
fn db_result_err_returns_error() {
    let result: DbResult<i32> = Err(DbError::NotFound {
        collection: "user_mappings".to_string(),
        key: "uid-1".to_string(),
    });
    assert!(result.is_err());
}
