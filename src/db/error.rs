//! Document store error types.
//!
//! Backend agnostic errors for reading and writing documents. Uses miette for
//! diagnostic output and thiserror for the derive macros.

use miette::Diagnostic;
use thiserror::Error;

/// Document store operation errors.
#[derive(Error, Diagnostic, Debug)]
pub enum DbError {
    #[error("Document not found: {collection}/{key}")]
    #[diagnostic(code(whack::db::not_found))]
    NotFound { collection: String, key: String },

    #[error("Invalid data: {message}")]
    #[diagnostic(code(whack::db::invalid_data))]
    InvalidData { message: String },

    #[error("Database error: {message}")]
    #[diagnostic(code(whack::db::database_error))]
    Database { message: String },

    #[error("Migration error: {message}")]
    #[diagnostic(code(whack::db::migration_error))]
    Migration { message: String },

    #[error("Connection error: {message}")]
    #[diagnostic(code(whack::db::connection_error))]
    Connection { message: String },
}

/// Result type for document store operations.
pub type DbResult<T> = Result<T, DbError>;
