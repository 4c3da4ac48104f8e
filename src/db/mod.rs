//! Document store abstraction layer.
//!
//! The rest of the crate talks to storage only through the [`DocumentStore`]
//! trait, so backends (SQLite, in-memory, a remote service) can be swapped
//! without touching profile logic.
//!
//! # Architecture
//!
//! - `error`: Storage-agnostic error types
//! - `repository`: The `DocumentStore` trait and collection names
//! - `memory`: Volatile in-memory backend
//! - `sqlite`: SQLite backend built on sqlx

mod error;
mod memory;
mod repository;
pub mod sqlite;
pub mod utils;

#[cfg(test)]
mod error_test;

pub use error::{DbError, DbResult};
pub use memory::MemoryDocumentStore;
pub use repository::{DocumentStore, IDENTITIES, PROFILES, USER_MAPPINGS};
pub use sqlite::SqliteDocumentStore;
