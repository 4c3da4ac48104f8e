//! SQLite implementation of the document store.

mod connection;

#[cfg(test)]
mod connection_test;

pub use connection::SqliteDocumentStore;
