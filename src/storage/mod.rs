//! Storage backends for retrotector-db
//!
//! Loading goes through the `RecordStore` trait. The primary implementation
//! is `SqliteStore`.

mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{unit_of_work, OpenStore, RecordStore, RowId, StorageError, StorageResult, Table};
