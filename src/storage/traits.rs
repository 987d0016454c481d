//! Storage trait definitions

use crate::mapping::{ChainRecord, DomainRecord, LtrRecord, MotifRecord, RunRecord, SubgeneRecord};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Identifier generated by the store when a row is inserted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(i64);

impl RowId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The six destination tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    RunMetadata,
    HervChain,
    Subgenes,
    Domains,
    Motifs,
    Ltr,
}

impl Table {
    pub const ALL: [Table; 6] = [
        Table::RunMetadata,
        Table::HervChain,
        Table::Subgenes,
        Table::Domains,
        Table::Motifs,
        Table::Ltr,
    ];

    /// Table name as it appears in the schema
    pub fn name(self) -> &'static str {
        match self {
            Table::RunMetadata => "run_metadata",
            Table::HervChain => "herv_chain",
            Table::Subgenes => "subgenes",
            Table::Domains => "domains",
            Table::Motifs => "motifs",
            Table::Ltr => "ltr",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Trait for relational storage backends
///
/// Every insert binds a fixed column set for its table and returns the
/// generated primary key. Inserts issued between `begin` and `commit` form
/// one unit of work; outside of one, the backend's autocommit applies.
pub trait RecordStore {
    // === Inserts ===

    fn insert_run(&self, run: &RunRecord) -> StorageResult<RowId>;

    fn insert_chain(&self, run_id: RowId, chain: &ChainRecord) -> StorageResult<RowId>;

    fn insert_subgene(&self, chain_id: RowId, subgene: &SubgeneRecord) -> StorageResult<RowId>;

    fn insert_domain(&self, subgene_id: RowId, domain: &DomainRecord) -> StorageResult<RowId>;

    fn insert_motif(&self, chain_id: RowId, motif: &MotifRecord) -> StorageResult<RowId>;

    /// Insert an LTR; `chain_id` is `None` for LTRs not tied to a chain
    fn insert_ltr(&self, chain_id: Option<RowId>, ltr: &LtrRecord) -> StorageResult<RowId>;

    // === Units of work ===

    fn begin(&self) -> StorageResult<()>;

    fn commit(&self) -> StorageResult<()>;

    fn rollback(&self) -> StorageResult<()>;
}

/// Extension trait for opening stores from paths
pub trait OpenStore: RecordStore + Sized {
    /// Open or create a store at the given path
    fn open(path: impl AsRef<Path>) -> StorageResult<Self>;

    /// Create an in-memory store (useful for testing)
    fn open_in_memory() -> StorageResult<Self>;
}

/// Run `work` inside one unit of work.
///
/// Commits when `work` succeeds. On failure the unit is rolled back and the
/// original error is returned; a rollback failure is only logged.
pub fn unit_of_work<S, T, E, F>(store: &S, work: F) -> Result<T, E>
where
    S: RecordStore + ?Sized,
    E: From<StorageError>,
    F: FnOnce(&S) -> Result<T, E>,
{
    store.begin()?;
    match work(store) {
        Ok(value) => {
            store.commit()?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = store.rollback() {
                tracing::warn!(error = %rollback_err, "rollback failed");
            }
            Err(err)
        }
    }
}
