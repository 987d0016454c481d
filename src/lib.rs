//! retrotector-db: RetroTector output loader
//!
//! Reads the JSON document RetroTector writes for one run and loads it into
//! six related tables, parents before children, so that every row points at
//! the generated key of the row it was nested under.
//!
//! # Core Concepts
//!
//! - **Document**: one run's output (`header`, `footer`, `soloLTRs`, `pseuGID`)
//! - **Mappers**: pure functions from a JSON sub-tree to a typed table record
//! - **Loader**: drives the inserts through a `RecordStore`, one unit of work
//!   per logical group
//!
//! # Example
//!
//! ```
//! use retrotector_db::{load_document, Document, OpenStore, SqliteStore};
//!
//! let store = SqliteStore::open_in_memory().unwrap();
//! let document = Document::from_json_str(r#"{"footer": {"db_name": "HERVdb"}}"#).unwrap();
//! let report = load_document(&store, &document).unwrap();
//! assert_eq!(report.chains, 0);
//! ```

pub mod document;
pub mod load;
pub mod mapping;
pub mod storage;

pub use document::{Document, DocumentError};
pub use load::{load_document, LoadError, LoadOptions, LoadReport, LoadResult, Loader, LtrLinkage, ResolutionError};
pub use mapping::{Entity, MappingError};
pub use storage::{OpenStore, RecordStore, RowId, SqliteStore, StorageError, StorageResult, Table};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
