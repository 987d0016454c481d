//! Load pipeline: one document into the store
//!
//! The orchestrator maps each entity with the `mapping` functions and
//! inserts it through a `RecordStore`, parents before children. Subgene
//! keys are remapped per chain by the `KeyResolver`.

mod keys;
mod orchestrator;

pub use keys::{KeyResolver, ResolutionError};
pub use orchestrator::{load_document, LoadError, LoadOptions, LoadReport, LoadResult, Loader, LtrLinkage};
