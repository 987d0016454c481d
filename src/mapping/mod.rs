//! Field mapping: document sub-trees to table-shaped records
//!
//! One pure function per destination entity. Mappers never touch the store;
//! they only read JSON and apply default substitution and normalization.

mod chain;
mod ltr;
pub mod normalize;
mod records;
mod run;

pub use chain::{map_chain, map_motifs, map_subgenes_and_domains};
pub use ltr::{map_chain_ltrs, map_ltrs, map_solo_ltrs, LtrSet};
pub use normalize::Fields;
pub use records::{
    ChainRecord, DomainRecord, LtrOrigin, LtrRecord, MotifCategory, MotifRecord, RunRecord,
    SubgeneIndex, SubgeneRecord,
};
pub use run::map_run;

use thiserror::Error;

/// Kind of entity a mapper produces, used to label errors and logs.
///
/// Displays as the name of the destination table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Run,
    Chain,
    Subgene,
    Domain,
    Motif,
    Ltr,
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Entity::Run => "run_metadata",
            Entity::Chain => "herv_chain",
            Entity::Subgene => "subgenes",
            Entity::Domain => "domains",
            Entity::Motif => "motifs",
            Entity::Ltr => "ltr",
        };
        f.write_str(name)
    }
}

/// Errors raised while projecting the document onto records
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("{entity}: required field '{field}' is missing")]
    MissingField { entity: Entity, field: String },

    #[error("{entity}: field '{field}' has unusable value {value}")]
    InvalidValue {
        entity: Entity,
        field: String,
        value: String,
    },

    #[error("{entity}: expected a JSON object")]
    NotAnObject { entity: Entity },
}

/// Result type for mapping operations
pub type MappingResult<T> = Result<T, MappingError>;
