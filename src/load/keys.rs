//! Positional subgene index to persisted row id

use crate::mapping::SubgeneIndex;
use crate::storage::RowId;
use std::collections::HashMap;
use thiserror::Error;

/// A domain named a parent subgene that was never persisted
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("domain references subgene {index}, which was not inserted for this chain")]
    UnknownSubgene { index: SubgeneIndex },
}

/// Arena of subgene keys for one chain.
///
/// Filled as each subgene row is inserted, read when its domains are
/// inserted, and dropped with the chain. Indices from another chain never
/// resolve here.
#[derive(Debug, Default)]
pub struct KeyResolver {
    persisted: HashMap<SubgeneIndex, RowId>,
}

impl KeyResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the row id the store returned for `index`
    pub fn assign(&mut self, index: SubgeneIndex, id: RowId) {
        self.persisted.insert(index, id);
    }

    pub fn resolve(&self, index: SubgeneIndex) -> Result<RowId, ResolutionError> {
        self.persisted
            .get(&index)
            .copied()
            .ok_or(ResolutionError::UnknownSubgene { index })
    }
}
