//! Load orchestrator
//!
//! Steps for one document:
//! 1. Run row, committed on its own
//! 2. Per chain block, in source order:
//!    a. chain row (own unit of work)
//!    b. subgenes then domains (one unit of work)
//!    c. motifs (one unit of work)
//!    d. LTRs (one unit of work), linked per `LtrLinkage`
//! 3. Solo LTRs, unlinked (`LtrLinkage::Originating` only)
//!
//! Any error aborts the remaining steps. Units already committed stay.

use super::keys::{KeyResolver, ResolutionError};
use crate::document::{Document, DocumentError};
use crate::mapping::{
    map_chain, map_chain_ltrs, map_ltrs, map_motifs, map_run, map_solo_ltrs,
    map_subgenes_and_domains, DomainRecord, LtrRecord, MappingError, MotifRecord, SubgeneRecord,
};
use crate::storage::{unit_of_work, RecordStore, RowId, StorageError};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that abort a load
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    #[error("Resolution error: {0}")]
    Resolution(#[from] ResolutionError),

    #[error("Store error: {0}")]
    Store(#[from] StorageError),
}

/// Result type for load operations
pub type LoadResult<T> = Result<T, LoadError>;

/// Which chain an LTR row is linked to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LtrLinkage {
    /// Full LTRs link to the chain they were nested in; solo LTRs link to
    /// no chain and are inserted once per document.
    #[default]
    Originating,
    /// Every chain iteration inserts the whole document's LTR set (solo and
    /// all chains' full LTRs) linked to that chain. Solo LTRs get no
    /// unlinked row. Reproduces tables written before the linkage fix.
    CurrentChain,
}

/// Knobs for a load
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    pub ltr_linkage: LtrLinkage,
}

impl LoadOptions {
    pub fn with_ltr_linkage(mut self, linkage: LtrLinkage) -> Self {
        self.ltr_linkage = linkage;
        self
    }
}

/// Rows inserted by one successful load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub run_id: RowId,
    pub chains: usize,
    pub subgenes: usize,
    pub domains: usize,
    pub motifs: usize,
    pub ltrs: usize,
}

impl LoadReport {
    fn new(run_id: RowId) -> Self {
        Self {
            run_id,
            chains: 0,
            subgenes: 0,
            domains: 0,
            motifs: 0,
            ltrs: 0,
        }
    }

    /// All rows, the run row included
    pub fn total_rows(&self) -> usize {
        1 + self.chains + self.subgenes + self.domains + self.motifs + self.ltrs
    }
}

impl std::fmt::Display for LoadReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "run {}: {} chains, {} subgenes, {} domains, {} motifs, {} LTRs",
            self.run_id, self.chains, self.subgenes, self.domains, self.motifs, self.ltrs
        )
    }
}

/// Drives the load of documents into one store
pub struct Loader<'s, S: RecordStore + ?Sized> {
    store: &'s S,
    options: LoadOptions,
}

impl<'s, S: RecordStore + ?Sized> Loader<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            options: LoadOptions::default(),
        }
    }

    pub fn with_options(mut self, options: LoadOptions) -> Self {
        self.options = options;
        self
    }

    /// Load one document. Loading the same document twice inserts two
    /// independent sets of rows.
    pub fn load(&self, document: &Document) -> LoadResult<LoadReport> {
        let blocks = document.chain_blocks();
        info!(
            chains = blocks.len(),
            solo_ltrs = document.solo_ltrs().len(),
            linkage = ?self.options.ltr_linkage,
            "loading document"
        );

        let run = map_run(document)?;
        let run_id = unit_of_work(self.store, |store| store.insert_run(&run))?;
        debug!(%run_id, "run inserted");

        let mut report = LoadReport::new(run_id);

        for (chain_index, block) in blocks.iter().enumerate() {
            self.load_chain(document, run_id, chain_index, block, &mut report)?;
        }

        if self.options.ltr_linkage == LtrLinkage::Originating {
            let solo = map_solo_ltrs(document)?;
            report.ltrs += self.insert_ltrs(None, &solo)?;
        }

        info!(%report, "document loaded");
        Ok(report)
    }

    fn load_chain(
        &self,
        document: &Document,
        run_id: RowId,
        chain_index: usize,
        block: &Value,
        report: &mut LoadReport,
    ) -> LoadResult<()> {
        let chain = map_chain(block)?;
        let chain_id = unit_of_work(self.store, |store| store.insert_chain(run_id, &chain))?;
        report.chains += 1;
        info!(chain_index, %chain_id, chain_type = %chain.type_of_chain, "chain inserted");

        let (subgenes, domains) = map_subgenes_and_domains(block)?;
        self.insert_subgenes_and_domains(chain_id, &subgenes, &domains)?;
        report.subgenes += subgenes.len();
        report.domains += domains.len();

        let motifs = map_motifs(block)?;
        report.motifs += self.insert_motifs(chain_id, &motifs)?;

        let ltrs = match self.options.ltr_linkage {
            LtrLinkage::Originating => map_chain_ltrs(chain_index, block)?,
            LtrLinkage::CurrentChain => {
                let set = map_ltrs(document)?;
                set.all().cloned().collect()
            }
        };
        report.ltrs += self.insert_ltrs(Some(chain_id), &ltrs)?;

        Ok(())
    }

    /// Insert a chain's subgenes, then its domains, as one unit of work.
    ///
    /// Each domain's parent key comes from the subgene row inserted for its
    /// positional index in this same call.
    fn insert_subgenes_and_domains(
        &self,
        chain_id: RowId,
        subgenes: &[SubgeneRecord],
        domains: &[DomainRecord],
    ) -> LoadResult<()> {
        unit_of_work(self.store, |store| {
            let mut keys = KeyResolver::new();

            for subgene in subgenes {
                let id = store.insert_subgene(chain_id, subgene)?;
                keys.assign(subgene.index, id);
            }

            for domain in domains {
                let subgene_id = keys.resolve(domain.subgene)?;
                store.insert_domain(subgene_id, domain)?;
            }

            debug!(%chain_id, subgenes = subgenes.len(), domains = domains.len(), "subgene batch committed");
            Ok::<_, LoadError>(())
        })
    }

    fn insert_motifs(&self, chain_id: RowId, motifs: &[MotifRecord]) -> LoadResult<usize> {
        unit_of_work(self.store, |store| {
            for motif in motifs {
                store.insert_motif(chain_id, motif)?;
            }
            debug!(%chain_id, motifs = motifs.len(), "motif batch committed");
            Ok::<_, LoadError>(motifs.len())
        })
    }

    fn insert_ltrs(&self, chain_id: Option<RowId>, ltrs: &[LtrRecord]) -> LoadResult<usize> {
        if ltrs.is_empty() {
            return Ok(0);
        }
        unit_of_work(self.store, |store| {
            for ltr in ltrs {
                store.insert_ltr(chain_id, ltr)?;
            }
            debug!(chain_id = ?chain_id.map(RowId::get), ltrs = ltrs.len(), "LTR batch committed");
            Ok::<_, LoadError>(ltrs.len())
        })
    }
}

/// Load `document` into `store` with default options
pub fn load_document<S: RecordStore + ?Sized>(store: &S, document: &Document) -> LoadResult<LoadReport> {
    Loader::new(store).load(document)
}
