//! Typed records, one per destination table

use chrono::{DateTime, Utc};

/// Position of a subgene within its chain block, starting at 0.
///
/// Subgenes carry no natural key in the source document; this index is their
/// identity until the store assigns a row id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubgeneIndex(pub usize);

impl std::fmt::Display for SubgeneIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One RetroTector execution (`run_metadata`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunRecord {
    pub executer: Option<String>,
    pub dna_file: Option<String>,
    pub selected: Option<String>,
    pub database: Option<String>,
    pub execution_duration: i64,
    pub selection_threshold: f64,
    pub input_file: String,
    pub improve_hits_max: i64,
    pub conservation_factor: i64,
    pub subgene_hits_max: i64,
    pub script_path: String,
    pub max_subgene_skip: i64,
    pub strand: String,
    pub sdfactor: bool,
    pub broken_passes: i64,
    pub fit_puteins: Option<String>,
    pub broken_penalty: f64,
    pub final_selection_threshold: f64,
    pub keep_threshold: f64,
    pub frame_factor: f64,
    pub length_bonus: f64,
    pub orfid_min_score: i64,
    pub make_chains_files: String,
    pub debugging: Option<String>,
    pub script_input: String,
    pub run_datetime: Option<DateTime<Utc>>,
    pub retrotector_version: String,
    pub db_name: String,
    pub db_last_modified_datetime: Option<DateTime<Utc>>,
}

/// One candidate chain (`herv_chain`)
#[derive(Debug, Clone, PartialEq)]
pub struct ChainRecord {
    pub chain_level: i64,
    pub chain_start_idx: i64,
    pub chain_end_idx: i64,
    pub retrovirus_type: String,
    pub score: i64,
    pub type_of_chain: String,
    /// Integration sites as JSON text
    pub integration_sites: Option<String>,
}

/// A named functional region of a chain (`subgenes`)
#[derive(Debug, Clone, PartialEq)]
pub struct SubgeneRecord {
    pub index: SubgeneIndex,
    pub name: Option<String>,
    pub subgene_type: Option<String>,
    pub score: Option<f64>,
    pub hotspot: Option<String>,
}

/// A sub-region of a subgene (`domains`)
#[derive(Debug, Clone, PartialEq)]
pub struct DomainRecord {
    /// Parent subgene, by position in the chain block
    pub subgene: SubgeneIndex,
    pub idx: Option<i64>,
    pub domain_type: Option<String>,
    pub origin: Option<String>,
    pub score: Option<f64>,
    pub hotspot: Option<String>,
    pub frame: Option<i64>,
    pub pos_init: Option<i64>,
    pub pos_fin: Option<i64>,
    pub match_input: Option<String>,
    pub reference_match: Option<String>,
    pub n_bases: Option<i64>,
}

/// Regulatory signal categories, in extraction order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotifCategory {
    Slippery,
    PseudoKnot,
    SpliceAcceptor,
    SpliceDonor,
}

impl MotifCategory {
    pub const ORDERED: [MotifCategory; 4] = [
        MotifCategory::Slippery,
        MotifCategory::PseudoKnot,
        MotifCategory::SpliceAcceptor,
        MotifCategory::SpliceDonor,
    ];

    /// Value stored in the `type` column
    pub fn as_str(self) -> &'static str {
        match self {
            MotifCategory::Slippery => "Slippery",
            MotifCategory::PseudoKnot => "PseudoKnot",
            MotifCategory::SpliceAcceptor => "SpliceAcceptor",
            MotifCategory::SpliceDonor => "SpliceDonor",
        }
    }

    /// Key of the sequence holding this category in a chain block
    pub fn source_key(self) -> &'static str {
        match self {
            MotifCategory::Slippery => "Slippery_motifs",
            MotifCategory::PseudoKnot => "PseudoKnot_motifs",
            MotifCategory::SpliceAcceptor => "SpliceAcceptor_motifs",
            MotifCategory::SpliceDonor => "SpliceDonor_motifs",
        }
    }
}

impl std::fmt::Display for MotifCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A regulatory motif found within a chain (`motifs`)
#[derive(Debug, Clone, PartialEq)]
pub struct MotifRecord {
    pub category: MotifCategory,
    pub pos_init: Option<i64>,
    pub pos_end: Option<i64>,
    pub score: Option<f64>,
}

/// Where an LTR was found in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LtrOrigin {
    /// Root-level `soloLTRs`, not part of any chain
    Solo,
    /// `LTRs` of the chain block at this position in `pseuGID`
    Chain(usize),
}

/// A long terminal repeat (`ltr`)
#[derive(Debug, Clone, PartialEq)]
pub struct LtrRecord {
    pub origin: LtrOrigin,
    pub is_primary: bool,
    pub ltr_type: Option<String>,
    pub factor_score: Option<f64>,
    pub virus_genus: Option<String>,
    pub peak_loc: Option<i64>,
    pub init_idx: i64,
    pub fin_idx: i64,
    pub adenylation_loc: Option<i64>,
    pub adenylation_seq: Option<String>,
    pub u5nn_score: Option<f64>,
    pub u5nn_idx: Option<i64>,
    pub gtmodifier_score: Option<f64>,
    pub u3nn_score: Option<f64>,
    pub u3nn_idx: Option<i64>,
    pub tataa_score: Option<f64>,
    pub tataa_idx: Option<i64>,
    pub meme50_score: Option<f64>,
    pub meme50_idx: Option<i64>,
    pub motifs1_score: Option<f64>,
    pub motifs1_idx: Option<i64>,
    pub motifs2_score: Option<f64>,
    pub motifs2_idx: Option<i64>,
    pub transsites_score: Option<f64>,
    pub cpgmodifier_score: Option<f64>,
    pub spl8modifier_score: Option<f64>,
    pub limiters: Option<String>,
    pub tsd5: Option<String>,
    pub tsd3: Option<String>,
    pub similarity_start: Option<i64>,
    pub similarity_end: Option<i64>,
}
