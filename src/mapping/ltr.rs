//! LTR mapper
//!
//! Solo LTRs (root `soloLTRs`) and full LTRs (each chain's `LTRs`) describe
//! the same element with differently named keys. Both map onto `LtrRecord`;
//! columns the other flavour lacks stay NULL.

use super::normalize::Fields;
use super::records::{LtrOrigin, LtrRecord};
use super::{Entity, MappingResult};
use crate::document::Document;
use serde_json::Value;

/// The LTRs of one document, split by origin
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LtrSet {
    pub solo: Vec<LtrRecord>,
    pub full: Vec<LtrRecord>,
}

impl LtrSet {
    /// Solo LTRs first, then full LTRs in chain order
    pub fn all(&self) -> impl Iterator<Item = &LtrRecord> {
        self.solo.iter().chain(self.full.iter())
    }
}

fn map_solo_ltr(entry: &Value) -> MappingResult<LtrRecord> {
    let f = Fields::of(Entity::Ltr, entry)?;

    Ok(LtrRecord {
        origin: LtrOrigin::Solo,
        is_primary: f.flag("primary"),
        ltr_type: Some("solo".to_string()),
        factor_score: None,
        virus_genus: None,
        peak_loc: f.opt_int("peak_loc")?,
        init_idx: f.req_int("init_idx")?,
        fin_idx: f.req_int("fin_idx")?,
        adenylation_loc: f.opt_int("adenylation_loc")?,
        adenylation_seq: f.opt_text("adenylation_seq"),
        u5nn_score: f.opt_float("U5NN_score")?,
        u5nn_idx: f.opt_int("U5NN_loc")?,
        gtmodifier_score: f.opt_float("GT_score")?,
        u3nn_score: f.opt_float("U3NN_score")?,
        u3nn_idx: f.opt_int("U3NN_loc")?,
        tataa_score: f.opt_float("TATAA_score")?,
        tataa_idx: f.opt_int("TATAA_loc")?,
        meme50_score: f.opt_float("MEME50_score")?,
        meme50_idx: f.opt_int("MEME50_loc")?,
        motifs1_score: f.opt_float("Mot1_score")?,
        motifs1_idx: f.opt_int("Mot1_loc")?,
        motifs2_score: f.opt_float("Mot2_score")?,
        motifs2_idx: f.opt_int("Mot2_loc")?,
        transsites_score: f.opt_float("Trans_score")?,
        cpgmodifier_score: f.opt_float("CpG_score")?,
        spl8modifier_score: f.opt_float("Spl8_score")?,
        limiters: None,
        tsd5: f.opt_text("TSD5"),
        tsd3: f.opt_text("TSD3"),
        similarity_start: None,
        similarity_end: None,
    })
}

fn map_full_ltr(chain_index: usize, entry: &Value) -> MappingResult<LtrRecord> {
    let f = Fields::of(Entity::Ltr, entry)?;

    Ok(LtrRecord {
        origin: LtrOrigin::Chain(chain_index),
        is_primary: f.flag("primary"),
        ltr_type: f.opt_text("LTR_type"),
        factor_score: f.opt_float("factor_score")?,
        virus_genus: f.opt_text("virus_genus"),
        peak_loc: None,
        init_idx: f.req_int("init_idx")?,
        fin_idx: f.req_int("fin_idx")?,
        adenylation_loc: f.opt_int("adenylation_loc")?,
        adenylation_seq: f.opt_text("adenylation_seq"),
        u5nn_score: f.opt_float("U5NN_score")?,
        u5nn_idx: f.opt_int("U5NN_idx")?,
        gtmodifier_score: f.opt_float("GTModifier_score")?,
        u3nn_score: f.opt_float("U3NN_score")?,
        u3nn_idx: f.opt_int("U3NN_idx")?,
        tataa_score: f.opt_float("TATAA_score")?,
        tataa_idx: f.opt_int("TATAA_idx")?,
        meme50_score: f.opt_float("MEME50_score")?,
        meme50_idx: f.opt_int("MEME50_idx")?,
        motifs1_score: f.opt_float("Motifs1_score")?,
        motifs1_idx: f.opt_int("Motifs1_idx")?,
        motifs2_score: f.opt_float("Motifs2_score")?,
        motifs2_idx: f.opt_int("Motifs2_idx")?,
        transsites_score: f.opt_float("Transsites_score")?,
        cpgmodifier_score: f.opt_float("CpGModifier_score")?,
        spl8modifier_score: f.opt_float("Spl8Modifier_score")?,
        limiters: f.opt_text("Limiters"),
        tsd5: None,
        tsd3: None,
        similarity_start: f.opt_int("similarity_start")?,
        similarity_end: f.opt_int("similarity_end")?,
    })
}

/// Solo LTRs from the document root
pub fn map_solo_ltrs(document: &Document) -> MappingResult<Vec<LtrRecord>> {
    document.solo_ltrs().iter().map(map_solo_ltr).collect()
}

/// Full LTRs nested in one chain block, tagged with its position in `pseuGID`
pub fn map_chain_ltrs(chain_index: usize, block: &Value) -> MappingResult<Vec<LtrRecord>> {
    let chain = Fields::of(Entity::Chain, block)?;
    chain
        .list("LTRs")?
        .iter()
        .map(|entry| map_full_ltr(chain_index, entry))
        .collect()
}

/// Collect every LTR of the document in one pass.
pub fn map_ltrs(document: &Document) -> MappingResult<LtrSet> {
    let mut set = LtrSet {
        solo: map_solo_ltrs(document)?,
        full: Vec::new(),
    };

    for (chain_index, block) in document.chain_blocks().iter().enumerate() {
        set.full.extend(map_chain_ltrs(chain_index, block)?);
    }

    Ok(set)
}
