//! Chain-level mappers: the chain row, its subgenes and domains, its motifs

use super::normalize::Fields;
use super::records::{ChainRecord, DomainRecord, MotifCategory, MotifRecord, SubgeneIndex, SubgeneRecord};
use super::{Entity, MappingResult};
use serde_json::Value;

/// Extract the `herv_chain` columns of one chain block.
///
/// Level, offsets, classification and score are required.
pub fn map_chain(block: &Value) -> MappingResult<ChainRecord> {
    let fields = Fields::of(Entity::Chain, block)?;

    Ok(ChainRecord {
        chain_level: fields.req_int("chain_level")?,
        chain_start_idx: fields.req_int("chain_start_idx")?,
        chain_end_idx: fields.req_int("chain_end_idx")?,
        retrovirus_type: fields.req_text("retrovirus_type")?,
        score: fields.req_int("score")?,
        type_of_chain: fields.req_text("type_of_chain")?,
        integration_sites: fields.opt_text("integration_sites"),
    })
}

fn map_subgene(index: SubgeneIndex, fields: &Fields<'_>) -> MappingResult<SubgeneRecord> {
    Ok(SubgeneRecord {
        index,
        name: fields.opt_text("name"),
        subgene_type: fields.opt_text("type"),
        score: fields.opt_float("score")?,
        hotspot: fields.opt_text("hotspot"),
    })
}

fn map_domain(subgene: SubgeneIndex, entry: &Value) -> MappingResult<DomainRecord> {
    let fields = Fields::of(Entity::Domain, entry)?;

    Ok(DomainRecord {
        subgene,
        idx: fields.opt_int("idx")?,
        domain_type: fields.opt_text("type"),
        origin: fields.opt_text("origin"),
        score: fields.opt_float("score")?,
        hotspot: fields.opt_text("hotspot"),
        frame: fields.opt_int("frame")?,
        pos_init: fields.opt_int("pos_init")?,
        pos_fin: fields.opt_int("pos_fin")?,
        match_input: fields.opt_text("match_input"),
        reference_match: fields.opt_text("reference_match"),
        n_bases: fields.opt_int("n_bases")?,
    })
}

/// Flatten a chain block's subgenes and their nested domains.
///
/// Subgenes are numbered by position, starting at 0 for every chain; each
/// domain carries the number of the subgene it was nested under.
pub fn map_subgenes_and_domains(block: &Value) -> MappingResult<(Vec<SubgeneRecord>, Vec<DomainRecord>)> {
    let chain = Fields::of(Entity::Chain, block)?;
    let mut subgenes = Vec::new();
    let mut domains = Vec::new();

    for (position, entry) in chain.list("subgenes")?.iter().enumerate() {
        let index = SubgeneIndex(position);
        let fields = Fields::of(Entity::Subgene, entry)?;
        subgenes.push(map_subgene(index, &fields)?);

        for domain in fields.list("domains")? {
            domains.push(map_domain(index, domain)?);
        }
    }

    Ok((subgenes, domains))
}

/// Flatten the four motif sequences of a chain block.
///
/// Categories come out in [`MotifCategory::ORDERED`] order; entries within
/// a category keep their source order.
pub fn map_motifs(block: &Value) -> MappingResult<Vec<MotifRecord>> {
    let chain = Fields::of(Entity::Chain, block)?;
    let mut motifs = Vec::new();

    for category in MotifCategory::ORDERED {
        for entry in chain.list(category.source_key())? {
            let fields = Fields::of(Entity::Motif, entry)?;
            motifs.push(MotifRecord {
                category,
                pos_init: fields.opt_int("pos_init")?,
                pos_end: fields.opt_int("pos_end")?,
                score: fields.opt_float("score")?,
            });
        }
    }

    Ok(motifs)
}
