//! Run metadata from the document header and footer

use super::normalize::Fields;
use super::records::RunRecord;
use super::{Entity, MappingResult};
use crate::document::Document;

/// First non-empty text among the candidates, footer before header.
fn either_text(candidates: &[(&Fields<'_>, &str)]) -> Option<String> {
    candidates
        .iter()
        .filter_map(|(fields, key)| fields.opt_text(key))
        .find(|text| !text.is_empty())
}

/// Project `header` and `footer` onto one `run_metadata` row.
///
/// The footer is authoritative; a few identity fields fall back to the
/// header, whose keys are capitalized differently.
pub fn map_run(document: &Document) -> MappingResult<RunRecord> {
    let header = Fields::of_map(Entity::Run, document.header());
    let footer = Fields::of_map(Entity::Run, document.footer());

    Ok(RunRecord {
        executer: either_text(&[(&footer, "executer"), (&header, "Executor")]),
        dna_file: either_text(&[(&footer, "DNAFile"), (&header, "DNAFile")]),
        selected: header.opt_text("Selected"),
        database: either_text(&[(&footer, "Database"), (&header, "Database")]),
        execution_duration: footer.int_or_zero("execution_duration")?,
        selection_threshold: footer.float_or_zero("SelectionThreshold")?,
        input_file: either_text(&[(&footer, "InputFile"), (&header, "InputFile")]).unwrap_or_default(),
        improve_hits_max: footer.int_or_zero("ImproveHitsMax")?,
        conservation_factor: footer.int_or_zero("ConservationFactor")?,
        subgene_hits_max: footer.int_or_zero("SubGeneHitsMax")?,
        script_path: footer.text_or_empty("ScriptPath"),
        max_subgene_skip: footer.int_or_zero("MaxSubGeneSkip")?,
        strand: footer.text_or_empty("Strand"),
        sdfactor: footer.flag("SDFactor"),
        broken_passes: footer.int_or_zero("BrokenPasses")?,
        fit_puteins: footer.opt_text("FitPuteins"),
        broken_penalty: footer.float_or_zero("BrokenPenalty")?,
        final_selection_threshold: footer.float_or_zero("FinalSelectionThreshold")?,
        keep_threshold: footer.float_or_zero("KeepThreshold")?,
        frame_factor: footer.float_or_zero("FrameFactor")?,
        length_bonus: footer.float_or_zero("LengthBonus")?,
        orfid_min_score: footer.int_or_zero("ORFIDMinScore")?,
        make_chains_files: footer.text_or_empty("MakeChainsFiles"),
        debugging: footer.opt_text("Debugging"),
        script_input: footer.text_or_empty("script_input"),
        run_datetime: footer.timestamp("run_datetime"),
        retrotector_version: footer.text_or_empty("retrotector_version"),
        db_name: footer.text_or_empty("db_name"),
        db_last_modified_datetime: footer.timestamp("db_last_modified_datetime"),
    })
}
