//! End-to-end loads of RetroTector documents into a SQLite file

mod common;

use common::{chain, document, ltr, solo_ltr, TestDb};
use retrotector_db::{
    load_document, Document, LoadError, LoadOptions, Loader, LtrLinkage, MappingError,
};
use serde_json::json;

fn single_chain_document() -> Document {
    document(
        vec![chain(
            1000,
            json!([
                {"name": "gag", "type": "gag", "score": 300,
                 "domains": [{"idx": 0, "type": "MA", "pos_init": 1100, "pos_fin": 1400}]},
                {"name": "pol", "type": "pol", "score": 120}
            ]),
            json!({"Slippery_motifs": [{"pos_init": 2200, "pos_end": 2207, "score": 10}]}),
            json!([]),
        )],
        vec![],
    )
}

fn two_chain_document() -> Document {
    document(
        vec![
            chain(
                1000,
                json!([{"name": "gag", "domains": [{"idx": 0}, {"idx": 1}]}]),
                json!({}),
                json!([ltr(900), ltr(9100)]),
            ),
            chain(
                50000,
                json!([{"name": "env", "domains": [{"idx": 0}]}]),
                json!({}),
                json!([ltr(49900)]),
            ),
        ],
        vec![solo_ltr(100)],
    )
}

#[test]
fn test_single_chain_scenario() {
    let db = TestDb::new();
    let store = db.open_store();
    let report = load_document(&store, &single_chain_document()).unwrap();
    store.close().unwrap();

    assert_eq!(report.chains, 1);
    assert_eq!(report.subgenes, 2);
    assert_eq!(report.domains, 1);
    assert_eq!(report.motifs, 1);
    assert_eq!(report.ltrs, 0);

    assert_eq!(db.count("SELECT COUNT(*) FROM run_metadata"), 1);
    assert_eq!(db.count("SELECT COUNT(*) FROM herv_chain"), 1);
    assert_eq!(db.count("SELECT COUNT(*) FROM subgenes"), 2);
    assert_eq!(db.count("SELECT COUNT(*) FROM domains"), 1);
    assert_eq!(db.count("SELECT COUNT(*) FROM motifs"), 1);
    assert_eq!(db.count("SELECT COUNT(*) FROM ltr"), 0);

    let gag_id = db.count("SELECT id FROM subgenes WHERE name = 'gag'");
    assert_eq!(db.ids("SELECT subgene_id FROM domains"), vec![Some(gag_id)]);
}

#[test]
fn test_run_row_normalized() {
    let db = TestDb::new();
    let store = db.open_store();
    load_document(&store, &single_chain_document()).unwrap();
    store.close().unwrap();

    let conn = db.connect();
    let (executer, sdfactor, run_datetime, strand): (String, i64, String, String) = conn
        .query_row(
            "SELECT executer, sdfactor, run_datetime, strand FROM run_metadata",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )
        .unwrap();

    assert_eq!(executer, "tester");
    assert_eq!(sdfactor, 1);
    assert_eq!(run_datetime, "2025-08-04T04:51:37+00:00");
    assert_eq!(strand, "+");
}

#[test]
fn test_one_chain_row_per_block() {
    let db = TestDb::new();
    let store = db.open_store();
    let doc = document(
        vec![
            chain(100, json!([]), json!({}), json!([])),
            chain(20000, json!([]), json!({}), json!([])),
            chain(40000, json!([]), json!({}), json!([])),
        ],
        vec![],
    );
    load_document(&store, &doc).unwrap();
    store.close().unwrap();

    assert_eq!(
        db.ids("SELECT chain_start_idx FROM herv_chain ORDER BY id"),
        vec![Some(100), Some(20000), Some(40000)]
    );
    let run_id = db.count("SELECT id FROM run_metadata");
    assert_eq!(
        db.count(&format!(
            "SELECT COUNT(*) FROM herv_chain WHERE run_metadata_id = {run_id}"
        )),
        3
    );
}

#[test]
fn test_domains_link_within_their_chain() {
    let db = TestDb::new();
    let store = db.open_store();
    load_document(&store, &two_chain_document()).unwrap();
    store.close().unwrap();

    // Every domain's subgene sits in the chain its JSON block belonged to
    let mismatched = db.count(
        "SELECT COUNT(*) FROM domains d
         JOIN subgenes s ON s.id = d.subgene_id
         JOIN herv_chain c ON c.id = s.herv_chain_id
         WHERE (s.name = 'gag' AND c.chain_start_idx != 1000)
            OR (s.name = 'env' AND c.chain_start_idx != 50000)",
    );
    assert_eq!(mismatched, 0);
    assert_eq!(
        db.count("SELECT COUNT(*) FROM domains d JOIN subgenes s ON s.id = d.subgene_id WHERE s.name = 'env'"),
        1
    );
}

#[test]
fn test_domain_links_to_its_own_subgene_not_the_first() {
    let db = TestDb::new();
    let store = db.open_store();
    let doc = document(
        vec![chain(
            1000,
            json!([
                {"name": "gag", "type": "gag"},
                {"name": "pol", "type": "pol", "domains": [{"idx": 0, "type": "RT"}]}
            ]),
            json!({}),
            json!([]),
        )],
        vec![],
    );
    load_document(&store, &doc).unwrap();
    store.close().unwrap();

    let gag_id = db.count("SELECT id FROM subgenes WHERE name = 'gag'");
    let pol_id = db.count("SELECT id FROM subgenes WHERE name = 'pol'");
    assert_ne!(gag_id, pol_id);
    assert_eq!(db.ids("SELECT subgene_id FROM domains"), vec![Some(pol_id)]);
}

#[test]
fn test_originating_linkage() {
    let db = TestDb::new();
    let store = db.open_store();
    let report = load_document(&store, &two_chain_document()).unwrap();
    store.close().unwrap();

    assert_eq!(report.ltrs, 4);
    assert_eq!(db.count("SELECT COUNT(*) FROM ltr"), 4);
    assert_eq!(db.count("SELECT COUNT(*) FROM ltr WHERE herv_chain_id IS NULL"), 1);
    assert_eq!(
        db.count("SELECT COUNT(*) FROM ltr WHERE herv_chain_id IS NULL AND ltr_type = 'solo'"),
        1
    );

    let first_chain = db.count("SELECT id FROM herv_chain WHERE chain_start_idx = 1000");
    assert_eq!(
        db.ids(&format!(
            "SELECT init_idx FROM ltr WHERE herv_chain_id = {first_chain} ORDER BY id"
        )),
        vec![Some(900), Some(9100)]
    );
}

#[test]
fn test_current_chain_linkage_repeats_ltrs() {
    let db = TestDb::new();
    let store = db.open_store();
    let options = LoadOptions::default().with_ltr_linkage(LtrLinkage::CurrentChain);
    let report = Loader::new(&store)
        .with_options(options)
        .load(&two_chain_document())
        .unwrap();
    store.close().unwrap();

    // Whole LTR set (1 solo + 3 full) once per chain
    assert_eq!(report.ltrs, 8);
    assert_eq!(db.count("SELECT COUNT(*) FROM ltr WHERE herv_chain_id IS NULL"), 0);
    assert_eq!(
        db.count("SELECT COUNT(DISTINCT herv_chain_id) FROM ltr"),
        2
    );
}

#[test]
fn test_solo_ltrs_without_chains() {
    let db = TestDb::new();
    let store = db.open_store();
    let doc = document(vec![], vec![solo_ltr(100), solo_ltr(5000)]);
    let report = load_document(&store, &doc).unwrap();
    store.close().unwrap();

    assert_eq!(report.chains, 0);
    assert_eq!(report.ltrs, 2);
    assert_eq!(db.count("SELECT COUNT(*) FROM run_metadata"), 1);
    assert_eq!(db.count("SELECT COUNT(*) FROM ltr WHERE herv_chain_id IS NULL"), 2);
}

#[test]
fn test_motifs_stored_in_category_order() {
    let db = TestDb::new();
    let store = db.open_store();
    let doc = document(
        vec![chain(
            1000,
            json!([]),
            json!({
                "SpliceDonor_motifs": [{"pos_init": 9000}],
                "SpliceAcceptor_motifs": [{"pos_init": 8000}],
                "Slippery_motifs": [{"pos_init": 2200}, {"pos_init": 2300}],
                "PseudoKnot_motifs": [{"pos_init": 2250}]
            }),
            json!([]),
        )],
        vec![],
    );
    load_document(&store, &doc).unwrap();
    store.close().unwrap();

    let conn = db.connect();
    let mut stmt = conn.prepare("SELECT type FROM motifs ORDER BY id").unwrap();
    let types: Vec<String> = stmt
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(
        types,
        vec!["Slippery", "Slippery", "PseudoKnot", "SpliceAcceptor", "SpliceDonor"]
    );
}

#[test]
fn test_loading_twice_duplicates_rows() {
    let db = TestDb::new();
    let doc = two_chain_document();

    let store = db.open_store();
    let first = load_document(&store, &doc).unwrap();
    store.close().unwrap();

    let store = db.open_store();
    let second = load_document(&store, &doc).unwrap();
    store.close().unwrap();

    assert_ne!(first.run_id, second.run_id);
    assert_eq!(db.count("SELECT COUNT(*) FROM run_metadata"), 2);
    assert_eq!(db.count("SELECT COUNT(*) FROM herv_chain"), 4);
    assert_eq!(db.count("SELECT COUNT(*) FROM ltr"), 8);
}

#[test]
fn test_missing_chain_field_keeps_committed_rows() {
    let db = TestDb::new();
    let store = db.open_store();
    let mut broken = chain(60000, json!([]), json!({}), json!([]));
    if let Some(block) = broken.as_object_mut() {
        block.remove("type_of_chain");
    }
    let doc = document(
        vec![chain(1000, json!([{"name": "gag"}]), json!({}), json!([])), broken],
        vec![solo_ltr(100)],
    );

    let err = load_document(&store, &doc).unwrap_err();
    store.close().unwrap();

    assert!(matches!(
        err,
        LoadError::Mapping(MappingError::MissingField { ref field, .. }) if field == "type_of_chain"
    ));
    // Run and the first chain were committed before the failure
    assert_eq!(db.count("SELECT COUNT(*) FROM run_metadata"), 1);
    assert_eq!(db.count("SELECT COUNT(*) FROM herv_chain"), 1);
    assert_eq!(db.count("SELECT COUNT(*) FROM subgenes"), 1);
    // Solo LTRs come after the chains and were never reached
    assert_eq!(db.count("SELECT COUNT(*) FROM ltr"), 0);
}

#[test]
fn test_document_from_file() {
    let db = TestDb::new();
    let input = db.path.with_file_name("run.json");
    std::fs::write(
        &input,
        serde_json::to_string(&json!({
            "header": common::header(),
            "footer": common::footer(),
            "pseuGID": [chain(1000, json!([]), json!({}), json!([ltr(900)]))]
        }))
        .unwrap(),
    )
    .unwrap();

    let doc = Document::from_path(&input).unwrap();
    let store = db.open_store();
    let report = load_document(&store, &doc).unwrap();
    store.close().unwrap();

    assert_eq!(report.total_rows(), 3);
    assert_eq!(db.count("SELECT COUNT(*) FROM ltr"), 1);
}
