//! Common test utilities for loader integration tests
//!
//! Builders for RetroTector-shaped documents and a file-backed database
//! that can be inspected with plain SQL after a load.

#![allow(dead_code)]

use retrotector_db::{Document, OpenStore, SqliteStore};
use rusqlite::Connection;
use serde_json::{json, Value};
use std::path::PathBuf;
use tempfile::TempDir;

/// A SQLite file in a temporary directory, removed on drop
pub struct TestDb {
    _dir: TempDir,
    pub path: PathBuf,
}

impl TestDb {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("retrotector.db");
        Self { _dir: dir, path }
    }

    pub fn open_store(&self) -> SqliteStore {
        SqliteStore::open(&self.path).expect("Failed to open store")
    }

    /// Raw connection for assertions
    pub fn connect(&self) -> Connection {
        Connection::open(&self.path).expect("Failed to open connection")
    }

    pub fn count(&self, sql: &str) -> i64 {
        self.connect()
            .query_row(sql, [], |row| row.get(0))
            .expect("Count query failed")
    }

    /// All values of an integer column, in rowid order
    pub fn ids(&self, sql: &str) -> Vec<Option<i64>> {
        let conn = self.connect();
        let mut stmt = conn.prepare(sql).expect("Failed to prepare");
        let rows = stmt
            .query_map([], |row| row.get(0))
            .expect("Query failed");
        rows.collect::<Result<_, _>>().expect("Row decode failed")
    }
}

pub fn header() -> Value {
    json!({
        "Executor": "tester",
        "DNAFile": "chr7.txt",
        "Database": "ORDB",
        "InputFile": "chr7.txt"
    })
}

pub fn footer() -> Value {
    json!({
        "execution_duration": 1532,
        "SelectionThreshold": 300.5,
        "Strand": "+",
        "SDFactor": "Yes",
        "Debugging": "No",
        "run_datetime": "Mon Aug 04 04:51:37 GMT 2025",
        "retrotector_version": "1.0.1"
    })
}

pub fn chain(start: i64, subgenes: Value, motifs: Value, ltrs: Value) -> Value {
    let mut block = json!({
        "chain_level": 1,
        "chain_start_idx": start,
        "chain_end_idx": start + 8000,
        "retrovirus_type": "Gamma",
        "score": 700,
        "type_of_chain": "HERVH",
        "subgenes": subgenes,
        "LTRs": ltrs
    });
    if let (Some(block), Some(motifs)) = (block.as_object_mut(), motifs.as_object()) {
        for (key, value) in motifs {
            block.insert(key.clone(), value.clone());
        }
    }
    block
}

pub fn ltr(start: i64) -> Value {
    json!({"init_idx": start, "fin_idx": start + 450, "LTR_type": "5LTR"})
}

pub fn solo_ltr(start: i64) -> Value {
    json!({"init_idx": start, "fin_idx": start + 400, "primary": "Yes"})
}

pub fn document(chains: Vec<Value>, solo: Vec<Value>) -> Document {
    Document::from_value(json!({
        "header": header(),
        "footer": footer(),
        "pseuGID": chains,
        "soloLTRs": solo
    }))
    .expect("Failed to build document")
}
