//! SQLite storage backend for retrotector-db

use super::traits::{OpenStore, RecordStore, RowId, StorageError, StorageResult, Table};
use crate::mapping::{ChainRecord, DomainRecord, LtrRecord, MotifRecord, RunRecord, SubgeneRecord};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;

/// SQLite-backed record store
///
/// One connection, used from one thread. Tables are created on open when
/// missing; existing tables are used as they are.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create the six tables if they do not exist yet
    fn init_schema(conn: &Connection) -> StorageResult<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS run_metadata (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                executer TEXT,
                dna_file TEXT,
                selected TEXT,
                database TEXT,
                execution_duration INTEGER NOT NULL DEFAULT 0,
                selection_threshold REAL NOT NULL DEFAULT 0,
                input_file TEXT NOT NULL DEFAULT '',
                improve_hits_max INTEGER NOT NULL DEFAULT 0,
                conservation_factor INTEGER NOT NULL DEFAULT 0,
                subgene_hits_max INTEGER NOT NULL DEFAULT 0,
                script_path TEXT NOT NULL DEFAULT '',
                max_subgene_skip INTEGER NOT NULL DEFAULT 0,
                strand TEXT NOT NULL DEFAULT '',
                sdfactor INTEGER NOT NULL DEFAULT 0,
                broken_passes INTEGER NOT NULL DEFAULT 0,
                fit_puteins TEXT,
                broken_penalty REAL NOT NULL DEFAULT 0,
                final_selection_threshold REAL NOT NULL DEFAULT 0,
                keep_threshold REAL NOT NULL DEFAULT 0,
                frame_factor REAL NOT NULL DEFAULT 0,
                length_bonus REAL NOT NULL DEFAULT 0,
                orfid_min_score INTEGER NOT NULL DEFAULT 0,
                make_chains_files TEXT NOT NULL DEFAULT '',
                debugging TEXT,
                script_input TEXT NOT NULL DEFAULT '',
                run_datetime TEXT,
                retrotector_version TEXT NOT NULL DEFAULT '',
                db_name TEXT NOT NULL DEFAULT '',
                db_last_modified_datetime TEXT
            );

            CREATE TABLE IF NOT EXISTS herv_chain (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                run_metadata_id INTEGER NOT NULL REFERENCES run_metadata(id),
                chain_level INTEGER NOT NULL,
                chain_start_idx INTEGER NOT NULL,
                chain_end_idx INTEGER NOT NULL,
                retrovirus_type TEXT NOT NULL,
                score INTEGER NOT NULL,
                type_of_chain TEXT NOT NULL,
                integration_sites TEXT
            );

            CREATE TABLE IF NOT EXISTS subgenes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                herv_chain_id INTEGER NOT NULL REFERENCES herv_chain(id),
                name TEXT,
                type TEXT,
                score REAL,
                hotspot TEXT
            );

            CREATE TABLE IF NOT EXISTS domains (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                subgene_id INTEGER NOT NULL REFERENCES subgenes(id),
                idx INTEGER,
                type TEXT,
                origin TEXT,
                score REAL,
                hotspot TEXT,
                frame INTEGER,
                pos_init INTEGER,
                pos_fin INTEGER,
                match_input TEXT,
                reference_match TEXT,
                n_bases INTEGER
            );

            CREATE TABLE IF NOT EXISTS motifs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                herv_chain_id INTEGER NOT NULL REFERENCES herv_chain(id),
                type TEXT NOT NULL,
                pos_init INTEGER,
                pos_end INTEGER,
                score REAL
            );

            -- herv_chain_id is NULL for solo LTRs
            CREATE TABLE IF NOT EXISTS ltr (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                herv_chain_id INTEGER REFERENCES herv_chain(id),
                is_primary INTEGER NOT NULL DEFAULT 0,
                ltr_type TEXT,
                factor_score REAL,
                virus_genus TEXT,
                peak_loc INTEGER,
                init_idx INTEGER NOT NULL,
                fin_idx INTEGER NOT NULL,
                adenylation_loc INTEGER,
                adenylation_seq TEXT,
                u5nn_score REAL,
                u5nn_idx INTEGER,
                gtmodifier_score REAL,
                u3nn_score REAL,
                u3nn_idx INTEGER,
                tataa_score REAL,
                tataa_idx INTEGER,
                meme50_score REAL,
                meme50_idx INTEGER,
                motifs1_score REAL,
                motifs1_idx INTEGER,
                motifs2_score REAL,
                motifs2_idx INTEGER,
                transsites_score REAL,
                cpgmodifier_score REAL,
                spl8modifier_score REAL,
                limiters TEXT,
                tsd5 TEXT,
                tsd3 TEXT,
                similarity_start INTEGER,
                similarity_end INTEGER
            );

            CREATE INDEX IF NOT EXISTS idx_herv_chain_run ON herv_chain(run_metadata_id);
            CREATE INDEX IF NOT EXISTS idx_subgenes_chain ON subgenes(herv_chain_id);
            CREATE INDEX IF NOT EXISTS idx_domains_subgene ON domains(subgene_id);
            CREATE INDEX IF NOT EXISTS idx_motifs_chain ON motifs(herv_chain_id);
            CREATE INDEX IF NOT EXISTS idx_ltr_chain ON ltr(herv_chain_id);

            PRAGMA foreign_keys = ON;
            PRAGMA journal_mode = WAL;
            "#,
        )?;
        Ok(())
    }

    fn timestamp(value: Option<DateTime<Utc>>) -> Option<String> {
        value.map(|t| t.to_rfc3339())
    }

    /// Close the connection, surfacing any error SQLite reports on close
    pub fn close(self) -> StorageResult<()> {
        self.conn.close().map_err(|(_, err)| StorageError::from(err))
    }

    /// Number of rows currently in `table`
    pub fn count_rows(&self, table: Table) -> StorageResult<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", table.name());
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count.max(0) as usize)
    }
}

impl OpenStore for SqliteStore {
    fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;

        Ok(Self { conn })
    }

    fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;

        Ok(Self { conn })
    }
}

impl RecordStore for SqliteStore {
    fn insert_run(&self, run: &RunRecord) -> StorageResult<RowId> {
        self.conn.execute(
            r#"
            INSERT INTO run_metadata (
                executer, dna_file, selected, database, execution_duration,
                selection_threshold, input_file, improve_hits_max, conservation_factor,
                subgene_hits_max, script_path, max_subgene_skip, strand, sdfactor,
                broken_passes, fit_puteins, broken_penalty, final_selection_threshold,
                keep_threshold, frame_factor, length_bonus, orfid_min_score,
                make_chains_files, debugging, script_input, run_datetime,
                retrotector_version, db_name, db_last_modified_datetime
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15,
                    ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28, ?29)
            "#,
            params![
                run.executer,
                run.dna_file,
                run.selected,
                run.database,
                run.execution_duration,
                run.selection_threshold,
                run.input_file,
                run.improve_hits_max,
                run.conservation_factor,
                run.subgene_hits_max,
                run.script_path,
                run.max_subgene_skip,
                run.strand,
                run.sdfactor,
                run.broken_passes,
                run.fit_puteins,
                run.broken_penalty,
                run.final_selection_threshold,
                run.keep_threshold,
                run.frame_factor,
                run.length_bonus,
                run.orfid_min_score,
                run.make_chains_files,
                run.debugging,
                run.script_input,
                Self::timestamp(run.run_datetime),
                run.retrotector_version,
                run.db_name,
                Self::timestamp(run.db_last_modified_datetime),
            ],
        )?;
        Ok(RowId::new(self.conn.last_insert_rowid()))
    }

    fn insert_chain(&self, run_id: RowId, chain: &ChainRecord) -> StorageResult<RowId> {
        self.conn.execute(
            r#"
            INSERT INTO herv_chain (run_metadata_id, chain_level, chain_start_idx, chain_end_idx,
                                    retrovirus_type, score, type_of_chain, integration_sites)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                run_id.get(),
                chain.chain_level,
                chain.chain_start_idx,
                chain.chain_end_idx,
                chain.retrovirus_type,
                chain.score,
                chain.type_of_chain,
                chain.integration_sites,
            ],
        )?;
        Ok(RowId::new(self.conn.last_insert_rowid()))
    }

    fn insert_subgene(&self, chain_id: RowId, subgene: &SubgeneRecord) -> StorageResult<RowId> {
        self.conn.execute(
            "INSERT INTO subgenes (herv_chain_id, name, type, score, hotspot) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                chain_id.get(),
                subgene.name,
                subgene.subgene_type,
                subgene.score,
                subgene.hotspot,
            ],
        )?;
        Ok(RowId::new(self.conn.last_insert_rowid()))
    }

    fn insert_domain(&self, subgene_id: RowId, domain: &DomainRecord) -> StorageResult<RowId> {
        self.conn.execute(
            r#"
            INSERT INTO domains (subgene_id, idx, type, origin, score, hotspot, frame,
                                 pos_init, pos_fin, match_input, reference_match, n_bases)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                subgene_id.get(),
                domain.idx,
                domain.domain_type,
                domain.origin,
                domain.score,
                domain.hotspot,
                domain.frame,
                domain.pos_init,
                domain.pos_fin,
                domain.match_input,
                domain.reference_match,
                domain.n_bases,
            ],
        )?;
        Ok(RowId::new(self.conn.last_insert_rowid()))
    }

    fn insert_motif(&self, chain_id: RowId, motif: &MotifRecord) -> StorageResult<RowId> {
        self.conn.execute(
            "INSERT INTO motifs (herv_chain_id, type, pos_init, pos_end, score) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                chain_id.get(),
                motif.category.as_str(),
                motif.pos_init,
                motif.pos_end,
                motif.score,
            ],
        )?;
        Ok(RowId::new(self.conn.last_insert_rowid()))
    }

    fn insert_ltr(&self, chain_id: Option<RowId>, ltr: &LtrRecord) -> StorageResult<RowId> {
        self.conn.execute(
            r#"
            INSERT INTO ltr (
                herv_chain_id, is_primary, ltr_type, factor_score, virus_genus, peak_loc,
                init_idx, fin_idx, adenylation_loc, adenylation_seq, u5nn_score, u5nn_idx,
                gtmodifier_score, u3nn_score, u3nn_idx, tataa_score, tataa_idx,
                meme50_score, meme50_idx, motifs1_score, motifs1_idx, motifs2_score,
                motifs2_idx, transsites_score, cpgmodifier_score, spl8modifier_score,
                limiters, tsd5, tsd3, similarity_start, similarity_end
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16,
                    ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28, ?29, ?30, ?31)
            "#,
            params![
                chain_id.map(RowId::get),
                ltr.is_primary,
                ltr.ltr_type,
                ltr.factor_score,
                ltr.virus_genus,
                ltr.peak_loc,
                ltr.init_idx,
                ltr.fin_idx,
                ltr.adenylation_loc,
                ltr.adenylation_seq,
                ltr.u5nn_score,
                ltr.u5nn_idx,
                ltr.gtmodifier_score,
                ltr.u3nn_score,
                ltr.u3nn_idx,
                ltr.tataa_score,
                ltr.tataa_idx,
                ltr.meme50_score,
                ltr.meme50_idx,
                ltr.motifs1_score,
                ltr.motifs1_idx,
                ltr.motifs2_score,
                ltr.motifs2_idx,
                ltr.transsites_score,
                ltr.cpgmodifier_score,
                ltr.spl8modifier_score,
                ltr.limiters,
                ltr.tsd5,
                ltr.tsd3,
                ltr.similarity_start,
                ltr.similarity_end,
            ],
        )?;
        Ok(RowId::new(self.conn.last_insert_rowid()))
    }

    fn begin(&self) -> StorageResult<()> {
        self.conn.execute_batch("BEGIN IMMEDIATE")?;
        Ok(())
    }

    fn commit(&self) -> StorageResult<()> {
        self.conn.execute_batch("COMMIT")?;
        Ok(())
    }

    fn rollback(&self) -> StorageResult<()> {
        self.conn.execute_batch("ROLLBACK")?;
        Ok(())
    }
}
