//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! four tables: `load_types`, `energy` (long format, one row per ledger
//! column and step), `activations` and `totals`.

use std::collections::BTreeMap;
use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{ActivationRow, EnergyRow, LoadTypeColumns, OutputError, OutputResult, TotalRow};

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    headers:  BTreeMap<u16, Vec<String>>,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS load_types (
                 load_type   INTEGER PRIMARY KEY,
                 name        TEXT    NOT NULL,
                 unit_of_sum TEXT    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS energy (
                 household      INTEGER NOT NULL,
                 load_type      INTEGER NOT NULL,
                 step           INTEGER NOT NULL,
                 unix_time_secs INTEGER NOT NULL,
                 column_name    TEXT    NOT NULL,
                 value          REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS activations (
                 household      INTEGER NOT NULL,
                 step           INTEGER NOT NULL,
                 unix_time_secs INTEGER NOT NULL,
                 person         TEXT    NOT NULL,
                 affordance     TEXT    NOT NULL,
                 location       TEXT    NOT NULL,
                 duration_steps INTEGER NOT NULL,
                 data_source    TEXT    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS totals (
                 household   INTEGER NOT NULL,
                 load_type   TEXT    NOT NULL,
                 unit_of_sum TEXT    NOT NULL,
                 total       REAL    NOT NULL
             );",
        )?;

        Ok(Self { conn, headers: BTreeMap::new(), finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn begin_load_type(&mut self, columns: &LoadTypeColumns) -> OutputResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO load_types (load_type, name, unit_of_sum) VALUES (?1, ?2, ?3)",
            rusqlite::params![columns.load_type, columns.name, columns.unit_of_sum],
        )?;
        self.headers.insert(columns.load_type, columns.headers.clone());
        Ok(())
    }

    fn write_energy(&mut self, row: &EnergyRow) -> OutputResult<()> {
        let headers = self
            .headers
            .get(&row.load_type)
            .ok_or(OutputError::UnknownLoadType(row.load_type))?;
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO energy \
                 (household, load_type, step, unix_time_secs, column_name, value) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for (header, value) in headers.iter().zip(&row.values) {
                stmt.execute(rusqlite::params![
                    row.household,
                    row.load_type,
                    row.external_step,
                    row.unix_time_secs,
                    header,
                    value,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_activations(&mut self, rows: &[ActivationRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO activations \
                 (household, step, unix_time_secs, person, affordance, location, duration_steps, data_source) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.household,
                    row.step,
                    row.unix_time_secs,
                    row.person,
                    row.affordance,
                    row.location,
                    row.duration_steps,
                    row.data_source,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_totals(&mut self, rows: &[TotalRow]) -> OutputResult<()> {
        for row in rows {
            self.conn.execute(
                "INSERT INTO totals (household, load_type, unit_of_sum, total) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![row.household, row.load_type, row.unit_of_sum, row.total],
            )?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn
            .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
