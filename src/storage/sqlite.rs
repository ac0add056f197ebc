//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the ReportStore trait.

use crate::report::AnalysisReport;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{ReportStore, StorageError, StorageResult};
use crate::storage::ReportSummary;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite report store
pub struct SqliteReportStore {
    conn: Connection,
    config_hash: String,
}

impl SqliteReportStore {
    /// Creates a new SqliteReportStore instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    /// * `config_hash` - Recorded alongside every saved report
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteReportStore)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path, config_hash: &str) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn,
            config_hash: config_hash.to_string(),
        })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory(config_hash: &str) -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn,
            config_hash: config_hash.to_string(),
        })
    }
}

/// Raw column values of one `reports` row
struct SummaryRow {
    id: i64,
    url: String,
    keywords: String,
    pages_analyzed: i64,
    analyzed_at: String,
    config_hash: String,
}

impl SummaryRow {
    fn into_summary(self) -> StorageResult<ReportSummary> {
        let keywords: Vec<String> = serde_json::from_str(&self.keywords)?;
        let analyzed_at = self
            .analyzed_at
            .parse::<DateTime<Utc>>()
            .map_err(|e| StorageError::Serialization(format!("bad timestamp: {}", e)))?;

        Ok(ReportSummary {
            id: self.id,
            url: self.url,
            keywords,
            pages_analyzed: usize::try_from(self.pages_analyzed).unwrap_or_default(),
            analyzed_at,
            config_hash: self.config_hash,
        })
    }
}

impl ReportStore for SqliteReportStore {
    fn save(&mut self, report: &AnalysisReport) -> StorageResult<i64> {
        let report_json = serde_json::to_string(report)?;
        let keywords = serde_json::to_string(&report.keywords)?;

        self.conn.execute(
            "INSERT INTO reports (url, keywords, pages_analyzed, analyzed_at, config_hash, report_json)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                report.url,
                keywords,
                report.pages_analyzed as i64,
                report.timestamp.to_rfc3339(),
                self.config_hash,
                report_json,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn load(&self, id: i64) -> StorageResult<AnalysisReport> {
        let report_json: Option<String> = self
            .conn
            .query_row(
                "SELECT report_json FROM reports WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;

        let report_json = report_json.ok_or(StorageError::ReportNotFound(id))?;
        Ok(serde_json::from_str(&report_json)?)
    }

    fn list(&self) -> StorageResult<Vec<ReportSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, url, keywords, pages_analyzed, analyzed_at, config_hash
             FROM reports ORDER BY id DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(SummaryRow {
                id: row.get(0)?,
                url: row.get(1)?,
                keywords: row.get(2)?,
                pages_analyzed: row.get(3)?,
                analyzed_at: row.get(4)?,
                config_hash: row.get(5)?,
            })
        })?;

        let mut summaries = Vec::new();
        for row in rows {
            summaries.push(row?.into_summary()?);
        }

        Ok(summaries)
    }
}
