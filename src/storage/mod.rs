//! Storage module for persisting analysis reports
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Saving each report with the configuration hash it ran under
//! - Loading and listing stored reports

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteReportStore;
pub use traits::{ReportStore, StorageError, StorageResult};

use chrono::{DateTime, Utc};
use std::path::Path;

/// Opens (creating if needed) the report database at `path`
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
/// * `config_hash` - Hash of the configuration reports are produced under
///
/// # Returns
///
/// * `Ok(SqliteReportStore)` - Successfully initialized storage
/// * `Err(StorageError)` - Failed to initialize storage
pub fn open_store(path: &Path, config_hash: &str) -> StorageResult<SqliteReportStore> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    SqliteReportStore::new(path, config_hash)
}

/// One row of the report listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub id: i64,
    pub url: String,
    pub keywords: Vec<String>,
    pub pages_analyzed: usize,
    pub analyzed_at: DateTime<Utc>,
    pub config_hash: String,
}
