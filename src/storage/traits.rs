//! Storage traits and error types
//!
//! This module defines the trait interface for report stores and the
//! associated error types.

use crate::report::AnalysisReport;
use crate::storage::ReportSummary;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Report not found: {0}")]
    ReportNotFound(i64),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl From<serde_json::Error> for StorageError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for report store implementations
///
/// A failed save must surface as an error; callers treat persistence as
/// part of a successful analysis.
pub trait ReportStore {
    /// Persists a report
    ///
    /// # Returns
    ///
    /// The ID of the newly stored report
    fn save(&mut self, report: &AnalysisReport) -> StorageResult<i64>;

    /// Loads a stored report by ID
    fn load(&self, id: i64) -> StorageResult<AnalysisReport>;

    /// Lists stored reports, newest first
    fn list(&self) -> StorageResult<Vec<ReportSummary>>;
}
