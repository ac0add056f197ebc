//! Document renderer trait and error types

use crate::report::AnalysisReport;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Failed to format output: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Renders a report into a human-readable document
///
/// Rendering is best effort: callers log a failure and carry on without a
/// document.
pub trait DocumentRenderer: Send + Sync {
    /// File extension of the documents this renderer writes, without the dot
    fn extension(&self) -> &'static str;

    /// Writes the document for `report` to `path`
    ///
    /// # Arguments
    ///
    /// * `report` - The report to render
    /// * `path` - Destination file; parent directories are created
    fn render(&self, report: &AnalysisReport, path: &Path) -> OutputResult<()>;
}
