//! Output module for rendering analysis reports
//!
//! This module handles:
//! - The document renderer interface
//! - The bundled paginated Markdown renderer
//! - Naming of rendered documents inside the report directory

mod markdown;
mod traits;

pub use markdown::{format_report_markdown, MarkdownRenderer, PAGE_BREAK};
pub use traits::{DocumentRenderer, OutputError, OutputResult};

use std::path::{Path, PathBuf};

/// Path of the document for stored report `id`
///
/// # Example
///
/// ```
/// use seo_scout::output::{document_path, MarkdownRenderer};
/// use std::path::Path;
///
/// let path = document_path(Path::new("reports"), 7, &MarkdownRenderer);
/// assert_eq!(path, Path::new("reports/seo-report-7.md"));
/// ```
pub fn document_path(report_dir: &Path, id: i64, renderer: &dyn DocumentRenderer) -> PathBuf {
    report_dir.join(format!("seo-report-{}.{}", id, renderer.extension()))
}
