//! Database schema definitions
//!
//! This module contains the SQL schema for the report database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per completed analysis
CREATE TABLE IF NOT EXISTS reports (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL,
    keywords TEXT NOT NULL,
    pages_analyzed INTEGER NOT NULL,
    analyzed_at TEXT NOT NULL,
    config_hash TEXT NOT NULL,
    report_json TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_reports_url ON reports(url);
CREATE INDEX IF NOT EXISTS idx_reports_analyzed_at ON reports(analyzed_at);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
