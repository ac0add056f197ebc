//! Page records produced by the extractor

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Heading levels always present in [`PageRecord::headings`]
pub const HEADING_LEVELS: std::ops::RangeInclusive<u8> = 1..=6;

/// One crawled and extracted page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    /// Canonical absolute URL of the page
    pub url: String,

    /// Text of the `<title>` element (empty if absent)
    pub title: String,

    /// Content of `<meta name="description">` (empty if absent)
    pub description: String,

    /// Heading texts keyed by level; levels 1 through 6 are always present
    pub headings: BTreeMap<u8, Vec<String>>,

    pub images: Vec<ImageRecord>,

    /// Deduplicated absolute same-origin links in document order
    pub links: Vec<String>,

    /// Meta tag name/property (lowercased) to content
    pub meta_tags: BTreeMap<String, String>,

    /// Parsed JSON-LD blocks; malformed blocks are omitted
    pub structured_data: Vec<serde_json::Value>,

    /// Visible body text, whitespace collapsed and length-bounded
    pub content: String,

    pub word_count: usize,
}

impl PageRecord {
    /// Returns the headings of one level, or an empty slice
    pub fn headings_at(&self, level: u8) -> &[String] {
        self.headings.get(&level).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Concatenates every heading text on the page
    pub fn all_heading_text(&self) -> String {
        self.headings
            .values()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// An `<img>` element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub src: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl ImageRecord {
    pub fn has_alt(&self) -> bool {
        !self.alt.trim().is_empty()
    }
}
