//! Text analytics over crawled pages
//!
//! - Keyword density per keyword, per page and overall
//! - A Flesch–Kincaid grade level over the combined page text

mod density;
mod readability;

pub use density::{
    count_occurrences, density, keyword_density, KeywordDensity, KeywordDensityReport,
    PageDensity,
};
pub use readability::{count_syllables, readability_score, Readability, TextStats};

use crate::crawler::PageRecord;

/// Rounds to two decimal places
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Readability across all pages
///
/// Sentence, word and syllable counts are summed page by page before the
/// formula is applied, so page boundaries never merge two sentences.
pub fn crawl_readability(pages: &[PageRecord]) -> Readability {
    let stats: TextStats = pages
        .iter()
        .map(|page| TextStats::from_text(&page.content))
        .sum();
    Readability::from_stats(stats)
}
