//! Keyword density

use crate::analytics::round2;
use crate::crawler::PageRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Density of one keyword on one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageDensity {
    pub url: String,
    pub count: usize,
    /// Percentage of the page's words, two decimals
    pub density: f64,
}

/// Density of one keyword across the crawl
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordDensity {
    /// Summed occurrences over summed word counts, as a percentage
    pub overall: f64,
    pub pages: Vec<PageDensity>,
}

/// Keyword to density breakdown
pub type KeywordDensityReport = BTreeMap<String, KeywordDensity>;

/// Counts case-insensitive, word-bounded occurrences of `keyword` in `text`
///
/// Multi-word phrases are matched as written. A match only counts when the
/// characters on either side are not alphanumeric, so "widget" does not
/// match inside "widgets".
///
/// # Examples
///
/// ```
/// use seo_scout::analytics::count_occurrences;
///
/// assert_eq!(count_occurrences("Widgets, widgets and WIDGETS!", "widgets"), 3);
/// assert_eq!(count_occurrences("widgetsmith", "widgets"), 0);
/// ```
pub fn count_occurrences(text: &str, keyword: &str) -> usize {
    let needle = keyword.trim().to_lowercase();
    if needle.is_empty() {
        return 0;
    }

    let haystack = text.to_lowercase();
    haystack
        .match_indices(&needle)
        .filter(|(start, matched)| {
            let end = start + matched.len();
            let before = haystack[..*start].chars().next_back();
            let after = haystack[end..].chars().next();
            !before.map_or(false, char::is_alphanumeric) && !after.map_or(false, char::is_alphanumeric)
        })
        .count()
}

/// Density as a percentage in [0, 100], rounded to two decimals
///
/// A zero word count yields 0.
pub fn density(count: usize, word_count: usize) -> f64 {
    if word_count == 0 {
        return 0.0;
    }
    round2((count as f64 / word_count as f64 * 100.0).clamp(0.0, 100.0))
}

/// Computes per-page and overall density for each keyword
///
/// Keywords are reported under their trimmed spelling; duplicates collapse
/// into one entry.
pub fn keyword_density(pages: &[PageRecord], keywords: &[String]) -> KeywordDensityReport {
    let total_words: usize = pages.iter().map(|p| p.word_count).sum();
    let mut report = KeywordDensityReport::new();

    for keyword in keywords {
        let keyword = keyword.trim();
        if report.contains_key(keyword) {
            continue;
        }

        let per_page: Vec<PageDensity> = pages
            .iter()
            .map(|page| {
                let count = count_occurrences(&page.content, keyword);
                PageDensity {
                    url: page.url.clone(),
                    count,
                    density: density(count, page.word_count),
                }
            })
            .collect();

        let total_count: usize = per_page.iter().map(|p| p.count).sum();

        report.insert(
            keyword.to_string(),
            KeywordDensity {
                overall: density(total_count, total_words),
                pages: per_page,
            },
        );
    }

    report
}
