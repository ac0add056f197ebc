//! Per-page on-page suggestions

use crate::crawler::PageRecord;
use crate::report::PageAudit;
use std::collections::HashSet;

/// Evaluates every page rule independently and collects the messages
///
/// # Rules
///
/// - No H1 heading
/// - More than one H1 heading
/// - A keyword missing from all heading text (one message per distinct
///   trimmed keyword)
/// - Images present but none with alt text
pub fn page_suggestions(page: &PageRecord, keywords: &[String]) -> Vec<String> {
    let mut suggestions = Vec::new();

    let h1_count = page.headings_at(1).len();
    if h1_count == 0 {
        suggestions.push("Add an H1 heading to define the page topic.".to_string());
    }
    if h1_count > 1 {
        suggestions.push(format!(
            "Use only one H1 heading per page (found {}).",
            h1_count
        ));
    }

    let heading_text = page.all_heading_text().to_lowercase();
    let mut checked = HashSet::new();
    for keyword in keywords {
        let keyword = keyword.trim();
        if keyword.is_empty() || !checked.insert(keyword) {
            continue;
        }
        if !heading_text.contains(&keyword.to_lowercase()) {
            suggestions.push(format!(
                "Include the keyword \"{}\" in at least one heading.",
                keyword
            ));
        }
    }

    if !page.images.is_empty() && !page.images.iter().any(|image| image.has_alt()) {
        suggestions.push("Add descriptive alt text to images for accessibility.".to_string());
    }

    suggestions
}

pub fn audit_page(page: &PageRecord, keywords: &[String]) -> PageAudit {
    PageAudit {
        url: page.url.clone(),
        title: page.title.clone(),
        word_count: page.word_count,
        suggestions: page_suggestions(page, keywords),
    }
}
