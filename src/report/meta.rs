//! Homepage title and meta description audit

use crate::analytics::KeywordDensityReport;
use crate::crawler::PageRecord;
use crate::report::MetaTagAudit;

/// Longest title search engines display in full
pub const MAX_TITLE_CHARS: usize = 60;

/// Longest meta description search engines display in full
pub const MAX_DESCRIPTION_CHARS: usize = 155;

/// Shortest content fragment considered for a generated description
const MIN_FRAGMENT_CHARS: usize = 20;

const ELLIPSIS: &str = "...";

/// Audits the homepage title and description
///
/// A length outside `(0, MAX]` produces an issue plus a generated
/// replacement: the title from the keywords ranked by overall density, the
/// description from the first sentence of the page content.
pub fn audit_meta_tags(
    homepage: &PageRecord,
    keywords: &[String],
    density: &KeywordDensityReport,
) -> MetaTagAudit {
    let title_length = homepage.title.chars().count();
    let description_length = homepage.description.chars().count();
    let mut issues = Vec::new();
    let mut suggested_title = None;
    let mut suggested_description = None;

    if title_length == 0 || title_length > MAX_TITLE_CHARS {
        issues.push(if title_length == 0 {
            "Title is missing.".to_string()
        } else {
            format!(
                "Title is too long ({} characters, maximum {}).",
                title_length, MAX_TITLE_CHARS
            )
        });
        suggested_title = suggest_title(homepage, keywords, density);
    }

    if description_length == 0 || description_length > MAX_DESCRIPTION_CHARS {
        issues.push(if description_length == 0 {
            "Meta description is missing.".to_string()
        } else {
            format!(
                "Meta description is too long ({} characters, maximum {}).",
                description_length, MAX_DESCRIPTION_CHARS
            )
        });
        suggested_description = suggest_description(&homepage.content);
    }

    MetaTagAudit {
        url: homepage.url.clone(),
        title: homepage.title.clone(),
        title_length,
        description: homepage.description.clone(),
        description_length,
        issues,
        suggested_title,
        suggested_description,
    }
}

/// Keywords by descending overall density joined with `" | "`
///
/// Ties keep request order. Falls back to the current title when no
/// keywords were given.
fn suggest_title(
    homepage: &PageRecord,
    keywords: &[String],
    density: &KeywordDensityReport,
) -> Option<String> {
    let mut ranked: Vec<(&str, f64)> = Vec::new();
    for keyword in keywords {
        let keyword = keyword.trim();
        if keyword.is_empty() || ranked.iter().any(|(k, _)| *k == keyword) {
            continue;
        }
        let overall = density.get(keyword).map_or(0.0, |d| d.overall);
        ranked.push((keyword, overall));
    }
    // stable sort keeps request order for equal densities
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let title = if ranked.is_empty() {
        homepage.title.trim().to_string()
    } else {
        ranked
            .iter()
            .map(|(keyword, _)| *keyword)
            .collect::<Vec<_>>()
            .join(" | ")
    };

    (!title.is_empty()).then(|| shorten(&title, MAX_TITLE_CHARS))
}

/// First sentence-like fragment of the content longer than 20 characters
fn suggest_description(content: &str) -> Option<String> {
    content
        .split(['.', '!', '?'])
        .map(str::trim)
        .find(|fragment| fragment.chars().count() > MIN_FRAGMENT_CHARS)
        .map(|fragment| shorten(fragment, MAX_DESCRIPTION_CHARS))
}

/// Cuts `text` to `max` characters, ellipsis included, when it is longer
fn shorten(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max - ELLIPSIS.len()).collect();
    format!("{}{}", kept, ELLIPSIS)
}
