//! Markdown report document
//!
//! The document is split into pages separated by a horizontal rule and an
//! explicit page break, so it prints and converts cleanly:
//!
//! 1. Overview, homepage meta tags and structured data
//! 2. Keyword density and readability
//! 3. Per-page suggestions
//! 4. AI insights, the sample rewrite and performance

use crate::insights::CollaboratorOutcome;
use crate::output::traits::{DocumentRenderer, OutputResult};
use crate::report::{Analysis, AnalysisReport};
use std::fs;
use std::path::Path;

/// Separator inserted between document pages
pub const PAGE_BREAK: &str = "\n---\n\n<div style=\"page-break-after: always;\"></div>\n\n";

/// Writes reports as paginated Markdown
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl DocumentRenderer for MarkdownRenderer {
    fn extension(&self) -> &'static str {
        "md"
    }

    fn render(&self, report: &AnalysisReport, path: &Path) -> OutputResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, format_report_markdown(report))?;
        Ok(())
    }
}

/// Formats a report as Markdown
///
/// # Arguments
///
/// * `report` - The analysis report
///
/// # Returns
///
/// A formatted markdown string
pub fn format_report_markdown(report: &AnalysisReport) -> String {
    let pages = [
        overview_page(report),
        analytics_page(&report.analysis),
        suggestions_page(&report.analysis),
        insights_page(&report.analysis),
    ];

    let total = pages.len();
    pages
        .iter()
        .enumerate()
        .map(|(i, page)| format!("{}\n_Page {} of {}_\n", page, i + 1, total))
        .collect::<Vec<_>>()
        .join(PAGE_BREAK)
}

fn overview_page(report: &AnalysisReport) -> String {
    let analysis = &report.analysis;
    let mut md = String::new();

    md.push_str("# SEO Analysis Report\n\n");
    md.push_str(&format!("- **URL**: {}\n", report.url));
    md.push_str(&format!(
        "- **Keywords**: {}\n",
        if report.keywords.is_empty() {
            "(none)".to_string()
        } else {
            report.keywords.join(", ")
        }
    ));
    md.push_str(&format!("- **Pages Analyzed**: {}\n", report.pages_analyzed));
    md.push_str(&format!(
        "- **Generated**: {}\n\n",
        report.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    if analysis.crawl.partial {
        md.push_str(&format!(
            "> **Partial crawl**: {} page(s) could not be analyzed.\n\n",
            analysis.crawl.failures.len()
        ));
        for failure in &analysis.crawl.failures {
            md.push_str(&format!("- {} ({})\n", failure.url, failure.reason));
        }
        md.push('\n');
    }

    md.push_str("## Meta Tags\n\n");
    match &analysis.meta_tags {
        Some(meta) => {
            md.push_str("| Tag | Value | Length |\n");
            md.push_str("|-----|-------|--------|\n");
            md.push_str(&format!(
                "| Title | {} | {} |\n",
                table_cell(&meta.title),
                meta.title_length
            ));
            md.push_str(&format!(
                "| Description | {} | {} |\n\n",
                table_cell(&meta.description),
                meta.description_length
            ));

            if meta.issues.is_empty() {
                md.push_str("No meta tag issues found.\n\n");
            } else {
                for issue in &meta.issues {
                    md.push_str(&format!("- {}\n", issue));
                }
                md.push('\n');
            }
            if let Some(title) = &meta.suggested_title {
                md.push_str(&format!("**Suggested title**: {}\n\n", title));
            }
            if let Some(description) = &meta.suggested_description {
                md.push_str(&format!("**Suggested description**: {}\n\n", description));
            }
        }
        None => md.push_str("No homepage was analyzed.\n\n"),
    }

    md.push_str("## Structured Data\n\n");
    md.push_str(&format!(
        "- **Pages with JSON-LD**: {}\n",
        analysis.structured_data.pages_with_structured_data
    ));
    if !analysis.structured_data.types.is_empty() {
        md.push_str(&format!(
            "- **Types**: {}\n",
            analysis.structured_data.types.join(", ")
        ));
    }

    md
}

fn analytics_page(analysis: &Analysis) -> String {
    let mut md = String::new();

    md.push_str("## Keyword Density\n\n");
    if analysis.keyword_density.is_empty() {
        md.push_str("No keywords were requested.\n\n");
    } else {
        md.push_str("| Keyword | Overall |\n");
        md.push_str("|---------|---------|\n");
        for (keyword, density) in &analysis.keyword_density {
            md.push_str(&format!(
                "| {} | {:.2}% |\n",
                table_cell(keyword),
                density.overall
            ));
        }
        md.push('\n');

        for (keyword, density) in &analysis.keyword_density {
            md.push_str(&format!("### {}\n\n", keyword));
            md.push_str("| Page | Count | Density |\n");
            md.push_str("|------|-------|---------|\n");
            for page in &density.pages {
                md.push_str(&format!(
                    "| {} | {} | {:.2}% |\n",
                    table_cell(&page.url),
                    page.count,
                    page.density
                ));
            }
            md.push('\n');
        }
    }

    let readability = &analysis.readability;
    md.push_str("## Readability\n\n");
    md.push_str(&format!(
        "- **Flesch-Kincaid Grade Level**: {:.2}\n",
        readability.score
    ));
    md.push_str(&format!("- **Sentences**: {}\n", readability.stats.sentences));
    md.push_str(&format!("- **Words**: {}\n", readability.stats.words));
    md.push_str(&format!("- **Syllables**: {}\n", readability.stats.syllables));

    md
}

fn suggestions_page(analysis: &Analysis) -> String {
    let mut md = String::from("## Suggestions\n\n");

    for page in &analysis.pages {
        let title = if page.title.is_empty() {
            "(untitled)"
        } else {
            &page.title
        };
        md.push_str(&format!("### {}\n\n", title));
        md.push_str(&format!("{} ({} words)\n\n", page.url, page.word_count));

        if page.suggestions.is_empty() {
            md.push_str("No suggestions.\n\n");
        } else {
            for suggestion in &page.suggestions {
                md.push_str(&format!("- {}\n", suggestion));
            }
            md.push('\n');
        }
    }

    md
}

fn insights_page(analysis: &Analysis) -> String {
    let mut md = String::from("## AI Insights\n\n");

    match &analysis.insights {
        CollaboratorOutcome::Ok { data } => {
            md.push_str(&format!("{}\n\n", data.ai_summary));
            if let Some(score) = data.ai_visibility_score {
                md.push_str(&format!("- **AI Visibility Score**: {:.0}/100\n", score));
            }
            if let Some(score) = data.semantic_clarity {
                md.push_str(&format!("- **Semantic Clarity**: {:.0}/100\n", score));
            }
            if !data.optimized_title.is_empty() {
                md.push_str(&format!("- **Optimized Title**: {}\n", data.optimized_title));
            }
            if !data.optimized_description.is_empty() {
                md.push_str(&format!(
                    "- **Optimized Description**: {}\n",
                    data.optimized_description
                ));
            }
            md.push('\n');

            if !data.content_suggestions.is_empty() {
                md.push_str("### Content Suggestions\n\n");
                for suggestion in &data.content_suggestions {
                    md.push_str(&format!("- {}\n", suggestion));
                }
                md.push('\n');
            }

            if !data.suggested_faqs.is_empty() {
                md.push_str("### Suggested FAQs\n\n");
                for faq in &data.suggested_faqs {
                    md.push_str(&format!("**Q: {}**\n\nA: {}\n\n", faq.question, faq.answer));
                }
            }

            if let Some(rewrite) = &data.sample_rewrite {
                md.push_str("### Sample Rewrite\n\n");
                for line in rewrite.lines() {
                    md.push_str(&format!("> {}\n", line));
                }
                md.push('\n');
            }
        }
        CollaboratorOutcome::Error { error } => {
            md.push_str(&format!("_Insights unavailable: {}_\n\n", error));
        }
    }

    md.push_str("## Performance\n\n");
    match &analysis.performance {
        CollaboratorOutcome::Ok { data } => {
            md.push_str(&format!("- **Strategy**: {}\n", data.strategy));
            if let Some(score) = data.performance_score {
                md.push_str(&format!("- **Performance Score**: {:.0}/100\n", score));
            }
            for (metric, value) in &data.metrics {
                md.push_str(&format!("- **{}**: {}\n", metric, value));
            }
        }
        CollaboratorOutcome::Error { error } => {
            md.push_str(&format!("_Performance data unavailable: {}_\n", error));
        }
    }

    md
}

fn table_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
