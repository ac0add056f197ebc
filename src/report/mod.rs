//! Report assembly
//!
//! Turns a crawl, its analytics and the collaborator outcomes into the
//! [`AnalysisReport`] returned to the caller.

mod meta;
mod structured;
mod suggestions;
mod types;

pub use meta::{audit_meta_tags, MAX_DESCRIPTION_CHARS, MAX_TITLE_CHARS};
pub use structured::summarize_structured_data;
pub use suggestions::{audit_page, page_suggestions};
pub use types::{
    Analysis, AnalysisReport, CrawlSummary, MetaTagAudit, PageAudit, StructuredDataSummary,
};

use crate::analytics::{crawl_readability, keyword_density};
use crate::crawler::CrawlResult;
use crate::insights::{CollaboratorOutcome, Insights, PerformanceSummary};
use crate::request::AnalyzeRequest;
use chrono::{DateTime, Utc};

/// Everything the assembler needs beyond the request itself
pub struct ReportInputs {
    pub crawl: CrawlResult,
    pub insights: CollaboratorOutcome<Insights>,
    pub performance: CollaboratorOutcome<PerformanceSummary>,
    pub timestamp: DateTime<Utc>,
}

/// Builds the final report
///
/// Collaborator failures are carried through as error outcomes; assembly
/// itself cannot fail.
pub fn assemble_report(request: &AnalyzeRequest, inputs: ReportInputs) -> AnalysisReport {
    let ReportInputs {
        crawl,
        insights,
        performance,
        timestamp,
    } = inputs;

    let keyword_density = keyword_density(&crawl.pages, &request.keywords);
    let meta_tags = crawl
        .homepage()
        .map(|homepage| audit_meta_tags(homepage, &request.keywords, &keyword_density));

    let pages = crawl
        .pages
        .iter()
        .map(|page| audit_page(page, &request.keywords))
        .collect();

    let analysis = Analysis {
        pages,
        readability: crawl_readability(&crawl.pages),
        structured_data: summarize_structured_data(&crawl.pages),
        meta_tags,
        keyword_density,
        crawl: CrawlSummary {
            partial: crawl.is_partial(),
            failures: crawl.failures.clone(),
        },
        insights,
        performance,
    };

    AnalysisReport {
        url: request.url.clone(),
        keywords: request.keywords.clone(),
        pages_analyzed: crawl.pages.len(),
        analysis,
        timestamp,
    }
}


/// A small but fully populated report for tests elsewhere in the crate
#[cfg(test)]
pub(crate) fn sample_report() -> AnalysisReport {
    use crate::crawler::{ImageRecord, PageRecord, HEADING_LEVELS};
    use crate::insights::Faq;
    use std::collections::BTreeMap;

    let mut headings: BTreeMap<u8, Vec<String>> =
        HEADING_LEVELS.map(|level| (level, Vec::new())).collect();
    headings.insert(1, vec!["Acme Widgets".to_string()]);

    let content = "Acme builds durable widgets for every workshop. Our widgets ship worldwide.";
    let homepage = PageRecord {
        url: "https://example.com/".to_string(),
        title: "Acme Widgets".to_string(),
        description: String::new(),
        headings,
        images: vec![ImageRecord {
            src: "https://example.com/widget.png".to_string(),
            alt: String::new(),
            title: None,
        }],
        links: vec![],
        meta_tags: BTreeMap::new(),
        structured_data: vec![serde_json::json!({"@type": "Organization"})],
        content: content.to_string(),
        word_count: content.split_whitespace().count(),
    };

    let request = AnalyzeRequest {
        url: "https://example.com".to_string(),
        keywords: vec!["widgets".to_string(), "gadgets".to_string()],
    };

    let insights = Insights {
        ai_visibility_score: Some(72.0),
        semantic_clarity: Some(64.0),
        ai_summary: "Acme sells durable workshop widgets.".to_string(),
        optimized_title: "Durable Widgets | Acme".to_string(),
        optimized_description: "Durable widgets for every workshop.".to_string(),
        suggested_faqs: vec![Faq {
            question: "Do you ship abroad?".to_string(),
            answer: "Yes, worldwide.".to_string(),
        }],
        content_suggestions: vec!["Add a pricing table.".to_string()],
        sample_rewrite: Some("Acme makes widgets that last.".to_string()),
    };

    assemble_report(
        &request,
        ReportInputs {
            crawl: CrawlResult {
                pages: vec![homepage],
                failures: vec![],
            },
            insights: CollaboratorOutcome::Ok { data: insights },
            performance: CollaboratorOutcome::Error {
                error: "pagespeed is disabled".to_string(),
            },
            timestamp: Utc::now(),
        },
    )
}
