//! Analysis pipeline
//!
//! Drives one request end to end:
//! crawl → analytics → {summarizer ∥ performance probe} → report → store → document.

use crate::config::Config;
use crate::crawler::{http_crawler, CrawlError, CrawlResult, Crawler};
use crate::insights::{
    probe_from_config, summarizer_from_config, CollaboratorOutcome, PerformanceProbe, Summarizer,
};
use crate::output::{document_path, DocumentRenderer, OutputResult};
use crate::report::{assemble_report, AnalysisReport, ReportInputs};
use crate::request::AnalyzeRequest;
use crate::storage::ReportStore;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Request-level analysis failures
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Crawl(#[from] CrawlError),

    #[error("Analysis did not finish within {0:?}")]
    Timeout(Duration),
}

/// Runs analyses against one crawler and one pair of collaborators
pub struct Analyzer {
    crawler: Crawler,
    summarizer: Arc<dyn Summarizer>,
    probe: Arc<dyn PerformanceProbe>,
    request_timeout: Option<Duration>,
}

impl Analyzer {
    pub fn new(
        crawler: Crawler,
        summarizer: Arc<dyn Summarizer>,
        probe: Arc<dyn PerformanceProbe>,
    ) -> Self {
        Self {
            crawler,
            summarizer,
            probe,
            request_timeout: None,
        }
    }

    /// Bounds the whole analysis, collaborators included
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Builds an analyzer with HTTP-backed components from the configuration
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let analyzer = Self::new(
            http_crawler(config)?,
            summarizer_from_config(config)?,
            probe_from_config(config)?,
        );
        Ok(analyzer.with_request_timeout(
            config.crawler.request_timeout_secs.map(Duration::from_secs),
        ))
    }

    /// Produces the report for one request
    ///
    /// # Returns
    ///
    /// * `Ok(AnalysisReport)` - Report, possibly with degraded collaborator fields
    /// * `Err(AnalysisError)` - The seed could not be crawled or time ran out
    pub async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisReport, AnalysisError> {
        match self.request_timeout {
            Some(limit) => tokio::time::timeout(limit, self.run(request))
                .await
                .map_err(|_| AnalysisError::Timeout(limit))?,
            None => self.run(request).await,
        }
    }

    async fn run(&self, request: &AnalyzeRequest) -> Result<AnalysisReport, AnalysisError> {
        let crawl = self.crawler.crawl(&request.url).await?;
        info!(
            "Crawled {} page(s) from {} ({} failed)",
            crawl.pages.len(),
            request.url,
            crawl.failures.len()
        );

        let text = combined_text(&crawl);
        let seed = crawl
            .homepage()
            .map_or(request.url.as_str(), |page| page.url.as_str());

        let (insights, performance) = tokio::join!(
            self.summarizer.summarize(seed, &text, &request.keywords),
            self.probe.measure(seed),
        );

        if let Err(e) = &insights {
            warn!("Insights unavailable: {}", e);
        }
        if let Err(e) = &performance {
            warn!("Performance data unavailable: {}", e);
        }

        Ok(assemble_report(
            request,
            ReportInputs {
                crawl,
                insights: CollaboratorOutcome::from(insights),
                performance: CollaboratorOutcome::from(performance),
                timestamp: Utc::now(),
            },
        ))
    }
}

/// Page contents in crawl order, one paragraph per page
fn combined_text(crawl: &CrawlResult) -> String {
    crawl
        .pages
        .iter()
        .map(|page| page.content.as_str())
        .filter(|content| !content.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// A persisted analysis
#[derive(Debug, Clone)]
pub struct StoredAnalysis {
    pub id: i64,
    pub report: AnalysisReport,
    /// Rendered document, absent when rendering failed
    pub document: Option<PathBuf>,
}

/// Analyzes, persists and renders one request
///
/// Persistence failures abort the request; a rendering failure is logged
/// and leaves [`StoredAnalysis::document`] empty.
pub async fn analyze_and_store(
    analyzer: &Analyzer,
    request: &AnalyzeRequest,
    store: &mut dyn ReportStore,
    renderer: &dyn DocumentRenderer,
    report_dir: &Path,
) -> crate::Result<StoredAnalysis> {
    let report = analyzer.analyze(request).await?;
    let id = store.save(&report)?;
    info!("Stored report {} for {}", id, report.url);

    let document = match render_document(&report, id, renderer, report_dir) {
        Ok(path) => Some(path),
        Err(e) => {
            warn!("Failed to render report {}: {}", id, e);
            None
        }
    };

    Ok(StoredAnalysis {
        id,
        report,
        document,
    })
}

/// Renders report `id` into the report directory and returns the path
pub fn render_document(
    report: &AnalysisReport,
    id: i64,
    renderer: &dyn DocumentRenderer,
    report_dir: &Path,
) -> OutputResult<PathBuf> {
    let path = document_path(report_dir, id, renderer);
    renderer.render(report, &path)?;
    info!("Rendered report {} to {}", id, path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CrawlerConfig;
    use crate::crawler::{FetchCause, FetchError, FetchedPage, PageFetcher};
    use crate::insights::{CollaboratorError, DisabledProbe, Insights, PerformanceSummary};
    use crate::output::{MarkdownRenderer, OutputError};
    use crate::storage::SqliteReportStore;
    use async_trait::async_trait;
    use std::collections::{BTreeMap, HashMap};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;
    use url::Url;

    struct StaticSite {
        pages: HashMap<String, String>,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl PageFetcher for StaticSite {
        async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let html = self
                .pages
                .get(url.as_str())
                .cloned()
                .ok_or_else(|| FetchError::new(url.as_str(), FetchCause::Status(404)))?;
            Ok(FetchedPage {
                url: url.clone(),
                html,
            })
        }
    }

    struct CountingSummarizer {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Summarizer for CountingSummarizer {
        async fn summarize(
            &self,
            _url: &str,
            text: &str,
            _keywords: &[String],
        ) -> Result<Insights, CollaboratorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Insights {
                ai_summary: format!("{} characters read", text.chars().count()),
                ..Insights::default()
            })
        }
    }

    struct FixedProbe;

    #[async_trait]
    impl PerformanceProbe for FixedProbe {
        async fn measure(&self, _url: &str) -> Result<PerformanceSummary, CollaboratorError> {
            Ok(PerformanceSummary {
                strategy: "mobile".to_string(),
                performance_score: Some(91.0),
                metrics: BTreeMap::new(),
            })
        }
    }

    struct BrokenRenderer;

    impl DocumentRenderer for BrokenRenderer {
        fn extension(&self) -> &'static str {
            "txt"
        }

        fn render(&self, _report: &AnalysisReport, _path: &Path) -> OutputResult<()> {
            Err(OutputError::Format("unsupported".to_string()))
        }
    }

    const HOME: &str = r#"<html><head><title>Acme</title></head>
        <body><h1>Widgets</h1><p>We sell widgets.</p><a href="/about">About</a></body></html>"#;
    const ABOUT: &str = r#"<html><head><title>About</title></head>
        <body><h1>About</h1><p>Family owned.</p></body></html>"#;

    fn site(delay: Option<Duration>) -> Arc<StaticSite> {
        let pages = [
            ("https://example.com/", HOME),
            ("https://example.com/about", ABOUT),
        ]
        .into_iter()
        .map(|(url, html)| (url.to_string(), html.to_string()))
        .collect();
        Arc::new(StaticSite { pages, delay })
    }

    fn analyzer(delay: Option<Duration>) -> Analyzer {
        let crawler = Crawler::new(site(delay), &CrawlerConfig::default());
        Analyzer::new(
            crawler,
            Arc::new(CountingSummarizer {
                calls: AtomicUsize::new(0),
            }),
            Arc::new(FixedProbe),
        )
    }

    fn request() -> AnalyzeRequest {
        AnalyzeRequest::new("https://example.com/", vec!["widgets".to_string()]).unwrap()
    }

    #[tokio::test]
    async fn test_analyze_merges_collaborators() {
        let report = analyzer(None).analyze(&request()).await.unwrap();

        assert_eq!(report.pages_analyzed, 2);
        assert!(report.analysis.insights.is_ok());
        assert_eq!(
            report.analysis.performance.data().unwrap().performance_score,
            Some(91.0)
        );
        assert!(!report.analysis.crawl.partial);
    }

    #[tokio::test]
    async fn test_disabled_probe_degrades_only_its_field() {
        let crawler = Crawler::new(site(None), &CrawlerConfig::default());
        let analyzer = Analyzer::new(
            crawler,
            Arc::new(CountingSummarizer {
                calls: AtomicUsize::new(0),
            }),
            Arc::new(DisabledProbe),
        );

        let report = analyzer.analyze(&request()).await.unwrap();
        assert!(report.analysis.insights.is_ok());
        assert!(!report.analysis.performance.is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_seed_is_an_error() {
        let request = AnalyzeRequest::new("https://example.com/missing", vec![]).unwrap();
        let result = analyzer(None).analyze(&request).await;
        assert!(matches!(
            result,
            Err(AnalysisError::Crawl(CrawlError::SeedUnreachable(_)))
        ));
    }

    #[tokio::test]
    async fn test_request_timeout() {
        let analyzer = analyzer(Some(Duration::from_millis(200)))
            .with_request_timeout(Some(Duration::from_millis(50)));
        let result = analyzer.analyze(&request()).await;
        assert!(matches!(result, Err(AnalysisError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_analyze_and_store() {
        let dir = TempDir::new().unwrap();
        let mut store = SqliteReportStore::new_in_memory("hash").unwrap();

        let stored = analyze_and_store(
            &analyzer(None),
            &request(),
            &mut store,
            &MarkdownRenderer,
            dir.path(),
        )
        .await
        .unwrap();

        assert_eq!(store.load(stored.id).unwrap().url, "https://example.com/");
        let document = stored.document.unwrap();
        assert!(document.exists());
        assert_eq!(document, dir.path().join(format!("seo-report-{}.md", stored.id)));
    }

    #[tokio::test]
    async fn test_render_failure_is_degraded() {
        let dir = TempDir::new().unwrap();
        let mut store = SqliteReportStore::new_in_memory("hash").unwrap();

        let stored = analyze_and_store(
            &analyzer(None),
            &request(),
            &mut store,
            &BrokenRenderer,
            dir.path(),
        )
        .await
        .unwrap();

        assert!(stored.document.is_none());
        assert_eq!(store.list().unwrap().len(), 1);
    }
}
