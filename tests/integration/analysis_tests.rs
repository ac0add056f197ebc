//! Integration tests for the analysis pipeline
//!
//! These tests use wiremock to serve both the audited site and the
//! language-model API, and run the full crawl → report → store → render cycle.

use seo_scout::config::{parse_config, Config};
use seo_scout::insights::CollaboratorOutcome;
use seo_scout::output::MarkdownRenderer;
use seo_scout::pipeline::analyze_and_store;
use seo_scout::storage::{open_store, ReportStore};
use seo_scout::request::InputValidationError;
use seo_scout::{AnalyzeRequest, Analyzer, ScoutError};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing every collaborator at `server_uri`
fn create_test_config(server_uri: &str, dir: &TempDir, max_pages: usize) -> Config {
    let toml = format!(
        r#"
[crawler]
max-pages = {max_pages}
page-timeout-ms = 2000

[user-agent]
crawler-name = "TestScout"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "test@example.com"

[insights]
endpoint = "{server_uri}"
model = "test-model"
api-key = "test-key"
timeout-secs = 5

[pagespeed]
enabled = false

[output]
database-path = "{db}"
report-dir = "{reports}"
"#,
        max_pages = max_pages,
        server_uri = server_uri,
        db = dir.path().join("reports.db").display(),
        reports = dir.path().join("reports").display(),
    );
    parse_config(&toml).expect("test config should be valid")
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html")
}

async fn mount_site(server: &MockServer) {
    let base = server.uri();

    let filler: Vec<String> = (0..98).map(|i| format!("word{}", i)).collect();
    let home = format!(
        r#"<html><head>
            <title>Acme Widgets</title>
            <meta name="description" content="Durable widgets for every workshop.">
            <script type="application/ld+json">{{"@type": "Organization", "name": "Acme"}}</script>
            <script type="application/ld+json">{{ not json </script>
        </head><body>
            <nav>
                widgets widgets widgets
                <a href="/">Home</a>
                <a href="/about">About</a>
                <a href="/broken">Broken</a>
                <a href="https://elsewhere.example/page">Elsewhere</a>
                <a href="{base}/about#team">About again</a>
            </nav>
            <h1>Widgets</h1>
            <p>{filler} widgets.</p>
            <img src="/logo.png" alt="Acme logo">
        </body></html>"#,
        filler = filler.join(" "),
        base = base,
    );

    let about = r#"<html><head><title>About Acme</title></head>
        <body><h2>Our story</h2><p>Family owned since 1990.</p>
        <a href="/">Home</a><a href="/contact">Contact</a></body></html>"#;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(home))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html(about.to_string()))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/contact"))
        .respond_with(html(
            "<html><head><title>Contact</title></head><body><h1>Contact</h1></body></html>"
                .to_string(),
        ))
        .mount(server)
        .await;
}

async fn mount_gemini(server: &MockServer) {
    let answer = json!({
        "aiVisibilityScore": 70,
        "semanticClarity": 60,
        "aiSummary": "Acme sells durable widgets.",
        "optimizedTitle": "Durable Widgets | Acme",
        "optimizedDescription": "Durable widgets for every workshop.",
        "suggestedFaqs": [],
        "contentSuggestions": ["Explain what the widgets are for."],
        "sampleRewrite": "Acme builds widgets that last."
    });

    Mock::given(method("POST"))
        .and(path("/v1beta/models/test-model:generateContent"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": answer.to_string()}]}}]
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_analysis_is_stored_and_rendered() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    mount_gemini(&server).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), &dir, 5);
    let analyzer = Analyzer::from_config(&config).unwrap();
    let mut store = open_store(
        std::path::Path::new(&config.output.database_path),
        "test-hash",
    )
    .unwrap();

    let request = AnalyzeRequest::new(format!("{}/", server.uri()), vec!["widgets".to_string()])
        .unwrap();

    let stored = analyze_and_store(
        &analyzer,
        &request,
        &mut store,
        &MarkdownRenderer,
        std::path::Path::new(&config.output.report_dir),
    )
    .await
    .unwrap();

    let report = &stored.report;
    let analysis = &report.analysis;

    // home, about, contact; /broken is recorded as a failure
    assert_eq!(report.pages_analyzed, 3);
    assert!(analysis.crawl.partial);
    assert_eq!(analysis.crawl.failures.len(), 1);
    assert!(analysis.crawl.failures[0].url.ends_with("/broken"));

    // each distinct URL is fetched once
    let about_fetches = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.method == wiremock::http::Method::Get && r.url.path() == "/about")
        .count();
    assert_eq!(about_fetches, 1);

    // every collected URL stays on the mock server's origin
    for page in &analysis.pages {
        assert!(page.url.starts_with(&server.uri()));
    }

    // nav text is excluded, so the homepage holds two hits in 100 words
    let widgets = &analysis.keyword_density["widgets"];
    assert_eq!(widgets.pages[0].count, 2);
    assert_eq!(widgets.pages[0].density, 2.0);

    // the malformed JSON-LD block does not hide the valid one
    assert_eq!(analysis.structured_data.pages_with_structured_data, 1);
    assert_eq!(analysis.structured_data.types, vec!["Organization"]);

    assert!(analysis.pages[0].suggestions.is_empty());
    assert!(analysis.pages[1]
        .suggestions
        .contains(&"Add an H1 heading to define the page topic.".to_string()));

    match &analysis.insights {
        CollaboratorOutcome::Ok { data } => {
            assert_eq!(data.ai_summary, "Acme sells durable widgets.")
        }
        other => panic!("expected insights, got {:?}", other),
    }
    assert!(!analysis.performance.is_ok());

    // persisted and rendered
    let loaded = store.load(stored.id).unwrap();
    assert_eq!(loaded.url, report.url);
    assert_eq!(store.list().unwrap()[0].config_hash, "test-hash");

    let document = std::fs::read_to_string(stored.document.unwrap()).unwrap();
    assert!(document.contains("Acme builds widgets that last."));
}

#[tokio::test]
async fn test_page_cap_limits_crawl() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server.uri(), &dir, 1);
    config.insights.enabled = false;

    let analyzer = Analyzer::from_config(&config).unwrap();
    let request = AnalyzeRequest::new(server.uri(), vec![]).unwrap();
    let report = analyzer.analyze(&request).await.unwrap();

    assert_eq!(report.pages_analyzed, 1);
    assert!(!report.analysis.crawl.partial);
    assert!(!report.analysis.insights.is_ok());
}

#[test]
fn test_request_without_keywords_is_rejected() {
    let result = AnalyzeRequest::from_json(r#"{"url": "https://example.com/"}"#);
    assert_eq!(result, Err(InputValidationError::MissingField("keywords")));

    let error: ScoutError = result.unwrap_err().into();
    assert!(matches!(error, ScoutError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_redirected_page_resolves_links_from_target() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<html><body><h1>Home</h1><a href="/docs">Docs</a></body></html>"#.to_string(),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/docs"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", format!("{}/docs/", base).as_str()),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/docs/"))
        .respond_with(html(
            r#"<html><body><h1>Docs</h1><a href="intro">Intro</a></body></html>"#.to_string(),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/docs/intro"))
        .respond_with(html(
            "<html><body><h1>Intro</h1><p>Start here.</p></body></html>".to_string(),
        ))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&base, &dir, 10);
    config.insights.enabled = false;

    let analyzer = Analyzer::from_config(&config).unwrap();
    let request = AnalyzeRequest::new(format!("{}/", base), vec![]).unwrap();
    let report = analyzer.analyze(&request).await.unwrap();

    let urls: Vec<_> = report
        .analysis
        .pages
        .iter()
        .map(|page| page.url.clone())
        .collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/", base),
            format!("{}/docs/", base),
            format!("{}/docs/intro", base)
        ]
    );
    assert!(!report.analysis.crawl.partial);
}
