//! HTML extractor for SEO signals
//!
//! This module turns a fetched HTML document into a [`PageRecord`]:
//! - Title, meta description and all meta tags
//! - Headings for levels 1 through 6
//! - Images with alt/title text
//! - Same-origin links (resolved, normalized, deduplicated)
//! - JSON-LD structured data blocks
//! - Visible body text and its word count

use crate::crawler::page::{ImageRecord, PageRecord, HEADING_LEVELS};
use crate::url::{is_same_origin, normalize_parsed};
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;
use url::{Origin, Url};

/// Elements whose text never counts as page content
const EXCLUDED_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "svg", "iframe", "nav", "footer", "aside",
];

/// A `<header>` inside one of these belongs to that section, not the page
const SECTIONING_TAGS: &[&str] = &["article", "section", "main", "aside", "nav"];

/// Class/id tokens that mark sidebars and advertising blocks
const EXCLUDED_MARKERS: &[&str] = &[
    "sidebar",
    "ad",
    "ads",
    "advert",
    "advertisement",
    "sponsored",
    "cookie-banner",
];

/// Elements that break text flow (a space is inserted around them)
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption", "figure",
    "h1", "h2", "h3", "h4", "h5", "h6", "hr", "li", "main", "ol", "p", "pre", "section",
    "table", "td", "th", "tr", "ul",
];

/// Whole-document extraction failures
#[derive(Debug, Clone, Error)]
pub enum ExtractError {
    #[error("Document at {url} is empty")]
    EmptyDocument { url: String },

    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },
}

/// A single JSON-LD block could not be parsed
#[derive(Debug, Clone, Error)]
#[error("Malformed JSON-LD block #{index} on {url}: {message}")]
pub struct StructuredDataParseError {
    pub url: String,
    pub index: usize,
    pub message: String,
}

/// Extracts a [`PageRecord`] from raw HTML
///
/// # Arguments
///
/// * `html` - The raw HTML document
/// * `page_url` - The URL that served the document (base for relative links
///   unless the document declares `<base href>`)
/// * `origin` - The seed origin; links outside it are dropped
/// * `max_content_chars` - Upper bound on the extracted body text
///
/// # Example
///
/// ```
/// use seo_scout::crawler::extract_page;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><h1>Hi</h1><a href="/a">A</a></body></html>"#;
/// let url = Url::parse("https://example.com/").unwrap();
/// let page = extract_page(html, &url, &url.origin(), 10_000).unwrap();
/// assert_eq!(page.title, "Test");
/// assert_eq!(page.links, vec!["https://example.com/a".to_string()]);
/// ```
pub fn extract_page(
    html: &str,
    page_url: &Url,
    origin: &Origin,
    max_content_chars: usize,
) -> Result<PageRecord, ExtractError> {
    if html.trim().is_empty() {
        return Err(ExtractError::EmptyDocument {
            url: page_url.to_string(),
        });
    }

    let document = Html::parse_document(html);

    let title = select_first_text(&document, "title")?;
    let meta_tags = extract_meta_tags(&document)?;
    let description = meta_tags.get("description").cloned().unwrap_or_default();
    let headings = extract_headings(&document)?;
    let base_url = document_base(&document, page_url)?;
    let images = extract_images(&document, &base_url)?;
    let links = extract_links(&document, &base_url, origin)?;
    let structured_data = extract_structured_data(&document, page_url)?;
    let content = extract_content(&document, max_content_chars)?;
    let word_count = content.split_whitespace().count();

    Ok(PageRecord {
        url: page_url.to_string(),
        title,
        description,
        headings,
        images,
        links,
        meta_tags,
        structured_data,
        content,
        word_count,
    })
}

fn selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|e| ExtractError::Selector {
        selector: css.to_string(),
        message: e.to_string(),
    })
}

/// Joins an element's text nodes and collapses whitespace
fn element_text(element: &ElementRef) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn select_first_text(document: &Html, css: &str) -> Result<String, ExtractError> {
    let sel = selector(css)?;
    Ok(document
        .select(&sel)
        .next()
        .map(|element| element_text(&element))
        .unwrap_or_default())
}

/// Collects `<meta>` tags keyed by name, property, http-equiv or itemprop
///
/// The first occurrence of a key wins.
fn extract_meta_tags(document: &Html) -> Result<BTreeMap<String, String>, ExtractError> {
    let sel = selector("meta")?;
    let mut tags = BTreeMap::new();

    for element in document.select(&sel) {
        let value = element.value();

        if let Some(charset) = value.attr("charset") {
            tags.entry("charset".to_string())
                .or_insert_with(|| charset.trim().to_string());
            continue;
        }

        let key = value
            .attr("name")
            .or_else(|| value.attr("property"))
            .or_else(|| value.attr("http-equiv"))
            .or_else(|| value.attr("itemprop"));

        if let (Some(key), Some(content)) = (key, value.attr("content")) {
            let key = key.trim().to_lowercase();
            if !key.is_empty() {
                tags.entry(key)
                    .or_insert_with(|| collapse_whitespace(content));
            }
        }
    }

    Ok(tags)
}

/// Extracts non-empty heading texts for every level, keeping all six keys
fn extract_headings(document: &Html) -> Result<BTreeMap<u8, Vec<String>>, ExtractError> {
    let mut headings = BTreeMap::new();

    for level in HEADING_LEVELS {
        let sel = selector(&format!("h{}", level))?;
        let texts = document
            .select(&sel)
            .map(|element| element_text(&element))
            .filter(|text| !text.is_empty())
            .collect();
        headings.insert(level, texts);
    }

    Ok(headings)
}

/// The first `<base href>`, resolved against the page URL
fn document_base(document: &Html, page_url: &Url) -> Result<Url, ExtractError> {
    let sel = selector("base[href]")?;
    Ok(document
        .select(&sel)
        .next()
        .and_then(|element| element.value().attr("href"))
        .and_then(|href| page_url.join(href.trim()).ok())
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or_else(|| page_url.clone()))
}

fn extract_images(document: &Html, base_url: &Url) -> Result<Vec<ImageRecord>, ExtractError> {
    let sel = selector("img")?;

    Ok(document
        .select(&sel)
        .filter_map(|element| {
            let value = element.value();
            let src = value.attr("src").or_else(|| value.attr("data-src"))?.trim();
            if src.is_empty() {
                return None;
            }

            let src = base_url
                .join(src)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| src.to_string());

            Some(ImageRecord {
                src,
                alt: value.attr("alt").map(str::trim).unwrap_or("").to_string(),
                title: value
                    .attr("title")
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string),
            })
        })
        .collect())
}

/// Extracts deduplicated same-origin links from `<a href>` tags
///
/// # Link Extraction Rules
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` and `data:` links
/// - fragment-only links
/// - hrefs that do not resolve to an HTTP(S) URL
/// - URLs outside the seed origin
fn extract_links(
    document: &Html,
    base_url: &Url,
    origin: &Origin,
) -> Result<Vec<String>, ExtractError> {
    let sel = selector("a[href]")?;
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&sel) {
        if element.value().attr("download").is_some() {
            continue;
        }

        let Some(href) = element.value().attr("href") else {
            continue;
        };

        if let Some(url) = resolve_link(href, base_url) {
            if is_same_origin(origin, &url) && seen.insert(url.to_string()) {
                links.push(url.to_string());
            }
        }
    }

    Ok(links)
}

/// Resolves a link href to a normalized absolute URL
///
/// Returns None if the link should be excluded.
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    normalize_parsed(absolute).ok()
}

/// Parses every JSON-LD block independently
///
/// Top-level arrays are flattened. A malformed block is logged and skipped
/// without affecting its siblings.
fn extract_structured_data(
    document: &Html,
    page_url: &Url,
) -> Result<Vec<serde_json::Value>, ExtractError> {
    let sel = selector(r#"script[type*="ld+json"]"#)?;
    let mut blocks = Vec::new();

    for (index, element) in document.select(&sel).enumerate() {
        let raw: String = element.text().collect();
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }

        match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(serde_json::Value::Array(items)) => blocks.extend(items),
            Ok(value) => blocks.push(value),
            Err(e) => {
                let error = StructuredDataParseError {
                    url: page_url.to_string(),
                    index,
                    message: e.to_string(),
                };
                tracing::warn!("{}", error);
            }
        }
    }

    Ok(blocks)
}

/// Extracts visible body text with non-content elements removed
fn extract_content(document: &Html, max_chars: usize) -> Result<String, ExtractError> {
    let body_sel = selector("body")?;
    let root = document
        .select(&body_sel)
        .next()
        .unwrap_or_else(|| document.root_element());

    let mut raw = String::new();
    collect_visible_text(root, &mut raw);

    let collapsed = collapse_whitespace(&raw);
    Ok(truncate_chars(&collapsed, max_chars))
}

fn collect_visible_text(element: ElementRef, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    if is_excluded(&child_element) {
                        continue;
                    }

                    let is_block = BLOCK_TAGS.contains(&child_element.value().name());
                    if is_block {
                        out.push(' ');
                    }
                    collect_visible_text(child_element, out);
                    if is_block {
                        out.push(' ');
                    }
                }
            }
            _ => {}
        }
    }
}

fn is_excluded(element: &ElementRef) -> bool {
    let value = element.value();

    if EXCLUDED_TAGS.contains(&value.name()) || value.attr("hidden").is_some() {
        return true;
    }

    if value.name() == "header" && is_page_header(element) {
        return true;
    }

    if matches!(
        value.attr("role"),
        Some("navigation") | Some("complementary") | Some("banner")
    ) {
        return true;
    }

    let marked = |token: &str| EXCLUDED_MARKERS.contains(&token.to_ascii_lowercase().as_str());
    value.classes().any(marked) || value.id().map_or(false, marked)
}

fn is_page_header(header: &ElementRef) -> bool {
    !header.ancestors().any(|node| {
        node.value()
            .as_element()
            .map_or(false, |element| SECTIONING_TAGS.contains(&element.name()))
    })
}

/// Truncates on a character boundary
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/page").unwrap()
    }

    fn extract(html: &str) -> PageRecord {
        let url = base_url();
        extract_page(html, &url, &url.origin(), 10_000).unwrap()
    }

    #[test]
    fn test_extract_title_with_whitespace() {
        let page = extract(r#"<html><head><title>  Test   Page  </title></head><body></body></html>"#);
        assert_eq!(page.title, "Test Page");
    }

    #[test]
    fn test_no_title_or_description() {
        let page = extract("<html><head></head><body><p>Hello</p></body></html>");
        assert_eq!(page.title, "");
        assert_eq!(page.description, "");
    }

    #[test]
    fn test_empty_document_is_an_error() {
        let url = base_url();
        let result = extract_page("   \n ", &url, &url.origin(), 100);
        assert!(matches!(result, Err(ExtractError::EmptyDocument { .. })));
    }

    #[test]
    fn test_meta_tags_and_description() {
        let page = extract(
            r#"<html><head>
                <meta charset="utf-8">
                <meta name="Description" content="A  fine page">
                <meta property="og:title" content="OG Title">
                <meta name="description" content="ignored duplicate">
            </head><body></body></html>"#,
        );
        assert_eq!(page.description, "A fine page");
        assert_eq!(page.meta_tags.get("og:title").unwrap(), "OG Title");
        assert_eq!(page.meta_tags.get("charset").unwrap(), "utf-8");
    }

    #[test]
    fn test_all_heading_levels_present() {
        let page = extract("<html><body><h2>Sub</h2><h2>Other</h2><h1></h1></body></html>");
        assert_eq!(page.headings.len(), 6);
        assert!(page.headings_at(1).is_empty());
        assert_eq!(page.headings_at(2), ["Sub".to_string(), "Other".to_string()]);
        assert!(page.headings_at(6).is_empty());
    }

    #[test]
    fn test_images_default_alt() {
        let page = extract(
            r#"<html><body>
                <img src="/a.png" alt="Logo" title="Brand">
                <img src="b.png">
                <img alt="no source">
            </body></html>"#,
        );
        assert_eq!(page.images.len(), 2);
        assert_eq!(page.images[0].src, "https://example.com/a.png");
        assert_eq!(page.images[0].alt, "Logo");
        assert_eq!(page.images[0].title.as_deref(), Some("Brand"));
        assert_eq!(page.images[1].alt, "");
        assert!(!page.images[1].has_alt());
    }

    #[test]
    fn test_links_same_origin_only() {
        let page = extract(
            r#"<html><body>
                <a href="/about">About</a>
                <a href="https://other.com/page">Other</a>
                <a href="https://sub.example.com/x">Sub</a>
                <a href="http://example.com/insecure">Scheme</a>
            </body></html>"#,
        );
        assert_eq!(page.links, vec!["https://example.com/about".to_string()]);
    }

    #[test]
    fn test_links_deduplicated_and_normalized() {
        let page = extract(
            r##"<html><body>
                <a href="/a#top">A</a>
                <a href="/a?utm_source=x">A again</a>
                <a href="https://example.com/a">A absolute</a>
                <a href="b">B</a>
            </body></html>"##,
        );
        assert_eq!(
            page.links,
            vec![
                "https://example.com/a".to_string(),
                "https://example.com/b".to_string()
            ]
        );
    }

    #[test]
    fn test_skipped_link_kinds() {
        let page = extract(
            r##"<html><body>
                <a href="javascript:void(0)">JS</a>
                <a href="MAILTO:test@example.com">Mail</a>
                <a href="tel:+123">Tel</a>
                <a href="data:text/html,hi">Data</a>
                <a href="#section">Jump</a>
                <a href="/file.pdf" download>Download</a>
                <a href="http://[bad">Broken</a>
            </body></html>"##,
        );
        assert!(page.links.is_empty());
    }

    #[test]
    fn test_malformed_json_ld_does_not_block_others() {
        let page = extract(
            r#"<html><head>
                <script type="application/ld+json">{"@type": "Organization", "name": "Acme"}</script>
                <script type="application/ld+json">{ this is not json </script>
                <script type="application/ld+json">[{"@type": "WebSite"}, {"@type": "Person"}]</script>
            </head><body></body></html>"#,
        );
        assert_eq!(page.structured_data.len(), 3);
        assert_eq!(page.structured_data[0]["@type"], "Organization");
        assert_eq!(page.structured_data[2]["@type"], "Person");
    }

    #[test]
    fn test_content_excludes_non_content_elements() {
        let page = extract(
            r#"<html><head><style>body { color: red }</style></head><body>
                <nav>Menu Home</nav>
                <header>Site header</header>
                <div class="sidebar">Side stuff</div>
                <div id="ads">Buy now</div>
                <main><h1>Title</h1><p>First paragraph.</p><p>Second <b>bold</b> text.</p></main>
                <script>var x = 1;</script>
                <footer>Copyright</footer>
            </body></html>"#,
        );
        assert_eq!(page.content, "Title First paragraph. Second bold text.");
        assert_eq!(page.word_count, 6);
    }

    #[test]
    fn test_content_truncated_on_char_boundary() {
        let url = base_url();
        let html = "<html><body><p>héllo wörld</p></body></html>";
        let page = extract_page(html, &url, &url.origin(), 4).unwrap();
        assert_eq!(page.content, "héll");
        assert_eq!(page.word_count, 1);
    }

    #[test]
    fn test_truncate_chars_shorter_than_limit() {
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn test_article_header_counts_as_content() {
        let page = extract(
            r#"<html><body>
                <header>Site banner</header>
                <article><header><h1>Widgets</h1><p>Intro text.</p></header><p>Body.</p></article>
                <form><label>Email widgets updates</label></form>
                <div role="banner">Promo</div>
            </body></html>"#,
        );
        assert_eq!(page.content, "Widgets Intro text. Body. Email widgets updates");
        assert_eq!(page.word_count, 7);
    }

    #[test]
    fn test_base_href_used_for_relative_urls() {
        let page = extract(
            r#"<html><head><base href="/docs/"></head><body>
                <a href="intro">Intro</a>
                <a href="/top">Top</a>
                <img src="diagram.png" alt="Diagram">
            </body></html>"#,
        );
        assert_eq!(
            page.links,
            vec![
                "https://example.com/docs/intro".to_string(),
                "https://example.com/top".to_string()
            ]
        );
        assert_eq!(page.images[0].src, "https://example.com/docs/diagram.png");
    }

    #[test]
    fn test_unusable_base_href_falls_back_to_page_url() {
        let page = extract(
            r#"<html><head><base href="javascript:void(0)"></head><body>
                <a href="b">B</a>
            </body></html>"#,
        );
        assert_eq!(page.links, vec!["https://example.com/b".to_string()]);
    }
}
