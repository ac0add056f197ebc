use url::{Origin, Url};

/// Returns true if `candidate` shares scheme, host and port with `origin`
///
/// # Examples
///
/// ```
/// use url::Url;
/// use seo_scout::url::is_same_origin;
///
/// let seed = Url::parse("https://example.com/").unwrap();
/// let origin = seed.origin();
/// assert!(is_same_origin(&origin, &Url::parse("https://example.com/about").unwrap()));
/// assert!(!is_same_origin(&origin, &Url::parse("https://example.com.evil.org/").unwrap()));
/// assert!(!is_same_origin(&origin, &Url::parse("http://example.com/").unwrap()));
/// ```
pub fn is_same_origin(origin: &Origin, candidate: &Url) -> bool {
    origin.is_tuple() && *origin == candidate.origin()
}
