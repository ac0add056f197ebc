//! URL handling module for SEO Scout
//!
//! This module provides URL normalization and same-origin checks used by the
//! extractor and crawler.

mod normalize;
mod origin;

pub use normalize::{normalize_parsed, normalize_url};
pub use origin::is_same_origin;
