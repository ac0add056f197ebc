//! Configuration module for SEO Scout
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! The resulting [`Config`] is passed explicitly into every component at
//! construction; nothing reads process-wide settings after startup.
//!
//! # Example
//!
//! ```no_run
//! use seo_scout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Crawler will collect at most {} pages", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, InsightsConfig, OutputConfig, PageSpeedConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
