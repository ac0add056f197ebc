//! Breadth-first crawl frontier
//!
//! This module handles:
//! - FIFO ordering of URLs waiting to be fetched
//! - The visited set guaranteeing each URL is fetched at most once
//! - Deduplication of URLs already waiting in the queue

use std::collections::{HashSet, VecDeque};
use url::Url;

/// FIFO queue of URLs plus the set of URLs already visited
///
/// The frontier only accepts URLs it has never seen, so it is bounded by
/// the number of distinct URLs discovered during a crawl.
#[derive(Debug, Default)]
pub struct Frontier {
    /// URLs waiting to be fetched, in discovery order
    queue: VecDeque<Url>,

    /// Every URL ever enqueued (visited or still waiting)
    seen: HashSet<String>,

    /// URLs popped for fetching
    visited: HashSet<String>,
}

impl Frontier {
    /// Creates a frontier holding only the seed URL
    pub fn new(seed: Url) -> Self {
        let mut frontier = Self::default();
        frontier.enqueue(seed);
        frontier
    }

    /// Adds a URL to the back of the queue
    ///
    /// Returns false if the URL was already enqueued or visited.
    pub fn enqueue(&mut self, url: Url) -> bool {
        if self.visited.contains(url.as_str()) || !self.seen.insert(url.to_string()) {
            return false;
        }
        self.queue.push_back(url);
        true
    }

    /// Pops the head of the queue and marks it visited
    ///
    /// URLs that were visited in the meantime are skipped.
    pub fn next_url(&mut self) -> Option<Url> {
        while let Some(url) = self.queue.pop_front() {
            if self.visited.insert(url.to_string()) {
                return Some(url);
            }
            tracing::trace!("Skipping already visited URL: {}", url);
        }
        None
    }

    /// Marks a URL visited without it passing through the queue
    ///
    /// Used for redirect targets. Returns false if it was already visited.
    pub fn mark_visited(&mut self, url: &Url) -> bool {
        self.seen.insert(url.to_string());
        self.visited.insert(url.to_string())
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Number of URLs waiting to be fetched
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
