//! Flesch–Kincaid grade level estimate

use crate::analytics::round2;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Raw counts behind a readability score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStats {
    pub sentences: usize,
    pub words: usize,
    pub syllables: usize,
}

impl TextStats {
    /// Counts sentences, words and syllables in `text`
    ///
    /// Sentences are the non-blank fragments between `.`, `!` and `?`.
    /// Words are whitespace-separated tokens.
    pub fn from_text(text: &str) -> Self {
        let sentences = text
            .split(['.', '!', '?'])
            .filter(|fragment| !fragment.trim().is_empty())
            .count();

        let (words, syllables) = text
            .split_whitespace()
            .fold((0, 0), |(w, s), word| (w + 1, s + count_syllables(word)));

        Self {
            sentences,
            words,
            syllables,
        }
    }

    /// Grade level from these counts; 0 when there are no sentences or words
    pub fn grade_level(&self) -> f64 {
        if self.sentences == 0 || self.words == 0 {
            return 0.0;
        }

        let words = self.words as f64;
        let score = 0.39 * (words / self.sentences as f64)
            + 11.8 * (self.syllables as f64 / words)
            - 15.59;
        round2(score)
    }
}

impl std::ops::Add for TextStats {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            sentences: self.sentences + other.sentences,
            words: self.words + other.words,
            syllables: self.syllables + other.syllables,
        }
    }
}

impl std::iter::Sum for TextStats {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, stats| acc + stats)
    }
}

/// Readability result for a crawl
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Readability {
    /// Grade level, two decimals
    pub score: f64,
    #[serde(flatten)]
    pub stats: TextStats,
}

impl Readability {
    pub fn from_stats(stats: TextStats) -> Self {
        Self {
            score: stats.grade_level(),
            stats,
        }
    }
}

/// Grade level of a single text
///
/// `0.39 * (words / sentences) + 11.8 * (syllables / words) - 15.59`,
/// rounded to two decimals.
///
/// # Examples
///
/// ```
/// use seo_scout::analytics::readability_score;
///
/// assert_eq!(readability_score("The cat sat on the mat."), -1.45);
/// assert_eq!(readability_score(""), 0.0);
/// ```
pub fn readability_score(text: &str) -> f64 {
    TextStats::from_text(text).grade_level()
}

fn silent_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:[^laeiouy]es|ed|[^laeiouy]e)$").expect("valid regex"))
}

fn vowel_group() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[aeiouy]+").expect("valid regex"))
}

/// Estimates the syllables in one word from its vowel groups
///
/// Non-letters are ignored and words of three letters or fewer count as one
/// syllable. Otherwise a trailing silent `e`/`es`/`ed` and a leading `y` are
/// stripped before counting runs of vowels; every word has at least one.
pub fn count_syllables(word: &str) -> usize {
    let word: String = word
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect();

    if word.chars().count() <= 3 {
        return 1;
    }

    let stripped = silent_suffix().replace(&word, "");
    let stripped = stripped.strip_prefix('y').unwrap_or(&stripped);

    vowel_group().find_iter(stripped).count().max(1)
}
