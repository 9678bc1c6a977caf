//! Fuzzy matching of a query against known titles

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Tuning for related-title suggestions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelatedOptions {
    /// Minimum normalized Levenshtein similarity (0.0 - 1.0)
    pub threshold: f64,
    /// Maximum number of suggestions
    pub limit: usize,
}

impl Default for RelatedOptions {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            limit: 10,
        }
    }
}

struct Candidate<'a> {
    title: &'a str,
    substring: bool,
    score: f64,
}

/// Titles related to `query`, best matches first
pub fn related_titles<S: AsRef<str>>(
    query: &str,
    titles: &[S],
    options: &RelatedOptions,
) -> Vec<String> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let mut candidates: Vec<Candidate<'_>> = titles
        .iter()
        .filter_map(|title| {
            let title = title.as_ref();
            let lower = title.to_lowercase();
            let substring = lower.contains(&query) || query.contains(&lower);
            let score = strsim::normalized_levenshtein(&query, &lower);

            (substring || score >= options.threshold).then_some(Candidate {
                title,
                substring,
                score,
            })
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.substring
            .cmp(&a.substring)
            .then_with(|| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal))
            .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
    });
    candidates.truncate(options.limit);

    candidates.into_iter().map(|c| c.title.to_string()).collect()
}
