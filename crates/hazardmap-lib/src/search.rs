//! Approximate text search over the shelter dataset.
//!
//! Every record's facility name and address are normalised once at build
//! time. A query is normalised the same way and then matched approximately
//! against each field: the pattern may align anywhere in the field with a
//! bounded number of edit errors, and alignments further from the start of
//! the field are penalised.
//!
//! Field score = `errors / pattern_len + start / location_distance`, where
//! `0.0` is a perfect match at the start of the field. Fields scoring above
//! the threshold do not match. A record's score is the product of its
//! matching field scores, so a record matching in both name and address
//! ranks above one matching in a single field.

use std::cmp::Ordering;
use std::sync::Arc;

use tracing::debug;

use crate::normalize::normalize;
use crate::shelter::{ShelterId, ShelterRecord};

/// Maximum field score that still counts as a match.
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Number of characters from the field start over which the location penalty
/// grows to `1.0`.
pub const DEFAULT_LOCATION_DISTANCE: f64 = 100.0;

/// Floor applied to perfect field scores so products keep ranking information.
const MIN_FIELD_SCORE: f64 = f64::EPSILON;

/// Fields of a [`ShelterRecord`] that take part in search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    FacilityName,
    Address,
}

impl SearchField {
    pub const ALL: [SearchField; 2] = [SearchField::FacilityName, SearchField::Address];

    /// Raw (un-normalised) field value.
    pub fn value(self, record: &ShelterRecord) -> &str {
        match self {
            SearchField::FacilityName => &record.name,
            SearchField::Address => &record.address,
        }
    }
}

/// Tuning for the approximate matcher.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOptions {
    pub threshold: f64,
    pub location_distance: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            location_distance: DEFAULT_LOCATION_DISTANCE,
        }
    }
}

/// Normalised view of one record.
#[derive(Debug, Clone)]
struct SearchIndexEntry {
    id: ShelterId,
    fields: [Vec<char>; SearchField::ALL.len()],
}

/// Search result with its combined score (lower is better).
#[derive(Debug, Clone, Copy)]
pub struct SearchHit<'a> {
    pub id: ShelterId,
    pub record: &'a ShelterRecord,
    pub score: f64,
}

/// Read-only index over a shelter collection.
#[derive(Debug, Clone)]
pub struct FuzzySearchIndex {
    shelters: Arc<Vec<ShelterRecord>>,
    entries: Vec<SearchIndexEntry>,
    options: SearchOptions,
}

impl FuzzySearchIndex {
    /// Build the index with default options.
    pub fn build(shelters: Arc<Vec<ShelterRecord>>) -> Self {
        Self::with_options(shelters, SearchOptions::default())
    }

    pub fn with_options(shelters: Arc<Vec<ShelterRecord>>, options: SearchOptions) -> Self {
        let entries = shelters
            .iter()
            .enumerate()
            .map(|(id, record)| SearchIndexEntry {
                id,
                fields: SearchField::ALL.map(|field| normalize(field.value(record)).chars().collect()),
            })
            .collect::<Vec<_>>();
        debug!(entries = entries.len(), "built fuzzy search index");
        Self {
            shelters,
            entries,
            options,
        }
    }

    /// The indexed collection.
    pub fn shelters(&self) -> &[ShelterRecord] {
        &self.shelters
    }

    /// Shared handle to the indexed collection.
    pub fn shelters_arc(&self) -> Arc<Vec<ShelterRecord>> {
        Arc::clone(&self.shelters)
    }

    pub fn options(&self) -> SearchOptions {
        self.options
    }

    /// Matching records, best first.
    pub fn search(&self, query: &str) -> Vec<&ShelterRecord> {
        self.search_hits(query)
            .into_iter()
            .map(|hit| hit.record)
            .collect()
    }

    /// Matching records with their scores, best first. Equal scores keep
    /// collection order.
    pub fn search_hits(&self, query: &str) -> Vec<SearchHit<'_>> {
        let pattern: Vec<char> = normalize(query).chars().collect();
        if pattern.is_empty() {
            return Vec::new();
        }
        let pattern_str: String = pattern.iter().collect();

        let mut hits = self
            .entries
            .iter()
            .filter_map(|entry| {
                let mut matched = false;
                let mut score = 1.0;
                for text in &entry.fields {
                    if let Some(field) = field_score(&pattern, &pattern_str, text, &self.options) {
                        matched = true;
                        score *= field.max(MIN_FIELD_SCORE);
                    }
                }
                matched.then(|| SearchHit {
                    id: entry.id,
                    record: &self.shelters[entry.id],
                    score,
                })
            })
            .collect::<Vec<_>>();

        hits.sort_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal));
        debug!(query, hits = hits.len(), "fuzzy search complete");
        hits
    }
}

/// Best score of `pattern` aligned anywhere in `text`, if within threshold.
fn field_score(
    pattern: &[char],
    pattern_str: &str,
    text: &[char],
    options: &SearchOptions,
) -> Option<f64> {
    let len = pattern.len();
    if len == 0 || text.is_empty() {
        return None;
    }

    let max_errors = (options.threshold * len as f64).floor() as usize;
    let min_width = len.saturating_sub(max_errors).max(1);
    let max_width = len + max_errors;
    let mut best: Option<f64> = None;

    for start in 0..text.len() {
        let proximity = start as f64 / options.location_distance;
        if proximity > options.threshold || best.is_some_and(|b| proximity >= b) {
            break;
        }

        for width in min_width..=max_width {
            let end = start + width;
            if end > text.len() {
                break;
            }
            let window: String = text[start..end].iter().collect();
            let errors = strsim::levenshtein(pattern_str, &window);
            if errors > max_errors {
                continue;
            }
            let score = errors as f64 / len as f64 + proximity;
            if score <= options.threshold && best.map_or(true, |b| score < b) {
                best = Some(score);
            }
        }
    }

    best
}
