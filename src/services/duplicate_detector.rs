//! Duplicate detection for candidate questions.
//!
//! A candidate is compared with every previously stored question through a
//! TF-IDF vector space fitted on `corpus ++ [candidate]`. The reported score is
//! the cosine similarity of the closest prior entry, so a single near-duplicate
//! among many unrelated questions is still caught.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::config::{Config, DEFAULT_DUPLICATE_THRESHOLD};
use crate::models::domain::DuplicateFlag;

// Tokens are runs of two or more word characters.
static TOKEN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("TOKEN_REGEX is a valid regex pattern"));

/// Term-weighting knobs of the vector space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TfIdfOptions {
    /// `ln((1 + n) / (1 + df)) + 1` when set, `ln(n / df) + 1` otherwise.
    pub smooth_idf: bool,
    /// Replace raw counts with `1 + ln(tf)`.
    pub sublinear_tf: bool,
}

impl Default for TfIdfOptions {
    fn default() -> Self {
        Self {
            smooth_idf: true,
            sublinear_tf: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DuplicateAssessment {
    pub score: f64,
    pub flag: DuplicateFlag,
}

#[derive(Clone, Copy, Debug)]
pub struct DuplicateDetector {
    threshold: f64,
    options: TfIdfOptions,
}

impl Default for DuplicateDetector {
    fn default() -> Self {
        Self::new(DEFAULT_DUPLICATE_THRESHOLD, TfIdfOptions::default())
    }
}

impl DuplicateDetector {
    pub fn new(threshold: f64, options: TfIdfOptions) -> Self {
        Self { threshold, options }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.duplicate_threshold,
            TfIdfOptions {
                smooth_idf: config.tfidf_smooth_idf,
                sublinear_tf: config.tfidf_sublinear_tf,
            },
        )
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn flag(&self, score: f64) -> DuplicateFlag {
        DuplicateFlag::from_score(score, self.threshold)
    }

    pub fn assess<S: AsRef<str>>(&self, candidate: &str, corpus: &[S]) -> DuplicateAssessment {
        let score = self.score(candidate, corpus);
        DuplicateAssessment {
            score,
            flag: self.flag(score),
        }
    }

    /// Highest cosine similarity between `candidate` and any entry of `corpus`, in `[0, 1]`.
    ///
    /// Returns exactly `0.0` for an empty corpus. Empty or whitespace-only texts
    /// are valid documents with an all-zero vector.
    pub fn score<S: AsRef<str>>(&self, candidate: &str, corpus: &[S]) -> f64 {
        if corpus.is_empty() {
            return 0.0;
        }

        let term_counts: Vec<BTreeMap<String, f64>> = corpus
            .iter()
            .map(|doc| count_terms(doc.as_ref()))
            .chain(std::iter::once(count_terms(candidate)))
            .collect();

        let idf = inverse_document_frequency(&term_counts, self.options.smooth_idf);

        let mut vectors: Vec<BTreeMap<&str, f64>> = term_counts
            .iter()
            .map(|counts| weigh(counts, &idf, self.options.sublinear_tf))
            .collect();

        let candidate_vector = vectors.pop().unwrap_or_default();

        vectors
            .iter()
            .map(|doc| cosine_similarity(&candidate_vector, doc))
            .fold(0.0_f64, f64::max)
            .clamp(0.0, 1.0)
    }
}

/// Scores with the default threshold and weighting.
pub fn score<S: AsRef<str>>(candidate: &str, corpus: &[S]) -> f64 {
    DuplicateDetector::default().score(candidate, corpus)
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    TOKEN_REGEX
        .find_iter(text)
        .map(|token| token.as_str().to_lowercase())
}

fn count_terms(text: &str) -> BTreeMap<String, f64> {
    let mut counts = BTreeMap::new();
    for token in tokenize(text) {
        *counts.entry(token).or_insert(0.0) += 1.0;
    }
    counts
}

fn inverse_document_frequency(
    term_counts: &[BTreeMap<String, f64>],
    smooth: bool,
) -> BTreeMap<&str, f64> {
    let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
    for counts in term_counts {
        for term in counts.keys() {
            *document_frequency.entry(term.as_str()).or_insert(0) += 1;
        }
    }

    let n = term_counts.len() as f64;
    document_frequency
        .into_iter()
        .map(|(term, df)| {
            let df = df as f64;
            let idf = if smooth {
                ((1.0 + n) / (1.0 + df)).ln() + 1.0
            } else {
                (n / df).ln() + 1.0
            };
            (term, idf)
        })
        .collect()
}

/// TF-IDF weights of one document, L2-normalised. An empty document stays empty.
fn weigh<'a>(
    counts: &'a BTreeMap<String, f64>,
    idf: &BTreeMap<&str, f64>,
    sublinear_tf: bool,
) -> BTreeMap<&'a str, f64> {
    let mut vector: BTreeMap<&str, f64> = counts
        .iter()
        .map(|(term, &tf)| {
            let tf = if sublinear_tf { 1.0 + tf.ln() } else { tf };
            let weight = tf * idf.get(term.as_str()).copied().unwrap_or(1.0);
            (term.as_str(), weight)
        })
        .collect();

    let norm = vector.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for weight in vector.values_mut() {
            *weight /= norm;
        }
    }
    vector
}

/// Dot product of two L2-normalised sparse vectors.
fn cosine_similarity(a: &BTreeMap<&str, f64>, b: &BTreeMap<&str, f64>) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small
        .iter()
        .filter_map(|(term, weight)| large.get(term).map(|other| weight * other))
        .sum()
}
