//! TF-IDF vectorizer over word n-grams.
//!
//! Term weighting:
//! - tokens: lowercase `\b\w\w+\b`, expanded to n-grams within `ngram_range`
//! - vocabulary: the `max_features` most frequent terms across the corpus, indexed alphabetically
//! - idf: `ln((1 + n_docs) / (1 + df)) + 1`
//! - rows: raw counts × idf, L2-normalized

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("valid token regex"));

/// Sparse row: `(term index, weight)` pairs sorted by index.
pub type SparseVector = Vec<(usize, f64)>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    ngram_range: (usize, usize),
    max_features: Option<usize>,
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
    fitted: bool,
}

impl TfidfVectorizer {
    pub fn new(ngram_range: (usize, usize), max_features: Option<usize>) -> Self {
        Self {
            ngram_range,
            max_features,
            vocabulary: BTreeMap::new(),
            idf: Vec::new(),
            fitted: false,
        }
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// Every vocabulary index has an idf weight. A deserialized model can violate this.
    pub fn is_consistent(&self) -> bool {
        self.idf.len() == self.vocabulary.len()
            && self.vocabulary.values().all(|&index| index < self.idf.len())
    }

    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// Learns vocabulary and idf weights from `corpus`, replacing any previous state.
    pub fn fit<S: AsRef<str>>(&mut self, corpus: &[S]) {
        let n_docs = corpus.len();
        let mut document_frequency: HashMap<String, usize> = HashMap::new();
        let mut corpus_frequency: HashMap<String, usize> = HashMap::new();

        for doc in corpus {
            let mut seen: HashSet<String> = HashSet::new();
            for term in self.analyze(doc.as_ref()) {
                *corpus_frequency.entry(term.clone()).or_insert(0) += 1;
                if seen.insert(term.clone()) {
                    *document_frequency.entry(term).or_insert(0) += 1;
                }
            }
        }

        let mut terms: Vec<(String, usize)> = corpus_frequency.into_iter().collect();
        if let Some(limit) = self.max_features {
            if terms.len() > limit {
                terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
                terms.truncate(limit);
            }
        }
        terms.sort_by(|a, b| a.0.cmp(&b.0));

        self.idf = terms
            .iter()
            .map(|(term, _)| {
                let df = document_frequency.get(term).copied().unwrap_or(0);
                ((1 + n_docs) as f64 / (1 + df) as f64).ln() + 1.0
            })
            .collect();
        self.vocabulary = terms
            .into_iter()
            .enumerate()
            .map(|(index, (term, _))| (term, index))
            .collect();
        self.fitted = true;
    }

    /// TF-IDF row for one document. Out-of-vocabulary terms are ignored, so an
    /// unfitted vectorizer yields an empty (zero) row.
    pub fn transform_one(&self, doc: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in self.analyze(doc) {
            if let Some(index) = self.term_index(&term) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut row: SparseVector = counts
            .into_iter()
            .map(|(index, tf)| (index, tf * self.idf[index]))
            .collect();

        let norm = l2_norm(&row);
        if norm > 0.0 {
            for (_, weight) in row.iter_mut() {
                *weight /= norm;
            }
        }
        row
    }

    pub fn transform<S: AsRef<str>>(&self, corpus: &[S]) -> Vec<SparseVector> {
        corpus.iter().map(|doc| self.transform_one(doc.as_ref())).collect()
    }

    /// Word n-grams of `doc`: every unigram first, then bigrams, and so on.
    fn analyze(&self, doc: &str) -> Vec<String> {
        let lowered = doc.to_lowercase();
        let tokens: Vec<&str> = TOKEN_PATTERN
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .collect();

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n.max(1)..=max_n {
            if n > tokens.len() {
                break;
            }
            terms.extend(tokens.windows(n).map(|window| window.join(" ")));
        }
        terms
    }
}

fn l2_norm(row: &[(usize, f64)]) -> f64 {
    row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
}

/// Cosine similarity of two index-sorted sparse rows; 0.0 if either is all zeros.
pub fn cosine_similarity(a: &[(usize, f64)], b: &[(usize, f64)]) -> f64 {
    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let (mut i, mut j) = (0, 0);
    let mut dot = 0.0;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                dot += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }

    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}
