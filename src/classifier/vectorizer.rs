//! Bag-of-n-grams tf-idf vectorization.
//!
//! Word tokens (letters, digits, underscore; two chars minimum, lowercased)
//! are expanded into unigrams through trigrams, the vocabulary capped at the
//! most frequent terms, and documents mapped to L2-normalized tf-idf rows.

use std::collections::{HashMap, HashSet};

pub const NGRAM_MIN: usize = 1;
pub const NGRAM_MAX: usize = 3;
pub const MAX_FEATURES: usize = 500;

#[derive(Debug, Clone)]
pub struct NgramVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl NgramVectorizer {
    /// Learn a vocabulary and idf weights from the corpus. Returns `None`
    /// when the corpus yields no terms at all (degenerate vocabulary).
    pub fn fit(documents: &[&str]) -> Option<Self> {
        let tokenized: Vec<Vec<String>> = documents.iter().map(|doc| ngrams(doc)).collect();

        let mut total_counts: HashMap<&str, usize> = HashMap::new();
        let mut doc_frequency: HashMap<&str, usize> = HashMap::new();
        for terms in &tokenized {
            let mut seen: HashSet<&str> = HashSet::new();
            for term in terms {
                *total_counts.entry(term).or_insert(0) += 1;
                seen.insert(term);
            }
            for term in seen {
                *doc_frequency.entry(term).or_insert(0) += 1;
            }
        }

        if total_counts.is_empty() {
            return None;
        }

        // Most frequent terms first, lexicographic tie-break, capped.
        let mut ranked: Vec<(&str, usize)> = total_counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(MAX_FEATURES);

        let n_docs = documents.len() as f64;
        let mut vocabulary = HashMap::with_capacity(ranked.len());
        let mut idf = Vec::with_capacity(ranked.len());
        for (index, (term, _)) in ranked.iter().enumerate() {
            let df = *doc_frequency.get(term).unwrap_or(&0) as f64;
            vocabulary.insert((*term).to_string(), index);
            idf.push(((1.0 + n_docs) / (1.0 + df)).ln() + 1.0);
        }

        Some(Self { vocabulary, idf })
    }

    /// Map a document to its L2-normalized tf-idf row. Documents sharing no
    /// terms with the vocabulary map to the zero vector.
    pub fn transform(&self, document: &str) -> Vec<f64> {
        let mut row = vec![0.0; self.vocabulary.len()];
        for term in ngrams(document) {
            if let Some(&index) = self.vocabulary.get(term.as_str()) {
                row[index] += 1.0;
            }
        }

        for (index, value) in row.iter_mut().enumerate() {
            *value *= self.idf[index];
        }

        let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in row.iter_mut() {
                *value /= norm;
            }
        }
        row
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }
}

/// Word tokens of length >= 2, lowercased.
fn tokenize(document: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for ch in document.chars() {
        if ch.is_alphanumeric() || ch == '_' {
            current.extend(ch.to_lowercase());
        } else if !current.is_empty() {
            if current.chars().count() >= 2 {
                tokens.push(std::mem::take(&mut current));
            } else {
                current.clear();
            }
        }
    }
    if current.chars().count() >= 2 {
        tokens.push(current);
    }
    tokens
}

/// Unigrams through trigrams over the token stream, space-joined.
fn ngrams(document: &str) -> Vec<String> {
    let tokens = tokenize(document);
    let mut terms = Vec::new();
    for n in NGRAM_MIN..=NGRAM_MAX {
        if tokens.len() < n {
            break;
        }
        for window in tokens.windows(n) {
            terms.push(window.join(" "));
        }
    }
    terms
}
