//! Bag-of-n-grams count vectorizer
//!
//! Turns raw documents into a sparse count matrix. Tokens are runs of
//! alphanumeric characters or `_` at least two characters long; n-grams join
//! consecutive tokens with a single space.

use crate::core::{FeatureMatrix, NBSVMError, Result, SparseVector};
use log::{debug, info};
use std::collections::{BTreeMap, HashMap};

/// Vectorizer settings
#[derive(Debug, Clone, PartialEq)]
pub struct VectorizerConfig {
    /// Largest n-gram length; 1 means unigrams only
    pub ngram_max: usize,
    /// Keep only this many of the most frequent terms
    pub max_features: Option<usize>,
    /// Record presence (1) instead of counts
    pub binary: bool,
    pub lowercase: bool,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            ngram_max: 2,
            max_features: Some(35_000),
            binary: false,
            lowercase: true,
        }
    }
}

impl VectorizerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.ngram_max == 0 {
            return Err(NBSVMError::InvalidParameter(
                "ngram_max must be at least 1".to_string(),
            ));
        }
        if self.max_features == Some(0) {
            return Err(NBSVMError::InvalidParameter(
                "max_features must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Split `text` into word tokens
pub fn tokenize(text: &str, lowercase: bool) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().nth(1).is_some())
        .map(|token| {
            if lowercase {
                token.to_lowercase()
            } else {
                token.to_string()
            }
        })
        .collect()
}

/// All n-grams of length 1..=ngram_max, in document order
pub fn ngrams(tokens: &[String], ngram_max: usize) -> Vec<String> {
    let mut terms = Vec::new();
    for n in 1..=ngram_max.min(tokens.len()) {
        terms.extend(tokens.windows(n).map(|window| window.join(" ")));
    }
    terms
}

/// Learns a vocabulary and maps documents onto it
#[derive(Debug, Clone, Default)]
pub struct CountVectorizer {
    config: VectorizerConfig,
    vocabulary: BTreeMap<String, usize>,
}

impl CountVectorizer {
    pub fn new(config: VectorizerConfig) -> Self {
        Self {
            config,
            vocabulary: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }

    /// Term → column index, ordered alphabetically
    pub fn vocabulary(&self) -> &BTreeMap<String, usize> {
        &self.vocabulary
    }

    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn is_fitted(&self) -> bool {
        !self.vocabulary.is_empty()
    }

    fn terms(&self, doc: &str) -> Vec<String> {
        ngrams(&tokenize(doc, self.config.lowercase), self.config.ngram_max)
    }

    /// Build the vocabulary from `docs`
    pub fn fit<S: AsRef<str>>(&mut self, docs: &[S]) -> Result<&mut Self> {
        self.config.validate()?;

        let mut frequencies: HashMap<String, usize> = HashMap::new();
        for doc in docs {
            for term in self.terms(doc.as_ref()) {
                *frequencies.entry(term).or_insert(0) += 1;
            }
        }
        if frequencies.is_empty() {
            return Err(NBSVMError::InvalidDataset(
                "documents produced an empty vocabulary".to_string(),
            ));
        }
        let n_terms = frequencies.len();

        let mut kept: Vec<(String, usize)> = frequencies.into_iter().collect();
        if let Some(limit) = self.config.max_features {
            if kept.len() > limit {
                kept.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
                kept.truncate(limit);
            }
        }
        kept.sort_by(|a, b| a.0.cmp(&b.0));

        self.vocabulary = kept
            .into_iter()
            .enumerate()
            .map(|(idx, (term, _))| (term, idx))
            .collect();
        info!(
            "Vocabulary has {} terms ({} seen across {} documents)",
            self.vocabulary.len(),
            n_terms,
            docs.len()
        );
        Ok(self)
    }

    /// Count matrix over the learned vocabulary; unseen terms are dropped
    pub fn transform<S: AsRef<str>>(&self, docs: &[S]) -> Result<FeatureMatrix> {
        if !self.is_fitted() {
            return Err(NBSVMError::ModelNotTrained);
        }

        let rows = docs
            .iter()
            .map(|doc| {
                let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
                for term in self.terms(doc.as_ref()) {
                    if let Some(&idx) = self.vocabulary.get(&term) {
                        *counts.entry(idx).or_insert(0.0) += 1.0;
                    }
                }
                let (indices, values): (Vec<usize>, Vec<f64>) = counts
                    .into_iter()
                    .map(|(idx, count)| (idx, if self.config.binary { 1.0 } else { count }))
                    .unzip();
                SparseVector::new(indices, values)
            })
            .collect();

        let matrix = FeatureMatrix::new(rows, self.n_features())?;
        debug!("Vectorized {} documents", matrix.n_rows());
        Ok(matrix)
    }

    pub fn fit_transform<S: AsRef<str>>(&mut self, docs: &[S]) -> Result<FeatureMatrix> {
        self.fit(docs)?;
        self.transform(docs)
    }
}
