//! High-level experiment API
//!
//! Fits NBSVM and the MNB baseline on the same split and reports both held-out
//! accuracies, either once or averaged over k folds.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use nbsvm::api::{compare_split, Corpus};
//! use nbsvm::data::{train_test_split, TextTable};
//! use nbsvm::text::VectorizerConfig;
//! use nbsvm::{NBSVMConfig, SolverConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let table = TextTable::from_path("reviews.csv", "text", "sentiment", None)?;
//! let split = train_test_split(table.len(), 0.2, 42)?;
//! let corpus = Corpus::Text {
//!     table,
//!     vectorizer: VectorizerConfig::default(),
//! };
//!
//! let result = compare_split(&corpus, &split, &NBSVMConfig::default(), &SolverConfig::default())?;
//! println!("NBSVM accuracy is {:.4}", result.nbsvm.accuracy);
//! println!("MNB accuracy is {:.4}", result.mnb.accuracy);
//! # Ok(())
//! # }
//! ```

use crate::core::{LabeledData, NBSVMError, Result, ScoreReport, SolverConfig, TextClassifier};
use crate::data::{k_fold, Split, TextTable};
use crate::models::{NBSVMConfig, NaiveBayes, NBSVM};
use crate::text::{CountVectorizer, VectorizerConfig};
use log::info;
use serde::Serialize;

/// Held-out results of both models on one split
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub nbsvm: ScoreReport,
    pub mnb: ScoreReport,
}

/// Per-fold comparisons and their averages
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossValidation {
    pub folds: Vec<Comparison>,
    pub nbsvm_accuracy: f64,
    pub mnb_accuracy: f64,
    /// Mean of the tuned β across folds
    pub mean_beta: f64,
}

/// Train both models on `train` and score them on `test`
pub fn compare(
    train: &LabeledData,
    test: &LabeledData,
    config: &NBSVMConfig,
    solver: &SolverConfig,
) -> Result<Comparison> {
    let mut nbsvm = NBSVM::new()
        .with_solver_config(solver.clone())
        .with_config(config.clone());
    nbsvm.fit(&train.features, &train.labels)?;
    let nbsvm_report = nbsvm.score_report(&test.features, &test.labels)?;

    let mut mnb = NaiveBayes::new().with_alpha(config.alpha);
    mnb.fit(&train.features, &train.labels)?;
    let mnb_report = mnb.score_report(&test.features, &test.labels)?;

    info!(
        "{} {:.4} (beta {:?}) vs {} {:.4} on {} held-out rows",
        nbsvm.name(),
        nbsvm_report.accuracy,
        nbsvm_report.beta,
        mnb.name(),
        mnb_report.accuracy,
        test.len()
    );
    Ok(Comparison {
        nbsvm: nbsvm_report,
        mnb: mnb_report,
    })
}

/// Input to an experiment: raw documents or an already vectorized matrix
#[derive(Debug, Clone)]
pub enum Corpus {
    /// Documents are vectorized per split, with the vocabulary learned on the
    /// training rows only
    Text {
        table: TextTable,
        vectorizer: VectorizerConfig,
    },
    Counts(LabeledData),
}

impl Corpus {
    pub fn len(&self) -> usize {
        match self {
            Corpus::Text { table, .. } => table.len(),
            Corpus::Counts(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Materialize the (train, test) matrices for `split`
    pub fn prepare(&self, split: &Split) -> Result<(LabeledData, LabeledData)> {
        let n = self.len();
        if let Some(&bad) = split.train.iter().chain(&split.test).find(|&&i| i >= n) {
            return Err(NBSVMError::InvalidParameter(format!(
                "split refers to row {bad} but the corpus has {n} rows"
            )));
        }

        match self {
            Corpus::Text { table, vectorizer } => {
                let docs = |rows: &[usize]| {
                    rows.iter()
                        .map(|&i| table.texts[i].as_str())
                        .collect::<Vec<_>>()
                };
                let labels = |rows: &[usize]| rows.iter().map(|&i| table.labels[i]).collect::<Vec<_>>();

                let mut counter = CountVectorizer::new(vectorizer.clone());
                let x_train = counter.fit_transform(&docs(&split.train))?;
                let x_test = counter.transform(&docs(&split.test))?;
                Ok((
                    LabeledData::new(x_train, labels(&split.train))?,
                    LabeledData::new(x_test, labels(&split.test))?,
                ))
            }
            Corpus::Counts(data) => Ok((data.select(&split.train), data.select(&split.test))),
        }
    }
}

/// `compare` on one split of `corpus`
pub fn compare_split(
    corpus: &Corpus,
    split: &Split,
    config: &NBSVMConfig,
    solver: &SolverConfig,
) -> Result<Comparison> {
    let (train, test) = corpus.prepare(split)?;
    compare(&train, &test, config, solver)
}

/// Run `compare` on each of `k` seeded folds and average the accuracies
pub fn cross_validate(
    corpus: &Corpus,
    k: usize,
    seed: u64,
    config: &NBSVMConfig,
    solver: &SolverConfig,
) -> Result<CrossValidation> {
    let splits = k_fold(corpus.len(), k, seed)?;
    let folds = splits
        .iter()
        .enumerate()
        .map(|(fold, split)| {
            info!("Fold {}/{}", fold + 1, k);
            compare_split(corpus, split, config, solver)
        })
        .collect::<Result<Vec<_>>>()?;

    let mean = |f: &dyn Fn(&Comparison) -> f64| -> f64 {
        folds.iter().map(f).sum::<f64>() / folds.len() as f64
    };
    let nbsvm_accuracy = mean(&|c| c.nbsvm.accuracy);
    let mnb_accuracy = mean(&|c| c.mnb.accuracy);
    let mean_beta = mean(&|c| c.nbsvm.beta.unwrap_or(config.beta));

    Ok(CrossValidation {
        folds,
        nbsvm_accuracy,
        mnb_accuracy,
        mean_beta,
    })
}

/// Convenience functions for quick operations
pub mod quick {
    use super::*;
    use crate::data::train_test_split;

    /// Seeded 80/20 comparison of NBSVM and MNB on raw documents with default
    /// settings
    pub fn compare_texts<S: AsRef<str>>(texts: &[S], labels: &[u8], seed: u64) -> Result<Comparison> {
        if texts.len() != labels.len() {
            return Err(NBSVMError::LengthMismatch {
                rows: texts.len(),
                labels: labels.len(),
            });
        }
        let corpus = Corpus::Text {
            table: TextTable {
                texts: texts.iter().map(|t| t.as_ref().to_string()).collect(),
                labels: labels.to_vec(),
                groups: None,
            },
            vectorizer: VectorizerConfig::default(),
        };
        let split = train_test_split(corpus.len(), 0.2, seed)?;
        compare_split(&corpus, &split, &NBSVMConfig::default(), &SolverConfig::default())
    }
}
