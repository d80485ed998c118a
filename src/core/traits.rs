//! Core traits for NB-SVM

use crate::core::{FeatureMatrix, LinearSeparator, Result, ScoreReport};

/// Fits a linear decision boundary to binary-labelled rows.
///
/// Implementations must be deterministic for fixed inputs and return exactly
/// one weight per feature column. Labels are 0 or 1.
pub trait LinearSeparatorTrainer {
    fn fit(&self, x: &FeatureMatrix, y: &[u8]) -> Result<LinearSeparator>;
}

impl<F> LinearSeparatorTrainer for F
where
    F: Fn(&FeatureMatrix, &[u8]) -> Result<LinearSeparator>,
{
    fn fit(&self, x: &FeatureMatrix, y: &[u8]) -> Result<LinearSeparator> {
        self(x, y)
    }
}

/// Shared fit / score / predict lifecycle of the text classifiers
pub trait TextClassifier {
    /// Train on a feature matrix and its labels
    fn fit(&mut self, x: &FeatureMatrix, y: &[u8]) -> Result<()>;

    /// Evaluate on held-out data, remembering it for `predict`
    fn score_report(&mut self, x: &FeatureMatrix, y: &[u8]) -> Result<ScoreReport>;

    /// Held-out accuracy
    fn score(&mut self, x: &FeatureMatrix, y: &[u8]) -> Result<f64> {
        Ok(self.score_report(x, y)?.accuracy)
    }

    /// Predicted labels for the rows passed to the latest `score` call
    fn predict(&self) -> Result<Vec<u8>>;

    /// Human readable model name
    fn name(&self) -> &str;
}
