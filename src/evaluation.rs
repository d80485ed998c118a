//! Linear prediction and accuracy scoring
//!
//! Thresholding convention: a decision value `x · w + b >= 0` is class 1,
//! anything else (negative or NaN) is class 0. An infinite bias therefore
//! collapses to a constant-class predictor instead of failing.

use crate::core::{validate_pair, FeatureMatrix, NBSVMError, Result};
use serde::Serialize;

/// Map a raw decision value to a {0, 1} label
pub fn threshold(decision: f64) -> u8 {
    u8::from(decision >= 0.0)
}

/// Raw decision values `x · w + b` for every row
pub fn decision_values(x: &FeatureMatrix, w: &[f64], b: f64) -> Result<Vec<f64>> {
    x.check_features(w.len())?;
    Ok(x.rows().iter().map(|row| row.dot_dense(w) + b).collect())
}

/// Thresholded linear predictions, one label per row
pub fn linear_prediction(x: &FeatureMatrix, w: &[f64], b: f64) -> Result<Vec<u8>> {
    Ok(decision_values(x, w, b)?
        .into_iter()
        .map(threshold)
        .collect())
}

/// Fraction of rows whose thresholded prediction matches `y`
pub fn accuracy(x: &FeatureMatrix, y: &[u8], w: &[f64], b: f64) -> Result<f64> {
    validate_pair(x, y)?;
    if y.is_empty() {
        return Err(NBSVMError::EmptyDataset);
    }
    let predictions = linear_prediction(x, w, b)?;
    let correct = predictions
        .iter()
        .zip(y)
        .filter(|(pred, actual)| pred == actual)
        .count();
    Ok(correct as f64 / y.len() as f64)
}

/// Confusion counts for a binary prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EvaluationMetrics {
    pub true_positives: usize,
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl EvaluationMetrics {
    /// Tally predictions against actual labels
    pub fn from_predictions(predicted: &[u8], actual: &[u8]) -> Result<Self> {
        if predicted.len() != actual.len() {
            return Err(NBSVMError::LengthMismatch {
                rows: predicted.len(),
                labels: actual.len(),
            });
        }

        let mut metrics = Self {
            true_positives: 0,
            true_negatives: 0,
            false_positives: 0,
            false_negatives: 0,
        };
        for (&p, &a) in predicted.iter().zip(actual) {
            match (p == 1, a == 1) {
                (true, true) => metrics.true_positives += 1,
                (false, false) => metrics.true_negatives += 1,
                (true, false) => metrics.false_positives += 1,
                (false, true) => metrics.false_negatives += 1,
            }
        }
        Ok(metrics)
    }

    pub fn total(&self) -> usize {
        self.true_positives + self.true_negatives + self.false_positives + self.false_negatives
    }

    /// (TP + TN) / total
    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positives + self.true_negatives, self.total())
    }

    /// TP / (TP + FP)
    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    /// TP / (TP + FN)
    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    pub fn f1_score(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * (p * r) / (p + r)
        }
    }

    /// TN / (TN + FP)
    pub fn specificity(&self) -> f64 {
        ratio(self.true_negatives, self.true_negatives + self.false_positives)
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}
