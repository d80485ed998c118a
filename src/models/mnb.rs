//! Multinomial Naive Bayes baseline
//!
//! Uses the log-count ratio `r` directly as the weight vector and the
//! class-prior log-odds `ln(n_pos / n_neg)` as the bias. No separator is
//! trained.

use crate::core::{
    partition_by_class, validate_pair, FeatureMatrix, ModelKind, NBSVMError, Result,
    ScoreReport, TextClassifier,
};
use crate::evaluation::{accuracy, linear_prediction};
use crate::weighting::{log_count_ratio, DEFAULT_ALPHA};
use log::{info, warn};

#[derive(Debug, Clone)]
struct NaiveBayesFit {
    ratio: Vec<f64>,
    bias: f64,
}

/// Naive Bayes linear classifier over log-count ratios
#[derive(Debug, Clone)]
pub struct NaiveBayes {
    alpha: f64,
    fitted: Option<NaiveBayesFit>,
    evaluation: Option<FeatureMatrix>,
}

impl NaiveBayes {
    pub fn new() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            fitted: None,
            evaluation: None,
        }
    }

    /// Set the additive smoothing used for the log-count ratio
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Log-count ratio learned by the last `fit`
    pub fn ratio(&self) -> Option<&[f64]> {
        self.fitted.as_ref().map(|f| f.ratio.as_slice())
    }

    /// Class-prior log-odds learned by the last `fit`
    pub fn bias(&self) -> Option<f64> {
        self.fitted.as_ref().map(|f| f.bias)
    }

    fn fitted(&self) -> Result<&NaiveBayesFit> {
        self.fitted.as_ref().ok_or(NBSVMError::ModelNotTrained)
    }
}

impl Default for NaiveBayes {
    fn default() -> Self {
        Self::new()
    }
}

/// `ln(n_pos / n_neg)`; infinite when one class is missing
pub(crate) fn prior_log_odds(n_pos: usize, n_neg: usize) -> f64 {
    let bias = (n_pos as f64 / n_neg as f64).ln();
    if !bias.is_finite() {
        warn!(
            "Training data has {n_pos} positive and {n_neg} negative rows; prior log-odds is {bias}"
        );
    }
    bias
}

impl TextClassifier for NaiveBayes {
    fn fit(&mut self, x: &FeatureMatrix, y: &[u8]) -> Result<()> {
        validate_pair(x, y)?;
        if y.is_empty() {
            return Err(NBSVMError::EmptyDataset);
        }

        let (pos, neg) = partition_by_class(x, y);
        let ratio = log_count_ratio(&pos, &neg, self.alpha)?;
        let bias = prior_log_odds(pos.n_rows(), neg.n_rows());

        info!(
            "MNB fitted on {} rows ({} positive), {} features, bias {:.4}",
            y.len(),
            pos.n_rows(),
            x.n_features(),
            bias
        );
        self.fitted = Some(NaiveBayesFit { ratio, bias });
        self.evaluation = None;
        Ok(())
    }

    fn score_report(&mut self, x: &FeatureMatrix, y: &[u8]) -> Result<ScoreReport> {
        let fitted = self.fitted()?;
        x.check_features(fitted.ratio.len())?;

        let acc = accuracy(x, y, &fitted.ratio, fitted.bias)?;
        info!("MNB accuracy is {acc:.4}");

        self.evaluation = Some(x.clone());
        Ok(ScoreReport {
            model: ModelKind::Mnb,
            accuracy: acc,
            beta: None,
            n_samples: y.len(),
            beta_curve: Vec::new(),
        })
    }

    fn predict(&self) -> Result<Vec<u8>> {
        let fitted = self.fitted()?;
        let x = self.evaluation.as_ref().ok_or(NBSVMError::NotScored)?;
        linear_prediction(x, &fitted.ratio, fitted.bias)
    }

    fn name(&self) -> &str {
        "MNB"
    }
}
