//! NB-SVM (Wang & Manning, 2012)
//!
//! Training scales the feature counts by the log-count ratio and fits a
//! linear separator on the result. Scoring tunes the interpolation parameter
//! β on the held-out rows and keeps the most accurate blend.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use nbsvm::{FeatureMatrix, TextClassifier, NBSVM};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let x_train = FeatureMatrix::from_dense(&[vec![2.0, 0.0], vec![0.0, 3.0]])?;
//! let x_test = FeatureMatrix::from_dense(&[vec![1.0, 0.0], vec![0.0, 1.0]])?;
//!
//! let mut model = NBSVM::new().with_c(1.0);
//! model.fit(&x_train, &[1, 0])?;
//! let report = model.score_report(&x_test, &[1, 0])?;
//! println!("accuracy {:.4} at beta {:?}", report.accuracy, report.beta);
//! let labels = model.predict()?;
//! # Ok(())
//! # }
//! ```

use crate::core::{
    partition_by_class, validate_pair, FeatureMatrix, LinearSeparator, LinearSeparatorTrainer,
    ModelKind, NBSVMError, Result, ScoreReport, SolverConfig, TextClassifier,
};
use crate::evaluation::linear_prediction;
use crate::interpolation::{best_beta, interpolate, tune_beta, BetaGrid};
use crate::models::mnb::prior_log_odds;
use crate::solver::SMOTrainer;
use crate::weighting::{log_count_ratio, nb_transform, DEFAULT_ALPHA};
use log::info;

/// Default interpolation parameter before any tuning
pub const DEFAULT_BETA: f64 = 0.25;

/// Model-level settings for NB-SVM
#[derive(Debug, Clone, PartialEq)]
pub struct NBSVMConfig {
    /// Additive smoothing for the log-count ratio
    pub alpha: f64,
    /// β used between `fit` and the first `score`
    pub beta: f64,
    /// Candidates searched by `score`
    pub beta_grid: BetaGrid,
}

impl Default for NBSVMConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            beta: DEFAULT_BETA,
            beta_grid: BetaGrid::default(),
        }
    }
}

#[derive(Debug, Clone)]
struct FittedState {
    ratio: Vec<f64>,
    separator: LinearSeparator,
    nb_bias: f64,
    beta: f64,
    interpolated: Vec<f64>,
}

/// NB-SVM classifier, generic over the separator trainer
pub struct NBSVM<T: LinearSeparatorTrainer = SMOTrainer> {
    trainer: T,
    config: NBSVMConfig,
    fitted: Option<FittedState>,
    evaluation: Option<FeatureMatrix>,
}

impl NBSVM<SMOTrainer> {
    /// NB-SVM with the SMO trainer and default parameters
    pub fn new() -> Self {
        Self::with_trainer(SMOTrainer::default())
    }

    /// Replace the solver configuration
    pub fn with_solver_config(mut self, config: SolverConfig) -> Self {
        self.trainer = SMOTrainer::new(config);
        self
    }

    fn map_solver_config(self, update: impl FnOnce(&mut SolverConfig)) -> Self {
        let mut config = self.trainer.config().clone();
        update(&mut config);
        self.with_solver_config(config)
    }

    /// Set regularization parameter C
    pub fn with_c(self, c: f64) -> Self {
        self.map_solver_config(|config| config.c = c)
    }

    /// Set convergence tolerance
    pub fn with_epsilon(self, epsilon: f64) -> Self {
        self.map_solver_config(|config| config.epsilon = epsilon)
    }

    /// Set maximum number of solver passes
    pub fn with_max_iterations(self, max_iterations: usize) -> Self {
        self.map_solver_config(|config| config.max_iterations = max_iterations)
    }

    /// Set Gram cache size in bytes
    pub fn with_cache_size(self, cache_size: usize) -> Self {
        self.map_solver_config(|config| config.cache_size = cache_size)
    }
}

impl Default for NBSVM<SMOTrainer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: LinearSeparatorTrainer> NBSVM<T> {
    /// NB-SVM with a custom separator trainer
    pub fn with_trainer(trainer: T) -> Self {
        Self {
            trainer,
            config: NBSVMConfig::default(),
            fitted: None,
            evaluation: None,
        }
    }

    pub fn with_config(mut self, config: NBSVMConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the log-count-ratio smoothing
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.config.alpha = alpha;
        self
    }

    /// Set the β used before tuning
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.config.beta = beta;
        self
    }

    /// Set the candidates searched by `score`
    pub fn with_beta_grid(mut self, grid: BetaGrid) -> Self {
        self.config.beta_grid = grid;
        self
    }

    pub fn config(&self) -> &NBSVMConfig {
        &self.config
    }

    pub fn trainer(&self) -> &T {
        &self.trainer
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Current β: the configured default after `fit`, the tuned value after `score`
    pub fn beta(&self) -> f64 {
        self.fitted.as_ref().map_or(self.config.beta, |f| f.beta)
    }

    /// Log-count ratio learned by the last `fit`
    pub fn ratio(&self) -> Option<&[f64]> {
        self.fitted.as_ref().map(|f| f.ratio.as_slice())
    }

    /// Separator learned on NB-weighted features
    pub fn separator(&self) -> Option<&LinearSeparator> {
        self.fitted.as_ref().map(|f| &f.separator)
    }

    /// Weights interpolated at the current β
    pub fn interpolated_weights(&self) -> Option<&[f64]> {
        self.fitted.as_ref().map(|f| f.interpolated.as_slice())
    }

    /// Class-prior log-odds of the training data
    pub fn nb_bias(&self) -> Option<f64> {
        self.fitted.as_ref().map(|f| f.nb_bias)
    }

    fn fitted(&self) -> Result<&FittedState> {
        self.fitted.as_ref().ok_or(NBSVMError::ModelNotTrained)
    }
}

impl<T: LinearSeparatorTrainer> TextClassifier for NBSVM<T> {
    fn fit(&mut self, x: &FeatureMatrix, y: &[u8]) -> Result<()> {
        validate_pair(x, y)?;
        if y.is_empty() {
            return Err(NBSVMError::EmptyDataset);
        }

        let (pos, neg) = partition_by_class(x, y);
        let ratio = log_count_ratio(&pos, &neg, self.config.alpha)?;
        let nb_bias = prior_log_odds(pos.n_rows(), neg.n_rows());
        let x_nb = nb_transform(x, &ratio)?;

        info!(
            "Training the NB-SVM on {} rows, {} features",
            y.len(),
            x.n_features()
        );
        let separator = self.trainer.fit(&x_nb, y)?;
        if separator.n_features() != x.n_features() {
            return Err(NBSVMError::DimensionMismatch {
                expected: x.n_features(),
                actual: separator.n_features(),
            });
        }

        let beta = self.config.beta;
        let interpolated = interpolate(&separator.weights, beta)?;

        self.fitted = Some(FittedState {
            ratio,
            separator,
            nb_bias,
            beta,
            interpolated,
        });
        self.evaluation = None;
        Ok(())
    }

    fn score_report(&mut self, x: &FeatureMatrix, y: &[u8]) -> Result<ScoreReport> {
        let fitted = self.fitted()?;
        x.check_features(fitted.ratio.len())?;
        validate_pair(x, y)?;

        let x_nb = nb_transform(x, &fitted.ratio)?;
        let curve = tune_beta(
            &x_nb,
            y,
            &fitted.separator.weights,
            fitted.separator.bias,
            &self.config.beta_grid,
        )?;
        let best = best_beta(&curve)?;
        let interpolated = interpolate(&fitted.separator.weights, best.beta)?;

        info!("Interpolated model accuracy is {:.4}", best.accuracy);
        info!("Best interpolation parameter is {}", best.beta);

        if let Some(state) = self.fitted.as_mut() {
            state.beta = best.beta;
            state.interpolated = interpolated;
        }
        self.evaluation = Some(x_nb);

        Ok(ScoreReport {
            model: ModelKind::Nbsvm,
            accuracy: best.accuracy,
            beta: Some(best.beta),
            n_samples: y.len(),
            beta_curve: curve,
        })
    }

    fn predict(&self) -> Result<Vec<u8>> {
        let fitted = self.fitted()?;
        let x_nb = self.evaluation.as_ref().ok_or(NBSVMError::NotScored)?;
        linear_prediction(x_nb, &fitted.interpolated, fitted.separator.bias)
    }

    fn name(&self) -> &str {
        "NBSVM"
    }
}
