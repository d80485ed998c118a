//! Sequential Minimal Optimization (SMO) for a linear-kernel SVM
//!
//! Solves the soft-margin dual by repeatedly optimizing pairs of Lagrange
//! multipliers. With a linear kernel the primal weight vector
//! `w = Σ αᵢ yᵢ xᵢ` is kept up to date after every step. Errors of free
//! multipliers are cached and updated incrementally; errors at a bound cost
//! one sparse dot product.

use crate::cache::GramCache;
use crate::core::{
    validate_pair, FeatureMatrix, LinearSeparator, LinearSeparatorTrainer, NBSVMError, Result,
    SolverConfig, SparseVector,
};
use log::{debug, info, warn};

/// Margin tolerance used to classify a multiplier as free (0 < α < C)
const BOUND_EPS: f64 = 1e-12;

/// Result of a full SMO run
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub separator: LinearSeparator,
    /// Lagrange multipliers, one per training row
    pub alpha: Vec<f64>,
    /// Number of passes over the training set
    pub iterations: usize,
    pub converged: bool,
}

impl SolveOutcome {
    /// Rows with a non-zero multiplier
    pub fn n_support_vectors(&self) -> usize {
        self.alpha.iter().filter(|&&a| a > BOUND_EPS).count()
    }
}

/// Linear SVM trainer backed by SMO
#[derive(Debug, Clone, Default)]
pub struct SMOTrainer {
    config: SolverConfig,
}

impl SMOTrainer {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Run SMO on `x` with labels in {0, 1}
    pub fn solve(&self, x: &FeatureMatrix, y: &[u8]) -> Result<SolveOutcome> {
        self.config.validate()?;
        validate_pair(x, y)?;
        if x.is_empty() {
            return Err(NBSVMError::EmptyDataset);
        }

        let n_pos = y.iter().filter(|&&l| l == 1).count();
        if n_pos == 0 || n_pos == y.len() {
            let bias = if n_pos == 0 { -1.0 } else { 1.0 };
            warn!(
                "Training labels contain a single class; returning constant separator with bias {bias}"
            );
            return Ok(SolveOutcome {
                separator: LinearSeparator::new(vec![0.0; x.n_features()], bias),
                alpha: vec![0.0; y.len()],
                iterations: 0,
                converged: true,
            });
        }

        let mut state = SmoState::new(x, y, &self.config);
        let n = state.len();

        let mut iterations = 0;
        let mut num_changed = 0;
        let mut examine_all = true;

        while (num_changed > 0 || examine_all) && iterations < self.config.max_iterations {
            num_changed = 0;

            for i in 0..n {
                if (examine_all || state.is_free(i)) && state.examine_example(i) {
                    num_changed += 1;
                }
            }

            debug!(
                "SMO pass {}: {} multipliers changed (examine_all={})",
                iterations, num_changed, examine_all
            );

            if examine_all {
                examine_all = false;
            } else if num_changed == 0 {
                examine_all = true;
            }

            iterations += 1;
        }

        let converged = num_changed == 0 && !examine_all;
        if !converged {
            warn!(
                "SMO stopped after {} passes without meeting the KKT tolerance {}",
                iterations, self.config.epsilon
            );
        }

        state.refine_bias();
        let stats = state.cache.stats();
        debug!(
            "Gram cache: {} hits, {} misses ({:.1}% hit rate)",
            stats.hits,
            stats.misses,
            state.cache.hit_rate() * 100.0
        );

        let outcome = SolveOutcome {
            separator: LinearSeparator::new(state.w, state.b),
            alpha: state.alpha,
            iterations,
            converged,
        };
        info!(
            "SMO finished in {} passes with {} support vectors, bias {:.6}",
            outcome.iterations,
            outcome.n_support_vectors(),
            outcome.separator.bias
        );
        Ok(outcome)
    }
}

impl LinearSeparatorTrainer for SMOTrainer {
    fn fit(&self, x: &FeatureMatrix, y: &[u8]) -> Result<LinearSeparator> {
        Ok(self.solve(x, y)?.separator)
    }
}

/// Working state of one SMO run. Decision values are `w · x + b` and errors
/// are `f(xᵢ) − yᵢ` with `yᵢ ∈ {−1, +1}`.
struct SmoState<'a> {
    rows: &'a [SparseVector],
    y: Vec<f64>,
    alpha: Vec<f64>,
    /// Error cache, valid for every free multiplier
    errors: Vec<f64>,
    w: Vec<f64>,
    b: f64,
    c: f64,
    tol: f64,
    cache: GramCache,
}

impl<'a> SmoState<'a> {
    fn new(x: &'a FeatureMatrix, labels: &[u8], config: &SolverConfig) -> Self {
        let y: Vec<f64> = labels
            .iter()
            .map(|&l| if l == 1 { 1.0 } else { -1.0 })
            .collect();
        // w = 0 and b = 0, so every error starts at -y
        let errors = y.iter().map(|&yi| -yi).collect();
        Self {
            rows: x.rows(),
            y,
            alpha: vec![0.0; labels.len()],
            errors,
            w: vec![0.0; x.n_features()],
            b: 0.0,
            c: config.c,
            tol: config.epsilon,
            cache: GramCache::for_rows(labels.len(), config.cache_size),
        }
    }

    fn len(&self) -> usize {
        self.rows.len()
    }

    fn is_free(&self, i: usize) -> bool {
        self.alpha[i] > BOUND_EPS && self.alpha[i] < self.c - BOUND_EPS
    }

    fn error(&self, i: usize) -> f64 {
        if self.is_free(i) {
            self.errors[i]
        } else {
            self.fresh_error(i)
        }
    }

    fn fresh_error(&self, i: usize) -> f64 {
        self.rows[i].dot_dense(&self.w) + self.b - self.y[i]
    }

    fn gram(&mut self, i: usize, j: usize) -> f64 {
        let rows = self.rows;
        self.cache.get_or_compute(i, j, || rows[i].dot(&rows[j]))
    }

    /// Try to make progress on multiplier `i2`; true if a step was taken
    fn examine_example(&mut self, i2: usize) -> bool {
        let y2 = self.y[i2];
        let a2 = self.alpha[i2];
        let e2 = self.error(i2);
        let r2 = e2 * y2;

        let violates_kkt = (r2 < -self.tol && a2 < self.c) || (r2 > self.tol && a2 > 0.0);
        if !violates_kkt {
            return false;
        }

        let free: Vec<usize> = (0..self.len())
            .filter(|&k| k != i2 && self.is_free(k))
            .collect();

        // Second-choice heuristic: maximize |E1 - E2| over the free multipliers
        let best = free
            .iter()
            .map(|&k| (k, (self.error(k) - e2).abs()))
            .fold(None, |best: Option<(usize, f64)>, (k, gap)| match best {
                Some((_, best_gap)) if best_gap >= gap => best,
                _ => Some((k, gap)),
            });
        if let Some((i1, _)) = best {
            if self.take_step(i1, i2, e2) {
                return true;
            }
        }

        // Deterministic rotation over the free set, then over everything
        if !free.is_empty() {
            let start = i2 % free.len();
            for k in 0..free.len() {
                let i1 = free[(start + k) % free.len()];
                if self.take_step(i1, i2, e2) {
                    return true;
                }
            }
        }

        let n = self.len();
        for k in 1..n {
            let i1 = (i2 + k) % n;
            if self.take_step(i1, i2, e2) {
                return true;
            }
        }

        false
    }

    /// Jointly optimize multipliers `i1` and `i2`
    fn take_step(&mut self, i1: usize, i2: usize, e2: f64) -> bool {
        if i1 == i2 {
            return false;
        }

        let (y1, y2) = (self.y[i1], self.y[i2]);
        let (a1, a2) = (self.alpha[i1], self.alpha[i2]);
        let s = y1 * y2;
        let c = self.c;

        let (low, high) = if y1 != y2 {
            ((a2 - a1).max(0.0), (c + a2 - a1).min(c))
        } else {
            ((a1 + a2 - c).max(0.0), (a1 + a2).min(c))
        };
        if low >= high {
            return false;
        }

        let e1 = self.error(i1);

        let k11 = self.gram(i1, i1);
        let k12 = self.gram(i1, i2);
        let k22 = self.gram(i2, i2);
        let eta = k11 + k22 - 2.0 * k12;

        // Identical rows give a flat objective along the constraint line
        if eta <= 0.0 {
            return false;
        }

        let a2_new = (a2 + y2 * (e1 - e2) / eta).clamp(low, high);
        if (a2_new - a2).abs() < self.tol * (a2_new + a2 + self.tol) {
            return false;
        }
        let a1_new = a1 + s * (a2 - a2_new);

        let d1 = y1 * (a1_new - a1);
        let d2 = y2 * (a2_new - a2);

        let b1 = self.b - e1 - d1 * k11 - d2 * k12;
        let b2 = self.b - e2 - d1 * k12 - d2 * k22;
        let b_new = if a1_new > 0.0 && a1_new < c {
            b1
        } else if a2_new > 0.0 && a2_new < c {
            b2
        } else {
            (b1 + b2) / 2.0
        };
        let db = b_new - self.b;
        self.b = b_new;

        let rows = self.rows;
        for (row, delta) in [(&rows[i1], d1), (&rows[i2], d2)] {
            for (&idx, &v) in row.indices.iter().zip(&row.values) {
                self.w[idx] += delta * v;
            }
        }

        self.alpha[i1] = a1_new;
        self.alpha[i2] = a2_new;

        for k in 0..self.len() {
            if k == i1 || k == i2 || !self.is_free(k) {
                continue;
            }
            let k1k = self.gram(i1, k);
            let k2k = self.gram(i2, k);
            self.errors[k] += d1 * k1k + d2 * k2k + db;
        }
        self.errors[i1] = self.fresh_error(i1);
        self.errors[i2] = self.fresh_error(i2);
        true
    }

    /// Average the bias over free support vectors, which lie on the margin
    fn refine_bias(&mut self) {
        let (sum, count) = (0..self.len())
            .filter(|&i| self.is_free(i))
            .map(|i| self.y[i] - self.rows[i].dot_dense(&self.w))
            .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
        if count > 0 {
            self.b = sum / count as f64;
        }
    }
}
