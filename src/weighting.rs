//! Naive Bayes log-count-ratio feature weighting
//!
//! For positive-class rows P and negative-class rows N:
//!
//! ```text
//! p = α + Σ P,  q = α + Σ N
//! r = ln( (p / ‖p‖₁) / (q / ‖q‖₁) )
//! ```
//!
//! NB-weighted features are the original counts scaled column-wise by `r`.

use crate::core::{FeatureMatrix, NBSVMError, Result};
use log::warn;

/// Default additive smoothing
pub const DEFAULT_ALPHA: f64 = 1.0;

/// Smoothed log-count ratio of positive versus negative feature counts.
///
/// A class matrix with zero rows contributes only the smoothing term. With
/// `alpha == 0`, features absent from one class come out as ±∞ or NaN.
pub fn log_count_ratio(pos: &FeatureMatrix, neg: &FeatureMatrix, alpha: f64) -> Result<Vec<f64>> {
    if !alpha.is_finite() || alpha < 0.0 {
        return Err(NBSVMError::InvalidParameter(format!(
            "smoothing alpha must be finite and non-negative, got {alpha}"
        )));
    }
    pos.check_features(neg.n_features())?;
    if alpha == 0.0 {
        warn!("log-count ratio computed without smoothing; unseen features will be non-finite");
    }

    let p = smoothed_totals(pos, alpha);
    let q = smoothed_totals(neg, alpha);
    let p_norm: f64 = p.iter().sum();
    let q_norm: f64 = q.iter().sum();

    Ok(p.iter()
        .zip(&q)
        .map(|(&pi, &qi)| ((pi / p_norm) / (qi / q_norm)).ln())
        .collect())
}

fn smoothed_totals(x: &FeatureMatrix, alpha: f64) -> Vec<f64> {
    x.column_sums().into_iter().map(|s| s + alpha).collect()
}

/// Scale every row element-wise by `r`
pub fn nb_transform(x: &FeatureMatrix, r: &[f64]) -> Result<FeatureMatrix> {
    x.check_features(r.len())?;
    let rows = x.rows().iter().map(|row| row.hadamard(r)).collect();
    FeatureMatrix::new(rows, x.n_features())
}
