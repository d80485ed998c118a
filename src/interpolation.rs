//! Weight interpolation and β grid search
//!
//! `w_β = (1 − β)·mean(w) + β·w` moves from a uniform weighting (β = 0) to the
//! trained SVM weights (β = 1). The tuner scores every candidate β on held-out
//! NB-weighted data and keeps the most accurate one.

use crate::core::{BetaScore, FeatureMatrix, NBSVMError, Result};
use crate::evaluation::accuracy;
use log::debug;

/// Number of points in the default grid
pub const DEFAULT_GRID_POINTS: usize = 41;

fn check_beta(beta: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&beta) {
        return Err(NBSVMError::InvalidParameter(format!(
            "beta must lie in [0, 1], got {beta}"
        )));
    }
    Ok(())
}

/// Blend `w` with its mean. β outside [0, 1] (or NaN) is rejected.
pub fn interpolate(w: &[f64], beta: f64) -> Result<Vec<f64>> {
    check_beta(beta)?;
    if w.is_empty() {
        return Ok(Vec::new());
    }
    let mean = w.iter().sum::<f64>() / w.len() as f64;
    Ok(w.iter().map(|&wi| (1.0 - beta) * mean + beta * wi).collect())
}

/// Ordered, validated set of candidate β values
#[derive(Debug, Clone, PartialEq)]
pub struct BetaGrid {
    values: Vec<f64>,
}

impl BetaGrid {
    /// Build a grid from explicit values; must be non-empty and within [0, 1]
    pub fn new(values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(NBSVMError::InvalidParameter(
                "beta grid must contain at least one value".to_string(),
            ));
        }
        for &beta in &values {
            check_beta(beta)?;
        }
        Ok(Self { values })
    }

    /// `points` evenly spaced values from 0 to 1 inclusive
    pub fn linspace(points: usize) -> Result<Self> {
        match points {
            0 => Self::new(Vec::new()),
            1 => Self::new(vec![1.0]),
            _ => {
                let steps = (points - 1) as f64;
                Self::new((0..points).map(|i| i as f64 / steps).collect())
            }
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for BetaGrid {
    /// 0, 0.025, ..., 1
    fn default() -> Self {
        let steps = (DEFAULT_GRID_POINTS - 1) as f64;
        Self {
            values: (0..DEFAULT_GRID_POINTS).map(|i| i as f64 / steps).collect(),
        }
    }
}

/// Accuracy of `interpolate(w, β)` for every β in the grid, in grid order
pub fn tune_beta(
    x: &FeatureMatrix,
    y: &[u8],
    w: &[f64],
    b: f64,
    grid: &BetaGrid,
) -> Result<Vec<BetaScore>> {
    let score = |beta: f64| -> Result<BetaScore> {
        let weights = interpolate(w, beta)?;
        Ok(BetaScore {
            beta,
            accuracy: accuracy(x, y, &weights, b)?,
        })
    };

    #[cfg(feature = "parallel")]
    let table: Result<Vec<BetaScore>> = {
        use rayon::prelude::*;
        grid.values().par_iter().map(|&beta| score(beta)).collect()
    };
    #[cfg(not(feature = "parallel"))]
    let table: Result<Vec<BetaScore>> = grid.values().iter().map(|&beta| score(beta)).collect();

    let table = table?;
    for entry in &table {
        debug!("beta={:.3} accuracy={:.4}", entry.beta, entry.accuracy);
    }
    Ok(table)
}

/// Highest-accuracy entry; ties go to the largest β
pub fn best_beta(table: &[BetaScore]) -> Result<BetaScore> {
    table
        .iter()
        .copied()
        .reduce(|best, candidate| {
            let better = candidate.accuracy > best.accuracy
                || (candidate.accuracy == best.accuracy && candidate.beta > best.beta);
            if better {
                candidate
            } else {
                best
            }
        })
        .ok_or_else(|| NBSVMError::InvalidParameter("empty beta table".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_interpolate_endpoints() {
        let w = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(interpolate(&w, 0.0).unwrap(), vec![2.5; 4]);
        assert_eq!(interpolate(&w, 1.0).unwrap(), w.to_vec());
    }

    #[test]
    fn test_interpolate_midpoint() {
        let w = [0.0, 4.0];
        let mid = interpolate(&w, 0.25).unwrap();
        // 0.75 * 2 + 0.25 * w
        assert_abs_diff_eq!(mid[0], 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(mid[1], 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_interpolate_rejects_out_of_range_beta() {
        for beta in [-0.1, 1.5, f64::NAN] {
            assert!(matches!(
                interpolate(&[1.0], beta),
                Err(NBSVMError::InvalidParameter(_))
            ));
        }
        assert!(interpolate(&[], 0.5).unwrap().is_empty());
    }

    #[test]
    fn test_default_grid() {
        let grid = BetaGrid::default();
        assert_eq!(grid.len(), 41);
        assert_eq!(grid.values()[0], 0.0);
        assert_eq!(grid.values()[40], 1.0);
        assert_abs_diff_eq!(grid.values()[1], 0.025, epsilon = 1e-15);
        assert_abs_diff_eq!(grid.values()[10], 0.25, epsilon = 1e-15);
        assert!(grid.values().windows(2).all(|p| p[0] < p[1]));
        assert_eq!(BetaGrid::linspace(41).unwrap(), grid);
    }

    #[test]
    fn test_grid_validation() {
        assert!(BetaGrid::new(vec![]).is_err());
        assert!(BetaGrid::new(vec![0.0, 1.2]).is_err());
        assert!(BetaGrid::linspace(0).is_err());
        assert_eq!(BetaGrid::linspace(3).unwrap().values(), &[0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_best_beta_prefers_highest_beta_on_ties() {
        let table = [
            BetaScore { beta: 0.0, accuracy: 0.6 },
            BetaScore { beta: 0.5, accuracy: 0.8 },
            BetaScore { beta: 1.0, accuracy: 0.8 },
        ];
        let best = best_beta(&table).unwrap();
        assert_eq!(best.beta, 1.0);
        assert_eq!(best.accuracy, 0.8);

        // Order of the table does not matter
        let reversed: Vec<BetaScore> = table.iter().rev().copied().collect();
        assert_eq!(best_beta(&reversed).unwrap().beta, 1.0);

        assert!(best_beta(&[]).is_err());
    }

    #[test]
    fn test_tune_beta_is_consistent_with_accuracy() {
        // Feature 1 is informative, feature 0 is not; averaging the weights
        // (β = 0) lets the uninformative mass leak into the decision.
        let x = FeatureMatrix::from_dense(&[
            vec![3.0, 1.0],
            vec![3.0, -1.0],
            vec![0.5, 2.0],
            vec![0.5, -2.0],
        ])
        .unwrap();
        let y = [1, 0, 1, 0];
        let w = [0.0, 1.0];
        let b = -0.25;

        let table = tune_beta(&x, &y, &w, b, &BetaGrid::default()).unwrap();
        assert_eq!(table.len(), 41);

        let best = best_beta(&table).unwrap();
        assert_eq!(best.accuracy, 1.0);
        assert_eq!(best.beta, 1.0);

        let direct = accuracy(&x, &y, &interpolate(&w, best.beta).unwrap(), b).unwrap();
        assert_eq!(best.accuracy, direct);

        // At β = 0 both weights are 0.5 and the second row flips to positive
        assert_eq!(table[0].beta, 0.0);
        assert_eq!(table[0].accuracy, 0.75);
    }
}
