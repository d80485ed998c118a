//! Core type definitions for NB-SVM

use crate::core::{NBSVMError, Result};
use serde::Serialize;

/// Sparse vector representation with sorted indices
#[derive(Clone, Debug, PartialEq)]
pub struct SparseVector {
    /// Sorted indices of non-zero elements
    pub indices: Vec<usize>,
    /// Values corresponding to indices
    pub values: Vec<f64>,
}

impl SparseVector {
    /// Create a new sparse vector, ensuring indices are sorted
    pub fn new(indices: Vec<usize>, values: Vec<f64>) -> Self {
        assert_eq!(
            indices.len(),
            values.len(),
            "Indices and values must have same length"
        );

        let mut pairs: Vec<_> = indices.into_iter().zip(values).collect();
        pairs.sort_by_key(|&(idx, _)| idx);

        let (indices, values): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();
        Self { indices, values }
    }

    /// Build a sparse vector from a dense slice, dropping zeros
    pub fn from_dense(dense: &[f64]) -> Self {
        let (indices, values) = dense
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0.0)
            .map(|(i, v)| (i, *v))
            .unzip();
        Self { indices, values }
    }

    /// Dot product of two sparse vectors, merging over the sorted indices
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let mut result = 0.0;
        let (mut i, mut j) = (0, 0);

        while i < self.indices.len() && j < other.indices.len() {
            match self.indices[i].cmp(&other.indices[j]) {
                std::cmp::Ordering::Equal => {
                    result += self.values[i] * other.values[j];
                    i += 1;
                    j += 1;
                }
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
            }
        }

        result
    }

    /// Dot product with a dense vector.
    ///
    /// Indices past the end of `dense` contribute nothing; callers validate
    /// dimensionality before getting here.
    pub fn dot_dense(&self, dense: &[f64]) -> f64 {
        self.indices
            .iter()
            .zip(&self.values)
            .filter_map(|(&i, &v)| dense.get(i).map(|&w| w * v))
            .sum()
    }

    /// Element-wise product with a dense vector of per-feature factors
    pub fn hadamard(&self, factors: &[f64]) -> Self {
        let values = self
            .indices
            .iter()
            .zip(&self.values)
            .map(|(&i, &v)| v * factors.get(i).copied().unwrap_or(0.0))
            .collect();
        Self {
            indices: self.indices.clone(),
            values,
        }
    }

    /// Expand into a dense vector of length `n`
    pub fn to_dense(&self, n: usize) -> Vec<f64> {
        let mut dense = vec![0.0; n];
        for (&i, &v) in self.indices.iter().zip(&self.values) {
            if i < n {
                dense[i] = v;
            }
        }
        dense
    }

    /// Number of non-zero elements
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Check if vector is empty
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Document-by-feature matrix stored as sparse rows.
///
/// The column count is explicit so that trailing all-zero features (common
/// with a fixed vocabulary) are still part of the shape.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureMatrix {
    rows: Vec<SparseVector>,
    n_features: usize,
}

impl FeatureMatrix {
    /// Create a matrix, checking that every row is well formed and that every
    /// index fits within `n_features`
    pub fn new(rows: Vec<SparseVector>, n_features: usize) -> Result<Self> {
        for (r, row) in rows.iter().enumerate() {
            if row.indices.len() != row.values.len() {
                return Err(NBSVMError::InvalidDataset(format!(
                    "row {r} has {} indices but {} values",
                    row.indices.len(),
                    row.values.len()
                )));
            }
            if row.indices.windows(2).any(|pair| pair[0] >= pair[1]) {
                return Err(NBSVMError::InvalidDataset(format!(
                    "row {r} indices are not strictly increasing"
                )));
            }
            if let Some(&max) = row.indices.iter().max() {
                if max >= n_features {
                    return Err(NBSVMError::DimensionMismatch {
                        expected: n_features,
                        actual: max + 1,
                    });
                }
            }
        }
        Ok(Self { rows, n_features })
    }

    /// Create a matrix from dense rows; all rows must have the same length
    pub fn from_dense(rows: &[Vec<f64>]) -> Result<Self> {
        let n_features = rows.first().map_or(0, Vec::len);
        let mut sparse = Vec::with_capacity(rows.len());
        for row in rows {
            if row.len() != n_features {
                return Err(NBSVMError::DimensionMismatch {
                    expected: n_features,
                    actual: row.len(),
                });
            }
            sparse.push(SparseVector::from_dense(row));
        }
        Ok(Self {
            rows: sparse,
            n_features,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[SparseVector] {
        &self.rows
    }

    /// # Panics
    /// Panics if `i >= n_rows()`
    pub fn row(&self, i: usize) -> &SparseVector {
        &self.rows[i]
    }

    /// Per-column totals
    pub fn column_sums(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.n_features];
        for row in &self.rows {
            for (&i, &v) in row.indices.iter().zip(&row.values) {
                sums[i] += v;
            }
        }
        sums
    }

    /// Copy out the rows at `indices`, in the given order
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        Self {
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
            n_features: self.n_features,
        }
    }

    /// Fail with `DimensionMismatch` unless the column count is `expected`
    pub fn check_features(&self, expected: usize) -> Result<()> {
        if self.n_features != expected {
            return Err(NBSVMError::DimensionMismatch {
                expected,
                actual: self.n_features,
            });
        }
        Ok(())
    }

    pub fn to_dense(&self) -> Vec<Vec<f64>> {
        self.rows
            .iter()
            .map(|row| row.to_dense(self.n_features))
            .collect()
    }
}

/// Check that every label is 0 or 1
pub fn validate_labels(labels: &[u8]) -> Result<()> {
    match labels.iter().find(|&&l| l > 1) {
        Some(&bad) => Err(NBSVMError::InvalidLabel(f64::from(bad))),
        None => Ok(()),
    }
}

/// Check that a matrix and its label vector agree on row count and that the
/// labels are binary
pub fn validate_pair(x: &FeatureMatrix, y: &[u8]) -> Result<()> {
    if x.n_rows() != y.len() {
        return Err(NBSVMError::LengthMismatch {
            rows: x.n_rows(),
            labels: y.len(),
        });
    }
    validate_labels(y)
}

/// A feature matrix paired with its binary labels
#[derive(Clone, Debug, PartialEq)]
pub struct LabeledData {
    pub features: FeatureMatrix,
    pub labels: Vec<u8>,
}

impl LabeledData {
    pub fn new(features: FeatureMatrix, labels: Vec<u8>) -> Result<Self> {
        validate_pair(&features, &labels)?;
        Ok(Self { features, labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Subset of rows (and labels) at `indices`
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            features: self.features.select_rows(indices),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }

    /// Split into (positive rows, negative rows)
    pub fn partition_by_class(&self) -> (FeatureMatrix, FeatureMatrix) {
        partition_by_class(&self.features, &self.labels)
    }
}

/// Split a matrix into its label-1 rows and its label-0 rows
pub fn partition_by_class(x: &FeatureMatrix, y: &[u8]) -> (FeatureMatrix, FeatureMatrix) {
    let (pos, neg): (Vec<usize>, Vec<usize>) = (0..y.len()).partition(|&i| y[i] == 1);
    (x.select_rows(&pos), x.select_rows(&neg))
}

/// A linear decision rule `x · w + b`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearSeparator {
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl LinearSeparator {
    pub fn new(weights: Vec<f64>, bias: f64) -> Self {
        Self { weights, bias }
    }

    /// Raw decision value for one row
    pub fn decision_function(&self, row: &SparseVector) -> f64 {
        row.dot_dense(&self.weights) + self.bias
    }

    pub fn n_features(&self) -> usize {
        self.weights.len()
    }
}

/// Accuracy of one interpolation candidate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BetaScore {
    pub beta: f64,
    pub accuracy: f64,
}

/// Which classifier produced a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Nbsvm,
    Mnb,
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelKind::Nbsvm => write!(f, "NBSVM"),
            ModelKind::Mnb => write!(f, "MNB"),
        }
    }
}

/// Outcome of a `score` call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    pub model: ModelKind,
    /// Fraction of correctly classified held-out rows
    pub accuracy: f64,
    /// Interpolation parameter chosen by tuning (NBSVM only)
    pub beta: Option<f64>,
    /// Number of held-out rows
    pub n_samples: usize,
    /// Accuracy of every candidate, in grid order (NBSVM only)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub beta_curve: Vec<BetaScore>,
}

/// Configuration for the SMO solver
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Regularization parameter (upper bound for alpha)
    pub c: f64,
    /// Tolerance for KKT conditions
    pub epsilon: f64,
    /// Maximum number of passes over the training set
    pub max_iterations: usize,
    /// Gram cache size in bytes
    pub cache_size: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            epsilon: 0.001,
            max_iterations: 1000,
            cache_size: 100_000_000, // 100MB
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.c.is_finite() && self.c > 0.0) {
            return Err(NBSVMError::InvalidParameter(format!(
                "C must be positive, got {}",
                self.c
            )));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(NBSVMError::InvalidParameter(format!(
                "epsilon must be positive, got {}",
                self.epsilon
            )));
        }
        if self.max_iterations == 0 {
            return Err(NBSVMError::InvalidParameter(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
