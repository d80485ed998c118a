//! Row index splits for held-out evaluation

use crate::core::{NBSVMError, Result};
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Train / test row indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

impl Split {
    fn checked(train: Vec<usize>, test: Vec<usize>) -> Result<Self> {
        if train.is_empty() || test.is_empty() {
            return Err(NBSVMError::InvalidParameter(format!(
                "split leaves {} training and {} test rows",
                train.len(),
                test.len()
            )));
        }
        Ok(Self { train, test })
    }
}

fn shuffled(n: usize, seed: u64) -> Vec<usize> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut rng);
    indices
}

/// Seeded random split; the test side gets `ceil(n * test_fraction)` rows
pub fn train_test_split(n: usize, test_fraction: f64, seed: u64) -> Result<Split> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(NBSVMError::InvalidParameter(format!(
            "test fraction must lie in (0, 1), got {test_fraction}"
        )));
    }
    let n_test = (n as f64 * test_fraction).ceil() as usize;
    let mut indices = shuffled(n, seed);
    let test = indices.split_off(n.saturating_sub(n_test));
    debug!("train/test split: {} / {} rows", indices.len(), test.len());
    Split::checked(indices, test)
}

/// Rows whose value equals `test_value` form the test set
pub fn split_by_value<S: AsRef<str>>(values: &[S], test_value: &str) -> Result<Split> {
    let (test, train): (Vec<usize>, Vec<usize>) =
        (0..values.len()).partition(|&i| values[i].as_ref() == test_value);
    debug!(
        "split on value {test_value:?}: {} / {} rows",
        train.len(),
        test.len()
    );
    Split::checked(train, test)
}

/// `k` disjoint test folds over a seeded shuffle; each fold trains on the rest
pub fn k_fold(n: usize, k: usize, seed: u64) -> Result<Vec<Split>> {
    if k < 2 || k > n {
        return Err(NBSVMError::InvalidParameter(format!(
            "cannot make {k} folds from {n} rows"
        )));
    }
    let indices = shuffled(n, seed);

    let base = n / k;
    let extra = n % k;
    let mut folds = Vec::with_capacity(k);
    let mut start = 0;
    for fold in 0..k {
        let size = base + usize::from(fold < extra);
        let end = start + size;
        let test = indices[start..end].to_vec();
        let train = indices[..start]
            .iter()
            .chain(&indices[end..])
            .copied()
            .collect();
        folds.push(Split::checked(train, test)?);
        start = end;
    }
    Ok(folds)
}
