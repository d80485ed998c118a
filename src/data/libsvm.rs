//! LibSVM format loader
//!
//! Reads pre-vectorized count matrices in the libsvm format:
//! label index:value index:value ...
//!
//! Example:
//! +1 1:2 3:1 7:4
//! -1 2:1 5:3
//!
//! Labels `+1`/`1` map to class 1, `-1`/`0` to class 0.

use crate::core::{FeatureMatrix, LabeledData, NBSVMError, Result, SparseVector};
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Labelled count matrix loaded from a libsvm file
#[derive(Debug, Clone)]
pub struct LibSVMDataset {
    data: LabeledData,
}

impl LibSVMDataset {
    /// Load a dataset from a LibSVM format file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(NBSVMError::IoError)?;
        let reader = BufReader::new(file);
        Self::from_reader(reader)
    }

    /// Load a dataset from a reader
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        let mut n_features = 0;

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(NBSVMError::IoError)?;
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (row, label) = Self::parse_line(line).map_err(|e| match e {
                NBSVMError::ParseError(msg) => {
                    NBSVMError::ParseError(format!("line {}: {}", line_num + 1, msg))
                }
                other => other,
            })?;
            if let Some(&last) = row.indices.last() {
                n_features = n_features.max(last + 1);
            }
            rows.push(row);
            labels.push(label);
        }

        if rows.is_empty() {
            return Err(NBSVMError::EmptyDataset);
        }

        debug!("Loaded {} libsvm rows with {} features", rows.len(), n_features);
        let features = FeatureMatrix::new(rows, n_features)?;
        Ok(LibSVMDataset {
            data: LabeledData::new(features, labels)?,
        })
    }

    /// Parse a single line in libsvm format
    fn parse_line(line: &str) -> Result<(SparseVector, u8)> {
        let mut parts = line.split_whitespace();

        let label_str = parts
            .next()
            .ok_or_else(|| NBSVMError::ParseError("empty line".to_string()))?;
        let label = label_str
            .parse::<f64>()
            .map_err(|_| NBSVMError::ParseError(format!("invalid label: {}", label_str)))?;
        let label = match label {
            l if l == 1.0 => 1,
            l if l == 0.0 || l == -1.0 => 0,
            other => return Err(NBSVMError::InvalidLabel(other)),
        };

        let mut indices = Vec::new();
        let mut values = Vec::new();

        for feature_str in parts {
            let (index_str, value_str) = feature_str.split_once(':').ok_or_else(|| {
                NBSVMError::ParseError(format!("invalid feature format: {}", feature_str))
            })?;

            let index = index_str.parse::<usize>().map_err(|_| {
                NBSVMError::ParseError(format!("invalid feature index: {}", index_str))
            })?;
            let value = value_str.parse::<f64>().map_err(|_| {
                NBSVMError::ParseError(format!("invalid feature value: {}", value_str))
            })?;

            // libsvm uses 1-based indexing
            if index == 0 {
                return Err(NBSVMError::ParseError(
                    "feature index must be positive: 0".to_string(),
                ));
            }

            indices.push(index - 1);
            values.push(value);
        }

        Ok((SparseVector::new(indices, values), label))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of feature columns (largest index seen)
    pub fn n_features(&self) -> usize {
        self.data.features.n_features()
    }

    pub fn data(&self) -> &LabeledData {
        &self.data
    }

    pub fn into_data(self) -> LabeledData {
        self.data
    }
}
