//! Error types for the NB-SVM implementation

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NBSVMError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Optimization failed: {0}")]
    OptimizationError(String),

    #[error("Model not trained: call fit() first")]
    ModelNotTrained,

    #[error("Model has no evaluation set: call score() before predict()")]
    NotScored,

    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("Invalid label: expected 0 or 1, got {0}")]
    InvalidLabel(f64),

    #[error("Dimension mismatch: expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Length mismatch: {rows} rows but {labels} labels")]
    LengthMismatch { rows: usize, labels: usize },

    #[error("Empty dataset")]
    EmptyDataset,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Parse error: {0}")]
    ParseError(String),
}

pub type Result<T> = std::result::Result<T, NBSVMError>;
