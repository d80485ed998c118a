//! Data loading and splitting
//!
//! Text tables for the vectorizer, pre-vectorized libsvm count matrices and
//! index splits for held-out scoring.

pub mod csv;
pub mod libsvm;
pub mod split;

pub use self::csv::TextTable;
pub use self::libsvm::LibSVMDataset;
pub use self::split::{k_fold, split_by_value, train_test_split, Split};
