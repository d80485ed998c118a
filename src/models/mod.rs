//! Text classifiers built on log-count-ratio weighting
//!
//! Both models implement [`TextClassifier`](crate::core::TextClassifier), so
//! callers can hold either behind a `Box<dyn TextClassifier>`.

pub mod mnb;
pub mod nbsvm;

pub use self::mnb::NaiveBayes;
pub use self::nbsvm::{NBSVMConfig, DEFAULT_BETA, NBSVM};
