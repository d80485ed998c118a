//! NB-SVM: linear SVM over Naive Bayes log-count-ratio features
//!
//! Based on "Baselines and Bigrams: Simple, Good Sentiment and Topic
//! Classification" by Sida Wang and Christopher Manning. Count features are
//! scaled by the smoothed log-count ratio of the two classes, a linear SVM is
//! trained on the scaled features, and its weights are interpolated towards
//! their mean with a β tuned on held-out data. A multinomial Naive Bayes
//! baseline shares the same ratio.
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
//! let accuracy = model.score(&x_test, &[1, 0])?;
//! println!("NBSVM accuracy is {accuracy}, beta {}", model.beta());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cache;
pub mod core;
pub mod data;
pub mod evaluation;
pub mod interpolation;
pub mod models;
pub mod solver;
pub mod text;
pub mod weighting;

// Re-export main types for convenience
pub use crate::api::{compare, compare_split, cross_validate, Comparison, Corpus, CrossValidation};
pub use crate::cache::{CacheStats, GramCache};
pub use crate::core::error::*;
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::data::{LibSVMDataset, Split, TextTable};
pub use crate::evaluation::{accuracy, linear_prediction, EvaluationMetrics};
pub use crate::interpolation::{best_beta, interpolate, tune_beta, BetaGrid};
pub use crate::models::{NBSVMConfig, NaiveBayes, DEFAULT_BETA, NBSVM};
pub use crate::solver::{SMOTrainer, SolveOutcome};
pub use crate::text::{CountVectorizer, VectorizerConfig};
pub use crate::weighting::{log_count_ratio, nb_transform, DEFAULT_ALPHA};

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
