//! Integration tests for the nbsvm library
//!
//! These tests verify end-to-end functionality across multiple modules
//! and validate real-world usage scenarios.

use approx::assert_abs_diff_eq;
use nbsvm::api::{compare, cross_validate, quick, Corpus};
use nbsvm::data::train_test_split;
use nbsvm::{
    accuracy, best_beta, interpolate, log_count_ratio, nb_transform, BetaGrid, BetaScore,
    CountVectorizer, EvaluationMetrics, FeatureMatrix, LabeledData, LinearSeparator,
    LinearSeparatorTrainer, NBSVMConfig, NBSVMError, NaiveBayes, Result, SMOTrainer,
    SolverConfig, TextClassifier, TextTable, VectorizerConfig, NBSVM,
};

fn matrix(rows: &[Vec<f64>]) -> FeatureMatrix {
    FeatureMatrix::from_dense(rows).expect("valid matrix")
}

fn train_reviews() -> (Vec<&'static str>, Vec<u8>) {
    (
        vec![
            "great movie, I love it",
            "love the great cast",
            "a great and fun ride",
            "fun story, great ending",
            "awful movie, I hate it",
            "hate the awful cast",
            "a boring and awful ride",
            "boring story, awful ending",
        ],
        vec![1, 1, 1, 1, 0, 0, 0, 0],
    )
}

fn test_reviews() -> (Vec<&'static str>, Vec<u8>) {
    (
        vec![
            "great fun, love it",
            "truly great",
            "awful and boring",
            "I hate it, awful",
        ],
        vec![1, 1, 0, 0],
    )
}

/// Log-count ratio of a tiny corpus with unit smoothing
#[test]
fn test_log_count_ratio_reference_values() {
    let pos = matrix(&[vec![2.0, 0.0], vec![1.0, 1.0]]);
    let neg = matrix(&[vec![0.0, 2.0], vec![1.0, 1.0]]);

    let r = log_count_ratio(&pos, &neg, 1.0).unwrap();
    assert_abs_diff_eq!(r[0], 0.2877, epsilon = 1e-4);
    assert_abs_diff_eq!(r[1], -0.2877, epsilon = 1e-4);
}

/// β = 0 collapses to the mean weight, β = 1 keeps the weights
#[test]
fn test_interpolation_reference_values() {
    let w = [1.0, 2.0, 3.0, 4.0];
    assert_eq!(interpolate(&w, 0.0).unwrap(), vec![2.5, 2.5, 2.5, 2.5]);
    assert_eq!(interpolate(&w, 1.0).unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
}

/// MNB bias is the class-prior log-odds
#[test]
fn test_mnb_bias_reference_values() {
    let mut mnb = NaiveBayes::new();
    let x = matrix(&[vec![1.0], vec![1.0], vec![1.0], vec![0.0]]);
    mnb.fit(&x, &[1, 1, 1, 0]).unwrap();
    assert_abs_diff_eq!(mnb.bias().unwrap(), 1.0986, epsilon = 1e-4);

    mnb.fit(&matrix(&[vec![1.0], vec![2.0]]), &[1, 0]).unwrap();
    assert_eq!(mnb.bias().unwrap(), 0.0);
}

/// Scoring an untrained model is an error, never a 0.0 accuracy
#[test]
fn test_score_before_fit_fails() {
    let x = matrix(&[vec![1.0, 0.0], vec![0.0, 1.0]]);
    let mut model = NBSVM::new();
    assert!(matches!(
        model.score(&x, &[1, 0]),
        Err(NBSVMError::ModelNotTrained)
    ));
    assert!(matches!(model.predict(), Err(NBSVMError::ModelNotTrained)));

    let mut mnb = NaiveBayes::new();
    assert!(matches!(
        mnb.score(&x, &[1, 0]),
        Err(NBSVMError::ModelNotTrained)
    ));
}

/// Ties in held-out accuracy resolve to the highest β
#[test]
fn test_beta_tie_break() {
    let table = [
        BetaScore { beta: 0.0, accuracy: 0.6 },
        BetaScore { beta: 0.5, accuracy: 0.8 },
        BetaScore { beta: 1.0, accuracy: 0.8 },
    ];
    let best = best_beta(&table).unwrap();
    assert_eq!(best.beta, 1.0);
    assert_eq!(best.accuracy, 0.8);
}

/// Complete workflow: vectorize -> fit -> score -> predict
#[test]
fn test_complete_text_workflow() {
    let (train_docs, y_train) = train_reviews();
    let (test_docs, y_test) = test_reviews();

    let mut vectorizer = CountVectorizer::new(VectorizerConfig::default());
    let x_train = vectorizer.fit_transform(&train_docs).unwrap();
    let x_test = vectorizer.transform(&test_docs).unwrap();
    assert_eq!(x_train.n_features(), x_test.n_features());

    let mut model = NBSVM::new().with_c(1.0).with_max_iterations(1000);
    model.fit(&x_train, &y_train).unwrap();
    assert!(model.is_fitted());

    let report = model.score_report(&x_test, &y_test).unwrap();
    assert!(
        report.accuracy >= 0.75,
        "NBSVM should separate clearly polarized reviews, got {}",
        report.accuracy
    );
    let beta = report.beta.expect("NBSVM reports its tuned beta");
    assert_eq!(model.beta(), beta);
    assert!(BetaGrid::default().values().contains(&beta));

    // predictions agree with the reported accuracy and are repeatable
    let predictions = model.predict().unwrap();
    assert_eq!(predictions, model.predict().unwrap());
    let metrics = EvaluationMetrics::from_predictions(&predictions, &y_test).unwrap();
    assert_abs_diff_eq!(metrics.accuracy(), report.accuracy, epsilon = 1e-12);

    let mut mnb = NaiveBayes::new();
    mnb.fit(&x_train, &y_train).unwrap();
    assert_eq!(mnb.score(&x_test, &y_test).unwrap(), 1.0);
}

/// The tuned accuracy equals a direct evaluation of the interpolated weights
#[test]
fn test_tuned_accuracy_matches_manual_pipeline() {
    let (train_docs, y_train) = train_reviews();
    let (test_docs, y_test) = test_reviews();
    let mut vectorizer = CountVectorizer::default();
    let x_train = vectorizer.fit_transform(&train_docs).unwrap();
    let x_test = vectorizer.transform(&test_docs).unwrap();

    let mut model = NBSVM::new();
    model.fit(&x_train, &y_train).unwrap();
    let acc = model.score(&x_test, &y_test).unwrap();

    let r = model.ratio().unwrap().to_vec();
    let separator = model.separator().unwrap().clone();
    let x_nb = nb_transform(&x_test, &r).unwrap();
    let w = interpolate(&separator.weights, model.beta()).unwrap();
    assert_eq!(accuracy(&x_nb, &y_test, &w, separator.bias).unwrap(), acc);
}

/// Fitting is deterministic for fixed inputs
#[test]
fn test_fit_is_deterministic() {
    let (docs, y) = train_reviews();
    let x = CountVectorizer::default().fit_transform(&docs).unwrap();

    let mut a = NBSVM::new();
    let mut b = NBSVM::new();
    a.fit(&x, &y).unwrap();
    b.fit(&x, &y).unwrap();
    assert_eq!(a.separator(), b.separator());
    assert_eq!(a.score(&x, &y).unwrap(), b.score(&x, &y).unwrap());
}

/// Any linear trainer can stand in for the SMO solver
#[test]
fn test_custom_trainer() {
    // Perceptron over the NB-weighted rows
    let perceptron = |x: &FeatureMatrix, y: &[u8]| -> Result<LinearSeparator> {
        let mut w = vec![0.0; x.n_features()];
        let mut b = 0.0;
        for _ in 0..20 {
            for (row, &label) in x.rows().iter().zip(y) {
                let target = if label == 1 { 1.0 } else { -1.0 };
                if target * (row.dot_dense(&w) + b) <= 0.0 {
                    for (&idx, &value) in row.indices.iter().zip(&row.values) {
                        w[idx] += target * value;
                    }
                    b += target;
                }
            }
        }
        Ok(LinearSeparator::new(w, b))
    };

    let (docs, y) = train_reviews();
    let x = CountVectorizer::default().fit_transform(&docs).unwrap();
    let mut model = NBSVM::with_trainer(perceptron);
    model.fit(&x, &y).unwrap();
    let acc = model.score(&x, &y).unwrap();
    assert!(acc >= 0.75, "got {acc}");
}

/// The SMO trainer separates linearly separable points
#[test]
fn test_smo_trainer_separates() {
    let x = matrix(&[
        vec![2.0, 1.0],
        vec![1.8, 1.1],
        vec![2.2, 0.9],
        vec![-2.0, -1.0],
        vec![-1.8, -1.1],
        vec![-2.2, -0.9],
    ]);
    let y = [1, 1, 1, 0, 0, 0];

    let trainer = SMOTrainer::new(SolverConfig::default());
    let separator = trainer.fit(&x, &y).unwrap();
    assert_eq!(separator.n_features(), 2);
    assert_eq!(accuracy(&x, &y, &separator.weights, separator.bias).unwrap(), 1.0);
}

/// A training set with one class yields constant predictions, not a crash
#[test]
fn test_single_class_training() {
    let x = matrix(&[vec![1.0, 0.0], vec![2.0, 1.0], vec![0.0, 3.0]]);
    let y = [1, 1, 1];

    let mut mnb = NaiveBayes::new();
    mnb.fit(&x, &y).unwrap();
    mnb.score(&x, &[1, 0, 1]).unwrap();
    assert_eq!(mnb.predict().unwrap(), vec![1, 1, 1]);

    let mut model = NBSVM::new();
    model.fit(&x, &y).unwrap();
    let acc = model.score(&x, &[1, 0, 1]).unwrap();
    assert!((0.0..=1.0).contains(&acc));
}

/// NBSVM and MNB compared on the same split
#[test]
fn test_compare_on_labeled_data() {
    let (docs, y) = train_reviews();
    let (test_docs, y_test) = test_reviews();
    let mut vectorizer = CountVectorizer::default();
    let train = LabeledData::new(vectorizer.fit_transform(&docs).unwrap(), y).unwrap();
    let test = LabeledData::new(vectorizer.transform(&test_docs).unwrap(), y_test).unwrap();

    let config = NBSVMConfig::default();
    let result = compare(&train, &test, &config, &SolverConfig::default()).unwrap();
    assert_eq!(result.nbsvm.n_samples, 4);
    assert_eq!(result.mnb.accuracy, 1.0);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["nbsvm"]["model"], "nbsvm");
    assert_eq!(json["mnb"]["model"], "mnb");
    assert!(json["mnb"].get("beta_curve").is_none());
    assert_eq!(json["nbsvm"]["beta_curve"].as_array().unwrap().len(), 41);
}

/// Cross-validation over raw documents
#[test]
fn test_cross_validation_on_texts() {
    let (mut docs, mut y) = train_reviews();
    let (test_docs, y_test) = test_reviews();
    docs.extend(test_docs);
    y.extend(y_test);

    let corpus = Corpus::Text {
        table: TextTable {
            texts: docs.iter().map(|d| d.to_string()).collect(),
            labels: y,
            groups: None,
        },
        vectorizer: VectorizerConfig::default(),
    };
    let cv = cross_validate(
        &corpus,
        3,
        42,
        &NBSVMConfig::default(),
        &SolverConfig::default(),
    )
    .unwrap();

    assert_eq!(cv.folds.len(), 3);
    let held_out: usize = cv.folds.iter().map(|f| f.mnb.n_samples).sum();
    assert_eq!(held_out, 12);
    assert!((0.0..=1.0).contains(&cv.nbsvm_accuracy));
    assert!((0.0..=1.0).contains(&cv.mnb_accuracy));
}

/// Quick helper runs an 80/20 split with defaults
#[test]
fn test_quick_compare() {
    let (docs, y) = train_reviews();
    let result = quick::compare_texts(&docs, &y, 7).unwrap();
    let split = train_test_split(docs.len(), 0.2, 7).unwrap();
    assert_eq!(result.nbsvm.n_samples, split.test.len());
}

/// Dynamic dispatch over both classifiers
#[test]
fn test_models_as_trait_objects() {
    let (docs, y) = train_reviews();
    let x = CountVectorizer::default().fit_transform(&docs).unwrap();

    let mut models: Vec<Box<dyn TextClassifier>> =
        vec![Box::new(NBSVM::new()), Box::new(NaiveBayes::new())];
    for model in models.iter_mut() {
        model.fit(&x, &y).unwrap();
        let acc = model.score(&x, &y).unwrap();
        assert!(acc >= 0.75, "{} got {acc}", model.name());
        assert_eq!(model.predict().unwrap().len(), y.len());
    }
}
