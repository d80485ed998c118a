//! NBSVM Command Line Interface
//!
//! Loads a labelled corpus, splits it into training and test rows, fits NBSVM
//! and the MNB baseline on the same split and prints both held-out accuracies.

use clap::{Parser, ValueEnum};
use env_logger::Env;
use log::{error, info};
use nbsvm::api::{compare_split, cross_validate, Comparison, Corpus, CrossValidation};
use nbsvm::data::{split_by_value, train_test_split, LibSVMDataset, Split, TextTable};
use nbsvm::{BetaGrid, NBSVMConfig, NBSVMError, Result, SolverConfig, VectorizerConfig};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "nbsvm")]
#[command(about = "Compare NBSVM and multinomial Naive Bayes on a labelled text corpus")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Input data file (CSV/TSV with a header row, or LibSVM)
    data: PathBuf,

    /// Name of the column holding the text (CSV only)
    x_name: Option<String>,

    /// Name of the column holding the 0/1 labels (CSV only)
    y_name: Option<String>,

    /// Data format
    #[arg(long, value_enum, default_value = "auto")]
    format: DataFormat,

    /// Keep every n-gram instead of the most frequent ones
    #[arg(long)]
    no_limit_features: bool,

    /// Number of n-gram features to keep, if limited
    #[arg(long, default_value = "35000")]
    features: usize,

    /// Largest n-gram size
    #[arg(long, default_value = "2")]
    ngrams: usize,

    /// How to choose the test rows
    #[arg(long, value_enum, default_value = "train-test")]
    split_method: SplitMethod,

    /// Column whose value selects the test rows (with --split-method var)
    #[arg(long)]
    split_variable: Option<String>,

    /// Value of --split-variable marking test rows
    #[arg(long)]
    test_value: Option<String>,

    /// Fraction of rows held out (with --split-method train-test)
    #[arg(long, default_value = "0.2")]
    test_size: f64,

    /// Number of folds (with --split-method cross-val)
    #[arg(long, default_value = "5")]
    folds: usize,

    /// Seed for shuffling
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Regularization parameter C
    #[arg(short = 'C', long, default_value = "1.0")]
    c: f64,

    /// Convergence tolerance
    #[arg(long, default_value = "0.001")]
    epsilon: f64,

    /// Maximum solver passes
    #[arg(long, default_value = "1000")]
    max_iterations: usize,

    /// Laplace smoothing for the log-count ratio
    #[arg(long, default_value = "1.0")]
    alpha: f64,

    /// Number of evenly spaced β candidates in [0, 1]
    #[arg(long, default_value = "41")]
    beta_points: usize,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum DataFormat {
    /// Pick by file extension
    Auto,
    Csv,
    Libsvm,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum SplitMethod {
    /// Seeded random hold-out of --test-size
    #[value(name = "train-test")]
    TrainTest,
    /// Rows where --split-variable equals --test-value are the test set
    #[value(name = "var")]
    Var,
    /// k-fold cross-validation with --folds
    #[value(name = "cross-val")]
    CrossVal,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    if let Err(e) = run(&cli) {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let format = match cli.format {
        DataFormat::Auto => detect_format(&cli.data),
        other => other,
    };
    info!("Loading {:?} as {format:?}", cli.data);

    let (corpus, groups) = load_corpus(cli, format)?;
    info!("Loaded {} rows", corpus.len());

    let config = NBSVMConfig {
        alpha: cli.alpha,
        beta_grid: BetaGrid::linspace(cli.beta_points)?,
        ..NBSVMConfig::default()
    };
    let solver = SolverConfig {
        c: cli.c,
        epsilon: cli.epsilon,
        max_iterations: cli.max_iterations,
        ..SolverConfig::default()
    };

    match cli.split_method {
        SplitMethod::CrossVal => {
            let cv = cross_validate(&corpus, cli.folds, cli.seed, &config, &solver)?;
            print_cross_validation(&cv, cli.json)
        }
        SplitMethod::TrainTest => {
            let split = train_test_split(corpus.len(), cli.test_size, cli.seed)?;
            let result = compare_split(&corpus, &split, &config, &solver)?;
            print_comparison(&result, cli.json)
        }
        SplitMethod::Var => {
            let split = split_on_variable(cli, groups)?;
            let result = compare_split(&corpus, &split, &config, &solver)?;
            print_comparison(&result, cli.json)
        }
    }
}

fn load_corpus(cli: &Cli, format: DataFormat) -> Result<(Corpus, Option<Vec<String>>)> {
    match format {
        DataFormat::Libsvm => {
            if cli.split_method == SplitMethod::Var {
                return Err(NBSVMError::InvalidParameter(
                    "--split-method var needs a CSV input with a split column".to_string(),
                ));
            }
            let dataset = LibSVMDataset::from_file(&cli.data)?;
            info!("{} features", dataset.n_features());
            Ok((Corpus::Counts(dataset.into_data()), None))
        }
        _ => {
            let (x_name, y_name) = match (&cli.x_name, &cli.y_name) {
                (Some(x), Some(y)) => (x.as_str(), y.as_str()),
                _ => {
                    return Err(NBSVMError::InvalidParameter(
                        "CSV input needs the text and label column names".to_string(),
                    ))
                }
            };
            let split_column = match cli.split_method {
                SplitMethod::Var => Some(cli.split_variable.as_deref().ok_or_else(|| {
                    NBSVMError::InvalidParameter(
                        "--split-method var requires --split-variable".to_string(),
                    )
                })?),
                _ => None,
            };

            let mut table = TextTable::from_path(&cli.data, x_name, y_name, split_column)?;
            let groups = table.groups.take();
            let vectorizer = VectorizerConfig {
                ngram_max: cli.ngrams,
                max_features: if cli.no_limit_features {
                    None
                } else {
                    Some(cli.features)
                },
                ..VectorizerConfig::default()
            };
            Ok((Corpus::Text { table, vectorizer }, groups))
        }
    }
}

fn split_on_variable(cli: &Cli, groups: Option<Vec<String>>) -> Result<Split> {
    let test_value = cli.test_value.as_deref().ok_or_else(|| {
        NBSVMError::InvalidParameter("--split-method var requires --test-value".to_string())
    })?;
    let groups = groups.ok_or_else(|| {
        NBSVMError::InvalidParameter("--split-method var requires --split-variable".to_string())
    })?;
    split_by_value(&groups, test_value)
}

fn print_comparison(result: &Comparison, json: bool) -> Result<()> {
    if json {
        println!("{}", to_json(result)?);
        return Ok(());
    }

    println!("Results:");
    println!("NBSVM accuracy is {:.4}", result.nbsvm.accuracy);
    if let Some(beta) = result.nbsvm.beta {
        println!("Best interpolation parameter is {beta}");
    }
    println!("MNB accuracy is {:.4}", result.mnb.accuracy);
    Ok(())
}

fn print_cross_validation(cv: &CrossValidation, json: bool) -> Result<()> {
    if json {
        println!("{}", to_json(cv)?);
        return Ok(());
    }

    println!("Results ({} folds):", cv.folds.len());
    for (i, fold) in cv.folds.iter().enumerate() {
        println!(
            "  fold {}: NBSVM {:.4} (beta {}), MNB {:.4}",
            i + 1,
            fold.nbsvm.accuracy,
            fold.nbsvm.beta.unwrap_or_default(),
            fold.mnb.accuracy
        );
    }
    println!("NBSVM accuracy is {:.4}", cv.nbsvm_accuracy);
    println!("Mean interpolation parameter is {:.4}", cv.mean_beta);
    println!("MNB accuracy is {:.4}", cv.mnb_accuracy);
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| NBSVMError::ParseError(format!("failed to encode results: {e}")))
}

fn detect_format(path: &Path) -> DataFormat {
    match path.extension().and_then(|s| s.to_str()) {
        Some("libsvm") | Some("svm") | Some("txt") => DataFormat::Libsvm,
        _ => DataFormat::Csv,
    }
}
