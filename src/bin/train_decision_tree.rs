//! Train a Decision Tree on Bovespa daily quotes
//!
//! Usage: cargo run --bin train_decision_tree -- --csv Bovespa.csv --max-depth 5

use anyhow::Result;
use bovespa_tree::data::QuoteLoader;
use bovespa_tree::features::FeatureEngine;
use bovespa_tree::models::{DecisionTree, TreeConfig};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Train a Gini decision tree on Bovespa quotes")]
struct Args {
    /// Bovespa quotes CSV
    #[arg(long, default_value = "Bovespa.csv")]
    csv: PathBuf,

    /// Max tree depth
    #[arg(long, default_value = "5")]
    max_depth: usize,

    /// Grow the tree without a depth limit
    #[arg(long)]
    unbounded: bool,

    /// Fraction of samples used for training (chronological)
    #[arg(long, default_value = "0.8")]
    train_ratio: f64,

    /// Tickers to keep
    #[arg(long, value_delimiter = ',', default_value = "PETR3,PETR4")]
    tickers: Vec<String>,

    /// Write the fitted model as JSON
    #[arg(long)]
    save_model: Option<PathBuf>,

    /// Write the engineered features as CSV
    #[arg(long)]
    export_features: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bovespa_tree=info")),
        )
        .init();

    let args = Args::parse();

    println!("===========================================");
    println!("  Decision Tree Training - Bovespa");
    println!("===========================================\n");

    info!("Loading {} quotes from {:?}...", args.tickers.join(", "), args.csv);
    let quotes = QuoteLoader::load_bovespa(&args.csv, &args.tickers)?;
    println!("Loaded {} quotes\n", quotes.len());

    let engine = FeatureEngine::new().with_tickers(args.tickers.clone());
    let dataset = engine.generate(&quotes);

    println!(
        "Dataset: {} samples, {} features",
        dataset.n_samples(),
        dataset.n_features()
    );
    println!("Features: {}", dataset.feature_names.join(", "));

    if dataset.is_empty() {
        anyhow::bail!("no samples left after feature engineering");
    }
    let (up, down) = dataset.class_balance();
    println!("Class balance: {} UP / {} DOWN", up, down);

    if let Some(path) = &args.export_features {
        dataset.save_csv(path)?;
        println!("Features written to {:?}", path);
    }

    let split = dataset.train_test_split(args.train_ratio)?;
    println!("\nTrain set: {} samples", split.train.n_samples());
    println!("Test set:  {} samples\n", split.test.n_samples());

    let config = TreeConfig {
        max_depth: if args.unbounded {
            None
        } else {
            Some(args.max_depth)
        },
    };

    info!("Training decision tree...");
    let mut tree = DecisionTree::new(config);
    if let Err(err) = tree.fit(&split.train) {
        if err.is_invariant_violation() {
            error!("split search failed: training rows with identical features carry different labels");
        }
        return Err(err.into());
    }

    println!("\n=== Model Evaluation ===\n");

    let train_acc = tree.accuracy(&split.train)?;
    let test_acc = tree.accuracy(&split.test)?;
    println!("Training Accuracy: {:.2}%", train_acc * 100.0);
    println!("Test Accuracy:     {:.2}%", test_acc * 100.0);
    println!("Total impurity:    {:.4}", tree.total_impurity()?);

    println!("\n=== Tree Structure ===\n");
    tree.print_tree();

    if let Some(path) = &args.save_model {
        tree.save(path)?;
        println!("\nModel saved to {:?}", path);
    }

    println!("\nTraining complete!");

    Ok(())
}
