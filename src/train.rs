use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use moodlist::mood::{
    classifier::DEFAULT_NEIGHBORS,
    dataset::read_rows,
    train::{train, write_labeled_csv},
};

/// Offline job: label the reference dataset and fit the mood model.
#[derive(Parser, Debug)]
#[command(name = "train-model")]
struct CliArgs {
    /// Reference dataset (CSV with Singer, Song name, energy, valence, tempo)
    #[arg(long, env = "MOODLIST_DATASET", default_value = "data/SingerAndSongs.csv")]
    dataset: PathBuf,

    /// Where to write the dataset with its rule-derived target column
    #[arg(long, default_value = "data/sad2.csv")]
    labeled_out: PathBuf,

    /// Where to write the trained model
    #[arg(long, env = "MOODLIST_MODEL", default_value = "KNN_Model.json")]
    model_out: PathBuf,

    #[arg(long, short = 'k', default_value_t = DEFAULT_NEIGHBORS)]
    neighbors: usize,

    /// Fraction of rows held out for evaluation
    #[arg(long, default_value_t = 0.2)]
    test_size: f64,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    let songs = read_rows(&args.dataset)
        .with_context(|| format!("Failed to load dataset {}", args.dataset.display()))?;
    info!("Read {} rows from {}", songs.len(), args.dataset.display());

    write_labeled_csv(&args.dataset, &args.labeled_out)
        .with_context(|| format!("Failed to write {}", args.labeled_out.display()))?;

    let outcome = train(&songs, args.neighbors, args.test_size, args.seed)?;
    info!(
        "Fitted k={} on {} rows, evaluated on {} ({} skipped)",
        outcome.model.k(),
        outcome.train_len,
        outcome.test_len,
        outcome.skipped
    );
    println!("{}", outcome.evaluation);

    outcome
        .model
        .save(&args.model_out)
        .with_context(|| format!("Failed to save model to {}", args.model_out.display()))?;
    info!("Model saved to {}", args.model_out.display());

    Ok(())
}
