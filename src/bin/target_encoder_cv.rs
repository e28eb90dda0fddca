//! Compares target encoding with and without internal cross fitting.
//!
//! A ridge regression is trained on three categorical features: one
//! informative, one shuffled (no signal) and one near-unique (no signal,
//! very high cardinality). Encoding them without cross fitting lets the
//! near-unique feature memorize the training target, which shows up as a
//! large train/test gap and a large coefficient on that feature.
//!
//! Run with: cargo run --release --bin target-encoder-cv -- --n-samples 20000

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use targetenc_rs::backend::CpuBackend;
use targetenc_rs::config::DemoConfig;
use targetenc_rs::model::RidgeSolver;
use targetenc_rs::workflow::compare_target_encodings;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file with a demo configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of generated samples
    #[arg(long)]
    n_samples: Option<usize>,
    /// Cardinality of the informative feature
    #[arg(long)]
    n_categories: Option<usize>,
    /// Seed of the data generator
    #[arg(long)]
    seed: Option<u64>,
    /// Number of cross-fitting folds in the target encoder
    #[arg(long)]
    cv_folds: Option<usize>,
    /// Ridge regularization strength
    #[arg(long)]
    alpha: Option<f64>,
    /// Ridge solver: lsqr or cholesky
    #[arg(long)]
    solver: Option<RidgeSolver>,
    /// Write scores and coefficients as JSON to this file
    #[arg(long)]
    output: Option<PathBuf>,
}

impl Args {
    fn demo_config(&self) -> anyhow::Result<DemoConfig> {
        let mut config = match &self.config {
            Some(path) => DemoConfig::from_json_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => DemoConfig::default(),
        };
        if let Some(n) = self.n_samples {
            config.dataset.n_samples = n;
        }
        if let Some(n) = self.n_categories {
            config.dataset.n_categories = n;
        }
        if let Some(seed) = self.seed {
            config.dataset.seed = seed;
        }
        if let Some(k) = self.cv_folds {
            config.cv_folds = k;
        }
        if let Some(alpha) = self.alpha {
            config.ridge_alpha = alpha;
        }
        if let Some(solver) = self.solver {
            config.solver = solver;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let config = args.demo_config()?;
    tracing::info!(?config, "starting target encoder comparison");

    let comparison = compare_target_encodings::<CpuBackend>(&config)?;

    println!("=== Scores (R²) ===\n");
    println!("{}\n", comparison.scores);
    println!("=== Coefficients ===\n");
    println!("{}", comparison.cv_coefficients);
    println!("{}", comparison.no_cv_coefficients);

    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(&comparison)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote report");
    }
    Ok(())
}
