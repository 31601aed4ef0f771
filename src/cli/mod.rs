//! Skycast CLI Module
//!
//! Thin command-line glue over the library: generate data, train the two
//! classifiers, run a single prediction.

use clap::{Parser, Subcommand};
use colored::*;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::artifact::ArtifactStore;
use crate::data::Dataset;
use crate::error::Result;
use crate::inference::PredictionService;
use crate::synthetic;
use crate::training::{train, TrainingConfig};

fn step_ok(msg: &str) {
    println!("  {} {}", "✓".green(), msg);
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", "─".repeat(56).truecolor(100, 100, 100));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "skycast")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Weather comfort and rain prediction from synthetically trained forests")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a labeled synthetic training dataset
    Generate {
        /// Number of samples to generate
        #[arg(short = 'n', long, default_value = "5000")]
        samples: usize,

        /// Random seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Output CSV file
        #[arg(short, long, default_value = "weather_training_data.csv")]
        output: PathBuf,
    },

    /// Train the rain and comfort classifiers on a dataset
    Train {
        /// Input dataset CSV
        #[arg(short, long, default_value = "weather_training_data.csv")]
        data: PathBuf,

        /// Directory for the trained artifact blobs
        #[arg(short, long, default_value = "models")]
        model_dir: PathBuf,

        /// Random seed for the split and both forests
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Number of trees per forest
        #[arg(long, default_value = "100")]
        n_estimators: usize,
    },

    /// Predict from a JSON feature map using a trained artifact
    Predict {
        /// Directory holding the trained artifact blobs
        #[arg(short, long, default_value = "models")]
        model_dir: PathBuf,

        /// JSON file mapping the seven feature names to numbers
        #[arg(short, long)]
        input: PathBuf,
    },
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_generate(samples: usize, seed: u64, output: &Path) -> Result<()> {
    section("Generating synthetic weather data");
    let start = Instant::now();

    let dataset = synthetic::generate(samples, seed);
    let rain = dataset.rain_labels().iter().sum::<usize>();
    let comfort = dataset.comfort_labels();

    dataset.save_csv(output)?;

    step_ok(&format!(
        "generated {} samples in {:.2}s",
        dataset.len(),
        start.elapsed().as_secs_f64()
    ));
    step_ok(&format!("rain: {rain} yes / {} no", dataset.len() - rain));
    step_ok(&format!(
        "comfort: {} low / {} medium / {} high",
        comfort.iter().filter(|&&c| c == 0).count(),
        comfort.iter().filter(|&&c| c == 1).count(),
        comfort.iter().filter(|&&c| c == 2).count(),
    ));
    step_ok(&format!("saved to {}", output.display()));
    Ok(())
}

pub fn cmd_train(data: &Path, model_dir: &Path, seed: u64, n_estimators: usize) -> Result<()> {
    section("Training classifiers");
    let start = Instant::now();

    let dataset = Dataset::load_csv(data)?;
    step_ok(&format!("loaded {} samples from {}", dataset.len(), data.display()));

    let config = TrainingConfig::with_seed(seed).with_n_estimators(n_estimators);
    let outcome = train(&dataset, &config)?;
    step_ok(&format!("trained in {:.2}s", start.elapsed().as_secs_f64()));

    section("Rain classifier");
    println!("{}", outcome.rain_report);
    section("Comfort classifier");
    println!("{}", outcome.comfort_report);

    let store = ArtifactStore::new(model_dir);
    store.save(&outcome.artifact)?;
    step_ok(&format!("saved artifact to {}", model_dir.display()));
    Ok(())
}

pub fn cmd_predict(model_dir: &Path, input: &Path) -> Result<()> {
    let store = ArtifactStore::new(model_dir);
    let service = PredictionService::from_store(&store)?;

    let json = fs::read_to_string(input)?;
    let features: HashMap<String, f64> = serde_json::from_str(&json)?;

    let result = service.predict(&features)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
