//! Skycast - Main Entry Point

use clap::Parser;
use skycast::cli::{cmd_generate, cmd_predict, cmd_train, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skycast=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { samples, seed, output } => {
            cmd_generate(samples, seed, &output)?;
        }
        Commands::Train { data, model_dir, seed, n_estimators } => {
            cmd_train(&data, &model_dir, seed, n_estimators)?;
        }
        Commands::Predict { model_dir, input } => {
            cmd_predict(&model_dir, &input)?;
        }
    }

    Ok(())
}
