//! Parkinson's voice detector: web form and command line.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod server;

use commands::{FeaturesCommand, PredictCommand, ServeCommand};
use config::Config;

/// Screens a sustained vowel recording for acoustic markers of Parkinson's
/// disease.
///
/// Model and scaler artifacts are loaded once at startup; their paths come
/// from the config file and can be overridden with --model and --scaler.
#[derive(Parser)]
#[command(name = "parkvoice")]
#[command(about = "Parkinson's disease voice detector")]
#[command(version)]
pub struct Cli {
    /// Config file (YAML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Classifier artifact (overrides config file)
    #[arg(long, global = true)]
    pub model: Option<PathBuf>,

    /// Scaler artifact (overrides config file)
    #[arg(long, global = true)]
    pub scaler: Option<PathBuf>,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web form
    Serve(ServeCommand),
    /// Classify one or more recordings
    Predict(PredictCommand),
    /// Print the acoustic features of one or more recordings
    Features(FeaturesCommand),
}

impl Cli {
    /// Loads the config file and applies command line overrides.
    pub fn config(&self) -> anyhow::Result<Config> {
        let mut cfg = Config::load(self.config.as_deref())?;
        if let Some(model) = &self.model {
            cfg.model_path = model.clone();
        }
        if let Some(scaler) = &self.scaler {
            cfg.scaler_path = scaler.clone();
        }
        Ok(cfg)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Serve(cmd) => cmd.run(&cli).await,
        Commands::Predict(cmd) => cmd.run(&cli),
        Commands::Features(cmd) => cmd.run(&cli),
    }
}
