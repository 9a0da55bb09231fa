//! Utility functions for CLI commands.

use std::sync::Arc;

use anyhow::Context;
use parkvoice_detector::PredictionService;
use parkvoice_model::ModelStore;
use parkvoice_phonation::FeatureExtractor;

use crate::config::Config;

/// Loads both artifacts and builds the prediction service.
pub fn create_service(cfg: &Config) -> anyhow::Result<PredictionService> {
    let store = ModelStore::load(&cfg.model_path, &cfg.scaler_path)
        .context("failed to load model artifacts")?;
    Ok(PredictionService::new(
        Arc::new(store),
        FeatureExtractor::new(cfg.analysis.clone()),
    ))
}

/// Outputs result as JSON or YAML.
pub fn output_result<T: serde::Serialize>(result: &T, as_json: bool) -> anyhow::Result<()> {
    let output = if as_json {
        serde_json::to_string_pretty(result)? + "\n"
    } else {
        serde_yaml::to_string(result)?
    };
    print!("{}", output);
    Ok(())
}

/// Prints error message.
pub fn print_error(msg: &str) {
    eprintln!("\x1b[31m✗\x1b[0m {}", msg);
}

/// Fails the command when any input failed.
pub fn check_failures(failed: usize, total: usize) -> anyhow::Result<()> {
    if failed > 0 {
        anyhow::bail!("{failed} of {total} files failed");
    }
    Ok(())
}
