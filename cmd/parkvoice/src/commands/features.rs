//! Print extracted features without a model.

use std::path::PathBuf;

use clap::Args;
use parkvoice_phonation::{FeatureExtractor, FeatureVector};
use serde::Serialize;

use super::{check_failures, output_result, print_error};
use crate::Cli;

/// Extract the 17 acoustic features from WAV recordings.
#[derive(Args)]
pub struct FeaturesCommand {
    /// WAV files to analyze
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output as JSON instead of YAML
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct FileFeatures {
    file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    features: Option<FeatureVector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl FeaturesCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = cli.config()?;
        let extractor = FeatureExtractor::new(cfg.analysis);

        let mut failed = 0;
        let mut results = Vec::with_capacity(self.files.len());
        for path in &self.files {
            let file = path.display().to_string();
            match extractor.extract_file(path) {
                Ok(features) => results.push(FileFeatures {
                    file,
                    features: Some(features),
                    error: None,
                }),
                Err(e) => {
                    failed += 1;
                    print_error(&format!("{file}: {e}"));
                    results.push(FileFeatures {
                        file,
                        features: None,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        output_result(&results, self.json)?;
        check_failures(failed, self.files.len())
    }
}
