//! Classify recordings from the command line.

use std::path::PathBuf;

use clap::Args;
use parkvoice_detector::{Report, render};
use serde::Serialize;

use super::{check_failures, create_service, output_result, print_error};
use crate::Cli;

/// Classify WAV recordings and print the result for each.
#[derive(Args)]
pub struct PredictCommand {
    /// WAV files to classify
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct FileReport {
    file: String,
    #[serde(flatten)]
    report: Report,
}

impl PredictCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = cli.config()?;
        let service = create_service(&cfg)?;

        let mut failed = 0;
        let mut reports = Vec::with_capacity(self.files.len());
        for path in &self.files {
            let outcome = service.predict_file(path);
            if outcome.is_err() {
                failed += 1;
            }
            if self.json {
                reports.push(FileReport {
                    file: path.display().to_string(),
                    report: Report::new(&outcome),
                });
            } else {
                let text = render(&outcome);
                match outcome {
                    Ok(_) => println!("{}:\n{}\n", path.display(), text),
                    Err(_) => print_error(&format!("{}: {}", path.display(), text)),
                }
            }
        }

        if self.json {
            output_result(&reports, true)?;
        }
        check_failures(failed, self.files.len())
    }
}
