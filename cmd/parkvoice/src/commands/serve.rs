//! Web form server command.

use clap::Args;

use super::create_service;
use crate::Cli;
use crate::server::{self, AppState};

/// Serve the upload form over HTTP.
#[derive(Args)]
pub struct ServeCommand {
    /// Listen address (overrides config file, e.g. :7860 or 127.0.0.1:8080)
    #[arg(long)]
    addr: Option<String>,
}

impl ServeCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = cli.config()?;
        let service = create_service(&cfg)?;
        let addr = self.addr.as_deref().unwrap_or(&cfg.addr);
        server::serve(addr, AppState::new(service)?, cfg.max_upload_bytes).await
    }
}
