// Copyright 2026 Steamwish Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::Parser;

use steamwish::config::{Cli, Config, Source};
use steamwish::export;
use steamwish::steam::StoreClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Diagnostics go to stderr; stdout carries nothing but the export.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = run(cli).await;

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }

    result
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::resolve(cli)?;

    let cookie = match &config.source {
        Source::Fetch { cookie, .. } => cookie.clone(),
        Source::Load(_) => None,
    };
    let client = StoreClient::new(cookie);

    let rendered = export::run(&config, &client).await?;
    print!("{rendered}");
    Ok(())
}
