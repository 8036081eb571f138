mod config;
mod error;
mod output;
mod source;
mod target;
mod translate;

use std::path::Path;
use std::str::FromStr;

use tracing::{error, info};

use crate::error::Error;
use crate::source::client::SourceClient;

#[tokio::main]
async fn main() {
    init_tracing();

    // Credential check happens before any network call.
    let config = match config::Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("Please provide LAUNCHDARKLY_API_KEY");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&config).await {
        error!("migration failed: {e}");
        std::process::exit(1);
    }
}

async fn run(config: &config::Config) -> Result<(), Error> {
    let client = SourceClient::new(config)?;

    let flags = client.list_flags().await?;
    info!(count = flags.len(), project = %config.project, "fetched flag list");

    let documents = translate::run(&client, &flags).await?;

    for document in &documents {
        output::write_document(document, Path::new("."))?;
    }

    info!(environments = documents.len(), "migration complete");
    Ok(())
}

fn init_tracing() {
    let env = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let filter = tracing_subscriber::EnvFilter::from_str(&env)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).init();
}
