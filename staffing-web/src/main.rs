use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

mod api;
mod cli;
mod config;
mod store;
mod transfer;
mod web;

use api::SheetsClient;
use cli::{Cli, Commands};
use config::Config;
use store::TableStore;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = Config::from_env(cli.overrides()).context("Invalid configuration")?;
    let key = config.load_service_account()?;

    let client = SheetsClient::new(key, config.spreadsheet_id.clone(), config.request_timeout)
        .context("Failed to create spreadsheet client")?;
    log::info!(
        "Using spreadsheet {} as {}",
        config.spreadsheet_id,
        client.service_account()
    );

    match client.missing_tables().await {
        Ok(missing) => {
            for table in missing {
                log::warn!(
                    "Worksheet '{}' not found; requests touching it will fail",
                    table
                );
            }
        }
        Err(e) => log::warn!("Could not check worksheets: {}", e),
    }

    let store: Arc<dyn TableStore> = Arc::new(client);

    match cli.command() {
        Commands::Serve { .. } => web::serve(config.bind, store).await,
        Commands::Export { output } => export(store.as_ref(), &output).await,
        Commands::Import { file } => import(store.as_ref(), &file).await,
    }
}

async fn export(store: &dyn TableStore, output: &Path) -> Result<()> {
    let buffer = transfer::export_workbook(store).await?;
    std::fs::write(output, &buffer)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Exported {} bytes to {}", buffer.len(), output.display());
    Ok(())
}

async fn import(store: &dyn TableStore, file: &Path) -> Result<()> {
    let data =
        std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let outcome = transfer::import_assignments(store, &data).await?;

    println!(
        "Imported {} assignment(s), skipped {} incomplete row(s)",
        outcome.appended, outcome.skipped
    );
    Ok(())
}
