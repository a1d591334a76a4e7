//! Validate command implementation

use crate::cli::utils;
use anyhow::Result;
use clap::{ArgMatches, Command};
use tracing::info;

pub fn command() -> Command {
    Command::new("validate")
        .about("Validate the configuration and the transformer plugins it points to")
        .arg(utils::plugin_dir_arg())
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    info!("Validating configuration file");

    let app = utils::create_app(matches, utils::plugin_dirs(matches)).await?;
    let config = app.config();

    println!("Configuration is valid!");
    println!("Version: {}", config.version);
    println!(
        "Transformer: {}",
        config
            .processing
            .transformer
            .as_deref()
            .unwrap_or(crate::DEFAULT_TRANSFORMER)
    );
    println!("Plugin directories:");
    for dir in app.registry().plugin_directories().await {
        println!("  - {}", dir.display());
    }

    let entries = app.registry().get_entries().await;
    println!("Discovered transformers: {}", entries.len());
    for entry in &entries {
        match app.registry().kinds().build(&entry.definition) {
            Ok(_) => println!("  - {} (ok)", entry.definition.name),
            Err(e) => println!("  - {} (invalid: {})", entry.definition.name, e),
        }
    }

    if let Some(transformer) = &config.processing.transformer {
        app.registry().build(transformer).await?;
    }

    Ok(())
}
