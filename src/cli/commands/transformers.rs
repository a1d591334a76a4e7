//! Transformer listing commands

use crate::cli::utils;
use crate::{TransformerInfo, TransformerOrigin};
use anyhow::Result;
use clap::{ArgMatches, Command};

/// Create the transformers command
pub fn command() -> Command {
    Command::new("transformers")
        .about("Inspect available transformers")
        .subcommand_required(true)
        .subcommand(
            Command::new("list")
                .about("List discovered transformers and built-in kinds")
                .arg(
                    clap::Arg::new("detailed")
                        .short('d')
                        .long("detailed")
                        .help("Show detailed information")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(clap::arg!(--kind <KIND> "Filter by transform kind"))
                .arg(utils::plugin_dir_arg()),
        )
        .subcommand(
            Command::new("info")
                .about("Show transformer information")
                .arg(clap::arg!(<NAME> "Transformer name"))
                .arg(utils::plugin_dir_arg()),
        )
}

/// Run transformers command
pub async fn run(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("list", sub_matches)) => run_list(sub_matches).await,
        Some(("info", sub_matches)) => run_info(sub_matches).await,
        _ => {
            let _ = command().print_help();
            Ok(())
        }
    }
}

async fn run_list(matches: &ArgMatches) -> Result<()> {
    let app = utils::create_app(matches, utils::plugin_dirs(matches)).await?;
    let mut transformers = app.transformer_info().await;

    if let Some(kind) = matches.get_one::<String>("kind") {
        transformers.retain(|t| t.kind.as_deref() == Some(kind.as_str()));
    }

    if transformers.is_empty() {
        println!("No transformers found.");
        return Ok(());
    }

    println!("Available transformers:");
    println!();

    let detailed = matches.get_flag("detailed");
    for transformer in &transformers {
        println!(
            "  {} ({})",
            transformer.name,
            transformer.kind.as_deref().unwrap_or("no kind")
        );
        if !transformer.description.is_empty() {
            println!("    Description: {}", transformer.description);
        }
        if detailed {
            print_origin(transformer);
        }
    }

    Ok(())
}

async fn run_info(matches: &ArgMatches) -> Result<()> {
    let app = utils::create_app(matches, utils::plugin_dirs(matches)).await?;
    let Some(name) = matches.get_one::<String>("NAME") else {
        let _ = command().print_help();
        return Ok(());
    };

    let transformers = app.transformer_info().await;
    let Some(transformer) = transformers.iter().find(|t| &t.name == name) else {
        println!("Transformer '{}' not found.", name);
        return Ok(());
    };

    println!("Transformer Information:");
    println!("  Name: {}", transformer.name);
    println!("  Kind: {}", transformer.kind.as_deref().unwrap_or("none"));
    println!("  Description: {}", transformer.description);
    print_origin(transformer);

    if let Some(entry) = app.registry().get_entry(name).await {
        if !entry.definition.options.is_null() {
            println!("  Options:");
            for line in serde_yaml::to_string(&entry.definition.options)?.lines() {
                println!("    {}", line);
            }
        }
        match app.registry().kinds().build(&entry.definition) {
            Ok(_) => println!("  Status: valid"),
            Err(e) => println!("  Status: invalid ({})", e),
        }
    }

    Ok(())
}

fn print_origin(transformer: &TransformerInfo) {
    match &transformer.origin {
        TransformerOrigin::Builtin => println!("    Origin: built-in"),
        TransformerOrigin::Plugin {
            plugin_id,
            source,
            discovered_at,
        } => {
            println!("    Origin: plugin '{}'", plugin_id);
            println!("    Manifest: {}", source.display());
            println!("    Discovered: {}", discovered_at.to_rfc3339());
        }
    }
}
