//! Process command implementation

use crate::cli::utils;
use anyhow::{Context, Result};
use clap::{ArgMatches, Command};
use std::path::PathBuf;
use tracing::info;

use crate::OutputFormat;

pub fn command() -> Command {
    Command::new("process")
        .about("Normalize result files into standardized entries")
        .arg(
            clap::Arg::new("transformer")
                .short('t')
                .long("transformer")
                .help("Transformer name, manifest reference (file.yaml:Name) or built-in kind")
                .value_name("NAME"),
        )
        .arg(
            clap::Arg::new("name")
                .short('n')
                .long("name")
                .help("Label stamped on every entry")
                .value_name("LABEL"),
        )
        .arg(
            clap::Arg::new("output")
                .short('o')
                .long("output")
                .help("Write the entries to a file instead of stdout")
                .value_name("FILE"),
        )
        .arg(
            clap::Arg::new("compact")
                .long("compact")
                .help("Emit single line JSON")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(utils::plugin_dir_arg())
        .arg(
            clap::Arg::new("FILES")
                .help("Result files or glob patterns")
                .num_args(0..),
        )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let app = utils::create_app(matches, utils::plugin_dirs(matches)).await?;

    let files: Vec<String> = matches
        .get_many::<String>("FILES")
        .map(|files| files.cloned().collect())
        .unwrap_or_default();

    let result = app
        .process(
            matches.get_one::<String>("transformer").map(String::as_str),
            matches.get_one::<String>("name").map(String::as_str),
            &files,
        )
        .await?;

    let output = &app.config().output;
    let format = if matches.get_flag("compact") {
        OutputFormat::Compact
    } else {
        output.format
    };
    let rendered = format.render(&result.entries)?;

    let output_path = matches
        .get_one::<String>("output")
        .map(PathBuf::from)
        .or_else(|| output.path.clone());

    match output_path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                crate::utils::ensure_directory(parent)?;
            }
            tokio::fs::write(&path, rendered)
                .await
                .with_context(|| format!("Failed to write {:?}", path))?;
            info!(
                "Wrote {} entries from {} file(s) to {:?}",
                result.entries.len(),
                result.files_requested,
                path
            );
        }
        None => println!("{}", rendered),
    }

    Ok(())
}
