//! CLI command implementations

use anyhow::Result;
use clap::{ArgMatches, Command};

pub mod commands;

/// Main CLI application
pub struct CliApp;

impl CliApp {
    /// Create the CLI application
    pub fn app() -> Command {
        Command::new("perftransform")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Normalize performance result files with transformer plugins")
            .arg(
                clap::Arg::new("config")
                    .short('c')
                    .long("config")
                    .help("Configuration file")
                    .value_name("FILE")
                    .global(true),
            )
            .subcommand(commands::init::command())
            .subcommand(commands::transformers::command())
            .subcommand(commands::process::command())
            .subcommand(commands::validate::command())
    }

    /// Run the CLI application
    pub async fn run(matches: &ArgMatches) -> Result<()> {
        match matches.subcommand() {
            Some(("init", sub_matches)) => commands::init::run(sub_matches).await,
            Some(("transformers", sub_matches)) => commands::transformers::run(sub_matches).await,
            Some(("process", sub_matches)) => commands::process::run(sub_matches).await,
            Some(("validate", sub_matches)) => commands::validate::run(sub_matches).await,
            _ => {
                // No subcommand provided, show help
                let _ = Self::app().print_help();
                Ok(())
            }
        }
    }
}

/// Common CLI utilities
pub mod utils {
    use anyhow::Result;
    use std::path::PathBuf;
    use tracing::debug;

    use crate::config::DEFAULT_CONFIG_FILES;

    /// Configuration path given with `--config`, or the first default file found
    pub fn find_config_path(matches: &clap::ArgMatches) -> Option<PathBuf> {
        if let Some(config_path) = matches.get_one::<String>("config") {
            return Some(PathBuf::from(config_path));
        }

        DEFAULT_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Load configuration, falling back to the defaults when no file exists
    pub fn load_config(matches: &clap::ArgMatches) -> Result<crate::Config> {
        match find_config_path(matches) {
            Some(path) => crate::Config::from_file(&path),
            None => {
                debug!("No configuration file found, using defaults");
                Ok(crate::Config::default())
            }
        }
    }

    /// Create a PerfTransform instance with extra plugin directories and
    /// discover its transformers
    pub async fn create_app(
        matches: &clap::ArgMatches,
        extra_plugin_dirs: Vec<PathBuf>,
    ) -> Result<crate::PerfTransform> {
        let mut config = load_config(matches)?;
        if !extra_plugin_dirs.is_empty() {
            config.plugins.enable_external_discovery = true;
            config.plugins.plugin_directories.extend(extra_plugin_dirs);
        }

        let app = crate::PerfTransform::new(config)?;
        app.initialize_plugins().await?;
        Ok(app)
    }

    /// Values of a repeatable `--plugin-dir` argument
    pub fn plugin_dirs(matches: &clap::ArgMatches) -> Vec<PathBuf> {
        matches
            .get_many::<String>("plugin_dir")
            .map(|dirs| dirs.map(PathBuf::from).collect())
            .unwrap_or_default()
    }

    /// `--plugin-dir` argument definition
    pub fn plugin_dir_arg() -> clap::Arg {
        clap::Arg::new("plugin_dir")
            .long("plugin-dir")
            .help("Additional directory to scan for transformer manifests")
            .value_name("DIR")
            .action(clap::ArgAction::Append)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_parses_process() {
        let matches = CliApp::app()
            .try_get_matches_from([
                "perftransform",
                "process",
                "--transformer",
                "perfherder",
                "--plugin-dir",
                "a",
                "--plugin-dir",
                "b",
                "run1.json",
                "run2.json",
            ])
            .unwrap();

        let (name, sub_matches) = matches.subcommand().unwrap();
        assert_eq!(name, "process");
        assert_eq!(
            sub_matches.get_one::<String>("transformer").map(String::as_str),
            Some("perfherder")
        );
        assert_eq!(utils::plugin_dirs(sub_matches).len(), 2);
        assert_eq!(sub_matches.get_many::<String>("FILES").unwrap().count(), 2);
    }

    #[test]
    fn test_app_global_config() {
        let matches = CliApp::app()
            .try_get_matches_from(["perftransform", "transformers", "list", "--config", "x.yaml"])
            .unwrap();
        let (_, sub_matches) = matches.subcommand().unwrap();
        let (_, list_matches) = sub_matches.subcommand().unwrap();
        assert_eq!(
            utils::find_config_path(list_matches),
            Some(std::path::PathBuf::from("x.yaml"))
        );
    }

    #[test]
    fn test_app_requires_transformer_name_for_info() {
        let result =
            CliApp::app().try_get_matches_from(["perftransform", "transformers", "info"]);
        assert!(result.is_err());
    }
}
