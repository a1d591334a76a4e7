//! perftransform library
//!
//! Discovers transformer plugins declared in YAML manifests and uses them to
//! normalize performance result files (JSON or plain text) into standardized
//! entries ready for aggregation.

pub mod cli;
pub mod config;
pub mod plugin;
pub mod transformer;
pub mod utils;

pub use config::{Config, OutputConfig, OutputFormat, PluginConfig, ProcessingConfig};
pub use perftransform_api::{
    DataPoint, FileData, SourceFile, StandardEntry, Transform, TransformError, TransformFactory,
    TransformResult,
};
pub use plugin::{
    get_transformer, get_transformers, PluginManifest, PluginMetadata, TransformKinds,
    TransformerDefinition, TransformerRegistry,
};
pub use transformer::Transformer;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Transformer used when neither the caller nor the configuration names one
pub const DEFAULT_TRANSFORMER: &str = "standard";

/// Main application context tying configuration and plugins together
pub struct PerfTransform {
    config: Config,
    registry: Arc<TransformerRegistry>,
}

impl PerfTransform {
    /// Create a new instance with the given configuration
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            registry: Arc::new(TransformerRegistry::default()),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> Arc<TransformerRegistry> {
        Arc::clone(&self.registry)
    }

    /// Discover transformers in the configured plugin directories
    pub async fn initialize_plugins(&self) -> Result<()> {
        if !self.config.plugins.enable_external_discovery {
            info!("External plugin discovery is disabled");
            return Ok(());
        }

        for plugin_dir in &self.config.plugins.plugin_directories {
            let expanded_dir = utils::expand_path(plugin_dir)?;
            if expanded_dir.is_dir() {
                info!("Adding plugin directory: {:?}", expanded_dir);
                self.registry.add_plugin_directory(expanded_dir).await;
            } else {
                info!("Plugin directory does not exist, skipping: {:?}", expanded_dir);
            }
        }

        let count = self
            .registry
            .discover()
            .await
            .context("Transformer discovery failed")?;
        info!("Plugin system initialized with {} transformer(s)", count);
        Ok(())
    }

    /// Describe discovered transformers followed by the built-in kinds
    pub async fn transformer_info(&self) -> Vec<TransformerInfo> {
        let mut infos: Vec<TransformerInfo> = self
            .registry
            .get_entries()
            .await
            .into_iter()
            .map(|entry| TransformerInfo {
                name: entry.definition.name.clone(),
                kind: entry.definition.kind.clone(),
                description: entry.definition.description.clone().unwrap_or_default(),
                origin: TransformerOrigin::Plugin {
                    plugin_id: entry.definition.plugin_id.clone().unwrap_or_default(),
                    source: entry.definition.source.clone(),
                    discovered_at: entry.discovered_at,
                },
            })
            .collect();

        let kinds = self.registry.kinds();
        for kind in kinds.list_kinds() {
            let description = kinds
                .get(&kind)
                .map(|factory| factory.description().to_string())
                .unwrap_or_default();
            infos.push(TransformerInfo {
                name: kind.clone(),
                kind: Some(kind),
                description,
                origin: TransformerOrigin::Builtin,
            });
        }

        infos
    }

    /// Build a transformer over `files` using the named transformer
    pub async fn build_transformer(&self, name: &str, files: Vec<PathBuf>) -> Result<Transformer> {
        let definition = self.registry.resolve(name).await?;
        let mut transformer =
            Transformer::new(files).with_custom_transformer(&definition, self.registry.kinds())?;

        if let Some(prefix) = &self.config.processing.prefix {
            transformer = transformer.with_prefix(prefix.clone());
        }

        Ok(transformer)
    }

    /// Normalize result files.
    ///
    /// Arguments left unset fall back to the processing configuration.
    pub async fn process(
        &self,
        transformer: Option<&str>,
        name: Option<&str>,
        files: &[String],
    ) -> Result<ProcessResult> {
        let start_time = Instant::now();

        let transformer_name = transformer
            .or(self.config.processing.transformer.as_deref())
            .unwrap_or(DEFAULT_TRANSFORMER);
        let name = name.unwrap_or(self.config.processing.name.as_str());
        let patterns = if files.is_empty() {
            self.config.processing.files.as_slice()
        } else {
            files
        };

        let files = utils::expand_file_patterns(patterns)?;
        info!(
            "Processing {} file(s) with transformer '{}'",
            files.len(),
            transformer_name
        );

        let files_requested = files.len();
        let transformer = self.build_transformer(transformer_name, files).await?;

        let entries = transformer.process(name)?;

        let processing_time = start_time.elapsed();
        info!(
            "Produced {} entries in {}",
            entries.len(),
            utils::format_duration(processing_time)
        );

        Ok(ProcessResult {
            transformer: transformer_name.to_string(),
            files_requested,
            entries,
            processing_time_ms: processing_time.as_millis() as u64,
        })
    }
}

/// Where a transformer comes from
#[derive(Debug, Clone)]
pub enum TransformerOrigin {
    /// Compiled-in transform kind
    Builtin,

    /// Declared by a plugin manifest
    Plugin {
        plugin_id: String,
        source: PathBuf,
        discovered_at: DateTime<Utc>,
    },
}

/// Transformer description for listings
#[derive(Debug, Clone)]
pub struct TransformerInfo {
    pub name: String,
    pub kind: Option<String>,
    pub description: String,
    pub origin: TransformerOrigin,
}

/// Outcome of a processing run
#[derive(Debug, Clone)]
pub struct ProcessResult {
    pub transformer: String,
    pub files_requested: usize,
    pub entries: Vec<StandardEntry>,
    pub processing_time_ms: u64,
}
