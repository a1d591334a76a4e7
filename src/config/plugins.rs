//! Plugin discovery configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::utils::get_config_dir;

/// Plugin configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Directories scanned for transformer manifests
    pub plugin_directories: Vec<PathBuf>,

    /// Whether to scan the plugin directories at all
    pub enable_external_discovery: bool,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            plugin_directories: default_plugin_directories(),
            enable_external_discovery: true,
        }
    }
}

/// `./transformers` and the user config directory
fn default_plugin_directories() -> Vec<PathBuf> {
    let mut dirs = vec![PathBuf::from("./transformers")];
    if let Ok(config_dir) = get_config_dir() {
        dirs.push(config_dir.join("transformers"));
    }
    dirs
}
