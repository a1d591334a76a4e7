//! Processing configuration

use anyhow::{anyhow, Result};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// What to transform and how to label it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Transformer name, manifest reference or built-in kind
    pub transformer: Option<String>,

    /// Label stamped on every produced entry
    pub name: String,

    /// Label attached to log output
    pub prefix: Option<String>,

    /// Result files or glob patterns
    #[serde(deserialize_with = "deserialize_files")]
    pub files: Vec<String>,
}

impl ProcessingConfig {
    pub fn validate(&self) -> Result<()> {
        if matches!(self.transformer.as_deref(), Some(t) if t.trim().is_empty()) {
            return Err(anyhow!("Transformer name cannot be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(anyhow!("Processing name cannot be empty"));
        }
        Ok(())
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            transformer: None,
            name: "results".to_string(),
            prefix: None,
            files: Vec::new(),
        }
    }
}

/// Accept only a list of paths; anything else leaves the list empty
fn deserialize_files<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_yaml::Value::deserialize(deserializer)?;

    match value {
        serde_yaml::Value::Null => Ok(Vec::new()),
        serde_yaml::Value::Sequence(items) => Ok(items
            .into_iter()
            .filter_map(|item| match item {
                serde_yaml::Value::String(path) => Some(path),
                other => {
                    warn!("Ignoring non-string entry in `files`: {:?}", other);
                    None
                }
            })
            .collect()),
        other => {
            warn!("`files` must be a list, got {:?}", other);
            Ok(Vec::new())
        }
    }
}
