//! Transformer plugins: manifests, transform kinds and discovery

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use perftransform_api::{Transform, TransformError, TransformFactory, TransformResult};

pub mod builtin;
pub mod registry;

pub use builtin::*;
pub use registry::*;

/// Plugin identifier
pub type PluginId = String;

/// Plugin metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginMetadata {
    /// Plugin identifier
    pub id: PluginId,

    /// Plugin name
    #[serde(default)]
    pub name: String,

    /// Plugin version
    #[serde(default)]
    pub version: String,

    /// Plugin description
    #[serde(default)]
    pub description: String,
}

/// A transformer declared by a plugin manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformerDefinition {
    /// Name the transformer is registered under
    pub name: String,

    /// Transform kind implementing it
    #[serde(default)]
    pub kind: Option<String>,

    /// Description
    #[serde(default)]
    pub description: Option<String>,

    /// Kind-specific options
    #[serde(default)]
    pub options: serde_yaml::Value,

    /// Manifest the transformer was loaded from
    #[serde(skip)]
    pub source: PathBuf,

    /// Plugin declaring the transformer
    #[serde(skip)]
    pub plugin_id: Option<PluginId>,
}

impl TransformerDefinition {
    /// Definition of a built-in kind used directly by name
    pub fn builtin(kind: &str) -> Self {
        Self {
            name: kind.to_string(),
            kind: Some(kind.to_string()),
            description: None,
            options: serde_yaml::Value::Null,
            source: PathBuf::new(),
            plugin_id: None,
        }
    }
}

/// Plugin manifest file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginManifest {
    /// Plugin metadata
    pub metadata: PluginMetadata,

    /// Transformers declared by the plugin
    #[serde(default)]
    pub transformers: Vec<TransformerDefinition>,
}

impl PluginManifest {
    /// Parse a manifest, attaching its origin to every transformer
    pub fn parse(content: &str, path: &Path) -> TransformResult<Self> {
        let mut manifest: PluginManifest =
            serde_yaml::from_str(content).map_err(|source| TransformError::Manifest {
                path: path.to_path_buf(),
                source,
            })?;

        for transformer in &mut manifest.transformers {
            transformer.source = path.to_path_buf();
            transformer.plugin_id = Some(manifest.metadata.id.clone());
        }

        Ok(manifest)
    }

    /// Load a manifest file
    pub async fn load(path: &Path) -> TransformResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| TransformError::io(path, e))?;
        Self::parse(&content, path)
    }
}

/// Registry of transform kinds a definition can refer to
#[derive(Clone)]
pub struct TransformKinds {
    factories: HashMap<String, Arc<dyn TransformFactory>>,
}

impl TransformKinds {
    /// Create an empty kind registry
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Create a registry holding every built-in kind
    pub fn with_builtins() -> Self {
        let mut kinds = Self::new();
        for factory in builtin::builtin_factories() {
            kinds.register(factory);
        }
        kinds
    }

    /// Register a transform factory
    pub fn register(&mut self, factory: Arc<dyn TransformFactory>) {
        let kind = factory.kind().to_string();
        debug!("Registering transform kind: {}", kind);
        self.factories.insert(kind, factory);
    }

    /// Get a factory by kind
    pub fn get(&self, kind: &str) -> Option<Arc<dyn TransformFactory>> {
        self.factories.get(kind).cloned()
    }

    /// Whether a kind is registered
    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Registered kinds, sorted
    pub fn list_kinds(&self) -> Vec<String> {
        let mut kinds: Vec<String> = self.factories.keys().cloned().collect();
        kinds.sort();
        kinds
    }

    /// Validate a definition's shape and build its transform
    pub fn build(&self, definition: &TransformerDefinition) -> TransformResult<Arc<dyn Transform>> {
        let invalid = |reason: String| TransformError::InvalidTransform {
            name: definition.name.clone(),
            reason,
        };

        let kind = definition
            .kind
            .as_deref()
            .ok_or_else(|| invalid("no transform kind declared".to_string()))?;

        let factory = self
            .get(kind)
            .ok_or_else(|| invalid(format!("unknown transform kind '{}'", kind)))?;

        let transform = factory
            .create(&definition.options)
            .map_err(|e| invalid(e.to_string()))?;

        Ok(Arc::from(transform))
    }
}

impl Default for TransformKinds {
    fn default() -> Self {
        Self::with_builtins()
    }
}
