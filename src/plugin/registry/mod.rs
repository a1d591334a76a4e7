//! Transformer discovery and registration

use chrono::{DateTime, Utc};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::{PluginManifest, TransformKinds, TransformerDefinition};
use perftransform_api::{Transform, TransformError, TransformResult};


/// Whether a file looks like a plugin manifest
pub fn is_manifest(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| {
            ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml")
        })
}

/// Insert definitions, refusing a name that is already registered
fn insert_unique(
    found: &mut BTreeMap<String, TransformerDefinition>,
    definitions: Vec<TransformerDefinition>,
) -> TransformResult<()> {
    for definition in definitions {
        match found.entry(definition.name.clone()) {
            Entry::Occupied(existing) => {
                return Err(TransformError::DuplicateTransforms {
                    name: definition.name,
                    first: existing.get().source.clone(),
                    second: definition.source,
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(definition);
            }
        }
    }
    Ok(())
}

/// Collect the transformers declared by the manifests of a directory.
///
/// Only the top level of `dirpath` is scanned, in file name order. Fails when
/// `dirpath` is not a directory, when a manifest cannot be parsed, or when a
/// transformer name is declared twice. Definitions the built-in kinds cannot
/// build are skipped.
pub async fn get_transformers(
    dirpath: impl AsRef<Path>,
) -> TransformResult<BTreeMap<String, TransformerDefinition>> {
    get_transformers_with_kinds(dirpath, &TransformKinds::with_builtins()).await
}

/// Collect the transformers of a directory, validated against `kinds`
pub async fn get_transformers_with_kinds(
    dirpath: impl AsRef<Path>,
    kinds: &TransformKinds,
) -> TransformResult<BTreeMap<String, TransformerDefinition>> {
    let dirpath = dirpath.as_ref();
    if !dirpath.is_dir() {
        return Err(TransformError::InvalidPath(dirpath.to_path_buf()));
    }

    info!("Scanning transformer directory: {:?}", dirpath);

    let mut found = BTreeMap::new();

    for entry in WalkDir::new(dirpath)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        if !is_manifest(path) {
            debug!("Skipping non-manifest file: {:?}", path);
            continue;
        }

        let manifest = PluginManifest::load(path).await?;
        debug!(
            "Loaded plugin '{}' with {} transformer(s) from {:?}",
            manifest.metadata.id,
            manifest.transformers.len(),
            path
        );

        let valid = manifest
            .transformers
            .into_iter()
            .filter(|definition| match kinds.build(definition) {
                Ok(_) => true,
                Err(e) => {
                    warn!("Ignoring transformer in {:?}: {}", path, e);
                    false
                }
            })
            .collect();
        insert_unique(&mut found, valid)?;
    }

    info!("Found {} transformer(s) in {:?}", found.len(), dirpath);
    Ok(found)
}

/// Resolve a single transformer.
///
/// `path/to/manifest.yaml:Name` loads `Name` from that manifest; anything else
/// is looked up as a built-in transform kind.
pub async fn get_transformer(
    spec: &str,
    kinds: &TransformKinds,
) -> TransformResult<TransformerDefinition> {
    if let Some((path, name)) = spec.rsplit_once(':') {
        let path = Path::new(path);
        if is_manifest(path) {
            let manifest = PluginManifest::load(path).await?;
            return manifest
                .transformers
                .into_iter()
                .find(|t| t.name == name)
                .ok_or_else(|| TransformError::UnknownTransformer(spec.to_string()));
        }
    }

    if kinds.contains(spec) {
        return Ok(TransformerDefinition::builtin(spec));
    }

    Err(TransformError::UnknownTransformer(spec.to_string()))
}

/// Registry entry for a discovered transformer
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    /// Transformer definition
    pub definition: TransformerDefinition,

    /// Directory it was discovered in
    pub directory: PathBuf,

    /// Discovery timestamp
    pub discovered_at: DateTime<Utc>,
}

/// Registry of transformers discovered across plugin directories
pub struct TransformerRegistry {
    /// Discovered transformers
    entries: Arc<RwLock<BTreeMap<String, RegistryEntry>>>,

    /// Plugin directories
    plugin_dirs: Arc<RwLock<Vec<PathBuf>>>,

    /// Transform kinds definitions are built with
    kinds: TransformKinds,
}

impl TransformerRegistry {
    /// Create a registry using the given kinds
    pub fn new(kinds: TransformKinds) -> Self {
        Self {
            entries: Arc::new(RwLock::new(BTreeMap::new())),
            plugin_dirs: Arc::new(RwLock::new(Vec::new())),
            kinds,
        }
    }

    /// Transform kinds
    pub fn kinds(&self) -> &TransformKinds {
        &self.kinds
    }

    /// Add a plugin directory, ignoring one already registered
    pub async fn add_plugin_directory(&self, dir: PathBuf) {
        let mut plugin_dirs = self.plugin_dirs.write().await;
        if !plugin_dirs.contains(&dir) {
            plugin_dirs.push(dir);
        }
    }

    /// Registered plugin directories
    pub async fn plugin_directories(&self) -> Vec<PathBuf> {
        self.plugin_dirs.read().await.clone()
    }

    /// Discover transformers in every registered directory.
    ///
    /// Directories resolving to the same location are scanned once. Names
    /// must be unique across directories. Returns the number of transformers
    /// registered.
    pub async fn discover(&self) -> TransformResult<usize> {
        let plugin_dirs = self.plugin_dirs.read().await.clone();
        let mut all = BTreeMap::new();
        let mut origin: BTreeMap<String, PathBuf> = BTreeMap::new();
        let mut scanned = HashSet::new();

        for dir in &plugin_dirs {
            let canonical = tokio::fs::canonicalize(dir)
                .await
                .unwrap_or_else(|_| dir.clone());
            if !scanned.insert(canonical) {
                debug!("Plugin directory already scanned: {:?}", dir);
                continue;
            }

            let found = get_transformers_with_kinds(dir, &self.kinds).await?;
            for name in found.keys() {
                origin.insert(name.clone(), dir.clone());
            }
            insert_unique(&mut all, found.into_values().collect())?;
        }

        let now = Utc::now();
        let mut entries = self.entries.write().await;
        entries.clear();
        for (name, definition) in all {
            let directory = origin.remove(&name).unwrap_or_default();
            entries.insert(
                name,
                RegistryEntry {
                    definition,
                    directory,
                    discovered_at: now,
                },
            );
        }

        info!("Registered {} transformer(s)", entries.len());
        Ok(entries.len())
    }

    /// All discovered transformers, ordered by name
    pub async fn get_entries(&self) -> Vec<RegistryEntry> {
        self.entries.read().await.values().cloned().collect()
    }

    /// Get a discovered transformer by name
    pub async fn get_entry(&self, name: &str) -> Option<RegistryEntry> {
        self.entries.read().await.get(name).cloned()
    }

    /// Resolve a transformer definition.
    ///
    /// Discovered transformers shadow built-in kinds; manifest references
    /// (`file.yaml:Name`) are loaded directly.
    pub async fn resolve(&self, name: &str) -> TransformResult<TransformerDefinition> {
        if let Some(entry) = self.get_entry(name).await {
            return Ok(entry.definition);
        }
        get_transformer(name, &self.kinds).await
    }

    /// Resolve and build a transform
    pub async fn build(&self, name: &str) -> TransformResult<Arc<dyn Transform>> {
        let definition = self.resolve(name).await?;
        self.kinds.build(&definition)
    }
}

impl Default for TransformerRegistry {
    fn default() -> Self {
        Self::new(TransformKinds::with_builtins())
    }
}
