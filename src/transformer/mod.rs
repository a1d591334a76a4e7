//! Normalizes result files into standardized entries

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info_span, warn};

use crate::plugin::{StandardTransform, TransformKinds, TransformerDefinition};
use perftransform_api::{
    FileData, SourceFile, StandardEntry, Transform, TransformError, TransformResult,
};

#[cfg(test)]
mod tests;

/// Reads result files and runs them through a transform
#[derive(Clone)]
pub struct Transformer {
    files: Vec<PathBuf>,
    custom_transformer: Option<Arc<dyn Transform>>,
    prefix: Option<String>,
}

impl Transformer {
    /// Create a transformer over the given files
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self {
            files,
            custom_transformer: None,
            prefix: None,
        }
    }

    /// Install the transform declared by a plugin definition.
    ///
    /// Fails with `InvalidTransform` when the definition does not resolve to a
    /// usable transform.
    pub fn with_custom_transformer(
        mut self,
        definition: &TransformerDefinition,
        kinds: &TransformKinds,
    ) -> TransformResult<Self> {
        self.custom_transformer = Some(kinds.build(definition)?);
        Ok(self)
    }

    /// Install an already built transform
    pub fn with_transform(mut self, transform: Arc<dyn Transform>) -> Self {
        self.custom_transformer = Some(transform);
        self
    }

    /// Label attached to log output while processing
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn set_files(&mut self, files: Vec<PathBuf>) {
        self.files = files;
    }

    /// Read a file: `.json` files are parsed, anything else is split into lines
    pub fn open_data(&self, path: &Path) -> TransformResult<FileData> {
        let content = fs::read_to_string(path).map_err(|e| TransformError::io(path, e))?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            let value = serde_json::from_str(&content).map_err(|source| TransformError::Json {
                path: path.to_path_buf(),
                source,
            })?;
            return Ok(FileData::Json(value));
        }

        Ok(FileData::Lines(content.lines().map(str::to_string).collect()))
    }

    /// Transform every file and stamp the merged entries with `name`.
    ///
    /// Missing files are skipped. Without a custom transform the input is
    /// expected to already be in the standard format.
    pub fn process(&self, name: &str) -> TransformResult<Vec<StandardEntry>> {
        let prefix = self.prefix.as_deref().unwrap_or("");
        let span = info_span!("process", label = name, prefix = prefix);
        let _guard = span.enter();

        let fallback: Arc<dyn Transform> = Arc::new(StandardTransform);
        let transform = self.custom_transformer.as_ref().unwrap_or(&fallback);

        let mut entries = Vec::new();
        let mut index = 0;

        for path in &self.files {
            if !path.exists() {
                warn!("Skipping missing file: {:?}", path);
                continue;
            }

            let file = SourceFile {
                index,
                path: path.clone(),
                data: self.open_data(path)?,
            };
            let produced = transform.transform(&file)?;
            debug!("{:?} produced {} entries", path, produced.len());

            entries.extend(produced);
            index += 1;
        }

        if index == 0 {
            warn!("No files could be read");
        }

        let mut merged = transform.merge(entries);
        for entry in &mut merged {
            entry.name = name.to_string();
        }

        Ok(merged)
    }
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl std::fmt::Debug for Transformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transformer")
            .field("files", &self.files)
            .field("custom_transformer", &self.custom_transformer.is_some())
            .field("prefix", &self.prefix)
            .finish()
    }
}
