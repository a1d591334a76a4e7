//! Transform traits implemented by every transform kind

use crate::data::{SourceFile, StandardEntry};
use crate::error::TransformResult;

/// Normalizes the contents of a result file into standardized entries
pub trait Transform: Send + Sync {
    /// Transform one opened file
    fn transform(&self, file: &SourceFile) -> TransformResult<Vec<StandardEntry>>;

    /// Merge the entries produced for all files.
    ///
    /// The default keeps the entries as they are, in file order.
    fn merge(&self, entries: Vec<StandardEntry>) -> Vec<StandardEntry> {
        entries
    }
}

/// Factory creating transforms of one kind from plugin options
pub trait TransformFactory: Send + Sync {
    /// Kind identifier referenced by plugin manifests
    fn kind(&self) -> &str;

    /// Short human readable description
    fn description(&self) -> &str {
        ""
    }

    /// Create a transform, validating the options
    fn create(&self, options: &serde_yaml::Value) -> TransformResult<Box<dyn Transform>>;
}
