//! Pass-through kind for files already in the standard format

use perftransform_api::{
    SourceFile, StandardEntry, Transform, TransformError, TransformFactory, TransformResult,
};

pub const KIND: &str = "standard";

/// Accepts one standard entry or an array of them
pub struct StandardTransform;

impl Transform for StandardTransform {
    fn transform(&self, file: &SourceFile) -> TransformResult<Vec<StandardEntry>> {
        let value = file
            .data
            .as_json()
            .ok_or_else(|| TransformError::unsupported(&file.path, "expected a JSON document"))?;

        let entries = if value.is_array() {
            serde_json::from_value::<Vec<StandardEntry>>(value.clone())
        } else {
            serde_json::from_value::<StandardEntry>(value.clone()).map(|entry| vec![entry])
        };

        entries.map_err(|source| TransformError::Json {
            path: file.path.clone(),
            source,
        })
    }
}

/// Factory for [`StandardTransform`]
pub struct StandardFactory;

impl TransformFactory for StandardFactory {
    fn kind(&self) -> &str {
        KIND
    }

    fn description(&self) -> &str {
        "JSON files already holding standardized entries"
    }

    fn create(&self, options: &serde_yaml::Value) -> TransformResult<Box<dyn Transform>> {
        let empty = options.as_mapping().map_or(false, |m| m.is_empty());
        if !options.is_null() && !empty {
            return Err(TransformError::invalid_options(KIND, "takes no options"));
        }
        Ok(Box::new(StandardTransform))
    }
}
