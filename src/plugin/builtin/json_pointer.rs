//! Extract measurements at a JSON pointer

use serde::{Deserialize, Serialize};

use super::{as_number, parse_options};
use perftransform_api::{
    merge_by_subtest, DataPoint, SourceFile, StandardEntry, Transform, TransformError,
    TransformFactory, TransformResult,
};

pub const KIND: &str = "json-pointer";

/// JSON pointer transform options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JsonPointerOptions {
    /// RFC 6901 pointer to the measurements
    pub pointer: String,

    /// Subtest used for numbers and arrays
    #[serde(default)]
    pub subtest: Option<String>,
}

/// Reads a number, an array of numbers, or an object of named measurements
pub struct JsonPointerTransform {
    options: JsonPointerOptions,
}

impl JsonPointerTransform {
    pub fn new(options: JsonPointerOptions) -> Self {
        Self { options }
    }

    fn default_subtest(&self) -> String {
        self.options.subtest.clone().unwrap_or_else(|| {
            self.options
                .pointer
                .rsplit('/')
                .find(|segment| !segment.is_empty())
                .unwrap_or("value")
                .to_string()
        })
    }
}

fn numbers(value: &serde_json::Value, xaxis: u64) -> Option<Vec<DataPoint>> {
    match value {
        serde_json::Value::Array(items) => Some(
            items
                .iter()
                .filter_map(as_number)
                .map(|v| DataPoint::new(v, xaxis))
                .collect(),
        ),
        other => as_number(other).map(|v| vec![DataPoint::new(v, xaxis)]),
    }
}

impl Transform for JsonPointerTransform {
    fn transform(&self, file: &SourceFile) -> TransformResult<Vec<StandardEntry>> {
        let doc = file
            .data
            .as_json()
            .ok_or_else(|| TransformError::unsupported(&file.path, "expected a JSON document"))?;

        let target = doc.pointer(&self.options.pointer).ok_or_else(|| {
            TransformError::unsupported(
                &file.path,
                format!("nothing found at pointer '{}'", self.options.pointer),
            )
        })?;

        let xaxis = file.index as u64;

        if let serde_json::Value::Object(map) = target {
            return Ok(map
                .iter()
                .filter_map(|(key, value)| {
                    numbers(value, xaxis).map(|data| StandardEntry::new(key.clone(), data))
                })
                .collect());
        }

        let data = numbers(target, xaxis).ok_or_else(|| {
            TransformError::unsupported(
                &file.path,
                format!("value at '{}' is not numeric", self.options.pointer),
            )
        })?;

        Ok(vec![StandardEntry::new(self.default_subtest(), data)])
    }

    fn merge(&self, entries: Vec<StandardEntry>) -> Vec<StandardEntry> {
        merge_by_subtest(entries)
    }
}

/// Factory for [`JsonPointerTransform`]
pub struct JsonPointerFactory;

impl TransformFactory for JsonPointerFactory {
    fn kind(&self) -> &str {
        KIND
    }

    fn description(&self) -> &str {
        "Numbers found at a JSON pointer"
    }

    fn create(&self, options: &serde_yaml::Value) -> TransformResult<Box<dyn Transform>> {
        let options: JsonPointerOptions = parse_options(KIND, options)?;
        if options.pointer.is_empty() || !options.pointer.starts_with('/') {
            return Err(TransformError::invalid_options(
                KIND,
                "`pointer` must be a non-empty JSON pointer starting with '/'",
            ));
        }
        Ok(Box::new(JsonPointerTransform::new(options)))
    }
}
