//! Measurements matched line by line in plain text files

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{parse_number, parse_options};
use perftransform_api::{
    merge_by_subtest, DataPoint, SourceFile, StandardEntry, Transform, TransformError,
    TransformFactory, TransformResult,
};

pub const KIND: &str = "text-pattern";

/// Matches lines holding a single number
pub const DEFAULT_PATTERN: &str = r"^\s*(?P<value>[-+]?\d+(?:\.\d+)?(?:[eE][-+]?\d+)?)\s*$";

/// Text pattern transform options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextPatternOptions {
    /// Regex with a `value` group and an optional `subtest` group
    pub pattern: String,

    /// Subtest for lines without a `subtest` capture
    pub subtest: String,
}

impl Default for TextPatternOptions {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.to_string(),
            subtest: "value".to_string(),
        }
    }
}

pub struct TextPatternTransform {
    pattern: Regex,
    subtest: String,
}

impl TextPatternTransform {
    pub fn new(options: TextPatternOptions) -> TransformResult<Self> {
        let pattern = Regex::new(&options.pattern)
            .map_err(|e| TransformError::invalid_options(KIND, e.to_string()))?;

        if !pattern.capture_names().any(|name| name == Some("value")) {
            return Err(TransformError::invalid_options(
                KIND,
                "`pattern` needs a named `value` group",
            ));
        }

        Ok(Self {
            pattern,
            subtest: options.subtest,
        })
    }
}

impl Transform for TextPatternTransform {
    fn transform(&self, file: &SourceFile) -> TransformResult<Vec<StandardEntry>> {
        let lines = file
            .data
            .as_lines()
            .ok_or_else(|| TransformError::unsupported(&file.path, "expected a text file"))?;

        let xaxis = file.index as u64;
        let mut entries = Vec::new();

        for line in lines {
            let Some(captures) = self.pattern.captures(line) else {
                continue;
            };
            let Some(value) = captures.name("value").and_then(|m| parse_number(m.as_str())) else {
                continue;
            };
            let subtest = captures
                .name("subtest")
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_else(|| self.subtest.clone());

            entries.push(StandardEntry::new(subtest, vec![DataPoint::new(value, xaxis)]));
        }

        Ok(entries)
    }

    fn merge(&self, entries: Vec<StandardEntry>) -> Vec<StandardEntry> {
        merge_by_subtest(entries)
    }
}

/// Factory for [`TextPatternTransform`]
pub struct TextPatternFactory;

impl TransformFactory for TextPatternFactory {
    fn kind(&self) -> &str {
        KIND
    }

    fn description(&self) -> &str {
        "Plain text lines matched against a regular expression"
    }

    fn create(&self, options: &serde_yaml::Value) -> TransformResult<Box<dyn Transform>> {
        let options: TextPatternOptions = parse_options(KIND, options)?;
        Ok(Box::new(TextPatternTransform::new(options)?))
    }
}
