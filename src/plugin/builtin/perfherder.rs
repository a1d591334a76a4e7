//! Perfherder result files

use serde::{Deserialize, Serialize};

use super::{as_number, parse_options};
use perftransform_api::{
    merge_by_subtest, DataPoint, SourceFile, StandardEntry, Transform, TransformError,
    TransformFactory, TransformResult,
};

pub const KIND: &str = "perfherder";

/// Perfherder transform options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PerfherderOptions {
    /// Use replicates instead of the summary value when present
    pub replicates: bool,

    /// Only keep these suites
    pub suites: Option<Vec<String>>,
}

impl Default for PerfherderOptions {
    fn default() -> Self {
        Self {
            replicates: true,
            suites: None,
        }
    }
}

/// Turns `{"suites": [...]}` documents into one entry per subtest
pub struct PerfherderTransform {
    options: PerfherderOptions,
}

impl PerfherderTransform {
    pub fn new(options: PerfherderOptions) -> Self {
        Self { options }
    }

    fn wanted(&self, suite: &str) -> bool {
        self.options
            .suites
            .as_ref()
            .map_or(true, |suites| suites.iter().any(|s| s == suite))
    }

    /// Points for a suite or a subtest object
    fn points(&self, node: &serde_json::Value, xaxis: u64) -> Vec<DataPoint> {
        if self.options.replicates {
            if let Some(replicates) = node.get("replicates").and_then(|r| r.as_array()) {
                if !replicates.is_empty() {
                    return replicates
                        .iter()
                        .filter_map(as_number)
                        .map(|value| DataPoint::new(value, xaxis))
                        .collect();
                }
            }
        }

        node.get("value")
            .and_then(as_number)
            .map(|value| vec![DataPoint::new(value, xaxis)])
            .unwrap_or_default()
    }
}

impl Transform for PerfherderTransform {
    fn transform(&self, file: &SourceFile) -> TransformResult<Vec<StandardEntry>> {
        let suites = file
            .data
            .as_json()
            .and_then(|doc| doc.get("suites"))
            .and_then(|suites| suites.as_array())
            .ok_or_else(|| {
                TransformError::unsupported(
                    &file.path,
                    "expected a Perfherder document with `suites`",
                )
            })?;

        let xaxis = file.index as u64;
        let mut entries = Vec::new();

        for suite in suites {
            let suite_name = suite.get("name").and_then(|n| n.as_str()).unwrap_or("suite");
            if !self.wanted(suite_name) {
                continue;
            }

            let subtests = suite
                .get("subtests")
                .and_then(|s| s.as_array())
                .filter(|s| !s.is_empty());

            match subtests {
                Some(subtests) => {
                    for subtest in subtests {
                        let subtest_name =
                            subtest.get("name").and_then(|n| n.as_str()).unwrap_or("subtest");
                        entries.push(StandardEntry::new(
                            format!("{}.{}", suite_name, subtest_name),
                            self.points(subtest, xaxis),
                        ));
                    }
                }
                None => entries.push(StandardEntry::new(suite_name, self.points(suite, xaxis))),
            }
        }

        Ok(entries)
    }

    fn merge(&self, entries: Vec<StandardEntry>) -> Vec<StandardEntry> {
        merge_by_subtest(entries)
    }
}

/// Factory for [`PerfherderTransform`]
pub struct PerfherderFactory;

impl TransformFactory for PerfherderFactory {
    fn kind(&self) -> &str {
        KIND
    }

    fn description(&self) -> &str {
        "Perfherder JSON documents, one entry per suite or subtest"
    }

    fn create(&self, options: &serde_yaml::Value) -> TransformResult<Box<dyn Transform>> {
        let options: PerfherderOptions = parse_options(KIND, options)?;
        Ok(Box::new(PerfherderTransform::new(options)))
    }
}
