//! Data types flowing through a transformer

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Contents of a result file
#[derive(Debug, Clone, PartialEq)]
pub enum FileData {
    /// Parsed JSON document (`.json` files)
    Json(serde_json::Value),

    /// Lines of any other file, without line terminators
    Lines(Vec<String>),
}

impl FileData {
    /// Get the JSON document, if this is one
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            FileData::Json(value) => Some(value),
            FileData::Lines(_) => None,
        }
    }

    /// Get the lines, if this is a text file
    pub fn as_lines(&self) -> Option<&[String]> {
        match self {
            FileData::Json(_) => None,
            FileData::Lines(lines) => Some(lines),
        }
    }
}

/// A file that was opened and is ready to be transformed
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Position of the file among the files that were read
    pub index: usize,

    /// Path the data was read from
    pub path: PathBuf,

    /// File contents
    pub data: FileData,
}

/// A single measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub value: f64,
    pub xaxis: u64,
}

impl DataPoint {
    pub fn new(value: f64, xaxis: u64) -> Self {
        Self { value, xaxis }
    }
}

/// Standardized entry produced by every transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardEntry {
    /// Label of the processing run, stamped after merging
    #[serde(default)]
    pub name: String,

    /// Subtest the measurements belong to
    pub subtest: String,

    /// Measurements
    #[serde(default)]
    pub data: Vec<DataPoint>,
}

impl StandardEntry {
    /// Create an unnamed entry for a subtest
    pub fn new(subtest: impl Into<String>, data: Vec<DataPoint>) -> Self {
        Self {
            name: String::new(),
            subtest: subtest.into(),
            data,
        }
    }
}

/// Merge entries sharing a subtest.
///
/// Groups keep the order in which their subtest was first seen; the points of
/// each group are concatenated and stable-sorted by `xaxis`.
pub fn merge_by_subtest(entries: Vec<StandardEntry>) -> Vec<StandardEntry> {
    let mut merged: Vec<StandardEntry> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        match positions.get(&entry.subtest) {
            Some(&position) => merged[position].data.extend(entry.data),
            None => {
                positions.insert(entry.subtest.clone(), merged.len());
                merged.push(entry);
            }
        }
    }

    for entry in &mut merged {
        entry.data.sort_by_key(|point| point.xaxis);
    }

    merged
}
