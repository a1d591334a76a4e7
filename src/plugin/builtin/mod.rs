//! Built-in transform kinds

use serde::de::DeserializeOwned;
use std::sync::Arc;

use perftransform_api::{TransformError, TransformFactory, TransformResult};

pub mod json_pointer;
pub mod perfherder;
pub mod standard;
pub mod text_pattern;

#[cfg(test)]
mod tests;

pub use json_pointer::{JsonPointerFactory, JsonPointerTransform};
pub use perfherder::{PerfherderFactory, PerfherderTransform};
pub use standard::{StandardFactory, StandardTransform};
pub use text_pattern::{TextPatternFactory, TextPatternTransform};

/// Factories for every built-in kind
pub fn builtin_factories() -> Vec<Arc<dyn TransformFactory>> {
    vec![
        Arc::new(StandardFactory),
        Arc::new(PerfherderFactory),
        Arc::new(JsonPointerFactory),
        Arc::new(TextPatternFactory),
    ]
}

/// Deserialize kind options, treating a missing block as the defaults
pub(crate) fn parse_options<T>(kind: &str, options: &serde_yaml::Value) -> TransformResult<T>
where
    T: DeserializeOwned + Default,
{
    if options.is_null() {
        return Ok(T::default());
    }

    serde_yaml::from_value(options.clone())
        .map_err(|e| TransformError::invalid_options(kind, e.to_string()))
}

/// Read a finite JSON number, accepting numeric strings as well
pub(crate) fn as_number(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => parse_number(s),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

/// Parse a finite number from text; `NaN` and infinities are rejected
pub(crate) fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
