//! Built-in transform kind tests

use super::*;
use perftransform_api::{DataPoint, FileData, SourceFile, Transform};
use serde_json::json;
use std::path::PathBuf;

fn json_file(index: usize, value: serde_json::Value) -> SourceFile {
    SourceFile {
        index,
        path: PathBuf::from(format!("result-{}.json", index)),
        data: FileData::Json(value),
    }
}

fn text_file(index: usize, lines: &[&str]) -> SourceFile {
    SourceFile {
        index,
        path: PathBuf::from(format!("result-{}.txt", index)),
        data: FileData::Lines(lines.iter().map(|l| l.to_string()).collect()),
    }
}

fn options(yaml: &str) -> serde_yaml::Value {
    serde_yaml::from_str(yaml).unwrap()
}

fn perfherder_doc(value: f64, replicates: &[f64]) -> serde_json::Value {
    json!({
        "suites": [{
            "name": "pageload",
            "value": value,
            "subtests": [
                {"name": "fcp", "value": value, "replicates": replicates},
                {"name": "loadtime", "value": value * 2.0}
            ]
        }]
    })
}

#[test]
fn test_perfherder_uses_replicates_by_default() {
    let transform = PerfherderFactory.create(&serde_yaml::Value::Null).unwrap();
    let entries = transform
        .transform(&json_file(3, perfherder_doc(10.0, &[9.0, 11.0])))
        .unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].subtest, "pageload.fcp");
    assert_eq!(
        entries[0].data,
        vec![DataPoint::new(9.0, 3), DataPoint::new(11.0, 3)]
    );
    assert_eq!(entries[1].subtest, "pageload.loadtime");
    assert_eq!(entries[1].data, vec![DataPoint::new(20.0, 3)]);
}

#[test]
fn test_perfherder_summary_values_only() {
    let transform = PerfherderFactory.create(&options("replicates: false")).unwrap();
    let entries = transform
        .transform(&json_file(0, perfherder_doc(10.0, &[9.0, 11.0])))
        .unwrap();

    assert_eq!(entries[0].data, vec![DataPoint::new(10.0, 0)]);
}

#[test]
fn test_perfherder_suite_without_subtests_and_filter() {
    let doc = json!({
        "suites": [
            {"name": "startup", "value": 120},
            {"name": "ignored", "value": 1}
        ]
    });
    let transform = PerfherderFactory
        .create(&options("suites: [startup]"))
        .unwrap();
    let entries = transform.transform(&json_file(0, doc)).unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].subtest, "startup");
    assert_eq!(entries[0].data, vec![DataPoint::new(120.0, 0)]);
}

#[test]
fn test_perfherder_merges_runs_by_subtest() {
    let transform = PerfherderFactory.create(&options("replicates: false")).unwrap();
    let mut entries = Vec::new();
    entries.extend(transform.transform(&json_file(1, perfherder_doc(2.0, &[]))).unwrap());
    entries.extend(transform.transform(&json_file(0, perfherder_doc(1.0, &[]))).unwrap());

    let merged = transform.merge(entries);
    assert_eq!(merged.len(), 2);
    assert_eq!(
        merged[0].data,
        vec![DataPoint::new(1.0, 0), DataPoint::new(2.0, 1)]
    );
}

#[test]
fn test_perfherder_rejects_text_and_unknown_options() {
    let transform = PerfherderFactory.create(&serde_yaml::Value::Null).unwrap();
    assert!(transform.transform(&text_file(0, &["1"])).is_err());
    assert!(PerfherderFactory.create(&options("bogus: true")).is_err());
}

#[test]
fn test_json_pointer_number_array_and_object() {
    let doc = json!({
        "metrics": {
            "first": 1.5,
            "runs": [1, 2, "3"],
            "timings": {"dns": 4, "tcp": [5, 6]}
        }
    });

    let number = JsonPointerFactory
        .create(&options("pointer: /metrics/first"))
        .unwrap();
    let entries = number.transform(&json_file(0, doc.clone())).unwrap();
    assert_eq!(entries[0].subtest, "first");
    assert_eq!(entries[0].data, vec![DataPoint::new(1.5, 0)]);

    let array = JsonPointerFactory
        .create(&options("{pointer: /metrics/runs, subtest: runs-total}"))
        .unwrap();
    let entries = array.transform(&json_file(2, doc.clone())).unwrap();
    assert_eq!(entries[0].subtest, "runs-total");
    assert_eq!(entries[0].data.len(), 3);
    assert!(entries[0].data.iter().all(|p| p.xaxis == 2));

    let object = JsonPointerFactory
        .create(&options("pointer: /metrics/timings"))
        .unwrap();
    let entries = object.transform(&json_file(0, doc)).unwrap();
    let subtests: Vec<&str> = entries.iter().map(|e| e.subtest.as_str()).collect();
    assert_eq!(subtests, vec!["dns", "tcp"]);
}

#[test]
fn test_json_pointer_missing_target() {
    let transform = JsonPointerFactory.create(&options("pointer: /nope")).unwrap();
    assert!(transform.transform(&json_file(0, json!({}))).is_err());
}

#[test]
fn test_json_pointer_requires_pointer() {
    assert!(JsonPointerFactory.create(&serde_yaml::Value::Null).is_err());
    assert!(JsonPointerFactory.create(&options("pointer: metrics")).is_err());
}

#[test]
fn test_text_pattern_default_matches_bare_numbers() {
    let transform = TextPatternFactory.create(&serde_yaml::Value::Null).unwrap();
    let entries = transform
        .transform(&text_file(1, &["12.5", "not a number", " 7 "]))
        .unwrap();

    let merged = transform.merge(entries);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].subtest, "value");
    assert_eq!(
        merged[0].data,
        vec![DataPoint::new(12.5, 1), DataPoint::new(7.0, 1)]
    );
}

#[test]
fn test_text_pattern_named_subtests() {
    let transform = TextPatternFactory
        .create(&options(r#"pattern: '^(?P<subtest>\w+)=(?P<value>\d+)ms$'"#))
        .unwrap();
    let entries = transform
        .transform(&text_file(0, &["fcp=120ms", "lcp=300ms", "fcp=110ms"]))
        .unwrap();

    let merged = transform.merge(entries);
    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].subtest, "fcp");
    assert_eq!(merged[0].data.len(), 2);
}

#[test]
fn test_text_pattern_requires_value_group() {
    assert!(TextPatternFactory.create(&options(r#"pattern: '(\d+)'"#)).is_err());
    assert!(TextPatternFactory.create(&options("pattern: '(['")).is_err());
}

#[test]
fn test_standard_accepts_entry_or_array() {
    let transform = StandardFactory.create(&serde_yaml::Value::Null).unwrap();

    let single = json!({"subtest": "fcp", "data": [{"value": 1.0, "xaxis": 0}]});
    assert_eq!(transform.transform(&json_file(0, single)).unwrap().len(), 1);

    let many = json!([
        {"subtest": "fcp", "data": []},
        {"subtest": "lcp", "data": []}
    ]);
    assert_eq!(transform.transform(&json_file(0, many)).unwrap().len(), 2);

    assert!(transform.transform(&text_file(0, &["x"])).is_err());
    assert!(StandardFactory.create(&options("a: 1")).is_err());
    assert!(StandardFactory.create(&options("{}")).is_ok());
}

#[test]
fn test_non_finite_values_are_dropped() {
    let perfherder = PerfherderFactory.create(&serde_yaml::Value::Null).unwrap();
    let doc = json!({"suites": [
        {"name": "s", "value": "NaN"},
        {"name": "t", "value": 2.0, "replicates": ["inf", "3", "-Infinity"]}
    ]});
    let entries = perfherder.transform(&json_file(0, doc)).unwrap();
    let points: Vec<&DataPoint> = entries.iter().flat_map(|e| &e.data).collect();
    assert_eq!(points, vec![&DataPoint::new(3.0, 0)]);

    let text = TextPatternFactory
        .create(&options(r#"pattern: '^(?P<value>\S+)$'"#))
        .unwrap();
    let entries = text.transform(&text_file(0, &["NaN", "inf", "4"])).unwrap();
    let points: Vec<&DataPoint> = entries.iter().flat_map(|e| &e.data).collect();
    assert_eq!(points, vec![&DataPoint::new(4.0, 0)]);

    let pointer = JsonPointerFactory.create(&options("pointer: /v")).unwrap();
    let entries = pointer
        .transform(&json_file(0, json!({"v": ["nan", 5]})))
        .unwrap();
    let points: Vec<&DataPoint> = entries.iter().flat_map(|e| &e.data).collect();
    assert_eq!(points, vec![&DataPoint::new(5.0, 0)]);

    let output = serde_json::to_value(&entries).unwrap();
    let standard = StandardFactory.create(&serde_yaml::Value::Null).unwrap();
    assert_eq!(standard.transform(&json_file(0, output)).unwrap(), entries);
}
