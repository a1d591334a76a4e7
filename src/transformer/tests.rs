//! Transformer tests

use super::*;
use perftransform_api::DataPoint;
use rstest::rstest;
use serde_json::json;
use tempfile::TempDir;

struct Resources {
    dir: TempDir,
    json_1: PathBuf,
    json_2: PathBuf,
    txt_3: PathBuf,
}

fn resources() -> Resources {
    let dir = TempDir::new().unwrap();
    let json_1 = dir.path().join("file_1.json");
    let json_2 = dir.path().join("file_2.json");
    let txt_3 = dir.path().join("file_3.txt");

    fs::write(&json_1, json!({"suites": [{"name": "a", "value": 1}]}).to_string()).unwrap();
    fs::write(&json_2, json!({"suites": [{"name": "a", "value": 2}]}).to_string()).unwrap();
    fs::write(&txt_3, "here goes text").unwrap();

    Resources {
        dir,
        json_1,
        json_2,
        txt_3,
    }
}

#[test]
fn test_init_failure() {
    let kinds = TransformKinds::with_builtins();
    let mut definition = TransformerDefinition::builtin("perfherder");
    definition.name = "TempClass".to_string();
    definition.kind = None;

    let result = Transformer::default().with_custom_transformer(&definition, &kinds);
    assert!(matches!(
        result,
        Err(TransformError::InvalidTransform { ref name, .. }) if name == "TempClass"
    ));
}

#[test]
fn test_files_getter() {
    let res = resources();
    let files = vec![res.json_1.clone(), res.json_2.clone(), res.txt_3.clone()];
    assert_eq!(Transformer::new(files.clone()).files(), files.as_slice());
}

#[test]
fn test_files_setter() {
    let res = resources();
    let files = vec![res.txt_3.clone(), res.json_1.clone()];
    let mut tfm = Transformer::default();
    assert!(tfm.files().is_empty());

    tfm.set_files(files.clone());
    assert_eq!(tfm.files(), files.as_slice());
}

#[test]
fn test_open_data() {
    let res = resources();
    let tfm = Transformer::default();

    assert_eq!(
        tfm.open_data(&res.json_1).unwrap(),
        FileData::Json(json!({"suites": [{"name": "a", "value": 1}]}))
    );
    assert_eq!(
        tfm.open_data(&res.json_2).unwrap(),
        FileData::Json(json!({"suites": [{"name": "a", "value": 2}]}))
    );
    assert_eq!(
        tfm.open_data(&res.txt_3).unwrap(),
        FileData::Lines(vec!["here goes text".to_string()])
    );

    assert!(matches!(
        tfm.open_data(Path::new("fail")),
        Err(TransformError::Io { .. })
    ));
}

#[rstest]
#[case("results.json", true)]
#[case("results.JSON", true)]
#[case("results.txt", false)]
#[case("results.json.log", false)]
#[case("results", false)]
fn test_open_data_dispatches_on_extension(#[case] file_name: &str, #[case] is_json: bool) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(file_name);
    fs::write(&path, "[1, 2]").unwrap();

    let data = Transformer::default().open_data(&path).unwrap();
    assert_eq!(data.as_json().is_some(), is_json);
}

#[test]
fn test_open_data_invalid_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{").unwrap();

    assert!(matches!(
        Transformer::default().open_data(&path),
        Err(TransformError::Json { .. })
    ));
}

#[test]
fn test_process_with_custom_transformer() {
    let res = resources();
    let kinds = TransformKinds::with_builtins();
    let definition = TransformerDefinition::builtin("perfherder");

    let tfm = Transformer::new(vec![
        res.json_1.clone(),
        res.dir.path().join("missing.json"),
        res.json_2.clone(),
    ])
    .with_custom_transformer(&definition, &kinds)
    .unwrap()
    .with_prefix("nightly");

    let entries = tfm.process("run-1").unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "run-1");
    assert_eq!(entries[0].subtest, "a");
    assert_eq!(
        entries[0].data,
        vec![DataPoint::new(1.0, 0), DataPoint::new(2.0, 1)]
    );
}

#[test]
fn test_process_defaults_to_standard_format() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("standard.json");
    let content = json!([{"name": "old", "subtest": "fcp", "data": [{"value": 3.0, "xaxis": 0}]}]);
    fs::write(&path, content.to_string()).unwrap();

    let entries = Transformer::new(vec![path]).process("renamed").unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "renamed");
}

#[test]
fn test_process_without_readable_files() {
    let entries = Transformer::new(vec![PathBuf::from("does-not-exist.json")])
        .process("empty")
        .unwrap();
    assert!(entries.is_empty());
}

#[test]
fn test_process_propagates_transform_errors() {
    let res = resources();
    let tfm = Transformer::new(vec![res.txt_3.clone()])
        .with_custom_transformer(
            &TransformerDefinition::builtin("perfherder"),
            &TransformKinds::with_builtins(),
        )
        .unwrap();

    assert!(matches!(
        tfm.process("text"),
        Err(TransformError::UnsupportedData { .. })
    ));
}
