use std::fs;

use pretty_assertions::assert_eq;
use rstest::rstest;
use serde::Deserialize;
use tempfile::TempDir;
use wsync_fs::{ConfigStore, Error};

#[derive(Debug, PartialEq, Deserialize)]
struct Sample {
    name: String,
    #[serde(default)]
    enabled: bool,
}

#[rstest]
#[case("config.toml", "name = \"dev\"\nenabled = true\n")]
#[case("config.json", r#"{"name": "dev", "enabled": true}"#)]
fn test_load_by_extension(#[case] file: &str, #[case] content: &str) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(file);
    fs::write(&path, content).unwrap();

    let loaded: Sample = ConfigStore::new().load(&path).unwrap();
    assert_eq!(
        loaded,
        Sample {
            name: "dev".into(),
            enabled: true
        }
    );
}

#[test]
fn test_load_rejects_unknown_extension() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.xml");
    fs::write(&path, "<config/>").unwrap();

    let result: Result<Sample, _> = ConfigStore::new().load(&path);
    assert!(matches!(result, Err(Error::UnsupportedFormat { .. })));
}

#[test]
fn test_load_reports_parse_errors() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, "name = ").unwrap();

    let result: Result<Sample, _> = ConfigStore::new().load(&path);
    assert!(matches!(result, Err(Error::ConfigParse { .. })));
}

#[test]
fn test_load_optional_missing_is_none() {
    let temp = TempDir::new().unwrap();
    let loaded: Option<Sample> = ConfigStore::new()
        .load_optional(&temp.path().join("user.toml"))
        .unwrap();
    assert!(loaded.is_none());
}

#[test]
fn test_load_optional_malformed_is_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("user.toml");
    fs::write(&path, "[[[").unwrap();

    let result: Result<Option<Sample>, _> = ConfigStore::new().load_optional(&path);
    assert!(result.is_err());
}
