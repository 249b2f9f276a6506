use std::fs;

use tempfile::TempDir;
use wsync_fs::ErrorMarker;

#[test]
fn test_marker_absent_by_default() {
    let temp = TempDir::new().unwrap();
    assert!(!ErrorMarker::at(temp.path()).is_present());
}

#[test]
fn test_set_then_clear() {
    let temp = TempDir::new().unwrap();
    let marker = ErrorMarker::at(temp.path());

    marker.set("binaries pull failed").unwrap();
    assert!(marker.is_present());
    assert_eq!(
        fs::read_to_string(marker.path()).unwrap(),
        "binaries pull failed"
    );

    assert!(marker.clear().unwrap());
    assert!(!marker.is_present());
    assert!(!marker.clear().unwrap());
}

#[test]
fn test_marker_path_is_in_workspace_root() {
    let temp = TempDir::new().unwrap();
    let marker = ErrorMarker::at(temp.path());
    assert_eq!(marker.path().parent().unwrap(), temp.path());
}
