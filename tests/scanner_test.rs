//! Integration tests for input discovery

use scrubline::core::scan::scan;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn build_tree(root: &Path) {
    for rel in ["d0.json", "a/d1.json", "a/b/d2.json", "a/b/c/d3.json", "a/notes.txt"] {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "{}").unwrap();
    }
}

fn names(root: &Path, max_depth: Option<usize>) -> BTreeSet<String> {
    scan(root, max_depth, "json")
        .iter()
        .map(|f| f.path().file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn test_depth_bound_is_inclusive() {
    let dir = tempdir().unwrap();
    build_tree(dir.path());

    let found = names(dir.path(), Some(1));

    assert_eq!(found, BTreeSet::from(["d0.json".to_string(), "d1.json".to_string()]));
}

#[test]
fn test_unlimited_depth_finds_everything() {
    let dir = tempdir().unwrap();
    build_tree(dir.path());

    assert_eq!(names(dir.path(), None).len(), 4);
}

#[test]
fn test_depth_is_recorded() {
    let dir = tempdir().unwrap();
    build_tree(dir.path());

    for file in scan(dir.path(), None, "json") {
        let expected: usize = file.path().file_stem().unwrap().to_string_lossy()[1..].parse().unwrap();
        assert_eq!(file.depth(), expected);
    }
}

#[test]
fn test_missing_root_is_empty_not_error() {
    let dir = tempdir().unwrap();
    assert!(scan(&dir.path().join("absent"), Some(3), "json").is_empty());
}

#[test]
fn test_extension_with_leading_dot() {
    let dir = tempdir().unwrap();
    build_tree(dir.path());

    assert_eq!(scan(dir.path(), None, ".JSON").len(), 4);
}
