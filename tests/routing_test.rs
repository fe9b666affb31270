//! Integration tests for output specifier routing

use scrubline::core::routing::{route, OutputKind, OutputTarget};
use std::path::{Path, PathBuf};

#[test]
fn test_bare_type_maps_to_default_under_output_dir() {
    let plan = route(&["json"], Path::new("./out"));

    assert_eq!(plan.targets(OutputKind::Json), &[OutputTarget::Default]);
    let resolved = plan.resolve(OutputKind::Json, &OutputTarget::Default, "scan", "0a1b2c3d");
    assert!(resolved.starts_with("./out"));
}

#[test]
fn test_assignment_maps_to_explicit_path() {
    let plan = route(&["csv=reports/x.csv"], Path::new("./out"));

    assert_eq!(
        plan.targets(OutputKind::Csv),
        &[OutputTarget::Explicit(PathBuf::from("reports/x.csv"))]
    );
    assert_eq!(
        plan.resolve(OutputKind::Csv, &plan.targets(OutputKind::Csv)[0], "scan", "0a1b2c3d"),
        PathBuf::from("reports/x.csv")
    );
}

#[test]
fn test_unknown_extension_is_skipped_with_warning() {
    let plan = route(&["report.xyz"], Path::new("./out"));

    assert!(plan.is_empty());
    assert_eq!(plan.warnings().len(), 1);
}

#[test]
fn test_mixed_specifiers_keep_valid_entries() {
    let plan = route(
        &["json,bogus", "summary.html", "agg-json=all/records.json"],
        Path::new("out"),
    );

    assert!(plan.contains(OutputKind::Json));
    assert_eq!(
        plan.targets(OutputKind::Html),
        &[OutputTarget::Explicit(PathBuf::from("summary.html"))]
    );
    assert_eq!(
        plan.aggregate_paths(OutputKind::AggJson),
        vec![PathBuf::from("all/records.json")]
    );
    assert_eq!(plan.warnings().len(), 1);
}
