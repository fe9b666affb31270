//! Output specifier routing
//!
//! Each specifier names an output type and optionally a destination:
//!
//! | Specifier | Meaning |
//! |---|---|
//! | `json` | type with its default path under the output directory |
//! | `csv=reports/x.csv` | type with an explicit path |
//! | `summary.html` | type implied by the extension, explicit path |
//!
//! Several specifiers may share one argument separated by `,` or `;`.
//! Unknown types and extensions are skipped with a warning.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Every output type accepted by [`route`]
pub const SUPPORTED_TYPES: &[&str] = &[
    "json",
    "csv",
    "thumbnail",
    "html",
    "fhir",
    "image",
    "report",
    "agg-csv",
    "agg-json",
];

/// Output type
///
/// Variant order is the order per-file artifacts are produced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputKind {
    /// Per-file flat JSON object
    Json,
    /// Per-file single-row CSV
    Csv,
    /// Per-file thumbnail image
    Thumbnail,
    /// Per-file HTML report
    Html,
    /// Per-file FHIR ImagingStudy resource
    Fhir,
    /// Per-file rendered image
    Image,
    /// Per-file metadata rendered as an image
    Report,
    /// Combined CSV across the batch
    AggCsv,
    /// Combined JSON array across the batch
    AggJson,
}

impl OutputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputKind::Json => "json",
            OutputKind::Csv => "csv",
            OutputKind::Thumbnail => "thumbnail",
            OutputKind::Html => "html",
            OutputKind::Fhir => "fhir",
            OutputKind::Image => "image",
            OutputKind::Report => "report",
            OutputKind::AggCsv => "agg-csv",
            OutputKind::AggJson => "agg-json",
        }
    }

    /// Whether the type is written once per batch rather than per file
    pub fn is_aggregate(&self) -> bool {
        matches!(self, OutputKind::AggCsv | OutputKind::AggJson)
    }

    /// Type implied by a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(OutputKind::Json),
            "csv" => Some(OutputKind::Csv),
            "html" => Some(OutputKind::Html),
            "png" | "jpg" | "jpeg" | "bmp" | "tiff" | "tif" => Some(OutputKind::Image),
            "thumb" => Some(OutputKind::Thumbnail),
            "fhir" => Some(OutputKind::Fhir),
            _ => None,
        }
    }

    /// File name used for a default destination
    ///
    /// `stem` and `fingerprint` identify the source file; aggregate names
    /// ignore them.
    pub fn default_file_name(&self, stem: &str, fingerprint: &str) -> PathBuf {
        match self {
            OutputKind::Json => format!("{stem}_{fingerprint}_metadata.json").into(),
            OutputKind::Csv => format!("{stem}_{fingerprint}_metadata.csv").into(),
            OutputKind::Thumbnail => Path::new("thumbnails")
                .join(format!("{stem}_{fingerprint}_thumb.png")),
            OutputKind::Html => format!("{stem}_{fingerprint}_report.html").into(),
            OutputKind::Fhir => format!("{stem}_{fingerprint}_imagingstudy.json").into(),
            OutputKind::Image => format!("{stem}_{fingerprint}_image.png").into(),
            OutputKind::Report => format!("{stem}_{fingerprint}_metadata_report.png").into(),
            OutputKind::AggCsv => "combined_metadata.csv".into(),
            OutputKind::AggJson => "combined_metadata.json".into(),
        }
    }
}

impl FromStr for OutputKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(OutputKind::Json),
            "csv" => Ok(OutputKind::Csv),
            "thumbnail" => Ok(OutputKind::Thumbnail),
            "html" => Ok(OutputKind::Html),
            "fhir" => Ok(OutputKind::Fhir),
            "image" => Ok(OutputKind::Image),
            "report" => Ok(OutputKind::Report),
            "agg-csv" => Ok(OutputKind::AggCsv),
            "agg-json" => Ok(OutputKind::AggJson),
            other => Err(format!(
                "Unsupported output type '{other}'. Supported: {}",
                SUPPORTED_TYPES.join(", ")
            )),
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where one output goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Derived name under the output directory, decided by the writer
    Default,
    /// Path as given; relative paths are relative to the working directory
    Explicit(PathBuf),
}

/// Routed outputs for a run
#[derive(Debug, Clone, Default)]
pub struct OutputPlan {
    output_dir: PathBuf,
    targets: BTreeMap<OutputKind, Vec<OutputTarget>>,
    warnings: Vec<String>,
}

impl OutputPlan {
    pub fn targets(&self, kind: OutputKind) -> &[OutputTarget] {
        self.targets.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, kind: OutputKind) -> bool {
        self.targets.contains_key(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Routed types in production order
    pub fn kinds(&self) -> impl Iterator<Item = OutputKind> + '_ {
        self.targets.keys().copied()
    }

    /// Per-file types in production order
    pub fn per_file_kinds(&self) -> impl Iterator<Item = OutputKind> + '_ {
        self.kinds().filter(|k| !k.is_aggregate())
    }

    /// Specifiers that were skipped
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Concrete path for a target
    pub fn resolve(&self, kind: OutputKind, target: &OutputTarget, stem: &str, fingerprint: &str) -> PathBuf {
        match target {
            OutputTarget::Explicit(path) => path.clone(),
            OutputTarget::Default => self.output_dir.join(kind.default_file_name(stem, fingerprint)),
        }
    }

    /// Destinations of an aggregate type
    pub fn aggregate_paths(&self, kind: OutputKind) -> Vec<PathBuf> {
        self.targets(kind)
            .iter()
            .map(|t| self.resolve(kind, t, "", ""))
            .collect()
    }

    fn add(&mut self, kind: OutputKind, target: OutputTarget) {
        self.targets.entry(kind).or_default().push(target);
    }

    fn warn(&mut self, message: String) {
        tracing::warn!("{message}");
        self.warnings.push(message);
    }
}

/// Parses output specifiers into a plan
pub fn route<S: AsRef<str>>(specifiers: &[S], output_dir: &Path) -> OutputPlan {
    let mut plan = OutputPlan {
        output_dir: output_dir.to_path_buf(),
        ..Default::default()
    };

    let items = specifiers
        .iter()
        .flat_map(|raw| raw.as_ref().split([',', ';']))
        .map(str::trim)
        .filter(|s| !s.is_empty());

    for item in items {
        if let Some((kind, path)) = item.split_once('=') {
            let Ok(kind) = kind.parse::<OutputKind>() else {
                plan.warn(format!("Unsupported output type '{}' in '{item}', skipped", kind.trim()));
                continue;
            };
            let path = path.trim();
            let target = if path.is_empty() {
                OutputTarget::Default
            } else {
                OutputTarget::Explicit(PathBuf::from(path))
            };
            plan.add(kind, target);
            continue;
        }

        if let Ok(kind) = item.parse::<OutputKind>() {
            plan.add(kind, OutputTarget::Default);
            continue;
        }

        match Path::new(item).extension().map(|e| e.to_string_lossy()) {
            Some(ext) => match OutputKind::from_extension(&ext) {
                Some(kind) => plan.add(kind, OutputTarget::Explicit(PathBuf::from(item))),
                None => plan.warn(format!(
                    "Unknown extension '.{ext}' for '{item}', skipped. Supported: .json .csv .html .png .jpg .jpeg .bmp .tiff .tif .thumb .fhir"
                )),
            },
            None => plan.warn(format!(
                "Unrecognized output '{item}', skipped. Supported types: {}",
                SUPPORTED_TYPES.join(", ")
            )),
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_bare_type_routes_to_default() {
        let plan = route(&["json"], Path::new("./out"));
        assert_eq!(plan.targets(OutputKind::Json), &[OutputTarget::Default]);
        assert_eq!(
            plan.resolve(OutputKind::Json, &OutputTarget::Default, "scan", "abcd1234"),
            Path::new("./out").join("scan_abcd1234_metadata.json")
        );
        assert!(plan.warnings().is_empty());
    }

    #[test]
    fn test_assignment_keeps_path() {
        let plan = route(&["csv=reports/x.csv"], Path::new("./out"));
        assert_eq!(
            plan.targets(OutputKind::Csv),
            &[OutputTarget::Explicit(PathBuf::from("reports/x.csv"))]
        );
    }

    #[test]
    fn test_unknown_extension_warns_and_skips() {
        let plan = route(&["report.xyz"], Path::new("./out"));
        assert!(plan.is_empty());
        assert_eq!(plan.warnings().len(), 1);
        assert!(plan.warnings()[0].contains("report.xyz"));
    }

    #[test]
    fn test_unknown_type_in_assignment_warns() {
        let plan = route(&["pdf=out.pdf", "json"], Path::new("./out"));
        assert!(plan.contains(OutputKind::Json));
        assert_eq!(plan.warnings().len(), 1);
    }

    #[test]
    fn test_separators_and_multiple_targets() {
        let plan = route(&["json;csv, agg-csv", "json=extra/a.json"], Path::new("out"));
        assert_eq!(plan.targets(OutputKind::Json).len(), 2);
        assert!(plan.contains(OutputKind::Csv));
        assert_eq!(
            plan.aggregate_paths(OutputKind::AggCsv),
            vec![Path::new("out").join("combined_metadata.csv")]
        );
        let per_file: Vec<_> = plan.per_file_kinds().collect();
        assert_eq!(per_file, vec![OutputKind::Json, OutputKind::Csv]);
    }

    #[test_case("summary.csv", OutputKind::Csv ; "csv extension")]
    #[test_case("page.HTML", OutputKind::Html ; "upper case extension")]
    #[test_case("frame.tif", OutputKind::Image ; "tif image")]
    #[test_case("study.fhir", OutputKind::Fhir ; "fhir extension")]
    fn test_extension_implies_type(spec: &str, kind: OutputKind) {
        let plan = route(&[spec], Path::new("out"));
        assert_eq!(plan.targets(kind), &[OutputTarget::Explicit(PathBuf::from(spec))]);
    }

    #[test]
    fn test_thumbnail_default_goes_to_subdirectory() {
        let name = OutputKind::Thumbnail.default_file_name("ct", "0011aabb");
        assert_eq!(name, Path::new("thumbnails").join("ct_0011aabb_thumb.png"));
    }

    #[test]
    fn test_kind_round_trips_through_str() {
        for name in SUPPORTED_TYPES {
            let kind: OutputKind = name.parse().unwrap();
            assert_eq!(kind.as_str(), *name);
        }
    }
}
