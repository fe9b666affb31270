//! Export-schema command implementation
//!
//! Writes an empty CSV carrying the column layout used by downstream
//! imaging datasets, so extracted metadata can be mapped onto it.

use clap::Args;
use std::path::{Path, PathBuf};

/// Columns of the dataset template, in order
pub const SCHEMA_COLUMNS: &[&str] = &[
    "study_id",
    "series_id",
    "instance_id",
    "patient_id",
    "patient_age",
    "patient_sex",
    "modality",
    "body_part",
    "manufacturer",
    "model",
    "study_date",
    "study_time",
    "study_date_time",
    "path_to_image",
    "rows",
    "columns",
    "pixel_spacing",
    "urgent",
    "private_tags_count",
];

/// Arguments for the export-schema command
#[derive(Args, Debug)]
pub struct ExportSchemaArgs {
    /// Destination file
    #[arg(default_value = "dicom_schema.csv")]
    pub file: PathBuf,
}

impl ExportSchemaArgs {
    /// Execute the export-schema command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        match write_schema(&self.file) {
            Ok(()) => {
                tracing::info!(path = %self.file.display(), "Schema template written");
                println!("✅ Schema template written: {}", self.file.display());
                Ok(0)
            }
            Err(e) => {
                tracing::error!(path = %self.file.display(), error = %e, "Failed to write schema");
                eprintln!("❌ Failed to write schema template: {e}");
                Ok(5)
            }
        }
    }
}

/// Writes the header-only CSV to `path`
pub fn write_schema(path: &Path) -> crate::domain::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(path)?;
    writer.write_record(SCHEMA_COLUMNS)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_schema_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("schema/cols.csv");
        write_schema(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("study_id,series_id,instance_id,patient_id,"));
        assert!(text.ends_with("urgent,private_tags_count\n"));
        assert_eq!(text.lines().count(), 1);
    }
}
