//! Built-in per-file writers
//!
//! JSON, single-row CSV and FHIR ImagingStudy outputs are produced here
//! directly; everything else goes through an
//! [`ArtifactRenderer`](super::render::ArtifactRenderer).

use crate::domain::{FlatRecord, Result};
use serde_json::{json, Map, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes the record as one pretty-printed JSON object
pub fn write_json(record: &FlatRecord, dest: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(dest)?);
    serde_json::to_writer_pretty(&mut writer, record)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Writes a header row with the record's own field order and one data row
///
/// An empty record produces an empty file.
pub fn write_csv_row(record: &FlatRecord, dest: &Path) -> Result<()> {
    if record.is_empty() {
        File::create(dest)?;
        return Ok(());
    }

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(dest)?;
    writer.write_record(record.keys())?;
    writer.write_record(record.keys().map(|k| record.cell(k)))?;
    writer.flush()?;
    Ok(())
}

/// Writes a minimal FHIR ImagingStudy resource
pub fn write_fhir(record: &FlatRecord, dest: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(dest)?);
    serde_json::to_writer_pretty(&mut writer, &imaging_study(record))?;
    writer.flush()?;
    Ok(())
}

/// Maps study fields onto an ImagingStudy; absent fields are omitted
pub fn imaging_study(record: &FlatRecord) -> Value {
    let mut resource = Map::new();
    resource.insert("resourceType".into(), json!("ImagingStudy"));

    if let Some(uid) = text_field(record, &["study_instance_uid", "StudyInstanceUID"]) {
        resource.insert(
            "identifier".into(),
            json!([{ "system": "urn:dicom:uid", "value": uid }]),
        );
    }
    resource.insert("status".into(), json!("available"));
    if let Some(patient) = text_field(record, &["patient_id", "PatientID"]) {
        resource.insert(
            "subject".into(),
            json!({ "reference": format!("Patient/{patient}") }),
        );
    }
    resource.insert("numberOfSeries".into(), json!(1));
    if let Some(modality) = text_field(record, &["modality", "Modality"]) {
        resource.insert("modality".into(), json!(modality));
    }
    if let Some(started) = text_field(record, &["study_date_time", "StudyDateTime"]) {
        resource.insert("started".into(), json!(started));
    }

    Value::Object(resource)
}

fn text_field(record: &FlatRecord, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find(|k| record.get(k).is_some_and(|v| !v.is_null()))
        .map(|k| record.cell(k))
        .filter(|s| !s.is_empty())
}
