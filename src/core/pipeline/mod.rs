//! Per-file pipeline
//!
//! [`RecordPipeline::process`] runs one file through decode, sanitize,
//! anonymize and the routed per-file writes. Whatever happens inside, the
//! caller gets a [`BatchResult`] back; decode and sanitize problems become
//! classified failures, and each failed output target is logged and counted
//! without affecting the other targets of the same file.

pub mod decode;
pub mod naming;
pub mod render;
pub mod sanitize;
pub mod writers;

pub use decode::{JsonRecordDecoder, RecordDecoder};
pub use render::{ArtifactRenderer, HtmlReportRenderer, RendererRegistry};
pub use sanitize::sanitize;

use crate::anonymization::{AnonymizationEngine, AnonymizationOutcome};
use crate::core::batch::result::{BatchResult, ProcessedRecord};
use crate::core::routing::{OutputKind, OutputPlan};
use crate::domain::{CandidateFile, FlatRecord, RecordError};
use std::path::Path;
use std::sync::Arc;

/// Run-wide switches for per-file processing
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineSettings {
    /// Log intended writes instead of writing
    pub dry_run: bool,
    /// Leave existing output files untouched
    pub no_overwrite: bool,
    /// Log per-file progress at debug instead of info
    pub suppress_details: bool,
}

/// What happened to one output target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    Written,
    DryRun,
    SkippedExisting,
    Unsupported,
}

/// Processes single files; shared read-only by all workers
pub struct RecordPipeline {
    decoder: Arc<dyn RecordDecoder>,
    engine: Option<Arc<AnonymizationEngine>>,
    plan: OutputPlan,
    renderers: RendererRegistry,
    settings: PipelineSettings,
}

impl RecordPipeline {
    pub fn new(
        decoder: Arc<dyn RecordDecoder>,
        engine: Option<Arc<AnonymizationEngine>>,
        plan: OutputPlan,
        renderers: RendererRegistry,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            decoder,
            engine,
            plan,
            renderers,
            settings,
        }
    }

    /// Whether this pipeline can produce `kind`
    pub fn supports(&self, kind: OutputKind) -> bool {
        matches!(kind, OutputKind::Json | OutputKind::Csv | OutputKind::Fhir)
            || self.renderers.supports(kind)
    }

    /// Routed per-file kinds that nothing can produce
    pub fn unsupported_kinds(&self) -> Vec<OutputKind> {
        self.plan
            .per_file_kinds()
            .filter(|kind| !self.supports(*kind))
            .collect()
    }

    /// Runs one file through the pipeline
    pub fn process(&self, file: &CandidateFile) -> BatchResult {
        let path = file.path();

        let value = match self.decoder.decode(path) {
            Ok(value) => value,
            Err(e) => return BatchResult::failure(path, &e),
        };

        let mut record = match sanitize(path, value) {
            Ok(record) => record,
            Err(e) => return BatchResult::failure(path, &e),
        };

        let outcome = match &self.engine {
            Some(engine) => engine.anonymize(&mut record),
            None => AnonymizationOutcome::default(),
        };

        let (outputs_written, output_failures) = self.write_outputs(path, &record);

        if self.settings.suppress_details {
            tracing::debug!(
                path = %path.display(),
                fields = record.len(),
                anonymized = outcome.fields_transformed,
                "Processed file"
            );
        } else {
            tracing::info!(
                path = %path.display(),
                fields = record.len(),
                anonymized = outcome.fields_transformed,
                "Processed file"
            );
        }

        BatchResult::Success(Box::new(ProcessedRecord {
            path: path.to_path_buf(),
            record,
            fragment: outcome.fragment,
            salt: outcome.salt,
            outputs_written,
            output_failures,
        }))
    }

    /// Writes every routed per-file target; returns (written, failed)
    fn write_outputs(&self, source: &Path, record: &FlatRecord) -> (usize, usize) {
        if self.plan.per_file_kinds().next().is_none() {
            return (0, 0);
        }

        let stem = naming::stem(source);
        let fingerprint = naming::fingerprint(source);
        let mut written = 0;
        let mut failed = 0;

        for kind in self.plan.per_file_kinds() {
            for target in self.plan.targets(kind) {
                let dest = self.plan.resolve(kind, target, &stem, &fingerprint);
                match self.write_target(kind, record, source, &dest) {
                    Ok(WriteStatus::Written) => written += 1,
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(
                            kind = %e.kind(),
                            source = %source.display(),
                            error = %e,
                            "Output target skipped"
                        );
                        failed += 1;
                    }
                }
            }
        }

        (written, failed)
    }

    fn write_target(
        &self,
        kind: OutputKind,
        record: &FlatRecord,
        source: &Path,
        dest: &Path,
    ) -> Result<WriteStatus, RecordError> {
        if !self.supports(kind) {
            tracing::debug!(kind = %kind, dest = %dest.display(), "No renderer for output type");
            return Ok(WriteStatus::Unsupported);
        }

        if self.settings.dry_run {
            tracing::info!(kind = %kind, dest = %dest.display(), "Dry run: would write output");
            return Ok(WriteStatus::DryRun);
        }

        if self.settings.no_overwrite && dest.exists() {
            tracing::warn!(kind = %kind, dest = %dest.display(), "Output exists, not overwriting");
            return Ok(WriteStatus::SkippedExisting);
        }

        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| RecordError::output_write(kind, dest, e))?;
        }

        let result = match kind {
            OutputKind::Json => writers::write_json(record, dest),
            OutputKind::Csv => writers::write_csv_row(record, dest),
            OutputKind::Fhir => writers::write_fhir(record, dest),
            other => match self.renderers.find(other) {
                Some(renderer) => renderer.render(other, record, source, dest),
                None => return Ok(WriteStatus::Unsupported),
            },
        };
        result.map_err(|e| RecordError::output_write(kind, dest, e))?;

        Ok(WriteStatus::Written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::backend::KeyedHashBackend;
    use crate::anonymization::{AnonymizationMode, AnonymizationRequest};
    use crate::config::secret_string;
    use crate::core::routing::route;
    use crate::domain::FailureKind;
    use std::fs;
    use tempfile::tempdir;

    fn pipeline(plan: OutputPlan, engine: Option<Arc<AnonymizationEngine>>, settings: PipelineSettings) -> RecordPipeline {
        RecordPipeline::new(
            Arc::new(JsonRecordDecoder),
            engine,
            plan,
            RendererRegistry::with_defaults(),
            settings,
        )
    }

    fn write_input(dir: &Path, name: &str, body: &str) -> CandidateFile {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        CandidateFile::new(path, 0)
    }

    #[test]
    fn test_process_writes_routed_outputs() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out");
        let file = write_input(dir.path(), "scan.json", r#"{"modality":"CT","rows":512}"#);
        let plan = route(&["json", "csv", "html"], &out);

        let result = pipeline(plan, None, PipelineSettings::default()).process(&file);

        let BatchResult::Success(processed) = result else {
            panic!("expected success");
        };
        assert_eq!(processed.outputs_written, 3);
        assert_eq!(processed.output_failures, 0);
        let fp = naming::fingerprint(file.path());
        assert!(out.join(format!("scan_{fp}_metadata.json")).exists());
        assert!(out.join(format!("scan_{fp}_metadata.csv")).exists());
        assert!(out.join(format!("scan_{fp}_report.html")).exists());
    }

    #[test]
    fn test_corrupt_file_is_classified() {
        let dir = tempdir().unwrap();
        let file = write_input(dir.path(), "bad.json", "{not json");

        let result = pipeline(OutputPlan::default(), None, PipelineSettings::default()).process(&file);

        match result {
            BatchResult::Failure(failure) => assert_eq!(failure.kind, FailureKind::Decode),
            BatchResult::Success(_) => panic!("expected failure"),
        }
    }

    #[test]
    fn test_wrong_shape_is_classified() {
        let dir = tempdir().unwrap();
        let file = write_input(dir.path(), "list.json", "[1,2]");

        let result = pipeline(OutputPlan::default(), None, PipelineSettings::default()).process(&file);

        match result {
            BatchResult::Failure(failure) => assert_eq!(failure.kind, FailureKind::Sanitize),
            BatchResult::Success(_) => panic!("expected failure"),
        }
    }

    #[test]
    fn test_failed_target_does_not_block_others() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out");
        let file = write_input(dir.path(), "scan.json", r#"{"modality":"CT"}"#);

        // a regular file where a directory is needed
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"x").unwrap();
        let bad = format!("csv={}", blocker.join("x.csv").display());
        let plan = route(&["json".to_string(), bad], &out);

        let result = pipeline(plan, None, PipelineSettings::default()).process(&file);

        let BatchResult::Success(processed) = result else {
            panic!("expected success");
        };
        assert_eq!(processed.outputs_written, 1);
        assert_eq!(processed.output_failures, 1);
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out");
        let file = write_input(dir.path(), "scan.json", r#"{"modality":"CT"}"#);
        let settings = PipelineSettings {
            dry_run: true,
            ..Default::default()
        };

        let result = pipeline(route(&["json"], &out), None, settings).process(&file);

        assert!(result.is_success());
        assert!(!out.exists());
    }

    #[test]
    fn test_no_overwrite_keeps_existing() {
        let dir = tempdir().unwrap();
        let file = write_input(dir.path(), "scan.json", r#"{"modality":"CT"}"#);
        let existing = dir.path().join("keep.json");
        fs::write(&existing, b"original").unwrap();
        let settings = PipelineSettings {
            no_overwrite: true,
            ..Default::default()
        };
        let spec = format!("json={}", existing.display());

        let result = pipeline(route(&[spec], dir.path()), None, settings).process(&file);

        assert!(result.is_success());
        assert_eq!(fs::read_to_string(&existing).unwrap(), "original");
    }

    #[test]
    fn test_anonymization_fragment_is_returned() {
        let dir = tempdir().unwrap();
        let file = write_input(
            dir.path(),
            "scan.json",
            r#"{"Patient Name":"DOE^JANE","modality":"MR"}"#,
        );
        let engine = AnonymizationEngine::new(
            AnonymizationRequest {
                tags: vec!["patient_name".to_string()],
                mode: AnonymizationMode::Pseudonymize,
                salt: Some(secret_string("pipeline-salt".to_string())),
            },
            Arc::new(KeyedHashBackend),
        );

        let result = pipeline(
            OutputPlan::default(),
            Some(Arc::new(engine)),
            PipelineSettings::default(),
        )
        .process(&file);

        let BatchResult::Success(processed) = result else {
            panic!("expected success");
        };
        let token = processed.fragment.get("DOE^JANE").unwrap();
        assert_eq!(processed.record.cell("Patient Name"), token);
        assert_eq!(processed.record.cell("modality"), "MR");
        assert!(processed.salt.is_some());
    }
}
