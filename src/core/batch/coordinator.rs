//! Batch coordinator - main orchestrator for a run
//!
//! Setup problems (a batch root that is not a directory, an output directory
//! that cannot be created, invalid anonymization settings) are returned as
//! errors before any worker starts. After that the run always goes over the
//! full file list; per-file problems only show up in the summary.

use crate::anonymization::{AnonymizationEngine, AnonymizationMode, MappingDocument, PseudonymMapping, RunSalt};
use crate::config::ScrublineConfig;
use crate::core::aggregate::{build_sinks, AggregateSettings};
use crate::core::batch::collector::ResultCollector;
use crate::core::batch::dispatch::{clamp_concurrency, dispatch};
use crate::core::batch::summary::BatchSummary;
use crate::core::capabilities::Capabilities;
use crate::core::pipeline::{
    ArtifactRenderer, PipelineSettings, RecordDecoder, RecordPipeline, RendererRegistry,
};
use crate::core::routing::route;
use crate::core::scan::{collect_inputs, scan};
use crate::domain::{CandidateFile, Result, ScrublineError};
use crate::{log_batch_complete, log_batch_start};
use futures::StreamExt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Where the files of a run come from
#[derive(Debug, Clone)]
pub enum InputSource {
    /// Directories scanned for record files; each must exist
    BatchRoots(Vec<PathBuf>),
    /// Files, directories or `-` for paths on stdin
    Paths(Vec<PathBuf>),
}

/// Batch coordinator
pub struct BatchCoordinator {
    config: ScrublineConfig,
    capabilities: Capabilities,
    decoder: Arc<dyn RecordDecoder>,
    renderers: RendererRegistry,
    detail_logging: bool,
}

impl BatchCoordinator {
    /// Create a new coordinator with the built-in renderers
    pub fn new(
        config: ScrublineConfig,
        capabilities: Capabilities,
        decoder: Arc<dyn RecordDecoder>,
    ) -> Self {
        Self {
            config,
            capabilities,
            decoder,
            renderers: RendererRegistry::with_defaults(),
            detail_logging: false,
        }
    }

    /// Adds a renderer for image-like output types
    pub fn with_renderer(mut self, renderer: Arc<dyn ArtifactRenderer>) -> Self {
        self.renderers.register(renderer);
        self
    }

    /// Keep per-file log lines at info level even for large batches
    pub fn with_detail_logging(mut self, enabled: bool) -> Self {
        self.detail_logging = enabled;
        self
    }

    /// Resolves the input source into candidate files
    ///
    /// # Errors
    ///
    /// Returns a setup error if a batch root is not a directory, or if an
    /// explicit input path is missing.
    pub fn discover(&self, source: &InputSource) -> Result<Vec<CandidateFile>> {
        let extension = self.config.input.normalized_extension();
        let max_depth = self.config.input.max_depth;

        match source {
            InputSource::BatchRoots(roots) => {
                let mut files = Vec::new();
                for root in roots {
                    if !root.is_dir() {
                        return Err(ScrublineError::Setup(format!(
                            "Batch root is not a directory: {}",
                            root.display()
                        )));
                    }
                    files.extend(scan(root, max_depth, extension));
                }
                Ok(files)
            }
            InputSource::Paths(paths) => {
                collect_inputs(paths, max_depth, extension, std::io::stdin().lock())
            }
        }
    }

    /// Discovers the input files and runs the batch
    pub async fn execute(&self, source: &InputSource) -> Result<BatchSummary> {
        let files = self.discover(source)?;
        self.execute_files(files).await
    }

    /// Runs the batch over `files`
    ///
    /// # Errors
    ///
    /// Only setup failures are returned; per-file and per-target failures are
    /// counted in the summary.
    pub async fn execute_files(&self, files: Vec<CandidateFile>) -> Result<BatchSummary> {
        let start_time = Instant::now();
        let run_id = Uuid::new_v4();
        let dry_run = self.config.application.dry_run;
        let concurrency = clamp_concurrency(self.config.processing.concurrency);

        let plan = route(&self.config.output.targets, &self.config.output.directory);
        if plan.is_empty() {
            tracing::info!("No outputs requested; records are only validated");
        }

        if dry_run {
            tracing::info!(
                dir = %self.config.output.directory.display(),
                "Dry run: would create output directory"
            );
        } else {
            std::fs::create_dir_all(&self.config.output.directory).map_err(|e| {
                ScrublineError::Setup(format!(
                    "Cannot create output directory {}: {e}",
                    self.config.output.directory.display()
                ))
            })?;
        }

        let engine = if self.config.anonymization.enabled {
            Some(Arc::new(AnonymizationEngine::from_config(
                &self.config.anonymization,
                &self.capabilities,
            )?))
        } else {
            None
        };

        let total = files.len();
        let settings = PipelineSettings {
            dry_run,
            no_overwrite: self.config.output.no_overwrite,
            suppress_details: !self.detail_logging && total > self.config.input.min_progress_report,
        };
        let pipeline = Arc::new(RecordPipeline::new(
            Arc::clone(&self.decoder),
            engine.clone(),
            plan.clone(),
            self.renderers.clone(),
            settings,
        ));

        for kind in pipeline.unsupported_kinds() {
            tracing::warn!(
                kind = %kind,
                "No renderer available for output type; it will be skipped for every file"
            );
        }

        let sinks = build_sinks(
            &plan,
            &self.capabilities,
            AggregateSettings {
                flush_interval: self.config.output.flush_interval,
                dry_run,
                no_overwrite: self.config.output.no_overwrite,
            },
        );

        if total == 0 {
            tracing::warn!("No input files found");
        }
        log_batch_start!(run_id, total, concurrency);

        let mut summary = BatchSummary::new(run_id, dry_run);
        summary.total_files = total;
        let mut collector = ResultCollector::new(sinks, summary);

        let mut results = dispatch(pipeline, files, concurrency);
        while let Some(result) = results.next().await {
            collector.accept(result);
        }

        let (mut summary, mapping, salt) = collector.finish();

        if let Some(engine) = &engine {
            if engine.mode() == AnonymizationMode::Pseudonymize {
                summary.mapping_path = self.persist_mapping(mapping, salt.as_ref(), dry_run);
            }
        }

        let summary = summary.with_duration(start_time.elapsed());
        log_batch_complete!(summary.successful, summary.failed, summary.duration);
        summary.log_summary();

        Ok(summary)
    }

    /// Writes the mapping file if one was requested; returns its path
    fn persist_mapping(
        &self,
        mapping: PseudonymMapping,
        salt: Option<&RunSalt>,
        dry_run: bool,
    ) -> Option<PathBuf> {
        let Some(path) = &self.config.anonymization.mapping_path else {
            if salt.and_then(RunSalt::persistable).is_some() {
                tracing::warn!(
                    "Generated salt was not persisted; pseudonyms of this run cannot be reproduced"
                );
            }
            return None;
        };

        if dry_run {
            tracing::info!(
                path = %path.display(),
                entries = mapping.len(),
                "Dry run: would write pseudonym mapping"
            );
            return None;
        }

        if mapping.is_empty() {
            tracing::info!(path = %path.display(), "No pseudonyms created; mapping file not written");
            return None;
        }

        let document = MappingDocument::new(mapping, salt.and_then(RunSalt::persistable).map(str::to_string));
        match document.persist(path) {
            Ok(()) => Some(path.clone()),
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Failed to write pseudonym mapping");
                None
            }
        }
    }
}
