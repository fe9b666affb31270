//! Anonymization engine
//!
//! The engine applies an [`AnonymizationRequest`] to one [`FlatRecord`] at a
//! time. It is built once per run and shared read-only by all workers; the
//! only state it carries besides configuration is the lazily generated run
//! salt, which is initialized at most once.
//!
//! # Examples
//!
//! ```
//! use scrubline::anonymization::{AnonymizationEngine, AnonymizationRequest, AnonymizationMode};
//! use scrubline::anonymization::backend::KeyedHashBackend;
//! use scrubline::config::secret_string;
//! use scrubline::domain::FlatRecord;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let request = AnonymizationRequest {
//!     tags: vec!["patient_name".to_string()],
//!     mode: AnonymizationMode::Pseudonymize,
//!     salt: Some(secret_string("site-salt".to_string())),
//! };
//! let engine = AnonymizationEngine::new(request, Arc::new(KeyedHashBackend));
//!
//! let mut record = FlatRecord::new();
//! record.insert("Patient Name", json!("Doe^Jane"));
//! let outcome = engine.anonymize(&mut record);
//!
//! let token = record.get("Patient Name").and_then(|v| v.as_str()).unwrap();
//! assert!(token.starts_with("anon_"));
//! assert_eq!(outcome.fragment.get("Doe^Jane"), Some(token));
//! ```

use crate::anonymization::backend::{select_backend, PseudonymBackend};
use crate::anonymization::config::{AnonymizationConfig, AnonymizationMode};
use crate::anonymization::keys::resolve_key;
use crate::anonymization::mapping::PseudonymMapping;
use crate::anonymization::salt::{RunSalt, SaltSource};
use crate::config::SecretString;
use crate::core::capabilities::Capabilities;
use crate::domain::{FlatRecord, RecordError, Result, ScrublineError};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

/// Sentinel written over removed fields
pub const REDACTED: &str = "REDACTED";

/// Which fields to transform and how
#[derive(Debug, Clone)]
pub struct AnonymizationRequest {
    /// Field names in the order they are applied
    pub tags: Vec<String>,
    pub mode: AnonymizationMode,
    /// Operator salt; `None` means generate one for the run
    pub salt: Option<SecretString>,
}

impl AnonymizationRequest {
    pub fn from_config(config: &AnonymizationConfig) -> Self {
        Self {
            tags: config.tags.clone(),
            mode: config.mode,
            salt: config.salt.clone(),
        }
    }
}

/// What one call to [`AnonymizationEngine::anonymize`] produced
#[derive(Debug, Default)]
pub struct AnonymizationOutcome {
    /// Entries created by this call only
    pub fragment: PseudonymMapping,
    /// The run salt, when pseudonymizing
    pub salt: Option<RunSalt>,
    /// Number of record fields that were replaced
    pub fields_transformed: usize,
}

/// Applies pseudonymization or removal to records
pub struct AnonymizationEngine {
    tags: Vec<String>,
    mode: AnonymizationMode,
    backend: Arc<dyn PseudonymBackend>,
    salts: SaltSource,
}

impl AnonymizationEngine {
    pub fn new(request: AnonymizationRequest, backend: Arc<dyn PseudonymBackend>) -> Self {
        Self {
            tags: request.tags,
            mode: request.mode,
            backend,
            salts: SaltSource::new(request.salt),
        }
    }

    /// Builds the engine for a run, choosing the backend from `capabilities`
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the anonymization settings are invalid.
    pub fn from_config(config: &AnonymizationConfig, capabilities: &Capabilities) -> Result<Self> {
        config.validate().map_err(|e| {
            ScrublineError::Configuration(format!("Invalid anonymization configuration: {e}"))
        })?;

        let backend = select_backend(capabilities, config);
        tracing::info!(
            mode = %config.mode,
            backend = backend.name(),
            hardened = backend.is_hardened(),
            tags = config.tags.len(),
            operator_salt = config.salt.is_some(),
            "Anonymization enabled"
        );

        Ok(Self::new(AnonymizationRequest::from_config(config), backend))
    }

    pub fn mode(&self) -> AnonymizationMode {
        self.mode
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// The run salt if one has been chosen or generated
    pub fn run_salt(&self) -> Option<&RunSalt> {
        self.salts.current()
    }

    /// Pseudonym of `value` under the run salt
    pub fn pseudonymize(&self, value: &str) -> std::result::Result<String, RecordError> {
        self.backend.derive(value, self.salts.get().key_bytes())
    }

    /// Transforms the requested fields of `record` in place
    ///
    /// Tags that resolve to no key are skipped, as are null values. A key
    /// reached by more than one tag is transformed once. If a pseudonym cannot
    /// be derived the field is redacted rather than left in clear.
    pub fn anonymize(&self, record: &mut FlatRecord) -> AnonymizationOutcome {
        let mut outcome = AnonymizationOutcome::default();
        let mut touched: HashSet<String> = HashSet::new();

        for tag in &self.tags {
            let Some(key) = resolve_key(record, tag) else {
                continue;
            };
            if touched.contains(&key) {
                continue;
            }

            let original = match record.get(&key) {
                None | Some(Value::Null) => continue,
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
            };

            let replacement = match self.mode {
                AnonymizationMode::Remove => REDACTED.to_string(),
                AnonymizationMode::Pseudonymize => match self.pseudonymize(&original) {
                    Ok(token) => {
                        outcome.fragment.record(original, token.clone());
                        token
                    }
                    Err(e) => {
                        tracing::warn!(
                            field = %key,
                            error = %e,
                            "Pseudonym derivation failed, redacting field"
                        );
                        REDACTED.to_string()
                    }
                },
            };

            record.insert(key.clone(), Value::String(replacement));
            touched.insert(key);
            outcome.fields_transformed += 1;
        }

        if self.mode == AnonymizationMode::Pseudonymize {
            outcome.salt = self.salts.current().cloned();
        }

        outcome
    }
}
