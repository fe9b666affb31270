//! De-identification of record fields
//!
//! Selected fields of each record are either replaced by a deterministic
//! keyed pseudonym or by a fixed sentinel. Within a run every field of every
//! file is keyed by the same salt, so equal values always map to equal tokens
//! and the per-file mapping fragments can be merged in any order.
//!
//! # Architecture
//!
//! - **Key resolution** ([`keys`]): finds a requested field under snake_case,
//!   title-case or upper-case spellings
//! - **Backends** ([`backend`]): PBKDF2 or keyed-hash token derivation, picked
//!   once per run from the capability descriptor
//! - **Salt** ([`salt`]): operator-supplied or generated once per run
//! - **Mapping** ([`mapping`]): union-merged original-to-token table and the
//!   mapping file written at the end of a batch
//! - **Engine** ([`engine`]): applies a request to one record

pub mod backend;
pub mod config;
pub mod engine;
pub mod keys;
pub mod mapping;
pub mod salt;

// Re-export main types
pub use config::{AnonymizationConfig, AnonymizationMode, DEFAULT_TAGS};
pub use engine::{AnonymizationEngine, AnonymizationOutcome, AnonymizationRequest, REDACTED};
pub use keys::resolve_key;
pub use mapping::{MappingDocument, PseudonymMapping};
pub use salt::{RunSalt, SaltOrigin};
