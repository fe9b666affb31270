//! Pseudonymization backends
//!
//! A backend turns `(value, salt)` into a stable token. Two implementations
//! exist and one is chosen per run by [`select_backend`]:
//!
//! - [`Pbkdf2Backend`]: PBKDF2-HMAC-SHA256 with a configurable iteration count
//!   and output length, base64url token. Only present with the `hardened-kdf`
//!   feature.
//! - [`KeyedHashBackend`]: HMAC-SHA256 truncated to 16 hex characters. Cheap
//!   to compute and therefore cheap to brute-force for low-entropy inputs such
//!   as dates or short identifiers; it is a fallback, not an equivalent.
//!
//! Both prefix tokens with [`TOKEN_PREFIX`].

#[cfg(feature = "hardened-kdf")]
pub mod kdf;
pub mod keyed_hash;

#[cfg(feature = "hardened-kdf")]
pub use kdf::Pbkdf2Backend;
pub use keyed_hash::KeyedHashBackend;

use crate::anonymization::config::AnonymizationConfig;
use crate::core::capabilities::Capabilities;
use crate::domain::RecordError;
use std::sync::Arc;

/// Readable prefix shared by every pseudonym token
pub const TOKEN_PREFIX: &str = "anon_";

/// Deterministic keyed value-to-token function
pub trait PseudonymBackend: Send + Sync {
    /// Short backend name for logs and summaries
    fn name(&self) -> &'static str;

    /// Whether the backend is a slow key-derivation function
    fn is_hardened(&self) -> bool;

    /// Derives the token for `value` keyed by `salt`
    ///
    /// Equal inputs always give equal tokens.
    fn derive(&self, value: &str, salt: &[u8]) -> Result<String, RecordError>;
}

/// Picks the backend for a run
///
/// The hardened backend is used when the configuration prefers it and the
/// capability descriptor reports it; otherwise the keyed hash is used. A
/// preferred-but-missing hardened backend is logged at debug level.
pub fn select_backend(
    capabilities: &Capabilities,
    config: &AnonymizationConfig,
) -> Arc<dyn PseudonymBackend> {
    if config.prefer_hardened {
        if capabilities.hardened_kdf {
            if let Some(backend) = hardened_backend(config) {
                return backend;
            }
        }

        let unavailable = RecordError::PseudonymBackendUnavailable(
            "built without the hardened-kdf feature".to_string(),
        );
        tracing::debug!(
            kind = %unavailable.kind(),
            error = %unavailable,
            fallback = KeyedHashBackend::NAME,
            "Falling back to keyed-hash pseudonyms"
        );
    }

    Arc::new(KeyedHashBackend)
}

#[cfg(feature = "hardened-kdf")]
fn hardened_backend(config: &AnonymizationConfig) -> Option<Arc<dyn PseudonymBackend>> {
    Some(Arc::new(Pbkdf2Backend::new(
        config.kdf_iterations,
        config.token_bytes,
    )))
}

#[cfg(not(feature = "hardened-kdf"))]
fn hardened_backend(_config: &AnonymizationConfig) -> Option<Arc<dyn PseudonymBackend>> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_keyed_hash_when_hardened_unavailable() {
        let caps = Capabilities {
            hardened_kdf: false,
            materialized_aggregation: false,
        };
        let backend = select_backend(&caps, &AnonymizationConfig::default());
        assert_eq!(backend.name(), KeyedHashBackend::NAME);
        assert!(!backend.is_hardened());
    }

    #[test]
    fn test_select_keyed_hash_when_not_preferred() {
        let config = AnonymizationConfig {
            prefer_hardened: false,
            ..Default::default()
        };
        let backend = select_backend(&Capabilities::detect(), &config);
        assert_eq!(backend.name(), KeyedHashBackend::NAME);
    }

    #[cfg(feature = "hardened-kdf")]
    #[test]
    fn test_select_hardened_when_available() {
        let backend = select_backend(&Capabilities::detect(), &AnonymizationConfig::default());
        assert_eq!(backend.name(), Pbkdf2Backend::NAME);
        assert!(backend.is_hardened());
    }
}
