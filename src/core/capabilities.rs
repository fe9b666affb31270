//! Optional-backend capability descriptor
//!
//! Components that have an optional code path take a [`Capabilities`] value
//! in their constructor instead of probing for it themselves, so either path
//! can be exercised in tests.

use serde::Serialize;

/// What this build and configuration can do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    /// PBKDF2 pseudonym backend compiled in (`hardened-kdf` feature)
    pub hardened_kdf: bool,

    /// Aggregates are buffered and written with the union of all fields
    pub materialized_aggregation: bool,
}

impl Capabilities {
    /// Reports what the current build provides
    ///
    /// Materialized aggregation is opt-in, so it starts disabled.
    pub fn detect() -> Self {
        Self {
            hardened_kdf: cfg!(feature = "hardened-kdf"),
            materialized_aggregation: false,
        }
    }

    pub fn with_materialized_aggregation(mut self, enabled: bool) -> Self {
        self.materialized_aggregation = enabled;
        self
    }

    /// Human-readable lines for `check-deps`
    pub fn describe(&self) -> Vec<(&'static str, bool, &'static str)> {
        vec![
            (
                "hardened-kdf",
                self.hardened_kdf,
                "PBKDF2-HMAC-SHA256 pseudonyms (fallback: truncated HMAC-SHA256)",
            ),
            (
                "materialized-aggregation",
                self.materialized_aggregation,
                "union-of-fields aggregates (default: schema from first record)",
            ),
        ]
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::detect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_follows_feature_flag() {
        let caps = Capabilities::detect();
        assert_eq!(caps.hardened_kdf, cfg!(feature = "hardened-kdf"));
        assert!(!caps.materialized_aggregation);
    }

    #[test]
    fn test_with_materialized_aggregation() {
        let caps = Capabilities::detect().with_materialized_aggregation(true);
        assert!(caps.materialized_aggregation);
        assert_eq!(caps.describe().len(), 2);
    }
}
