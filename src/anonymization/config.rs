//! Anonymization configuration

use crate::config::{secret_string, SecretString};
use anyhow::{Context, Result};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Fields transformed when no explicit tag list is given
pub const DEFAULT_TAGS: &[&str] = &[
    "patient_name",
    "patient_id",
    "patient_birth_date",
    "patient_birth_time",
    "patient_age",
    "patient_address",
    "other_patient_ids",
    "other_patient_names",
    "referring_physician_name",
    "performing_physician_name",
    "operators_name",
    "institution_name",
    "station_name",
    "accession_number",
    "study_id",
    "series_description",
    "study_comments",
];

/// What happens to a matched field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnonymizationMode {
    /// Replace with a deterministic keyed token
    #[default]
    Pseudonymize,
    /// Replace with the `REDACTED` sentinel
    Remove,
}

impl FromStr for AnonymizationMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pseudonymize" | "pseudonymise" | "hash" => Ok(Self::Pseudonymize),
            "remove" | "redact" => Ok(Self::Remove),
            other => Err(format!(
                "Invalid anonymization mode '{other}'. Must be one of: pseudonymize, remove"
            )),
        }
    }
}

impl fmt::Display for AnonymizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pseudonymize => f.write_str("pseudonymize"),
            Self::Remove => f.write_str("remove"),
        }
    }
}

/// Anonymization settings for a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizationConfig {
    /// Enable/disable anonymization
    #[serde(default)]
    pub enabled: bool,

    /// Pseudonymize or remove matched fields
    #[serde(default)]
    pub mode: AnonymizationMode,

    /// Field names to transform, resolved against each record's keys
    #[serde(default = "default_tags")]
    pub tags: Vec<String>,

    /// Operator salt; a random per-run salt is generated when absent
    #[serde(default, skip_serializing)]
    pub salt: Option<SecretString>,

    /// Where the pseudonym mapping is written at the end of the batch
    #[serde(default)]
    pub mapping_path: Option<PathBuf>,

    /// Use the PBKDF2 backend when this build has it
    #[serde(default = "default_true")]
    pub prefer_hardened: bool,

    /// PBKDF2 iteration count
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Derived key length for the PBKDF2 backend
    #[serde(default = "default_token_bytes")]
    pub token_bytes: usize,
}

impl Default for AnonymizationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            mode: AnonymizationMode::default(),
            tags: default_tags(),
            salt: None,
            mapping_path: None,
            prefer_hardened: true,
            kdf_iterations: default_kdf_iterations(),
            token_bytes: default_token_bytes(),
        }
    }
}

impl AnonymizationConfig {
    /// Validate the configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.enabled && self.tags.iter().all(|t| t.trim().is_empty()) {
            return Err("anonymization.tags cannot be empty when anonymization is enabled".to_string());
        }

        if self.kdf_iterations == 0 {
            return Err("anonymization.kdf_iterations must be > 0".to_string());
        }

        if !(4..=64).contains(&self.token_bytes) {
            return Err(format!(
                "anonymization.token_bytes must be between 4 and 64, got {}",
                self.token_bytes
            ));
        }

        if let Some(ref salt) = self.salt {
            if salt.expose_secret().is_empty() {
                return Err("anonymization.salt cannot be an empty string".to_string());
            }
        }

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("SCRUBLINE_ANONYMIZATION_ENABLED") {
            self.enabled = val
                .parse()
                .context("Invalid SCRUBLINE_ANONYMIZATION_ENABLED value")?;
        }

        if let Ok(val) = std::env::var("SCRUBLINE_ANONYMIZATION_MODE") {
            self.mode = val.parse().map_err(anyhow::Error::msg)?;
        }

        if let Ok(val) = std::env::var("SCRUBLINE_ANONYMIZATION_TAGS") {
            self.tags = split_tags(&val);
        }

        if let Ok(val) = std::env::var("SCRUBLINE_ANONYMIZATION_SALT") {
            self.salt = Some(secret_string(val));
        }

        if let Ok(val) = std::env::var("SCRUBLINE_ANONYMIZATION_MAPPING_PATH") {
            self.mapping_path = Some(PathBuf::from(val));
        }

        if let Ok(val) = std::env::var("SCRUBLINE_ANONYMIZATION_KDF_ITERATIONS") {
            self.kdf_iterations = val
                .parse()
                .context("Invalid SCRUBLINE_ANONYMIZATION_KDF_ITERATIONS value")?;
        }

        Ok(())
    }
}

/// Splits a comma-separated tag list, dropping blanks
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn default_tags() -> Vec<String> {
    DEFAULT_TAGS.iter().map(|t| t.to_string()).collect()
}

fn default_true() -> bool {
    true
}

fn default_kdf_iterations() -> u32 {
    100_000
}

fn default_token_bytes() -> usize {
    12
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnonymizationConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.mode, AnonymizationMode::Pseudonymize);
        assert_eq!(config.tags.len(), DEFAULT_TAGS.len());
        assert!(config.tags.contains(&"patient_name".to_string()));
        assert!(config.salt.is_none());
        assert!(config.prefer_hardened);
        assert_eq!(config.kdf_iterations, 100_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("remove".parse::<AnonymizationMode>(), Ok(AnonymizationMode::Remove));
        assert_eq!(
            "Pseudonymize".parse::<AnonymizationMode>(),
            Ok(AnonymizationMode::Pseudonymize)
        );
        assert!("scramble".parse::<AnonymizationMode>().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_token_bytes() {
        let config = AnonymizationConfig {
            token_bytes: 2,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_empty_salt() {
        let config = AnonymizationConfig {
            salt: Some(secret_string(String::new())),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_split_tags() {
        assert_eq!(
            split_tags("patient_name, patient_id,,"),
            vec!["patient_name".to_string(), "patient_id".to_string()]
        );
    }

    #[test]
    fn test_deserialize_section() {
        let config: AnonymizationConfig = toml::from_str(
            r#"
enabled = true
mode = "remove"
tags = ["patient_name"]
"#,
        )
        .unwrap();
        assert!(config.enabled);
        assert_eq!(config.mode, AnonymizationMode::Remove);
        assert_eq!(config.tags, vec!["patient_name".to_string()]);
        assert_eq!(config.token_bytes, 12);
    }
}
