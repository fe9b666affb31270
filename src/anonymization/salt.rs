//! Run salt selection

use crate::config::{secret_string, SecretString};
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use rand::RngCore;
use secrecy::ExposeSecret;
use std::sync::OnceLock;

/// Random bytes behind a generated salt
const GENERATED_SALT_BYTES: usize = 12;

/// Where the salt of a run came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaltOrigin {
    /// Supplied by the operator; stable across runs
    Operator,
    /// Generated for this run; reproducible only if persisted
    Generated,
}

/// Keying material used for every pseudonym of a run
#[derive(Debug, Clone)]
pub struct RunSalt {
    value: SecretString,
    origin: SaltOrigin,
}

impl RunSalt {
    pub fn operator(value: SecretString) -> Self {
        Self {
            value,
            origin: SaltOrigin::Operator,
        }
    }

    fn generated(value: String) -> Self {
        Self {
            value: secret_string(value),
            origin: SaltOrigin::Generated,
        }
    }

    pub fn origin(&self) -> SaltOrigin {
        self.origin
    }

    /// Bytes fed to the pseudonym backend
    pub fn key_bytes(&self) -> &[u8] {
        self.value.expose_secret().as_bytes()
    }

    /// The salt text to store next to the mapping
    ///
    /// Only generated salts are returned; an operator salt already lives
    /// wherever the operator keeps it and is never written out.
    pub fn persistable(&self) -> Option<&str> {
        match self.origin {
            SaltOrigin::Generated => Some(self.value.expose_secret().as_ref()),
            SaltOrigin::Operator => None,
        }
    }
}

/// Hands out one salt per run
///
/// With an operator salt that salt is returned every time. Without one, a
/// random salt is generated on first use and reused for the rest of the run.
#[derive(Debug, Default)]
pub struct SaltSource {
    operator: Option<RunSalt>,
    generated: OnceLock<RunSalt>,
}

impl SaltSource {
    pub fn new(operator: Option<SecretString>) -> Self {
        Self {
            operator: operator.map(RunSalt::operator),
            generated: OnceLock::new(),
        }
    }

    /// The salt of this run, generating it on first call if needed
    pub fn get(&self) -> &RunSalt {
        if let Some(ref salt) = self.operator {
            return salt;
        }
        self.generated.get_or_init(|| {
            tracing::warn!(
                "No anonymization salt provided: generated a random salt for this run. \
                 Pseudonyms are reproducible only if the mapping file (which stores it) is kept"
            );
            RunSalt::generated(generate_salt())
        })
    }

    /// The salt of this run if one exists yet
    pub fn current(&self) -> Option<&RunSalt> {
        self.operator.as_ref().or_else(|| self.generated.get())
    }
}

/// URL-safe base64 of 12 random bytes
pub fn generate_salt() -> String {
    let mut bytes = [0u8; GENERATED_SALT_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE.encode(bytes)
}
