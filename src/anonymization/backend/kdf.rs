//! PBKDF2-HMAC-SHA256 backend

use super::{PseudonymBackend, TOKEN_PREFIX};
use crate::domain::RecordError;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;

/// Slow key derivation keyed by the salt
///
/// The value is the PBKDF2 password and the run salt is the PBKDF2 salt. The
/// derived bytes are base64url-encoded without padding, so 12 bytes give a
/// 16 character token body.
#[derive(Debug, Clone, Copy)]
pub struct Pbkdf2Backend {
    iterations: u32,
    output_len: usize,
}

impl Pbkdf2Backend {
    pub const NAME: &'static str = "pbkdf2-hmac-sha256";

    pub fn new(iterations: u32, output_len: usize) -> Self {
        Self {
            iterations: iterations.max(1),
            output_len: output_len.max(1),
        }
    }
}

impl PseudonymBackend for Pbkdf2Backend {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn is_hardened(&self) -> bool {
        true
    }

    fn derive(&self, value: &str, salt: &[u8]) -> Result<String, RecordError> {
        let mut derived = vec![0u8; self.output_len];
        pbkdf2_hmac::<Sha256>(value.as_bytes(), salt, self.iterations, &mut derived);
        Ok(format!("{TOKEN_PREFIX}{}", URL_SAFE_NO_PAD.encode(&derived)))
    }
}
