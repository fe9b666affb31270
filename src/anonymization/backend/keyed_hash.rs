//! HMAC-SHA256 fallback backend

use super::{PseudonymBackend, TOKEN_PREFIX};
use crate::domain::RecordError;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Key used when the salt is empty
const EMPTY_SALT_KEY: &[u8] = b"default_salt";

/// Hex characters kept from the MAC
const TOKEN_HEX_LEN: usize = 16;

/// HMAC-SHA256 keyed by the salt, truncated to 16 hex characters
///
/// 64 bits of output and a single hash per value: collisions are unlikely at
/// batch scale but guessing inputs is fast for anyone holding the salt.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyedHashBackend;

impl KeyedHashBackend {
    pub const NAME: &'static str = "hmac-sha256";
}

impl PseudonymBackend for KeyedHashBackend {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn is_hardened(&self) -> bool {
        false
    }

    fn derive(&self, value: &str, salt: &[u8]) -> Result<String, RecordError> {
        let key = if salt.is_empty() { EMPTY_SALT_KEY } else { salt };
        let mut mac = HmacSha256::new_from_slice(key).map_err(|e| {
            RecordError::PseudonymBackendUnavailable(format!("HMAC key rejected: {e}"))
        })?;
        mac.update(value.as_bytes());
        let digest = format!("{:x}", mac.finalize().into_bytes());
        Ok(format!("{TOKEN_PREFIX}{}", &digest[..TOKEN_HEX_LEN]))
    }
}
