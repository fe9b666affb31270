//! Artifact naming

use sha2::{Digest, Sha256};
use std::path::Path;

/// Hex characters kept from the path digest
const FINGERPRINT_LEN: usize = 8;

/// Short digest of a resolved path
///
/// The same path always yields the same fingerprint, so artifacts of two
/// files that share a stem do not collide.
///
/// ```
/// use scrubline::core::pipeline::naming::fingerprint;
/// use std::path::Path;
///
/// let a = fingerprint(Path::new("/data/a/scan.json"));
/// let b = fingerprint(Path::new("/data/b/scan.json"));
/// assert_eq!(a.len(), 8);
/// assert_ne!(a, b);
/// ```
pub fn fingerprint(path: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.to_string_lossy().as_bytes());
    let mut digest = format!("{:x}", hasher.finalize());
    digest.truncate(FINGERPRINT_LEN);
    digest
}

/// File stem used in artifact names
pub fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "record".to_string())
}
