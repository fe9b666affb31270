//! Record decoding seam

use crate::domain::RecordError;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Turns one input file into a structured value
///
/// Implementations must be stateless across calls; one decoder instance is
/// shared by all workers.
pub trait RecordDecoder: Send + Sync {
    /// Decodes the file at `path`
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Decode`] for unreadable or malformed input.
    fn decode(&self, path: &Path) -> Result<Value, RecordError>;
}

/// Reads one JSON document per file
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRecordDecoder;

impl RecordDecoder for JsonRecordDecoder {
    fn decode(&self, path: &Path) -> Result<Value, RecordError> {
        let file = File::open(path).map_err(|e| RecordError::decode(path, e))?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| RecordError::decode(path, e))
    }
}
