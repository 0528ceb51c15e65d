//! Content-based hashing for run IDs.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Run id from the run configuration, a digest of the inputs it read and the
/// engine version. Identical runs share an id.
pub fn compute_run_id<C: Serialize>(config: &C, inputs_digest: &str, version: &str) -> String {
    let mut hasher = Sha256::new();

    let config_json = serde_json::to_string(config).unwrap_or_default();
    hasher.update(config_json.as_bytes());

    hasher.update(inputs_digest.as_bytes());
    hasher.update(version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}

/// Hex digest of raw input bytes.
pub fn digest_bytes(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}
