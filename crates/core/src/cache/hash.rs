//! Content-addressed cache key generation.

use sha2::{Digest, Sha256};

/// Compute the cache key for a request URL.
///
/// The exact string is hashed without canonicalization, so `https://a/x` and
/// `https://a/x/` are distinct entries.
pub fn compute_cache_key(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}
