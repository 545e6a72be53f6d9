pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::error::{CacheError, GatewayError};
use crate::models::PuzzleRequest;

pub use memory::MemoryCache;
pub use sqlite::SqliteCache;

// Stored row: one per fingerprint, last write wins
#[derive(Clone, Debug, PartialEq)]
pub struct CacheEntry {
    pub fingerprint: String,
    pub request: Vec<u8>,
    pub response: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

// Cache key plus the exact bytes it was derived from
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fingerprint {
    pub key: String,
    pub request_bytes: Vec<u8>,
}

/// Create a cache key: SHA-256 of the request's canonical JSON, lowercase hex.
pub fn make_cache_key(req: &PuzzleRequest) -> Result<Fingerprint, GatewayError> {
    let request_bytes = serde_json::to_vec(req).map_err(GatewayError::Fingerprint)?;
    let mut hasher = Sha256::new();
    hasher.update(&request_bytes);
    Ok(Fingerprint {
        key: format!("{:x}", hasher.finalize()),
        request_bytes,
    })
}

/// Storage for generated puzzles keyed by fingerprint.
#[async_trait]
pub trait PuzzleCache: Send + Sync {
    /// `Ok(None)` on a miss, `Err` only when the store itself failed.
    async fn get(&self, fingerprint: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Insert or overwrite the entry for `fingerprint`.
    async fn put(
        &self,
        fingerprint: &str,
        request: &[u8],
        response: &[u8],
    ) -> Result<(), CacheError>;
}
