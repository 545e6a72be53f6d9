use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use crate::cache::{CacheEntry, PuzzleCache};
use crate::error::CacheError;

// In-process cache, same upsert semantics as the SQLite one
#[derive(Default)]
pub struct MemoryCache {
    entries: DashMap<String, CacheEntry>, // fingerprint -> entry
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(&self, fingerprint: &str) -> Option<CacheEntry> {
        self.entries.get(fingerprint).map(|e| e.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl PuzzleCache for MemoryCache {
    async fn get(&self, fingerprint: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.entries.get(fingerprint).map(|e| e.response.clone()))
    }

    async fn put(
        &self,
        fingerprint: &str,
        request: &[u8],
        response: &[u8],
    ) -> Result<(), CacheError> {
        self.entries.insert(
            fingerprint.to_string(),
            CacheEntry {
                fingerprint: fingerprint.to_string(),
                request: request.to_vec(),
                response: response.to_vec(),
                created_at: Utc::now(),
            },
        );
        Ok(())
    }
}
