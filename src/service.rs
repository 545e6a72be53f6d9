use std::sync::Arc;

use crate::cache::{PuzzleCache, make_cache_key};
use crate::error::Result;
use crate::metrics::{
    CACHE_HITS, CACHE_MISSES, CACHE_READ_FAULTS, CACHE_WRITE_FAULTS, PROVIDER_FAILURES,
};
use crate::models::PuzzleRequest;
use crate::provider::PuzzleGenerator;

// Payload handed back to the caller
#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    pub fingerprint: String,
    pub payload: Vec<u8>,
    pub cache_hit: bool,
}

/// Cache-or-generate flow. Cache faults never fail a request; provider faults always do.
#[derive(Clone)]
pub struct PuzzleService {
    cache: Arc<dyn PuzzleCache>,
    generator: Arc<dyn PuzzleGenerator>,
}

impl PuzzleService {
    pub fn new(cache: Arc<dyn PuzzleCache>, generator: Arc<dyn PuzzleGenerator>) -> Self {
        Self { cache, generator }
    }

    pub async fn get_or_generate(&self, req: &PuzzleRequest) -> Result<Generated> {
        let fingerprint = make_cache_key(req)?;

        // check cache first, a broken store counts as a miss
        match self.cache.get(&fingerprint.key).await {
            Ok(Some(payload)) => {
                CACHE_HITS.inc();
                tracing::info!("cache hit for {}", fingerprint.key);
                return Ok(Generated {
                    fingerprint: fingerprint.key,
                    payload,
                    cache_hit: true,
                });
            }
            Ok(None) => {
                CACHE_MISSES.inc();
                tracing::info!("cache miss for {}", fingerprint.key);
            }
            Err(e) => {
                CACHE_MISSES.inc();
                CACHE_READ_FAULTS.inc();
                tracing::warn!("cache lookup failed for {}: {}", fingerprint.key, e);
            }
        }

        let payload = match self.generator.generate(req).await {
            Ok(payload) => payload,
            Err(e) => {
                PROVIDER_FAILURES.inc();
                tracing::error!("puzzle generation failed for {:?}: {}", req, e);
                return Err(e);
            }
        };

        match self
            .cache
            .put(&fingerprint.key, &fingerprint.request_bytes, &payload)
            .await
        {
            Ok(()) => tracing::info!("cached new puzzle for {}", fingerprint.key),
            Err(e) => {
                CACHE_WRITE_FAULTS.inc();
                tracing::warn!("failed to cache puzzle for {}: {}", fingerprint.key, e);
            }
        }

        Ok(Generated {
            fingerprint: fingerprint.key,
            payload,
            cache_hit: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::error::{CacheError, GatewayError};
    use crate::models::{Difficulty, GameType};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingGenerator {
        calls: AtomicUsize,
        payload: &'static [u8],
    }

    impl CountingGenerator {
        fn new(payload: &'static [u8]) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                payload,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PuzzleGenerator for CountingGenerator {
        async fn generate(&self, _req: &PuzzleRequest) -> Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.payload.to_vec())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl PuzzleGenerator for FailingGenerator {
        async fn generate(&self, _req: &PuzzleRequest) -> Result<Vec<u8>> {
            Err(GatewayError::ProviderStatus {
                status: 503,
                body: "overloaded".into(),
            })
        }
    }

    // store that fails reads and/or writes
    struct BrokenCache {
        fail_get: bool,
        fail_put: bool,
        inner: MemoryCache,
    }

    #[async_trait]
    impl PuzzleCache for BrokenCache {
        async fn get(&self, fingerprint: &str) -> std::result::Result<Option<Vec<u8>>, CacheError> {
            if self.fail_get {
                return Err(CacheError::Poisoned);
            }
            self.inner.get(fingerprint).await
        }

        async fn put(
            &self,
            fingerprint: &str,
            request: &[u8],
            response: &[u8],
        ) -> std::result::Result<(), CacheError> {
            if self.fail_put {
                return Err(CacheError::Poisoned);
            }
            self.inner.put(fingerprint, request, response).await
        }
    }

    fn request() -> PuzzleRequest {
        PuzzleRequest {
            game_type: GameType::Crossword,
            difficulty: Difficulty::Easy,
            topics: vec!["animals".into(), "nature".into()],
            language: "pt".into(),
        }
    }

    #[tokio::test]
    async fn miss_generates_and_stores() {
        let cache = Arc::new(MemoryCache::new());
        let generator = CountingGenerator::new(b"{\"gameType\":\"crossword\"}");
        let service = PuzzleService::new(cache.clone(), generator.clone());

        let out = service.get_or_generate(&request()).await.unwrap();

        assert!(!out.cache_hit);
        assert_eq!(out.payload, b"{\"gameType\":\"crossword\"}".to_vec());
        assert_eq!(generator.calls(), 1);

        let entry = cache.entry(&out.fingerprint).unwrap();
        assert_eq!(entry.response, out.payload);
        assert_eq!(entry.request, serde_json::to_vec(&request()).unwrap());
    }

    #[tokio::test]
    async fn hit_skips_generator() {
        let cache = Arc::new(MemoryCache::new());
        let key = make_cache_key(&request()).unwrap();
        cache.put(&key.key, &key.request_bytes, b"stored bytes").await.unwrap();

        let generator = CountingGenerator::new(b"fresh");
        let service = PuzzleService::new(cache, generator.clone());

        let out = service.get_or_generate(&request()).await.unwrap();

        assert!(out.cache_hit);
        assert_eq!(out.payload, b"stored bytes".to_vec());
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn repeated_request_generates_once() {
        let generator = CountingGenerator::new(b"{}");
        let service = PuzzleService::new(Arc::new(MemoryCache::new()), generator.clone());

        let first = service.get_or_generate(&request()).await.unwrap();
        let second = service.get_or_generate(&request()).await.unwrap();

        assert!(!first.cache_hit);
        assert!(second.cache_hit);
        assert_eq!(first.payload, second.payload);
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn read_fault_falls_back_to_generation() {
        let cache = Arc::new(BrokenCache {
            fail_get: true,
            fail_put: false,
            inner: MemoryCache::new(),
        });
        let generator = CountingGenerator::new(b"regenerated");
        let service = PuzzleService::new(cache.clone(), generator.clone());

        let out = service.get_or_generate(&request()).await.unwrap();

        assert_eq!(out.payload, b"regenerated".to_vec());
        assert_eq!(generator.calls(), 1);
        assert_eq!(cache.inner.len(), 1);
    }

    #[tokio::test]
    async fn write_fault_still_returns_payload() {
        let cache = Arc::new(BrokenCache {
            fail_get: false,
            fail_put: true,
            inner: MemoryCache::new(),
        });
        let generator = CountingGenerator::new(b"generated");
        let service = PuzzleService::new(cache.clone(), generator.clone());

        let out = service.get_or_generate(&request()).await.unwrap();

        assert_eq!(out.payload, b"generated".to_vec());
        assert!(cache.inner.is_empty());
    }

    #[tokio::test]
    async fn provider_failure_fails_request_and_caches_nothing() {
        let cache = Arc::new(MemoryCache::new());
        let service = PuzzleService::new(cache.clone(), Arc::new(FailingGenerator));

        let err = service.get_or_generate(&request()).await.unwrap_err();

        assert!(matches!(err, GatewayError::ProviderStatus { status: 503, .. }));
        assert!(cache.is_empty());
    }
}
