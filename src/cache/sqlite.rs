use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params, types::Type};
use std::sync::{Arc, Mutex};

use crate::cache::{CacheEntry, PuzzleCache};
use crate::error::CacheError;

/// SQLite-backed puzzle cache.
///
/// ```sql
/// CREATE TABLE cached_puzzles (
///     request_hash   TEXT PRIMARY KEY,
///     request_params BLOB NOT NULL,
///     response_data  BLOB NOT NULL,
///     created_at     TEXT NOT NULL
/// );
/// ```
pub struct SqliteCache {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteCache {
    /// Open (or create) the database at `path` and make sure the table exists.
    pub fn open(path: &str) -> Result<Self, CacheError> {
        let conn = Connection::open(path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS cached_puzzles (
                request_hash TEXT PRIMARY KEY,
                request_params BLOB NOT NULL,
                response_data BLOB NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        tracing::info!("puzzle cache ready at {}", path);

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    // rusqlite is blocking, so every statement runs on the blocking pool
    async fn with_conn<T, F>(&self, f: F) -> Result<T, CacheError>
    where
        F: FnOnce(&Connection) -> Result<T, CacheError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|_| CacheError::Poisoned)?;
            f(&*conn)
        })
        .await?
    }

    /// Full row for `fingerprint`, including the stored request bytes.
    pub async fn entry(&self, fingerprint: &str) -> Result<Option<CacheEntry>, CacheError> {
        let fingerprint = fingerprint.to_string();
        self.with_conn(move |conn| {
            let entry = conn
                .query_row(
                    "SELECT request_hash, request_params, response_data, created_at
                     FROM cached_puzzles
                     WHERE request_hash = ?1",
                    params![fingerprint],
                    |row| {
                        let created_at: String = row.get(3)?;
                        let created_at = DateTime::parse_from_rfc3339(&created_at)
                            .map_err(|e| {
                                rusqlite::Error::FromSqlConversionFailure(
                                    3,
                                    Type::Text,
                                    Box::new(e),
                                )
                            })?
                            .with_timezone(&Utc);
                        Ok(CacheEntry {
                            fingerprint: row.get(0)?,
                            request: row.get(1)?,
                            response: row.get(2)?,
                            created_at,
                        })
                    },
                )
                .optional()?;
            Ok(entry)
        })
        .await
    }

    pub async fn len(&self) -> Result<u64, CacheError> {
        self.with_conn(|conn| {
            let count: u64 =
                conn.query_row("SELECT COUNT(*) FROM cached_puzzles", [], |row| row.get(0))?;
            Ok(count)
        })
        .await
    }

    pub async fn is_empty(&self) -> Result<bool, CacheError> {
        Ok(self.len().await? == 0)
    }
}

#[async_trait]
impl PuzzleCache for SqliteCache {
    async fn get(&self, fingerprint: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let fingerprint = fingerprint.to_string();
        self.with_conn(move |conn| {
            let response = conn
                .query_row(
                    "SELECT response_data FROM cached_puzzles WHERE request_hash = ?1",
                    params![fingerprint],
                    |row| row.get::<_, Vec<u8>>(0),
                )
                .optional()?;
            Ok(response)
        })
        .await
    }

    async fn put(
        &self,
        fingerprint: &str,
        request: &[u8],
        response: &[u8],
    ) -> Result<(), CacheError> {
        let (fingerprint, request, response) =
            (fingerprint.to_string(), request.to_vec(), response.to_vec());
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO cached_puzzles (request_hash, request_params, response_data, created_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (request_hash) DO UPDATE SET
                    request_params = excluded.request_params,
                    response_data = excluded.response_data,
                    created_at = excluded.created_at",
                params![fingerprint, request, response, Utc::now().to_rfc3339()],
            )?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_creates_empty_table() {
        let cache = SqliteCache::open(":memory:").unwrap();
        assert_eq!(cache.len().await.unwrap(), 0);
        assert!(cache.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn test_miss_is_none() {
        let cache = SqliteCache::open(":memory:").unwrap();
        assert_eq!(cache.get("nope").await.unwrap(), None);
        assert_eq!(cache.entry("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let cache = SqliteCache::open(":memory:").unwrap();
        cache.put("abc", b"{\"req\":1}", b"{\"puzzle\":1}").await.unwrap();

        assert_eq!(cache.get("abc").await.unwrap(), Some(b"{\"puzzle\":1}".to_vec()));

        let entry = cache.entry("abc").await.unwrap().unwrap();
        assert_eq!(entry.fingerprint, "abc");
        assert_eq!(entry.request, b"{\"req\":1}".to_vec());
        assert_eq!(entry.response, b"{\"puzzle\":1}".to_vec());
    }

    #[tokio::test]
    async fn test_put_overwrites_existing_row() {
        let cache = SqliteCache::open(":memory:").unwrap();
        cache.put("abc", b"r1", b"first").await.unwrap();
        let first = cache.entry("abc").await.unwrap().unwrap();

        cache.put("abc", b"r2", b"second").await.unwrap();
        let second = cache.entry("abc").await.unwrap().unwrap();

        assert_eq!(cache.len().await.unwrap(), 1);
        assert_eq!(second.request, b"r2".to_vec());
        assert_eq!(second.response, b"second".to_vec());
        assert!(second.created_at >= first.created_at);
    }

    #[tokio::test]
    async fn test_payload_bytes_are_verbatim() {
        let cache = SqliteCache::open(":memory:").unwrap();
        let payload = "{ \"gameType\" : \"wordsearch\" ,\n \"x\": \"ção\" }".as_bytes();
        cache.put("k", b"{}", payload).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some(payload));
    }

    #[tokio::test]
    async fn test_corrupt_timestamp_is_an_error() {
        let cache = SqliteCache::open(":memory:").unwrap();
        cache
            .conn
            .lock()
            .unwrap()
            .execute(
                "INSERT INTO cached_puzzles VALUES ('bad', x'00', x'00', 'yesterday-ish')",
                [],
            )
            .unwrap();

        let err = cache.entry("bad").await.unwrap_err();
        assert!(matches!(
            err,
            CacheError::Database(rusqlite::Error::FromSqlConversionFailure(3, Type::Text, _))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_writers_share_the_store() {
        let cache = Arc::new(SqliteCache::open(":memory:").unwrap());

        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move {
                    let key = format!("k{}", i % 4);
                    cache.put(&key, b"req", format!("v{i}").as_bytes()).await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(cache.len().await.unwrap(), 4);
        for i in 0..4 {
            assert!(cache.get(&format!("k{i}")).await.unwrap().is_some());
        }
    }
}
