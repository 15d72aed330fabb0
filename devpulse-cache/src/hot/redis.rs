//! Redis-backed hot store.
//!
//! Envelopes are stored as JSON strings under `"<prefix>:<subject>"`
//! keys with a server-side TTL (`SET ... EX`), so eviction is the
//! store's job and needs no bookkeeping here. Stats use a SCAN loop
//! over the namespace pattern; the hot path never scans.

use async_trait::async_trait;
use devpulse_core::{CacheError, CacheSettings};
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tracing::info;

use crate::envelope::CacheEnvelope;
use crate::subject_key::SubjectKey;
use crate::traits::{HotStore, HotStoreStats};

/// Hot store backed by a shared Redis connection.
///
/// The multiplexed connection is cheap to clone and safe to share
/// across tasks; one store instance is constructed per process and
/// reused for every request.
pub struct RedisHotStore {
    conn: MultiplexedConnection,
    settings: CacheSettings,
}

fn transport(e: redis::RedisError) -> CacheError {
    CacheError::hot(e.to_string())
}

impl RedisHotStore {
    /// Connect to Redis and verify the connection with a PING.
    pub async fn connect(url: &str, settings: CacheSettings) -> Result<Self, CacheError> {
        let client = redis::Client::open(url).map_err(transport)?;
        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(transport)?;

        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(transport)?;

        info!(url, "hot store connected");

        Ok(Self { conn, settings })
    }

    fn hot_key(&self, subject: &str) -> Result<String, CacheError> {
        Ok(SubjectKey::new(&self.settings, subject)?.hot_key())
    }
}

#[async_trait]
impl HotStore for RedisHotStore {
    async fn put(&self, envelope: &CacheEnvelope) -> Result<(), CacheError> {
        let key = self.hot_key(&envelope.subject)?;
        let data = serde_json::to_string(envelope)
            .map_err(|e| CacheError::serialization(e.to_string()))?;

        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(&key, data, self.settings.hot_ttl.as_secs())
            .await
            .map_err(transport)
    }

    async fn get(&self, subject: &str) -> Result<Option<CacheEnvelope>, CacheError> {
        let key = self.hot_key(subject)?;

        let mut conn = self.conn.clone();
        let data: Option<String> = conn.get(&key).await.map_err(transport)?;

        match data {
            Some(raw) => {
                let envelope = serde_json::from_str(&raw)
                    .map_err(|e| CacheError::serialization(e.to_string()))?;
                Ok(Some(envelope))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, subject: &str) -> Result<bool, CacheError> {
        let key = self.hot_key(subject)?;

        let mut conn = self.conn.clone();
        let removed: i64 = conn.del(&key).await.map_err(transport)?;
        Ok(removed > 0)
    }

    async fn exists(&self, subject: &str) -> Result<bool, CacheError> {
        let key = self.hot_key(subject)?;

        let mut conn = self.conn.clone();
        conn.exists(&key).await.map_err(transport)
    }

    async fn stats(&self) -> Result<HotStoreStats, CacheError> {
        let pattern = SubjectKey::hot_pattern(&self.settings.key_prefix);
        let mut conn = self.conn.clone();

        let mut cursor: u64 = 0;
        let mut total: u64 = 0;

        loop {
            let (next_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut conn)
                .await
                .map_err(transport)?;

            total += keys.len() as u64;
            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }

        Ok(HotStoreStats {
            total_cached_subjects: total,
            ttl_seconds: self.settings.hot_ttl.as_secs(),
            connected: true,
        })
    }
}

impl std::fmt::Debug for RedisHotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisHotStore")
            .field("key_prefix", &self.settings.key_prefix)
            .field("ttl_seconds", &self.settings.hot_ttl.as_secs())
            .finish()
    }
}
