//! Store traits for the two cache tiers.
//!
//! Both tiers are pluggable: a networked implementation for production
//! and an in-memory fake for tests and local mode, selected at
//! construction time. Every operation returns an explicit `Result` so
//! failure handling is visible in the signature; converting errors into
//! misses is the orchestrator's job, not the backend's.

use async_trait::async_trait;
use devpulse_core::CacheError;
use serde::{Deserialize, Serialize};

use crate::envelope::CacheEnvelope;

/// Statistics reported by a hot store. Observability only; never used
/// for correctness decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotStoreStats {
    pub total_cached_subjects: u64,
    pub ttl_seconds: u64,
    pub connected: bool,
}

/// One subject known to the cold store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectListing {
    pub subject: String,
    /// Epoch seconds of the last write.
    pub last_updated: i64,
}

/// The fast, short-TTL tier.
///
/// Implementations apply their configured TTL at write time and may
/// evict entries at any point after it elapses. `put` is also the
/// promotion path, so it must store the envelope's own timestamp rather
/// than re-stamping.
#[async_trait]
pub trait HotStore: Send + Sync {
    /// Store an envelope under its subject with the store's TTL.
    async fn put(&self, envelope: &CacheEnvelope) -> Result<(), CacheError>;

    /// Look up a subject. `Ok(None)` means miss (absent or expired).
    async fn get(&self, subject: &str) -> Result<Option<CacheEnvelope>, CacheError>;

    /// Delete a subject's entry. Returns whether an entry was physically
    /// removed; absence is not an error.
    async fn delete(&self, subject: &str) -> Result<bool, CacheError>;

    /// Existence check without deserializing the value. Diagnostics
    /// only, not on the hot path.
    async fn exists(&self, subject: &str) -> Result<bool, CacheError>;

    /// Count entries in this cache's namespace.
    async fn stats(&self) -> Result<HotStoreStats, CacheError>;
}

/// The durable, long-TTL tier.
///
/// Entries carry an absolute expiration stamped at write time.
/// Implementations must treat an entry whose expiration has passed as
/// absent on read (lazy expiration) even if it has not been physically
/// removed; physical deletion of such entries is best-effort.
#[async_trait]
pub trait ColdStore: Send + Sync {
    /// Store an envelope, stamping creation/update times and the
    /// absolute expiration.
    async fn put(&self, envelope: &CacheEnvelope) -> Result<(), CacheError>;

    /// Look up a subject, applying the lazy expiration check.
    async fn get(&self, subject: &str) -> Result<Option<CacheEnvelope>, CacheError>;

    /// Delete a subject's entry. Returns whether an entry was physically
    /// removed; absence is not an error.
    async fn delete(&self, subject: &str) -> Result<bool, CacheError>;

    /// Enumerate all stored subjects. A fresh enumeration on every call,
    /// not a stateful cursor. Diagnostics only.
    async fn list_subjects(&self) -> Result<Vec<SubjectListing>, CacheError>;
}
