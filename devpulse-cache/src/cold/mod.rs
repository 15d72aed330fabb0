//! Cold-tier store implementations.

pub mod lmdb;
pub mod memory;

pub use lmdb::LmdbColdStore;
pub use memory::InMemoryColdStore;

use chrono::Utc;
use devpulse_core::CacheSettings;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::envelope::CacheEnvelope;

/// The item stored in the cold tier.
///
/// Carries the envelope fields plus cold-tier bookkeeping: epoch-second
/// creation/update stamps and the absolute expiration used by the lazy
/// expiration check on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColdRecord {
    pub subject: String,
    pub category: String,
    pub payload: Value,
    pub cached_at_millis: i64,
    pub created_at: i64,
    pub updated_at: i64,
    pub expires_at: i64,
}

impl ColdRecord {
    /// Build a record from an envelope, stamping bookkeeping fields.
    pub fn from_envelope(envelope: &CacheEnvelope, settings: &CacheSettings) -> Self {
        let now = Utc::now().timestamp();
        Self {
            subject: envelope.subject.clone(),
            category: settings.category.clone(),
            payload: envelope.payload.clone(),
            cached_at_millis: envelope.cached_at_millis,
            created_at: now,
            updated_at: now,
            expires_at: now + settings.cold_ttl.as_secs() as i64,
        }
    }

    /// Whether the record's absolute expiration has passed.
    pub fn is_expired(&self, now_secs: i64) -> bool {
        self.expires_at < now_secs
    }

    /// Recover the stored envelope.
    pub fn into_envelope(self) -> CacheEnvelope {
        CacheEnvelope {
            subject: self.subject,
            payload: self.payload,
            cached_at_millis: self.cached_at_millis,
        }
    }
}
