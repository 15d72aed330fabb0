//! Cache envelope and annotated read results.
//!
//! The envelope is the unit of storage in either tier. The write
//! timestamp travels inside the stored value, so an entry's age can be
//! computed after any deserialization, independent of tier-specific
//! metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which tier produced a cache read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheTier {
    Hot,
    Cold,
}

impl std::fmt::Display for CacheTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hot => write!(f, "hot"),
            Self::Cold => write!(f, "cold"),
        }
    }
}

/// The unit of storage in either cache tier.
///
/// `save` stamps the current wall-clock time; promotion copies an
/// envelope between tiers VERBATIM, preserving the original timestamp so
/// a promoted entry never appears younger than it is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEnvelope {
    pub subject: String,
    /// Opaque caller-supplied payload. The cache never inspects its
    /// structure.
    pub payload: Value,
    /// Wall-clock write time, epoch milliseconds.
    pub cached_at_millis: i64,
}

impl CacheEnvelope {
    /// Create an envelope stamped with the current time.
    pub fn new(subject: impl Into<String>, payload: Value) -> Self {
        Self::with_timestamp(subject, payload, Utc::now())
    }

    /// Create an envelope with an explicit write timestamp.
    pub fn with_timestamp(
        subject: impl Into<String>,
        payload: Value,
        cached_at: DateTime<Utc>,
    ) -> Self {
        Self {
            subject: subject.into(),
            payload,
            cached_at_millis: cached_at.timestamp_millis(),
        }
    }

    /// When this envelope was written.
    pub fn cached_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.cached_at_millis).unwrap_or_else(Utc::now)
    }

    /// Whole seconds elapsed since the envelope was written, clamped at
    /// zero.
    pub fn age_seconds(&self) -> i64 {
        let elapsed_millis = Utc::now().timestamp_millis() - self.cached_at_millis;
        (elapsed_millis / 1000).max(0)
    }
}

/// An annotated cache read.
///
/// Carries the payload plus the staleness metadata callers need to
/// decide whether to serve it or refresh. A value of this type always
/// came from a cache tier; fresh fetches bypass it entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedAnalytics {
    pub subject: String,
    pub payload: Value,
    pub cached_at: DateTime<Utc>,
    pub cache_age_seconds: i64,
    pub tier: CacheTier,
    /// True when this read was served from the cold tier and the entry
    /// was copied into the hot tier on the way out.
    pub promoted_to_hot: bool,
}

impl CachedAnalytics {
    /// Build a read result from a stored envelope.
    pub fn from_envelope(envelope: CacheEnvelope, tier: CacheTier, promoted_to_hot: bool) -> Self {
        let cached_at = envelope.cached_at();
        let cache_age_seconds = envelope.age_seconds();
        Self {
            subject: envelope.subject,
            payload: envelope.payload,
            cached_at,
            cache_age_seconds,
            tier,
            promoted_to_hot,
        }
    }

    /// Merge the cache annotations into the payload, producing the wire
    /// shape handlers return: the payload fields plus
    /// `cache_age_seconds`, `from_cache`, `cache_tier`, and
    /// `promoted_to_hot`.
    ///
    /// A non-object payload is wrapped under a `"data"` field first.
    pub fn into_annotated_json(self) -> Value {
        let mut object = match self.payload {
            Value::Object(map) => map,
            other => {
                let mut map = serde_json::Map::new();
                map.insert("data".to_string(), other);
                map
            }
        };

        object.insert(
            "cache_age_seconds".to_string(),
            Value::from(self.cache_age_seconds),
        );
        object.insert("from_cache".to_string(), Value::Bool(true));
        object.insert("cache_tier".to_string(), Value::from(self.tier.to_string()));
        object.insert(
            "promoted_to_hot".to_string(),
            Value::Bool(self.promoted_to_hot),
        );

        Value::Object(object)
    }
}
