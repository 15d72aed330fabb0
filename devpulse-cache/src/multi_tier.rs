//! Two-tier cache orchestration.
//!
//! Routes reads hot-then-cold with read-through promotion, and fans
//! writes out to both tiers concurrently. This layer owns the
//! degrade-to-default policy: every backend error is converted into a
//! miss (reads) or a reported failure flag (writes) and logged, so no
//! cache failure ever surfaces as an error to the request path. A cache
//! outage costs latency, never availability.
//!
//! # Consistency
//!
//! No cross-request locking is provided. Two concurrent saves for the
//! same subject may interleave their tier writes; each tier resolves
//! the race last-write-wins, and a transient hot/cold disagreement
//! self-heals on the next promotion or TTL-driven refresh. Acceptable
//! for a refreshable cache, not for a system of record.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::envelope::{CacheEnvelope, CacheTier, CachedAnalytics};
use crate::traits::{ColdStore, HotStore, HotStoreStats, SubjectListing};
use devpulse_core::CacheSettings;

/// Result of a dual-tier save.
///
/// `success` requires both tiers; a partial failure reports which tier
/// took the write. A cold-only success self-corrects through promotion
/// on the next read. A hot-only success simply expires with the hot TTL
/// and is treated as a soft degradation, not a retryable failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveOutcome {
    pub success: bool,
    pub hot: bool,
    pub cold: bool,
    pub error: Option<String>,
}

/// Result of a dual-tier clear. Absence counts as success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClearOutcome {
    pub success: bool,
    pub hot: bool,
    pub cold: bool,
}

/// Cold-tier portion of a stats report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColdTierStats {
    pub total_cached_subjects: usize,
    /// First `max_listed_subjects` entries of the enumeration.
    pub subjects: Vec<SubjectListing>,
}

/// Fixed description of the tiering strategy, for the diagnostics
/// endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TieringStrategy {
    pub tier_1: &'static str,
    pub tier_2: &'static str,
    pub lookup_order: &'static str,
}

impl Default for TieringStrategy {
    fn default() -> Self {
        Self {
            tier_1: "hot key/value store, short TTL",
            tier_2: "durable store, 30 day TTL",
            lookup_order: "hot, then cold (with promotion), then fresh fetch",
        }
    }
}

/// Combined stats from both tiers. Observability only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierStats {
    pub hot: HotStoreStats,
    pub cold: ColdTierStats,
    pub strategy: TieringStrategy,
}

/// The two cache tiers behind one logical interface.
///
/// Store clients are constructed once per process and injected here;
/// the orchestrator itself is cheap to clone and holds no per-request
/// state.
pub struct MultiTierCache<H, C>
where
    H: HotStore,
    C: ColdStore,
{
    hot: Arc<H>,
    cold: Arc<C>,
    settings: CacheSettings,
}

impl<H, C> MultiTierCache<H, C>
where
    H: HotStore,
    C: ColdStore,
{
    /// Create a cache over the given tier backends.
    pub fn new(hot: Arc<H>, cold: Arc<C>, settings: CacheSettings) -> Self {
        Self {
            hot,
            cold,
            settings,
        }
    }

    /// Get the cache settings.
    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    /// Look up a subject's analytics.
    ///
    /// Checks the hot tier first and short-circuits on a hit; the cold
    /// tier is only consulted after a confirmed hot miss, never
    /// concurrently. A cold hit is synchronously promoted into the hot
    /// tier verbatim (same payload, same timestamp) before returning;
    /// promotion failure is logged and does not affect the result.
    ///
    /// Returns `None` on a full miss, and also on any backend error;
    /// the caller's fallback (fetch fresh data) is always safe.
    pub async fn get_analytics(&self, subject: &str) -> Option<CachedAnalytics> {
        match self.hot.get(subject).await {
            Ok(Some(envelope)) => {
                debug!(subject, age = envelope.age_seconds(), "hot tier hit");
                return Some(CachedAnalytics::from_envelope(
                    envelope,
                    CacheTier::Hot,
                    false,
                ));
            }
            Ok(None) => debug!(subject, "hot tier miss"),
            Err(e) => warn!(subject, error = %e, "hot tier read failed, treating as miss"),
        }

        let envelope = match self.cold.get(subject).await {
            Ok(Some(envelope)) => envelope,
            Ok(None) => {
                debug!(subject, "full cache miss");
                return None;
            }
            Err(e) => {
                warn!(subject, error = %e, "cold tier read failed, treating as miss");
                return None;
            }
        };

        debug!(subject, age = envelope.age_seconds(), "cold tier hit, promoting");
        if let Err(e) = self.hot.put(&envelope).await {
            warn!(subject, error = %e, "promotion to hot tier failed");
        }

        Some(CachedAnalytics::from_envelope(
            envelope,
            CacheTier::Cold,
            true,
        ))
    }

    /// Save a subject's analytics to both tiers.
    ///
    /// One envelope is stamped with the current time and written to
    /// both tiers concurrently; total latency is the slower write, not
    /// the sum. Partial failure is reported, never raised.
    pub async fn save_analytics(&self, subject: &str, payload: Value) -> SaveOutcome {
        let envelope = CacheEnvelope::new(subject, payload);
        self.save_envelope(&envelope).await
    }

    async fn save_envelope(&self, envelope: &CacheEnvelope) -> SaveOutcome {
        let subject = envelope.subject.as_str();
        let (hot_result, cold_result) =
            tokio::join!(self.hot.put(envelope), self.cold.put(envelope));

        let mut errors = Vec::new();

        let hot = match hot_result {
            Ok(()) => true,
            Err(e) => {
                warn!(subject, error = %e, "hot tier write failed");
                errors.push(e.to_string());
                false
            }
        };

        let cold = match cold_result {
            Ok(()) => true,
            Err(e) => {
                warn!(subject, error = %e, "cold tier write failed");
                errors.push(e.to_string());
                false
            }
        };

        let success = hot && cold;
        if success {
            debug!(subject, "saved to both tiers");
        }

        SaveOutcome {
            success,
            hot,
            cold,
            error: if errors.is_empty() {
                None
            } else {
                Some(errors.join("; "))
            },
        }
    }

    /// Remove a subject's analytics from both tiers concurrently.
    ///
    /// Absence in a tier counts as success, so clearing is idempotent.
    pub async fn clear_analytics(&self, subject: &str) -> ClearOutcome {
        let (hot_result, cold_result) =
            tokio::join!(self.hot.delete(subject), self.cold.delete(subject));

        let hot = match hot_result {
            Ok(_) => true,
            Err(e) => {
                warn!(subject, error = %e, "hot tier delete failed");
                false
            }
        };

        let cold = match cold_result {
            Ok(_) => true,
            Err(e) => {
                warn!(subject, error = %e, "cold tier delete failed");
                false
            }
        };

        ClearOutcome {
            success: hot && cold,
            hot,
            cold,
        }
    }

    /// Gather combined stats from both tiers concurrently.
    ///
    /// A failing tier degrades to an empty report (hot: `connected =
    /// false`) rather than failing the call.
    pub async fn stats(&self) -> TierStats {
        let (hot_result, cold_result) = tokio::join!(self.hot.stats(), self.cold.list_subjects());

        let hot = match hot_result {
            Ok(stats) => stats,
            Err(e) => {
                warn!(error = %e, "hot tier stats unavailable");
                HotStoreStats {
                    total_cached_subjects: 0,
                    ttl_seconds: self.settings.hot_ttl.as_secs(),
                    connected: false,
                }
            }
        };

        let cold = match cold_result {
            Ok(mut subjects) => {
                let total = subjects.len();
                subjects.truncate(self.settings.max_listed_subjects);
                ColdTierStats {
                    total_cached_subjects: total,
                    subjects,
                }
            }
            Err(e) => {
                warn!(error = %e, "cold tier enumeration unavailable");
                ColdTierStats {
                    total_cached_subjects: 0,
                    subjects: Vec::new(),
                }
            }
        };

        TierStats {
            hot,
            cold,
            strategy: TieringStrategy::default(),
        }
    }
}

impl<H, C> MultiTierCache<H, C>
where
    H: HotStore + 'static,
    C: ColdStore + 'static,
{
    /// Save without blocking the caller.
    ///
    /// The dual write runs as a spawned task; the request path drops
    /// the handle and responds immediately, while the completion task
    /// logs a degraded outcome. Tests may await the returned handle for
    /// determinism.
    pub fn save_analytics_detached(&self, subject: &str, payload: Value) -> JoinHandle<SaveOutcome> {
        let cache = self.clone();
        let subject = subject.to_string();

        tokio::spawn(async move {
            let outcome = cache.save_analytics(&subject, payload).await;
            if outcome.success {
                debug!(subject, "detached cache save completed");
            } else {
                warn!(
                    subject,
                    hot = outcome.hot,
                    cold = outcome.cold,
                    error = outcome.error.as_deref().unwrap_or(""),
                    "detached cache save degraded"
                );
            }
            outcome
        })
    }
}

impl<H, C> Clone for MultiTierCache<H, C>
where
    H: HotStore,
    C: ColdStore,
{
    fn clone(&self) -> Self {
        Self {
            hot: Arc::clone(&self.hot),
            cold: Arc::clone(&self.cold),
            settings: self.settings.clone(),
        }
    }
}
