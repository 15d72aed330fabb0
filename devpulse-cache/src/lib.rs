//! Two-tier analytics cache: hot key/value store + cold durable store.
//!
//! This crate fronts the expensive activity-aggregation pipeline with
//! one logical cache built from two tiers with different TTL horizons:
//! a fast shared store holding entries for about an hour, and a durable
//! store holding them for thirty days.
//!
//! # Design
//!
//! - **Read-through promotion**: reads check hot then cold; a cold hit
//!   is copied into the hot tier verbatim before it is returned, so
//!   repeat reads ride the fast path.
//! - **Dual write**: saves go to both tiers concurrently and report a
//!   per-tier outcome instead of raising.
//! - **Degrade to default**: a tier failure is a miss (reads) or a
//!   reported flag (writes). Callers never see a cache error; at worst
//!   they fetch fresh data.
//! - **Explicit staleness**: every read result carries its write
//!   timestamp and age, computed from a timestamp embedded in the
//!   stored value itself.
//!
//! Backends are pluggable behind the [`HotStore`] and [`ColdStore`]
//! traits: Redis and LMDB in production, in-memory fakes for tests and
//! local mode, selected at construction time.

pub mod cold;
pub mod envelope;
pub mod hot;
pub mod multi_tier;
pub mod subject_key;
pub mod traits;

pub use cold::{ColdRecord, InMemoryColdStore, LmdbColdStore};
pub use envelope::{CacheEnvelope, CacheTier, CachedAnalytics};
pub use hot::{InMemoryHotStore, RedisHotStore};
pub use multi_tier::{
    ClearOutcome, ColdTierStats, MultiTierCache, SaveOutcome, TierStats, TieringStrategy,
};
pub use subject_key::SubjectKey;
pub use traits::{ColdStore, HotStore, HotStoreStats, SubjectListing};
