//! In-memory hot store for tests and local mode.
//!
//! Honors the same contract as the Redis store, including TTL-based
//! eviction (checked lazily on read, since there is no background
//! reaper). A fail-mode switch lets tests simulate a hot-tier outage.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use std::time::Instant;

use async_trait::async_trait;
use devpulse_core::{CacheError, CacheSettings};

use crate::envelope::CacheEnvelope;
use crate::subject_key::SubjectKey;
use crate::traits::{HotStore, HotStoreStats};

struct StoredEntry {
    envelope: CacheEnvelope,
    expires_at: Instant,
}

/// In-memory hot store with lazy TTL eviction.
pub struct InMemoryHotStore {
    entries: RwLock<HashMap<String, StoredEntry>>,
    settings: CacheSettings,
    fail_mode: AtomicBool,
}

impl InMemoryHotStore {
    pub fn new(settings: CacheSettings) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            settings,
            fail_mode: AtomicBool::new(false),
        }
    }

    /// Make every subsequent operation fail, simulating an outage.
    pub fn set_fail_mode(&self, fail: bool) {
        self.fail_mode.store(fail, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), CacheError> {
        if self.fail_mode.load(Ordering::SeqCst) {
            Err(CacheError::hot("simulated hot-tier outage"))
        } else {
            Ok(())
        }
    }

    fn hot_key(&self, subject: &str) -> Result<String, CacheError> {
        Ok(SubjectKey::new(&self.settings, subject)?.hot_key())
    }
}

#[async_trait]
impl HotStore for InMemoryHotStore {
    async fn put(&self, envelope: &CacheEnvelope) -> Result<(), CacheError> {
        self.check_available()?;
        let key = self.hot_key(&envelope.subject)?;

        let mut entries = self.entries.write().expect("hot store lock poisoned");
        entries.insert(
            key,
            StoredEntry {
                envelope: envelope.clone(),
                expires_at: Instant::now() + self.settings.hot_ttl,
            },
        );
        Ok(())
    }

    async fn get(&self, subject: &str) -> Result<Option<CacheEnvelope>, CacheError> {
        self.check_available()?;
        let key = self.hot_key(subject)?;

        let mut entries = self.entries.write().expect("hot store lock poisoned");
        match entries.get(&key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.envelope.clone())),
            Some(_) => {
                // Expired: evict on the way out.
                entries.remove(&key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, subject: &str) -> Result<bool, CacheError> {
        self.check_available()?;
        let key = self.hot_key(subject)?;

        let mut entries = self.entries.write().expect("hot store lock poisoned");
        Ok(entries.remove(&key).is_some())
    }

    async fn exists(&self, subject: &str) -> Result<bool, CacheError> {
        self.check_available()?;
        let key = self.hot_key(subject)?;

        let entries = self.entries.read().expect("hot store lock poisoned");
        Ok(entries
            .get(&key)
            .map(|entry| entry.expires_at > Instant::now())
            .unwrap_or(false))
    }

    async fn stats(&self) -> Result<HotStoreStats, CacheError> {
        self.check_available()?;

        let now = Instant::now();
        let entries = self.entries.read().expect("hot store lock poisoned");
        let live = entries.values().filter(|e| e.expires_at > now).count();

        Ok(HotStoreStats {
            total_cached_subjects: live as u64,
            ttl_seconds: self.settings.hot_ttl.as_secs(),
            connected: true,
        })
    }
}
