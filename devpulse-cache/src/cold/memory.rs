//! In-memory cold store for tests and local mode.
//!
//! Mirrors the LMDB store's semantics: records carry an absolute
//! expiration checked lazily on read, and enumeration is a fresh pass
//! over current contents. The expiration of a stored record can be
//! back-dated to exercise the lazy expiration path deterministically.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use devpulse_core::{CacheError, CacheSettings};

use super::ColdRecord;
use crate::envelope::CacheEnvelope;
use crate::subject_key::SubjectKey;
use crate::traits::{ColdStore, SubjectListing};

/// In-memory cold store with lazy expiration.
pub struct InMemoryColdStore {
    records: RwLock<HashMap<String, ColdRecord>>,
    settings: CacheSettings,
    fail_mode: AtomicBool,
}

impl InMemoryColdStore {
    pub fn new(settings: CacheSettings) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            settings,
            fail_mode: AtomicBool::new(false),
        }
    }

    /// Make every subsequent operation fail, simulating an outage.
    pub fn set_fail_mode(&self, fail: bool) {
        self.fail_mode.store(fail, Ordering::SeqCst);
    }

    /// Back-date (or forward-date) a stored record's expiration.
    /// Returns false if the subject has no record.
    pub fn set_expires_at(&self, subject: &str, expires_at: i64) -> bool {
        let mut records = self.records.write().expect("cold store lock poisoned");
        match records.get_mut(subject) {
            Some(record) => {
                record.expires_at = expires_at;
                true
            }
            None => false,
        }
    }

    fn check_available(&self) -> Result<(), CacheError> {
        if self.fail_mode.load(Ordering::SeqCst) {
            Err(CacheError::cold("simulated cold-tier outage"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ColdStore for InMemoryColdStore {
    async fn put(&self, envelope: &CacheEnvelope) -> Result<(), CacheError> {
        self.check_available()?;
        // Validate the subject the same way the durable store does.
        SubjectKey::new(&self.settings, &envelope.subject)?;

        let record = ColdRecord::from_envelope(envelope, &self.settings);
        let mut records = self.records.write().expect("cold store lock poisoned");
        records.insert(envelope.subject.clone(), record);
        Ok(())
    }

    async fn get(&self, subject: &str) -> Result<Option<CacheEnvelope>, CacheError> {
        self.check_available()?;

        let mut records = self.records.write().expect("cold store lock poisoned");
        match records.get(subject) {
            Some(record) if record.is_expired(Utc::now().timestamp()) => {
                records.remove(subject);
                Ok(None)
            }
            Some(record) => Ok(Some(record.clone().into_envelope())),
            None => Ok(None),
        }
    }

    async fn delete(&self, subject: &str) -> Result<bool, CacheError> {
        self.check_available()?;

        let mut records = self.records.write().expect("cold store lock poisoned");
        Ok(records.remove(subject).is_some())
    }

    async fn list_subjects(&self) -> Result<Vec<SubjectListing>, CacheError> {
        self.check_available()?;

        let records = self.records.read().expect("cold store lock poisoned");
        Ok(records
            .values()
            .map(|record| SubjectListing {
                subject: record.subject.clone(),
                last_updated: record.updated_at,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> InMemoryColdStore {
        InMemoryColdStore::new(CacheSettings::default())
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let store = store();
        let envelope = CacheEnvelope::new("octocat", json!({"repos": 5}));

        store.put(&envelope).await.expect("put should succeed");
        let read = store
            .get("octocat")
            .await
            .expect("get should succeed")
            .expect("entry should exist");
        assert_eq!(read, envelope);
    }

    #[tokio::test]
    async fn test_backdated_expiry_reads_as_absent() {
        let store = store();
        store
            .put(&CacheEnvelope::new("octocat", json!({})))
            .await
            .expect("put should succeed");

        assert!(store.set_expires_at("octocat", Utc::now().timestamp() - 1));
        assert!(store
            .get("octocat")
            .await
            .expect("get should succeed")
            .is_none());
    }

    #[tokio::test]
    async fn test_fail_mode_errors_every_operation() {
        let store = store();
        store.set_fail_mode(true);

        assert!(store
            .put(&CacheEnvelope::new("octocat", json!({})))
            .await
            .is_err());
        assert!(store.get("octocat").await.is_err());
        assert!(store.delete("octocat").await.is_err());
        assert!(store.list_subjects().await.is_err());
    }

    #[tokio::test]
    async fn test_list_subjects() {
        let store = store();
        for subject in ["alice", "bob"] {
            store
                .put(&CacheEnvelope::new(subject, json!({})))
                .await
                .expect("put should succeed");
        }

        let mut listings = store
            .list_subjects()
            .await
            .expect("list_subjects should succeed");
        listings.sort_by(|a, b| a.subject.cmp(&b.subject));
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].subject, "alice");
        assert_eq!(listings[1].subject, "bob");
    }
}
