//! LMDB-backed cold store.
//!
//! Uses the heed crate for a durable, memory-mapped item store. Records
//! are keyed by the binary `SubjectKey` encoding and stored as JSON.
//!
//! Expiration is lazy: a read that finds an expired record reports a
//! miss and attempts a best-effort physical delete, but correctness
//! never depends on that delete succeeding; the next write overwrites
//! the slot regardless.

use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use devpulse_core::{CacheError, CacheSettings};
use heed::types::{Bytes, SerdeJson};
use heed::{Database, Env, EnvOpenOptions};
use tracing::debug;

use super::ColdRecord;
use crate::envelope::CacheEnvelope;
use crate::subject_key::SubjectKey;
use crate::traits::{ColdStore, SubjectListing};

fn storage(e: impl std::fmt::Display) -> CacheError {
    CacheError::cold(e.to_string())
}

/// Cold store backed by an LMDB environment.
pub struct LmdbColdStore {
    env: Env,
    db: Database<Bytes, SerdeJson<ColdRecord>>,
    settings: CacheSettings,
}

impl LmdbColdStore {
    /// Open or create the store at the given directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Directory where LMDB files will be stored
    /// * `max_size_mb` - Maximum size of the database in megabytes
    pub fn open<P: AsRef<Path>>(
        path: P,
        max_size_mb: usize,
        settings: CacheSettings,
    ) -> Result<Self, CacheError> {
        std::fs::create_dir_all(&path).map_err(storage)?;

        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(max_size_mb * 1024 * 1024)
                .max_dbs(1)
                .open(path.as_ref())
        }
        .map_err(storage)?;

        let mut wtxn = env.write_txn().map_err(storage)?;
        let db = env
            .create_database(&mut wtxn, Some("analytics_cache"))
            .map_err(storage)?;
        wtxn.commit().map_err(storage)?;

        Ok(Self { env, db, settings })
    }

    fn encoded_key(&self, subject: &str) -> Result<Vec<u8>, CacheError> {
        Ok(SubjectKey::new(&self.settings, subject)?.encode())
    }

    /// Best-effort removal of an expired record. Failures are logged
    /// and ignored.
    fn try_evict(&self, key: &[u8], subject: &str) {
        let result = self
            .env
            .write_txn()
            .and_then(|mut wtxn| {
                self.db.delete(&mut wtxn, key)?;
                wtxn.commit()
            });

        if let Err(e) = result {
            debug!(subject, error = %e, "failed to evict expired cold entry");
        }
    }
}

#[async_trait]
impl ColdStore for LmdbColdStore {
    async fn put(&self, envelope: &CacheEnvelope) -> Result<(), CacheError> {
        let key = self.encoded_key(&envelope.subject)?;
        let record = ColdRecord::from_envelope(envelope, &self.settings);

        let mut wtxn = self.env.write_txn().map_err(storage)?;
        self.db.put(&mut wtxn, &key, &record).map_err(storage)?;
        wtxn.commit().map_err(storage)
    }

    async fn get(&self, subject: &str) -> Result<Option<CacheEnvelope>, CacheError> {
        let key = self.encoded_key(subject)?;

        let record = {
            let rtxn = self.env.read_txn().map_err(storage)?;
            self.db.get(&rtxn, &key).map_err(storage)?
        };

        match record {
            Some(record) if record.is_expired(Utc::now().timestamp()) => {
                debug!(subject, "cold entry expired, treating as absent");
                self.try_evict(&key, subject);
                Ok(None)
            }
            Some(record) => Ok(Some(record.into_envelope())),
            None => Ok(None),
        }
    }

    async fn delete(&self, subject: &str) -> Result<bool, CacheError> {
        let key = self.encoded_key(subject)?;

        let mut wtxn = self.env.write_txn().map_err(storage)?;
        let removed = self.db.delete(&mut wtxn, &key).map_err(storage)?;
        wtxn.commit().map_err(storage)?;
        Ok(removed)
    }

    async fn list_subjects(&self) -> Result<Vec<SubjectListing>, CacheError> {
        let rtxn = self.env.read_txn().map_err(storage)?;
        let iter = self.db.iter(&rtxn).map_err(storage)?;

        let mut listings = Vec::new();
        for result in iter {
            let (key, record) = match result {
                Ok(entry) => entry,
                Err(_) => continue,
            };

            // Skip records written under an unreadable key encoding.
            if SubjectKey::decode(key).is_none() {
                continue;
            }

            listings.push(SubjectListing {
                subject: record.subject,
                last_updated: record.updated_at,
            });
        }

        Ok(listings)
    }
}

impl std::fmt::Debug for LmdbColdStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LmdbColdStore")
            .field("category", &self.settings.category)
            .field("ttl_seconds", &self.settings.cold_ttl.as_secs())
            .finish()
    }
}
