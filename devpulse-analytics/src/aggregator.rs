//! Cache-fronted dashboard assembly.
//!
//! The aggregator is the cache's upstream caller: a dashboard request
//! checks the cache first and only runs the fetch-and-compute pipeline
//! on a full miss. Freshly computed snapshots are persisted without
//! blocking the response (the save runs detached; its outcome is
//! logged, not awaited).

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, warn};

use devpulse_cache::{CacheTier, ColdStore, HotStore, MultiTierCache, TierStats};
use devpulse_core::{
    ActivitySnapshot, CacheError, DevpulseResult, GithubSettings,
};

use crate::assessment::AssessmentProvider;
use crate::compute::{author_productivity, commit_trends, repository_metrics};
use crate::source::ActivitySource;

/// A dashboard response: the snapshot payload plus cache provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub subject: String,
    pub payload: Value,
    pub from_cache: bool,
    pub cache_tier: Option<CacheTier>,
    pub cache_age_seconds: Option<i64>,
}

/// Aggregates GitHub activity into cached analytics snapshots.
pub struct Aggregator<H, C, S>
where
    H: HotStore + 'static,
    C: ColdStore + 'static,
    S: ActivitySource,
{
    cache: MultiTierCache<H, C>,
    source: Arc<S>,
    assessor: Arc<dyn AssessmentProvider>,
    settings: GithubSettings,
}

impl<H, C, S> Aggregator<H, C, S>
where
    H: HotStore + 'static,
    C: ColdStore + 'static,
    S: ActivitySource,
{
    pub fn new(
        cache: MultiTierCache<H, C>,
        source: Arc<S>,
        assessor: Arc<dyn AssessmentProvider>,
        settings: GithubSettings,
    ) -> Self {
        Self {
            cache,
            source,
            assessor,
            settings,
        }
    }

    /// Assemble the dashboard for a subject, cache-first.
    ///
    /// On a cache hit the stored payload is returned as-is; on a full
    /// miss the pipeline fetches activity, computes metrics, attaches
    /// an assessment, and persists the result detached.
    pub async fn dashboard(&self, subject: &str) -> DevpulseResult<Dashboard> {
        if let Some(cached) = self.cache.get_analytics(subject).await {
            debug!(subject, tier = %cached.tier, age = cached.cache_age_seconds, "serving cached dashboard");
            return Ok(Dashboard {
                subject: subject.to_string(),
                payload: cached.payload,
                from_cache: true,
                cache_tier: Some(cached.tier),
                cache_age_seconds: Some(cached.cache_age_seconds),
            });
        }

        let snapshot = self.build_snapshot(subject).await?;
        let payload = serde_json::to_value(&snapshot)
            .map_err(|e| CacheError::serialization(e.to_string()))?;

        // Fire-and-forget: the response does not wait on the cache
        // write; the spawned task logs a degraded outcome.
        let _save = self.cache.save_analytics_detached(subject, payload.clone());

        Ok(Dashboard {
            subject: subject.to_string(),
            payload,
            from_cache: false,
            cache_tier: None,
            cache_age_seconds: None,
        })
    }

    /// Admin cache-bust: clear both tiers, then recompute.
    pub async fn refresh(&self, subject: &str) -> DevpulseResult<Dashboard> {
        let cleared = self.cache.clear_analytics(subject).await;
        if !cleared.success {
            warn!(subject, hot = cleared.hot, cold = cleared.cold, "cache clear degraded");
        }
        self.dashboard(subject).await
    }

    /// Combined cache statistics for the diagnostics endpoint.
    pub async fn cache_stats(&self) -> TierStats {
        self.cache.stats().await
    }

    async fn build_snapshot(&self, subject: &str) -> DevpulseResult<ActivitySnapshot> {
        let repositories = self
            .source
            .repositories(subject, self.settings.max_repositories)
            .await?;

        let mut commits = Vec::new();
        for repo in &repositories {
            match self
                .source
                .recent_commits(subject, &repo.name, self.settings.max_commits_per_repo)
                .await
            {
                Ok(mut batch) => commits.append(&mut batch),
                // One unreadable repository must not sink the whole
                // dashboard.
                Err(e) => warn!(subject, repo = %repo.name, error = %e, "skipping repository commits"),
            }
        }

        let commit_trends = commit_trends(&commits);
        let authors = author_productivity(&commits);
        let metrics = repository_metrics(&repositories, &commits);

        let mut snapshot = ActivitySnapshot {
            subject: subject.to_string(),
            repositories,
            commit_trends,
            authors,
            metrics,
            assessment: None,
            generated_at: Utc::now(),
        };

        match self.assessor.assess(&snapshot).await {
            Ok(assessment) => snapshot.assessment = Some(assessment),
            Err(e) => warn!(subject, error = %e, "assessment unavailable, omitting"),
        }

        Ok(snapshot)
    }
}
