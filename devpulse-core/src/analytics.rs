//! Computed analytics types.
//!
//! The aggregator turns raw activity records into these metric types and
//! bundles them into an [`ActivitySnapshot`], which is what the cache
//! stores as an opaque JSON payload.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::Repository;

/// Commits grouped by UTC day, for time-series display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitTrendPoint {
    pub date: NaiveDate,
    /// Number of commits on this day.
    pub count: usize,
    /// Number of distinct authors active on this day.
    pub authors: usize,
}

/// Per-author productivity rollup, sorted descending by commit count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorProductivity {
    pub name: String,
    pub email: String,
    pub commits: usize,
    pub first_commit: DateTime<Utc>,
    pub last_commit: DateTime<Utc>,
    /// Number of distinct days with at least one commit.
    pub active_days: usize,
}

/// Aggregate metrics over all fetched repositories and commits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryMetrics {
    pub total_repositories: usize,
    pub total_commits: usize,
    pub unique_contributors: usize,
    /// Commits per day over the observed commit span.
    pub commits_per_day: f64,
    pub most_active_repo: Option<String>,
    /// 0.0 to 10.0, one decimal place.
    pub activity_score: f64,
}

impl Default for RepositoryMetrics {
    fn default() -> Self {
        Self {
            total_repositories: 0,
            total_commits: 0,
            unique_contributors: 0,
            commits_per_day: 0.0,
            most_active_repo: None,
            activity_score: 0.0,
        }
    }
}

/// Risk level attached to a burnout assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

/// Narrative assessment produced by an assessment provider (or its
/// deterministic fallback when no provider is configured).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// 0.0 to 10.0.
    pub code_quality_score: f64,
    pub burnout_risk: RiskLevel,
    pub team_performance: String,
    pub summary: String,
}

/// The aggregate payload cached per subject.
///
/// This is what `save_analytics` persists and what a dashboard request
/// returns; the cache itself treats it as an opaque JSON value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySnapshot {
    pub subject: String,
    pub repositories: Vec<Repository>,
    pub commit_trends: Vec<CommitTrendPoint>,
    pub authors: Vec<AuthorProductivity>,
    pub metrics: RepositoryMetrics,
    pub assessment: Option<Assessment>,
    pub generated_at: DateTime<Utc>,
}
