//! Narrative assessment seam.
//!
//! An assessment provider turns a computed snapshot into a short
//! structured read on code quality, burnout risk, and team performance.
//! The production implementation calls a language model; this crate
//! ships only the trait and a deterministic fallback, so the aggregator
//! always has something to attach when no provider is configured or a
//! provider call fails.

use async_trait::async_trait;
use devpulse_core::{ActivitySnapshot, Assessment, AssessmentError, RiskLevel};

/// Produces a narrative assessment from a computed snapshot.
///
/// Implementations must be thread-safe (`Send + Sync`).
#[async_trait]
pub trait AssessmentProvider: Send + Sync {
    async fn assess(&self, snapshot: &ActivitySnapshot) -> Result<Assessment, AssessmentError>;
}

/// Deterministic heuristic assessment, used when no model-backed
/// provider is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FallbackAssessment;

#[async_trait]
impl AssessmentProvider for FallbackAssessment {
    async fn assess(&self, snapshot: &ActivitySnapshot) -> Result<Assessment, AssessmentError> {
        let metrics = &snapshot.metrics;

        let code_quality_score =
            ((5.0 + metrics.activity_score * 0.5).min(10.0) * 10.0).round() / 10.0;

        let burnout_risk = if metrics.commits_per_day > 8.0 {
            RiskLevel::High
        } else if metrics.commits_per_day > 3.0 {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        };

        let team_performance = match metrics.unique_contributors {
            0 | 1 => "solo project, throughput tracks one contributor",
            2 => "small pair, review latency is the main risk",
            _ => "collaborative team with distributed contributions",
        }
        .to_string();

        let summary = format!(
            "{} repositories, {} commits by {} contributor(s); activity score {:.1}/10",
            metrics.total_repositories,
            metrics.total_commits,
            metrics.unique_contributors,
            metrics.activity_score,
        );

        Ok(Assessment {
            code_quality_score,
            burnout_risk,
            team_performance,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use devpulse_core::RepositoryMetrics;

    fn snapshot_with_metrics(metrics: RepositoryMetrics) -> ActivitySnapshot {
        ActivitySnapshot {
            subject: "octocat".to_string(),
            repositories: vec![],
            commit_trends: vec![],
            authors: vec![],
            metrics,
            assessment: None,
            generated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_fallback_is_deterministic() {
        let snapshot = snapshot_with_metrics(RepositoryMetrics {
            total_repositories: 2,
            total_commits: 40,
            unique_contributors: 3,
            commits_per_day: 2.0,
            most_active_repo: Some("devpulse".to_string()),
            activity_score: 6.0,
        });

        let first = FallbackAssessment
            .assess(&snapshot)
            .await
            .expect("assess should succeed");
        let second = FallbackAssessment
            .assess(&snapshot)
            .await
            .expect("assess should succeed");
        assert_eq!(first, second);
        assert_eq!(first.code_quality_score, 8.0);
        assert_eq!(first.burnout_risk, RiskLevel::Low);
        assert!(first.team_performance.contains("collaborative"));
    }

    #[tokio::test]
    async fn test_burnout_thresholds() {
        for (per_day, expected) in [
            (1.0, RiskLevel::Low),
            (5.0, RiskLevel::Moderate),
            (12.0, RiskLevel::High),
        ] {
            let snapshot = snapshot_with_metrics(RepositoryMetrics {
                commits_per_day: per_day,
                total_repositories: 1,
                ..RepositoryMetrics::default()
            });
            let assessment = FallbackAssessment
                .assess(&snapshot)
                .await
                .expect("assess should succeed");
            assert_eq!(assessment.burnout_risk, expected, "per_day={per_day}");
        }
    }

    #[tokio::test]
    async fn test_code_quality_capped_at_ten() {
        let snapshot = snapshot_with_metrics(RepositoryMetrics {
            activity_score: 10.0,
            ..RepositoryMetrics::default()
        });
        let assessment = FallbackAssessment
            .assess(&snapshot)
            .await
            .expect("assess should succeed");
        assert!(assessment.code_quality_score <= 10.0);
    }
}
