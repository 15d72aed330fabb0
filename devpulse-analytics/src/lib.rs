//! DevPulse Analytics - Activity Aggregation Pipeline
//!
//! Fetches GitHub activity through a pluggable [`ActivitySource`],
//! computes per-subject metrics, attaches a narrative assessment, and
//! fronts the whole pipeline with the two-tier cache from
//! `devpulse-cache`: a dashboard request hits the cache first and only
//! fetches fresh data on a full miss, persisting the result without
//! blocking the response.

pub mod aggregator;
pub mod assessment;
pub mod compute;
pub mod github;
pub mod source;

pub use aggregator::{Aggregator, Dashboard};
pub use assessment::{AssessmentProvider, FallbackAssessment};
pub use compute::{author_productivity, commit_trends, repository_metrics};
pub use github::GithubClient;
pub use source::{ActivitySource, FixtureSource};
