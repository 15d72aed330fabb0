//! DevPulse Core - Shared Data Types
//!
//! Core types for the DevPulse activity analytics backend: typed GitHub
//! activity records, computed analytics, the error taxonomy, and
//! configuration. Storage and orchestration live in `devpulse-cache`;
//! the aggregation pipeline lives in `devpulse-analytics`.

pub mod activity;
pub mod analytics;
pub mod config;
pub mod error;

pub use activity::{Commit, CommitAuthor, Issue, PullRequest, Repository};
pub use analytics::{
    ActivitySnapshot, Assessment, AuthorProductivity, CommitTrendPoint, RepositoryMetrics,
    RiskLevel,
};
pub use config::{CacheSettings, GithubSettings, KEY_SEPARATOR};
pub use error::{
    AssessmentError, CacheError, ConfigError, DevpulseError, DevpulseResult, SourceError,
};
