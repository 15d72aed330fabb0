//! Typed GitHub activity records.
//!
//! These are the records the activity source produces and the analytics
//! computations consume. Fields follow the subset of the GitHub REST
//! payloads the aggregator actually uses; everything else is dropped at
//! the source boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A repository owned by the subject, forks excluded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub id: i64,
    pub name: String,
    pub full_name: String,
    pub private: bool,
    pub language: Option<String>,
    pub stars: i64,
    pub forks: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Author metadata attached to a commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitAuthor {
    pub name: String,
    pub email: String,
    pub date: DateTime<Utc>,
}

/// A single commit, tagged with the repository it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    pub sha: String,
    pub message: String,
    pub author: CommitAuthor,
    /// Name of the repository this commit belongs to.
    pub repo: String,
}

/// A pull request in one of the subject's repositories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: i64,
    pub title: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
}

/// An issue in one of the subject's repositories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub number: i64,
    pub title: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_round_trips_through_json() {
        let commit = Commit {
            sha: "abc123".to_string(),
            message: "fix parser".to_string(),
            author: CommitAuthor {
                name: "Mona".to_string(),
                email: "mona@example.com".to_string(),
                date: Utc::now(),
            },
            repo: "devpulse".to_string(),
        };

        let json = serde_json::to_string(&commit).expect("serialize should succeed");
        let back: Commit = serde_json::from_str(&json).expect("deserialize should succeed");
        assert_eq!(back, commit);
    }
}
