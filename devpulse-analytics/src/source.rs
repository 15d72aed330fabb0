//! Activity source abstraction.
//!
//! The aggregator is written against this trait; the networked GitHub
//! client and the in-memory fixture source both implement it, selected
//! at construction time.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use devpulse_core::{Commit, Repository, SourceError};

/// Produces activity records for a subject.
///
/// Implementations must be thread-safe (`Send + Sync`); one instance is
/// shared across requests.
#[async_trait]
pub trait ActivitySource: Send + Sync {
    /// The subject's repositories, forks excluded, at most `limit`.
    async fn repositories(
        &self,
        subject: &str,
        limit: usize,
    ) -> Result<Vec<Repository>, SourceError>;

    /// Recent commits in one of the subject's repositories, newest
    /// first, at most `limit`.
    async fn recent_commits(
        &self,
        subject: &str,
        repo: &str,
        limit: usize,
    ) -> Result<Vec<Commit>, SourceError>;
}

/// In-memory activity source for tests and local mode.
///
/// Subjects that were never seeded report [`SourceError::NotFound`],
/// mirroring the networked client's behavior for unknown users.
#[derive(Default)]
pub struct FixtureSource {
    repositories: RwLock<HashMap<String, Vec<Repository>>>,
    commits: RwLock<HashMap<(String, String), Vec<Commit>>>,
}

impl FixtureSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed repositories for a subject.
    pub fn add_repositories(&self, subject: &str, repositories: Vec<Repository>) {
        self.repositories
            .write()
            .expect("fixture lock poisoned")
            .insert(subject.to_string(), repositories);
    }

    /// Seed commits for a subject's repository.
    pub fn add_commits(&self, subject: &str, repo: &str, commits: Vec<Commit>) {
        self.commits
            .write()
            .expect("fixture lock poisoned")
            .insert((subject.to_string(), repo.to_string()), commits);
    }
}

#[async_trait]
impl ActivitySource for FixtureSource {
    async fn repositories(
        &self,
        subject: &str,
        limit: usize,
    ) -> Result<Vec<Repository>, SourceError> {
        let repositories = self.repositories.read().expect("fixture lock poisoned");
        match repositories.get(subject) {
            Some(repos) => Ok(repos.iter().take(limit).cloned().collect()),
            None => Err(SourceError::NotFound {
                subject: subject.to_string(),
            }),
        }
    }

    async fn recent_commits(
        &self,
        subject: &str,
        repo: &str,
        limit: usize,
    ) -> Result<Vec<Commit>, SourceError> {
        let commits = self.commits.read().expect("fixture lock poisoned");
        Ok(commits
            .get(&(subject.to_string(), repo.to_string()))
            .map(|batch| batch.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}
