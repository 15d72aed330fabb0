//! GitHub REST client implementing [`ActivitySource`].
//!
//! Maps the subset of the GitHub payloads the aggregator needs into the
//! core record types, filters forks at the boundary, and converts HTTP
//! failures into the source error taxonomy (403/429 become
//! `RateLimited` with the server's Retry-After when present).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use devpulse_core::{Commit, CommitAuthor, GithubSettings, Repository, SourceError};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::source::ActivitySource;

/// Networked activity source backed by the GitHub REST API.
pub struct GithubClient {
    client: reqwest::Client,
    settings: GithubSettings,
}

impl GithubClient {
    /// Build a client from settings.
    pub fn new(settings: GithubSettings) -> Result<Self, SourceError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&settings.user_agent).map_err(|e| {
                SourceError::InvalidResponse {
                    reason: format!("invalid user agent: {e}"),
                }
            })?,
        );
        if let Some(token) = &settings.token {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
                SourceError::InvalidResponse {
                    reason: format!("invalid token: {e}"),
                }
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| SourceError::RequestFailed {
                status: 0,
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { client, settings })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        subject: &str,
    ) -> Result<T, SourceError> {
        let url = format!("{}{}", self.settings.base_url.trim_end_matches('/'), path);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| SourceError::RequestFailed {
                status: 0,
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| SourceError::InvalidResponse {
                    reason: format!("failed to parse response: {e}"),
                });
        }

        let retry_after_ms = parse_retry_after_ms(response.headers());
        let message = response.text().await.unwrap_or_default();

        Err(match status {
            StatusCode::NOT_FOUND => SourceError::NotFound {
                subject: subject.to_string(),
            },
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => SourceError::RateLimited {
                retry_after_ms: retry_after_ms.unwrap_or(60_000),
            },
            _ => SourceError::RequestFailed {
                status: status.as_u16(),
                message,
            },
        })
    }
}

#[async_trait]
impl ActivitySource for GithubClient {
    async fn repositories(
        &self,
        subject: &str,
        limit: usize,
    ) -> Result<Vec<Repository>, SourceError> {
        let dtos: Vec<RepoDto> = self
            .get_json(
                &format!("/users/{subject}/repos"),
                &[
                    ("sort", "updated".to_string()),
                    ("direction", "desc".to_string()),
                    ("per_page", limit.clamp(1, 100).to_string()),
                ],
                subject,
            )
            .await?;

        Ok(map_repositories(dtos, limit))
    }

    async fn recent_commits(
        &self,
        subject: &str,
        repo: &str,
        limit: usize,
    ) -> Result<Vec<Commit>, SourceError> {
        let result: Result<Vec<CommitDto>, SourceError> = self
            .get_json(
                &format!("/repos/{subject}/{repo}/commits"),
                &[("per_page", limit.clamp(1, 100).to_string())],
                subject,
            )
            .await;

        match result {
            Ok(dtos) => Ok(map_commits(dtos, repo)),
            // GitHub answers 409 for an empty repository; that is zero
            // commits, not a failure.
            Err(SourceError::RequestFailed { status: 409, .. }) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }
}

fn parse_retry_after_ms(headers: &reqwest::header::HeaderMap) -> Option<i64> {
    headers
        .get("retry-after")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<f64>().ok())
        .map(|seconds| (seconds * 1000.0) as i64)
}

fn map_repositories(dtos: Vec<RepoDto>, limit: usize) -> Vec<Repository> {
    dtos.into_iter()
        .filter(|dto| !dto.fork)
        .map(|dto| Repository {
            id: dto.id,
            name: dto.name,
            full_name: dto.full_name,
            private: dto.private,
            language: dto.language,
            stars: dto.stargazers_count,
            forks: dto.forks_count,
            created_at: dto.created_at,
            updated_at: dto.updated_at,
        })
        .take(limit)
        .collect()
}

fn map_commits(dtos: Vec<CommitDto>, repo: &str) -> Vec<Commit> {
    dtos.into_iter()
        .filter_map(|dto| {
            // Commits without author metadata (e.g. unlinked emails)
            // carry nothing the analytics can use.
            let author = dto.commit.author?;
            Some(Commit {
                sha: dto.sha,
                message: dto.commit.message,
                author: CommitAuthor {
                    name: author.name,
                    email: author.email,
                    date: author.date,
                },
                repo: repo.to_string(),
            })
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct RepoDto {
    id: i64,
    name: String,
    full_name: String,
    private: bool,
    fork: bool,
    language: Option<String>,
    stargazers_count: i64,
    forks_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct CommitDto {
    sha: String,
    commit: CommitDetailDto,
}

#[derive(Debug, Deserialize)]
struct CommitDetailDto {
    message: String,
    author: Option<CommitAuthorDto>,
}

#[derive(Debug, Deserialize)]
struct CommitAuthorDto {
    name: String,
    email: String,
    date: DateTime<Utc>,
}

impl std::fmt::Debug for GithubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubClient")
            .field("base_url", &self.settings.base_url)
            .field("token", &self.settings.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn repo_dto(name: &str, fork: bool) -> serde_json::Value {
        json!({
            "id": 42,
            "name": name,
            "full_name": format!("octocat/{name}"),
            "private": false,
            "fork": fork,
            "language": "Rust",
            "stargazers_count": 7,
            "forks_count": 1,
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2026-06-01T12:00:00Z"
        })
    }

    #[test]
    fn test_map_repositories_filters_forks_and_truncates() {
        let dtos: Vec<RepoDto> = serde_json::from_value(json!([
            repo_dto("a", false),
            repo_dto("forked", true),
            repo_dto("b", false),
            repo_dto("c", false),
        ]))
        .expect("dtos should parse");

        let repos = map_repositories(dtos, 2);
        let names: Vec<_> = repos.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_map_commits_skips_missing_author() {
        let dtos: Vec<CommitDto> = serde_json::from_value(json!([
            {
                "sha": "abc",
                "commit": {
                    "message": "fix parser",
                    "author": {
                        "name": "Mona",
                        "email": "mona@example.com",
                        "date": "2026-06-01T12:00:00Z"
                    }
                }
            },
            {
                "sha": "def",
                "commit": { "message": "orphan", "author": null }
            }
        ]))
        .expect("dtos should parse");

        let commits = map_commits(dtos, "devpulse");
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].sha, "abc");
        assert_eq!(commits[0].repo, "devpulse");
        assert_eq!(commits[0].author.email, "mona@example.com");
    }

    #[test]
    fn test_client_builds_with_token() {
        let settings = GithubSettings {
            token: Some("ghp_test".to_string()),
            ..GithubSettings::default()
        };
        assert!(GithubClient::new(settings).is_ok());
    }
}
