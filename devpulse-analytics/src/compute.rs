//! Pure metric computations over activity records.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use devpulse_core::{AuthorProductivity, Commit, CommitTrendPoint, Repository, RepositoryMetrics};

/// Group commits by UTC day, ascending, with distinct author counts.
pub fn commit_trends(commits: &[Commit]) -> Vec<CommitTrendPoint> {
    let mut by_day: BTreeMap<NaiveDate, (usize, HashSet<&str>)> = BTreeMap::new();

    for commit in commits {
        let day = commit.author.date.date_naive();
        let entry = by_day.entry(day).or_default();
        entry.0 += 1;
        entry.1.insert(commit.author.name.as_str());
    }

    by_day
        .into_iter()
        .map(|(date, (count, authors))| CommitTrendPoint {
            date,
            count,
            authors: authors.len(),
        })
        .collect()
}

/// Per-author rollups, sorted descending by commit count (name as the
/// tie-breaker, so output is deterministic).
pub fn author_productivity(commits: &[Commit]) -> Vec<AuthorProductivity> {
    struct Acc {
        email: String,
        commits: usize,
        first_commit: DateTime<Utc>,
        last_commit: DateTime<Utc>,
        active_days: HashSet<NaiveDate>,
    }

    let mut by_author: HashMap<&str, Acc> = HashMap::new();

    for commit in commits {
        let acc = by_author
            .entry(commit.author.name.as_str())
            .or_insert_with(|| Acc {
                email: commit.author.email.clone(),
                commits: 0,
                first_commit: commit.author.date,
                last_commit: commit.author.date,
                active_days: HashSet::new(),
            });

        acc.commits += 1;
        acc.active_days.insert(commit.author.date.date_naive());
        if commit.author.date < acc.first_commit {
            acc.first_commit = commit.author.date;
        }
        if commit.author.date > acc.last_commit {
            acc.last_commit = commit.author.date;
        }
    }

    let mut rows: Vec<AuthorProductivity> = by_author
        .into_iter()
        .map(|(name, acc)| AuthorProductivity {
            name: name.to_string(),
            email: acc.email,
            commits: acc.commits,
            first_commit: acc.first_commit,
            last_commit: acc.last_commit,
            active_days: acc.active_days.len(),
        })
        .collect();

    rows.sort_by(|a, b| b.commits.cmp(&a.commits).then_with(|| a.name.cmp(&b.name)));
    rows
}

/// Aggregate metrics over repositories and commits.
pub fn repository_metrics(repositories: &[Repository], commits: &[Commit]) -> RepositoryMetrics {
    if repositories.is_empty() {
        return RepositoryMetrics::default();
    }

    let total_commits = commits.len();
    let unique_contributors = commits
        .iter()
        .map(|c| c.author.email.as_str())
        .collect::<HashSet<_>>()
        .len();

    let day_span = commit_day_span(commits);
    let commits_per_day = if day_span > 0 {
        round2(total_commits as f64 / day_span as f64)
    } else {
        0.0
    };

    RepositoryMetrics {
        total_repositories: repositories.len(),
        total_commits,
        unique_contributors,
        commits_per_day,
        most_active_repo: most_active_repository(repositories, commits),
        activity_score: activity_score(total_commits, unique_contributors, day_span),
    }
}

/// Days between the first and last commit, at least 1 when any commits
/// exist.
fn commit_day_span(commits: &[Commit]) -> i64 {
    let Some(first) = commits.iter().map(|c| c.author.date).min() else {
        return 0;
    };
    let last = commits
        .iter()
        .map(|c| c.author.date)
        .max()
        .expect("non-empty");

    let days = (last - first).num_days();
    days.max(1)
}

/// The repository with the most commits, falling back to the most
/// recently updated repository when no commits were fetched.
fn most_active_repository(repositories: &[Repository], commits: &[Commit]) -> Option<String> {
    if commits.is_empty() {
        return repositories
            .iter()
            .max_by_key(|r| r.updated_at)
            .map(|r| r.name.clone());
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for commit in commits {
        *counts.entry(commit.repo.as_str()).or_default() += 1;
    }

    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(name, _)| name.to_string())
}

/// 0-10 score blending volume, team size, and consistency, rounded to
/// one decimal.
fn activity_score(commits: usize, authors: usize, day_span: i64) -> f64 {
    if commits == 0 {
        return 0.0;
    }

    let commit_score = (commits as f64 / 10.0).min(10.0);
    let author_score = (authors as f64 * 2.0).min(10.0);
    let consistency_score = if day_span > 0 {
        (commits as f64 / day_span as f64 * 10.0).min(10.0)
    } else {
        0.0
    };

    round1((commit_score + author_score + consistency_score) / 3.0)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use devpulse_core::CommitAuthor;

    fn commit(repo: &str, name: &str, email: &str, date: &str) -> Commit {
        Commit {
            sha: format!("{repo}-{name}-{date}"),
            message: "change".to_string(),
            author: CommitAuthor {
                name: name.to_string(),
                email: email.to_string(),
                date: date.parse().expect("valid datetime"),
            },
            repo: repo.to_string(),
        }
    }

    fn repo(name: &str, updated: &str) -> Repository {
        Repository {
            id: 1,
            name: name.to_string(),
            full_name: format!("octocat/{name}"),
            private: false,
            language: None,
            stars: 0,
            forks: 0,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            updated_at: updated.parse().expect("valid datetime"),
        }
    }

    #[test]
    fn test_commit_trends_groups_by_day() {
        let commits = vec![
            commit("a", "mona", "m@x.com", "2026-06-01T09:00:00Z"),
            commit("a", "mona", "m@x.com", "2026-06-01T17:00:00Z"),
            commit("a", "hubot", "h@x.com", "2026-06-01T18:00:00Z"),
            commit("a", "mona", "m@x.com", "2026-06-03T10:00:00Z"),
        ];

        let trends = commit_trends(&commits);
        assert_eq!(trends.len(), 2);
        assert_eq!(trends[0].date.to_string(), "2026-06-01");
        assert_eq!(trends[0].count, 3);
        assert_eq!(trends[0].authors, 2);
        assert_eq!(trends[1].date.to_string(), "2026-06-03");
        assert_eq!(trends[1].count, 1);
        assert_eq!(trends[1].authors, 1);
    }

    #[test]
    fn test_commit_trends_empty() {
        assert!(commit_trends(&[]).is_empty());
    }

    #[test]
    fn test_author_productivity_sorted_and_counted() {
        let commits = vec![
            commit("a", "mona", "m@x.com", "2026-06-01T09:00:00Z"),
            commit("a", "mona", "m@x.com", "2026-06-02T09:00:00Z"),
            commit("a", "mona", "m@x.com", "2026-06-02T11:00:00Z"),
            commit("a", "hubot", "h@x.com", "2026-06-01T10:00:00Z"),
        ];

        let rows = author_productivity(&commits);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "mona");
        assert_eq!(rows[0].commits, 3);
        assert_eq!(rows[0].active_days, 2);
        assert_eq!(
            rows[0].first_commit,
            "2026-06-01T09:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
        assert_eq!(
            rows[0].last_commit,
            "2026-06-02T11:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
        assert_eq!(rows[1].name, "hubot");
        assert_eq!(rows[1].commits, 1);
    }

    #[test]
    fn test_repository_metrics_totals() {
        let repositories = vec![
            repo("a", "2026-06-02T00:00:00Z"),
            repo("b", "2026-06-01T00:00:00Z"),
        ];
        let commits = vec![
            commit("a", "mona", "m@x.com", "2026-06-01T00:00:00Z"),
            commit("a", "mona", "m@x.com", "2026-06-02T00:00:00Z"),
            commit("b", "hubot", "h@x.com", "2026-06-03T00:00:00Z"),
        ];

        let metrics = repository_metrics(&repositories, &commits);
        assert_eq!(metrics.total_repositories, 2);
        assert_eq!(metrics.total_commits, 3);
        assert_eq!(metrics.unique_contributors, 2);
        assert_eq!(metrics.most_active_repo.as_deref(), Some("a"));
        assert!((metrics.commits_per_day - 1.5).abs() < 1e-9);
        assert!(metrics.activity_score > 0.0);
        assert!(metrics.activity_score <= 10.0);
    }

    #[test]
    fn test_repository_metrics_empty_repositories() {
        let metrics = repository_metrics(&[], &[]);
        assert_eq!(metrics, RepositoryMetrics::default());
    }

    #[test]
    fn test_most_active_repo_falls_back_to_recently_updated() {
        let repositories = vec![
            repo("stale", "2026-01-01T00:00:00Z"),
            repo("fresh", "2026-06-01T00:00:00Z"),
        ];

        let metrics = repository_metrics(&repositories, &[]);
        assert_eq!(metrics.most_active_repo.as_deref(), Some("fresh"));
        assert_eq!(metrics.commits_per_day, 0.0);
        assert_eq!(metrics.activity_score, 0.0);
    }

    #[test]
    fn test_day_span_is_at_least_one_for_same_day_commits() {
        let commits = vec![
            commit("a", "mona", "m@x.com", "2026-06-01T09:00:00Z"),
            commit("a", "mona", "m@x.com", "2026-06-01T10:00:00Z"),
        ];
        assert_eq!(commit_day_span(&commits), 1);
    }

    #[test]
    fn test_activity_score_bounds() {
        assert_eq!(activity_score(0, 0, 0), 0.0);
        let high = activity_score(1000, 50, 1);
        assert!(high <= 10.0);
    }
}
