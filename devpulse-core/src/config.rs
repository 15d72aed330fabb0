//! Configuration types

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, DevpulseError, DevpulseResult};

/// Byte that separates subject and category in encoded cold-tier keys.
/// Subjects and key components containing it are rejected at validation.
pub const KEY_SEPARATOR: char = '\u{1f}';

/// Settings for the two-tier cache.
///
/// Constructed once per process and injected into the store backends and
/// the orchestrator; there is no ambient global configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Namespace prefix for hot-tier keys (`"<prefix>:<subject>"`).
    pub key_prefix: String,
    /// Fixed cache category for cold-tier keys (one logical entry per
    /// subject per category).
    pub category: String,
    /// Hot-tier time to live. Applied by the hot store itself at write
    /// time.
    pub hot_ttl: Duration,
    /// Cold-tier time to live. An entry past this age is reported absent
    /// even if the backing store still holds it.
    pub cold_ttl: Duration,
    /// Maximum number of cold-tier subjects included in a stats report.
    pub max_listed_subjects: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            key_prefix: "analytics".to_string(),
            category: "dashboard".to_string(),
            hot_ttl: Duration::from_secs(3600),
            cold_ttl: Duration::from_secs(30 * 24 * 60 * 60),
            max_listed_subjects: 10,
        }
    }
}

impl CacheSettings {
    /// Create settings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the hot-tier TTL.
    pub fn with_hot_ttl(mut self, ttl: Duration) -> Self {
        self.hot_ttl = ttl;
        self
    }

    /// Set the cold-tier TTL.
    pub fn with_cold_ttl(mut self, ttl: Duration) -> Self {
        self.cold_ttl = ttl;
        self
    }

    /// Set the hot-tier key prefix.
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Set the cold-tier category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the maximum number of subjects listed by stats.
    pub fn with_max_listed_subjects(mut self, max: usize) -> Self {
        self.max_listed_subjects = max;
        self
    }

    /// Validate the settings.
    ///
    /// Rejects zero TTLs, empty key components, and key components that
    /// contain the key separator or the hot-tier `:` delimiter.
    pub fn validate(&self) -> DevpulseResult<()> {
        if self.key_prefix.is_empty() {
            return Err(DevpulseError::Config(ConfigError::MissingRequired {
                field: "key_prefix".to_string(),
            }));
        }

        if self.category.is_empty() {
            return Err(DevpulseError::Config(ConfigError::MissingRequired {
                field: "category".to_string(),
            }));
        }

        for (field, value) in [("key_prefix", &self.key_prefix), ("category", &self.category)] {
            if value.contains(KEY_SEPARATOR) || value.contains(':') {
                return Err(DevpulseError::Config(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: value.clone(),
                    reason: "must not contain key delimiters".to_string(),
                }));
            }
        }

        if self.hot_ttl.is_zero() {
            return Err(DevpulseError::Config(ConfigError::InvalidValue {
                field: "hot_ttl".to_string(),
                value: format!("{:?}", self.hot_ttl),
                reason: "hot_ttl must be positive".to_string(),
            }));
        }

        if self.cold_ttl.is_zero() {
            return Err(DevpulseError::Config(ConfigError::InvalidValue {
                field: "cold_ttl".to_string(),
                value: format!("{:?}", self.cold_ttl),
                reason: "cold_ttl must be positive".to_string(),
            }));
        }

        if self.cold_ttl < self.hot_ttl {
            return Err(DevpulseError::Config(ConfigError::InvalidValue {
                field: "cold_ttl".to_string(),
                value: format!("{:?}", self.cold_ttl),
                reason: "cold_ttl must be at least hot_ttl".to_string(),
            }));
        }

        Ok(())
    }

    /// Create from environment variables with fallback to defaults.
    ///
    /// Environment variables:
    /// - `DEVPULSE_CACHE_KEY_PREFIX`: hot-tier key namespace (default: "analytics")
    /// - `DEVPULSE_CACHE_CATEGORY`: cold-tier category (default: "dashboard")
    /// - `DEVPULSE_CACHE_HOT_TTL_SECS`: hot TTL in seconds (default: 3600)
    /// - `DEVPULSE_CACHE_COLD_TTL_SECS`: cold TTL in seconds (default: 30 days)
    /// - `DEVPULSE_CACHE_MAX_LISTED_SUBJECTS`: stats listing cap (default: 10)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            key_prefix: std::env::var("DEVPULSE_CACHE_KEY_PREFIX")
                .unwrap_or(defaults.key_prefix),
            category: std::env::var("DEVPULSE_CACHE_CATEGORY").unwrap_or(defaults.category),
            hot_ttl: std::env::var("DEVPULSE_CACHE_HOT_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.hot_ttl),
            cold_ttl: std::env::var("DEVPULSE_CACHE_COLD_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.cold_ttl),
            max_listed_subjects: std::env::var("DEVPULSE_CACHE_MAX_LISTED_SUBJECTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_listed_subjects),
        }
    }
}

/// Settings for the GitHub activity source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GithubSettings {
    pub base_url: String,
    /// Personal access token; unauthenticated requests work but are
    /// rate-limited aggressively by GitHub.
    pub token: Option<String>,
    pub user_agent: String,
    pub request_timeout: Duration,
    /// Maximum repositories fetched per subject.
    pub max_repositories: usize,
    /// Maximum commits fetched per repository.
    pub max_commits_per_repo: usize,
}

impl Default for GithubSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.github.com".to_string(),
            token: None,
            user_agent: "devpulse".to_string(),
            request_timeout: Duration::from_secs(10),
            max_repositories: 10,
            max_commits_per_repo: 30,
        }
    }
}

impl GithubSettings {
    /// Create from environment variables with fallback to defaults.
    ///
    /// Environment variables:
    /// - `GITHUB_TOKEN`: personal access token (default: none)
    /// - `DEVPULSE_GITHUB_BASE_URL`: API base URL (default: https://api.github.com)
    /// - `DEVPULSE_GITHUB_TIMEOUT_SECS`: request timeout (default: 10)
    /// - `DEVPULSE_GITHUB_MAX_REPOSITORIES`: repositories per subject (default: 10)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            base_url: std::env::var("DEVPULSE_GITHUB_BASE_URL").unwrap_or(defaults.base_url),
            token: std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()),
            user_agent: defaults.user_agent,
            request_timeout: std::env::var("DEVPULSE_GITHUB_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            max_repositories: std::env::var("DEVPULSE_GITHUB_MAX_REPOSITORIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_repositories),
            max_commits_per_repo: defaults.max_commits_per_repo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_settings_defaults_validate() {
        let settings = CacheSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.hot_ttl, Duration::from_secs(3600));
        assert_eq!(settings.cold_ttl, Duration::from_secs(2_592_000));
    }

    #[test]
    fn test_cache_settings_builder() {
        let settings = CacheSettings::new()
            .with_hot_ttl(Duration::from_secs(60))
            .with_cold_ttl(Duration::from_secs(120))
            .with_key_prefix("act")
            .with_category("summary")
            .with_max_listed_subjects(5);

        assert!(settings.validate().is_ok());
        assert_eq!(settings.key_prefix, "act");
        assert_eq!(settings.category, "summary");
        assert_eq!(settings.max_listed_subjects, 5);
    }

    #[test]
    fn test_cache_settings_rejects_zero_hot_ttl() {
        let settings = CacheSettings::new().with_hot_ttl(Duration::ZERO);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_cache_settings_rejects_cold_shorter_than_hot() {
        let settings = CacheSettings::new()
            .with_hot_ttl(Duration::from_secs(3600))
            .with_cold_ttl(Duration::from_secs(60));
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_cache_settings_rejects_delimiter_in_prefix() {
        let settings = CacheSettings::new().with_key_prefix("an:alytics");
        assert!(settings.validate().is_err());

        let settings = CacheSettings::new().with_category(format!("dash{}board", KEY_SEPARATOR));
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_cache_settings_rejects_empty_prefix() {
        let settings = CacheSettings::new().with_key_prefix("");
        assert!(settings.validate().is_err());
    }
}
