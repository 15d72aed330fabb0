//! Error types for DevPulse operations

use thiserror::Error;

/// Cache subsystem errors.
///
/// Every store operation returns an explicit `Result` carrying one of
/// these variants. The orchestration layer is the single place where
/// cache errors are converted into misses or failed-write reports;
/// nothing below it swallows an error silently.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("{tier} store error: {reason}")]
    Backend { tier: String, reason: String },

    #[error("Serialization error: {reason}")]
    Serialization { reason: String },

    #[error("Key encoding error for subject {subject:?}: {reason}")]
    KeyEncoding { subject: String, reason: String },
}

impl CacheError {
    /// Shorthand for a hot-tier backend failure.
    pub fn hot(reason: impl Into<String>) -> Self {
        Self::Backend {
            tier: "hot".to_string(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a cold-tier backend failure.
    pub fn cold(reason: impl Into<String>) -> Self {
        Self::Backend {
            tier: "cold".to_string(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a serialization failure.
    pub fn serialization(reason: impl Into<String>) -> Self {
        Self::Serialization {
            reason: reason.into(),
        }
    }
}

/// Activity source (GitHub) errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("Request failed with status {status}: {message}")]
    RequestFailed { status: u16, message: String },

    #[error("Rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: i64 },

    #[error("Invalid response: {reason}")]
    InvalidResponse { reason: String },

    #[error("Subject not found: {subject}")]
    NotFound { subject: String },
}

/// Narrative assessment provider errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AssessmentError {
    #[error("No assessment provider configured")]
    ProviderNotConfigured,

    #[error("Request failed with status {status}: {message}")]
    RequestFailed { status: u16, message: String },

    #[error("Invalid response: {reason}")]
    InvalidResponse { reason: String },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Master error type for all DevPulse errors.
#[derive(Debug, Clone, Error)]
pub enum DevpulseError {
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Assessment error: {0}")]
    Assessment(#[from] AssessmentError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for DevPulse operations.
pub type DevpulseResult<T> = Result<T, DevpulseError>;

// =============================================================================
// TESTS
// =============================================================================
