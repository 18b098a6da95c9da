use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Upstream request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Upstream returned non-200 status: {status}")]
    UpstreamStatusError { status: reqwest::StatusCode },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

/// Coarse classification used when logging failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Startup misconfiguration. The only fatal kind.
    Configuration,
    /// Fetching from the query API failed; the cycle is skipped.
    Upstream,
    /// The upstream body could not be decoded; the cycle is skipped.
    Decode,
}

impl CacheError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CacheError::MissingConfigError { .. } | CacheError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            CacheError::ApiError(e) if e.is_decode() => ErrorCategory::Decode,
            CacheError::ApiError(_) | CacheError::UpstreamStatusError { .. } => ErrorCategory::Upstream,
            CacheError::SerializationError(_) => ErrorCategory::Decode,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.category() == ErrorCategory::Configuration
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CacheError::MissingConfigError { field } => {
                format!("{} is not set in the environment", field)
            }
            CacheError::InvalidConfigValueError { field, reason, .. } => {
                format!("{} is invalid: {}", field, reason)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;
