//! Error types for the Slack client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, SlackError>;

/// Errors that can occur when calling the Slack API
#[derive(Debug, Error)]
pub enum SlackError {
    /// HTTP request failed (connection, timeout, ...)
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Slack answered with `ok: false`
    #[error("{0}")]
    Slack(String),
}

impl SlackError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Slack error code (e.g. `channel_not_found`), if Slack produced one
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Slack(code) => Some(code),
            _ => None,
        }
    }

    /// Check if Slack throttled the request
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::ApiError { status: 429, .. })
            || matches!(self, Self::Slack(code) if code == "ratelimited")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slack_error_displays_code() {
        let error = SlackError::Slack("channel_not_found".to_string());
        assert_eq!(error.to_string(), "channel_not_found");
        assert_eq!(error.code(), Some("channel_not_found"));
    }

    #[test]
    fn test_rate_limited() {
        assert!(SlackError::api_error(429, "slow down").is_rate_limited());
        assert!(SlackError::Slack("ratelimited".to_string()).is_rate_limited());
        assert!(!SlackError::api_error(500, "boom").is_rate_limited());
    }
}
