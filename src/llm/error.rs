//! Generation errors and retry policy.
//!
//! Transient failures (rate limits, 5xx, network) are retried by the
//! model-backed generator; everything else fails fast so the calling agent can
//! fall back to its rule-based draft.

use std::time::Duration;

/// Failure reported by a [`TextGenerator`](super::TextGenerator).
#[derive(Debug, thiserror::Error)]
#[error("{kind}{}: {message}", status_suffix(.status_code))]
pub struct LlmError {
    pub kind: LlmErrorKind,
    pub status_code: Option<u16>,
    pub message: String,
    /// Delay requested by the provider (Retry-After), if any.
    pub retry_after: Option<Duration>,
}

impl LlmError {
    fn new(kind: LlmErrorKind, status_code: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            kind,
            status_code,
            message: message.into(),
            retry_after: None,
        }
    }

    pub fn rate_limited(message: impl Into<String>, retry_after: Option<Duration>) -> Self {
        Self {
            retry_after,
            ..Self::new(LlmErrorKind::RateLimited, Some(429), message)
        }
    }

    /// Build an error from a non-success HTTP status.
    pub fn from_status(status: u16, body: impl Into<String>, retry_after: Option<Duration>) -> Self {
        match classify_http_status(status) {
            LlmErrorKind::RateLimited => Self::rate_limited(body, retry_after),
            kind => Self::new(kind, Some(status), body),
        }
    }

    pub fn network_error(message: impl Into<String>) -> Self {
        Self::new(LlmErrorKind::NetworkError, None, message)
    }

    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::new(LlmErrorKind::ParseError, None, message)
    }

    pub fn is_transient(&self) -> bool {
        self.kind.is_transient()
    }

    /// Delay before retry number `attempt` (0-based).
    ///
    /// Uses the provider's Retry-After when present, otherwise exponential
    /// backoff from a per-kind base, capped at 60 seconds.
    pub fn suggested_delay(&self, attempt: u32) -> Duration {
        if let Some(retry_after) = self.retry_after {
            return retry_after;
        }

        let base_secs: u64 = match self.kind {
            LlmErrorKind::RateLimited => 5,
            LlmErrorKind::ServerError => 2,
            _ => 1,
        };
        let secs = base_secs.saturating_mul(2u64.saturating_pow(attempt));
        Duration::from_secs(secs.min(60))
    }
}

fn status_suffix(status_code: &Option<u16>) -> String {
    status_code
        .map(|code| format!(" (HTTP {})", code))
        .unwrap_or_default()
}

/// Classification of generation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmErrorKind {
    /// 429
    RateLimited,
    /// 5xx
    ServerError,
    /// Other 4xx (bad request, auth)
    ClientError,
    /// Connection failure or timeout
    NetworkError,
    /// Response body not understood
    ParseError,
}

impl LlmErrorKind {
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::ServerError | Self::NetworkError
        )
    }
}

impl std::fmt::Display for LlmErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::RateLimited => "Rate limited",
            Self::ServerError => "Server error",
            Self::ClientError => "Client error",
            Self::NetworkError => "Network error",
            Self::ParseError => "Parse error",
        };
        f.write_str(label)
    }
}

/// Map an HTTP status code to an error kind.
pub fn classify_http_status(status: u16) -> LlmErrorKind {
    match status {
        429 => LlmErrorKind::RateLimited,
        400..=499 => LlmErrorKind::ClientError,
        _ => LlmErrorKind::ServerError,
    }
}

/// Retry behaviour of the model-backed generator.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    /// Upper bound on the total time spent across attempts.
    pub max_retry_duration: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            max_retry_duration: Duration::from_secs(120),
        }
    }
}

impl RetryConfig {
    /// Whether attempt number `attempt` (0-based) may be retried after `error`.
    pub fn should_retry(&self, error: &LlmError, attempt: u32) -> bool {
        error.is_transient() && attempt < self.max_retries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_classification() {
        assert_eq!(classify_http_status(429), LlmErrorKind::RateLimited);
        assert_eq!(classify_http_status(503), LlmErrorKind::ServerError);
        assert_eq!(classify_http_status(401), LlmErrorKind::ClientError);
    }

    #[test]
    fn test_client_errors_are_not_retried() {
        let retry = RetryConfig::default();
        let error = LlmError::from_status(400, "bad request", None);

        assert!(!retry.should_retry(&error, 0));
        assert!(retry.should_retry(&LlmError::network_error("reset"), 0));
        assert!(!retry.should_retry(&LlmError::network_error("reset"), 3));
    }

    #[test]
    fn test_backoff_grows_and_is_capped() {
        let error = LlmError::from_status(502, "bad gateway", None);

        assert!(error.suggested_delay(1) > error.suggested_delay(0));
        assert_eq!(error.suggested_delay(10), Duration::from_secs(60));
    }

    #[test]
    fn test_retry_after_wins() {
        let error = LlmError::rate_limited("slow down", Some(Duration::from_secs(30)));
        assert_eq!(error.suggested_delay(4), Duration::from_secs(30));
    }

    #[test]
    fn test_display_includes_status() {
        let error = LlmError::from_status(500, "boom", None);
        assert_eq!(error.to_string(), "Server error (HTTP 500): boom");
    }
}
