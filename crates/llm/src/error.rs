//! Vendor-neutral provider failure taxonomy.

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::StatusCode;

/// Longest slice of an error body kept in messages.
const MAX_ERROR_BODY_CHARS: usize = 300;

/// Tagged result of a failed provider call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// Missing, invalid, or unauthorized API key.
    #[error("Provider rejected the credentials: {0}")]
    AuthFailure(String),

    /// The vendor throttled the request.
    #[error("Provider rate limit exceeded")]
    RateLimited { retry_after: Option<Duration> },

    #[error("Provider call timed out")]
    Timeout,

    /// The call completed but the body could not be used.
    #[error("Provider returned an invalid response: {0}")]
    InvalidResponse(String),

    /// Network failure or vendor-side outage.
    #[error("Provider unavailable: {0}")]
    Unavailable(String),
}

impl ProviderError {
    /// Stable snake_case name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AuthFailure(_) => "auth_failure",
            Self::RateLimited { .. } => "rate_limited",
            Self::Timeout => "timeout",
            Self::InvalidResponse(_) => "invalid_response",
            Self::Unavailable(_) => "unavailable",
        }
    }

    /// Transient failures worth one more attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::Timeout | Self::Unavailable(_)
        )
    }

    /// Classify a non-success HTTP status.
    pub fn from_status(status: StatusCode, headers: &HeaderMap, body: &str) -> Self {
        let detail = format!("HTTP {}: {}", status.as_u16(), truncate(body));
        match status.as_u16() {
            401 | 403 => Self::AuthFailure(detail),
            429 => Self::RateLimited {
                retry_after: retry_after(headers),
            },
            408 | 504 => Self::Timeout,
            400..=499 => Self::InvalidResponse(detail),
            _ => Self::Unavailable(detail),
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Unavailable(err.to_string())
        }
    }
}

/// Read `retry-after-ms` or `retry-after` (whole seconds).
pub fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
    };
    if let Some(ms) = header("retry-after-ms").and_then(|v| v.parse::<u64>().ok()) {
        return Some(Duration::from_millis(ms));
    }
    header("retry-after")
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|secs| secs.is_finite() && (0.0..=86_400.0).contains(secs))
        .map(Duration::from_secs_f64)
}

fn truncate(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}
