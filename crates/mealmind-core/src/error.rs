//! Error types for Mealmind

use thiserror::Error;

use crate::ai::FailureKind;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    /// Map into the tagged failure taxonomy surfaced by the AI gateway
    pub fn kind(&self) -> FailureKind {
        if self.is_quota_exceeded() {
            return FailureKind::QuotaExceeded;
        }
        match self {
            Error::Configuration(_) => FailureKind::Configuration,
            Error::QuotaExceeded(_) => FailureKind::QuotaExceeded,
            Error::Parse(_) | Error::Json(_) => FailureKind::Parse,
            Error::Http(_) | Error::Api { .. } | Error::Io(_) | Error::InvalidData(_) => {
                FailureKind::Transport
            }
        }
    }

    /// Whether this error is a provider rate-limit / quota signal
    pub fn is_quota_exceeded(&self) -> bool {
        match self {
            Error::QuotaExceeded(_) => true,
            Error::Api { status, message } => *status == 429 || is_quota_message(message),
            Error::Http(e) => e.status().is_some_and(|s| s.as_u16() == 429),
            _ => false,
        }
    }
}

/// Keywords providers use when rejecting a call for rate or usage limits
const QUOTA_KEYWORDS: &[&str] = &[
    "quota",
    "rate limit",
    "rate-limit",
    "resource_exhausted",
    "resource exhausted",
    "too many requests",
];

/// Check a provider error message for quota-related keywords
pub fn is_quota_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    QUOTA_KEYWORDS.iter().any(|k| lower.contains(k))
}

pub type Result<T> = std::result::Result<T, Error>;
