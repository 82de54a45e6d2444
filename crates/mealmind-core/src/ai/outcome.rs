//! Tagged outcome of an AI operation
//!
//! Callers hold an [`AiOutcome`] per in-flight operation instead of separate
//! loading/error/result flags, so impossible combinations such as "loading
//! with a result" cannot be represented.

use serde::Serialize;

use crate::error::Error;

/// Failure taxonomy surfaced by the AI gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Missing or placeholder credential; no network call was made
    Configuration,
    /// Network or HTTP failure reaching the provider
    Transport,
    /// Provider rate-limit / usage-limit signal
    QuotaExceeded,
    /// Response missing, not valid JSON, or missing required fields
    Parse,
}

/// A failed AI operation with a human-readable message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AiFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl std::fmt::Display for AiFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<Error> for AiFailure {
    fn from(err: Error) -> Self {
        let kind = err.kind();
        let message = match err {
            // Configuration messages are shown to the user verbatim
            Error::Configuration(msg) => msg,
            other => other.to_string(),
        };
        Self { kind, message }
    }
}

/// State of one AI operation as seen by its caller
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AiOutcome<T> {
    /// Request issued, no response yet
    #[default]
    Pending,
    Success(T),
    Failed(AiFailure),
}

impl<T> AiOutcome<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The result, if the operation succeeded
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    /// The failure, if the operation failed
    pub fn failure(&self) -> Option<&AiFailure> {
        match self {
            Self::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> AiOutcome<U> {
        match self {
            Self::Pending => AiOutcome::Pending,
            Self::Success(value) => AiOutcome::Success(f(value)),
            Self::Failed(failure) => AiOutcome::Failed(failure),
        }
    }
}

impl<T> From<crate::error::Result<T>> for AiOutcome<T> {
    fn from(result: crate::error::Result<T>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(err) => Self::Failed(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_pending() {
        let outcome: AiOutcome<u32> = AiOutcome::default();
        assert!(outcome.is_pending());
        assert!(outcome.ok().is_none());
    }

    #[test]
    fn test_configuration_message_is_verbatim() {
        let outcome: AiOutcome<u32> = Err(Error::Configuration("No key".into())).into();
        let failure = outcome.failure().unwrap();
        assert_eq!(failure.kind, FailureKind::Configuration);
        assert_eq!(failure.message, "No key");
    }

    #[test]
    fn test_parse_error_tag() {
        let outcome: AiOutcome<u32> = Err(Error::Parse("bad".into())).into();
        assert_eq!(outcome.failure().unwrap().kind, FailureKind::Parse);
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_map_success() {
        let outcome: AiOutcome<u32> = Ok(2).into();
        assert_eq!(outcome.map(|v| v * 2).ok(), Some(4));
    }
}
