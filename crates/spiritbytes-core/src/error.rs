// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types shared by every SpiritBytes crate.

use std::time::Duration;

use thiserror::Error;

use crate::types::AdapterType;

/// The primary error type used across adapters, clients, and the mood flow.
#[derive(Debug, Error)]
pub enum SpiritError {
    /// Configuration errors (invalid TOML, bad values, unusable settings).
    #[error("configuration error: {0}")]
    Config(String),

    /// Missing input or credential, rejected before any network call.
    #[error("validation error: {0}")]
    Validation(String),

    /// A remote service was unreachable or answered with a non-2xx status.
    #[error("{service} transport error: {message}")]
    Transport {
        service: AdapterType,
        message: String,
        /// HTTP status, when the service answered at all.
        status: Option<u16>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A remote call exceeded its time budget.
    #[error("{service} timed out after {duration:?}")]
    Timeout {
        service: AdapterType,
        duration: Duration,
    },

    /// An upstream payload could not be understood after every recovery step.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// The local write succeeded but the remote sync did not.
    #[error("saved locally only: {message}")]
    PartialPersistence { message: String },

    /// Local database failure.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SpiritError {
    /// Builds a transport error without an underlying cause.
    pub fn transport(service: AdapterType, message: impl Into<String>) -> Self {
        SpiritError::Transport {
            service,
            message: message.into(),
            status: None,
            source: None,
        }
    }

    /// Whether a user-initiated retry of the same call could succeed.
    ///
    /// Nothing in SpiritBytes retries automatically; this only drives the
    /// retry affordance shown to the user.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SpiritError::Transport { .. } | SpiritError::Timeout { .. }
        )
    }

    /// HTTP status carried by a transport error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            SpiritError::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SpiritError {
    fn from(e: serde_json::Error) -> Self {
        SpiritError::Parse {
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_and_timeout_are_retryable() {
        let transport = SpiritError::transport(AdapterType::BlobStore, "403 Forbidden");
        let timeout = SpiritError::Timeout {
            service: AdapterType::Inference,
            duration: Duration::from_secs(30),
        };
        assert!(transport.is_retryable());
        assert!(timeout.is_retryable());
        assert!(!SpiritError::Validation("no key".into()).is_retryable());
        assert!(
            !SpiritError::PartialPersistence {
                message: "remote down".into()
            }
            .is_retryable()
        );
    }

    #[test]
    fn display_names_the_service() {
        let err = SpiritError::Transport {
            service: AdapterType::Completion,
            message: "API returned 500".into(),
            status: Some(500),
            source: None,
        };
        assert_eq!(err.to_string(), "completion transport error: API returned 500");
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn json_errors_become_parse_errors() {
        let e = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err: SpiritError = e.into();
        assert!(matches!(err, SpiritError::Parse { .. }));
    }
}
