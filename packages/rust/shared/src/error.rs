//! Error types for StandardForge.
//!
//! Library crates use [`StandardForgeError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all StandardForge operations.
#[derive(Debug, thiserror::Error)]
pub enum StandardForgeError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Authentication or permission failure reported by the platform.
    #[error("authentication failed (HTTP {status}): check CODACY_API_TOKEN and org permissions")]
    Auth { status: u16 },

    /// The platform throttled the request and the bounded retry was exhausted.
    #[error("rate limited by the API (HTTP 429)")]
    RateLimited,

    /// Transport-level failure (DNS, TLS, connect, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// Non-success response from the platform.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Response parsed, but its shape was not what the client expected.
    #[error("unexpected response: {message}")]
    UnexpectedResponse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, StandardForgeError>;

impl StandardForgeError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create an unexpected-response error from any displayable message.
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
