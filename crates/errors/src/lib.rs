#![warn(mismatched_lifetime_syntaxes)]
#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Error types for the content package tabulator
//!
//! This crate provides fine-grained error types organized by domain.
//! Validation findings are never errors: they are recorded through the
//! reporting sink. The types here describe faults, either ones that abort a
//! single identity (caught by the scheduler) or ones that abort the run.

use std::borrow::Cow;

use thiserror::Error;

pub mod config;
pub mod content;
pub mod package;
pub mod report;
pub mod tree;

// Re-export all error types at the root
pub use config::ConfigError;
pub use content::ContentError;
pub use package::PackageError;
pub use report::ReportError;
pub use tree::TreeError;

/// Generic error type for cross-crate boundaries
#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("content error: {0}")]
    Content(#[from] ContentError),

    #[error("report error: {0}")]
    Report(#[from] ReportError),

    #[error("package error: {0}")]
    Package(#[from] PackageError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("I/O error: {message}")]
    Io {
        kind: std::io::ErrorKind,
        message: String,
        path: Option<std::path::PathBuf>,
    },
}

impl Error {
    /// Create an internal error with a message
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Create an Io error with an associated path
    #[must_use]
    pub fn io_with_path(err: &std::io::Error, path: impl Into<std::path::PathBuf>) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
            path: Some(path.into()),
        }
    }

    /// Whether this error must abort the whole run instead of one identity.
    ///
    /// Only the reporting sink and the package itself are load-bearing for
    /// every other component; anything else is contained by the scheduler.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        match self {
            Error::Report(_) | Error::Package(_) | Error::Config(_) => true,
            Error::Tree(err) => err.is_open_failure(),
            _ => false,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
            path: None,
        }
    }
}

/// Result type alias for tabulator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Minimal interface for rendering user-facing error information without
/// requiring heavyweight envelopes.
pub trait UserFacingError {
    /// Short message suitable for CLI output.
    fn user_message(&self) -> Cow<'_, str>;

    /// Optional remediation hint.
    fn user_hint(&self) -> Option<&'static str> {
        None
    }

    /// Whether retrying the same operation is likely to succeed.
    fn is_retryable(&self) -> bool {
        false
    }

    /// Stable error code for analytics / structured reporting.
    fn user_code(&self) -> Option<&'static str> {
        None
    }
}

impl UserFacingError for Error {
    fn user_message(&self) -> Cow<'_, str> {
        match self {
            Error::Tree(err) => err.user_message(),
            Error::Package(err) => err.user_message(),
            Error::Report(err) => err.user_message(),
            Error::Io { message, .. } => Cow::Owned(message.clone()),
            _ => Cow::Owned(self.to_string()),
        }
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Error::Tree(err) => err.user_hint(),
            Error::Package(err) => err.user_hint(),
            Error::Report(err) => err.user_hint(),
            Error::Config(err) => err.user_hint(),
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            Error::Tree(err) => err.is_retryable(),
            Error::Report(err) => err.is_retryable(),
            Error::Io { .. } => true,
            _ => false,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        match self {
            Error::Tree(err) => err.user_code(),
            Error::Content(err) => err.user_code(),
            Error::Report(err) => err.user_code(),
            Error::Package(err) => err.user_code(),
            Error::Config(err) => err.user_code(),
            Error::Internal(_) => Some("error.internal"),
            Error::Io { .. } => Some("error.io"),
        }
    }
}
