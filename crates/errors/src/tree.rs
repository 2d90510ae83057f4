//! Virtual tree error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum TreeError {
    #[error("failed to open package root {path}: {message}")]
    OpenFailed { path: String, message: String },

    #[error("corrupt archive {path}: {message}")]
    CorruptArchive { path: String, message: String },

    #[error("permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("failed to read {path}: {message}")]
    ReadFailed { path: String, message: String },

    #[error("invalid path: {path}")]
    InvalidPath { path: String },
}

impl TreeError {
    /// Convert an `io::Error` into a `TreeError` for a read of `path`
    #[must_use]
    pub fn from_io_with_path(err: &std::io::Error, path: &str) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                path: path.to_string(),
            },
            _ => Self::ReadFailed {
                path: path.to_string(),
                message: err.to_string(),
            },
        }
    }

    /// Faults raised while opening the package root rather than reading one entry.
    #[must_use]
    pub fn is_open_failure(&self) -> bool {
        matches!(self, Self::OpenFailed { .. } | Self::CorruptArchive { .. })
    }
}

impl UserFacingError for TreeError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::CorruptArchive { .. } => {
                Some("Re-export the package archive; it could not be read as a zip file.")
            }
            Self::PermissionDenied { .. } => {
                Some("Ensure the package files are readable by the current user.")
            }
            Self::OpenFailed { .. } => Some("Check that the package path exists."),
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::ReadFailed { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::OpenFailed { .. } => "tree.open_failed",
            Self::CorruptArchive { .. } => "tree.corrupt_archive",
            Self::PermissionDenied { .. } => "tree.permission_denied",
            Self::ReadFailed { .. } => "tree.read_failed",
            Self::InvalidPath { .. } => "tree.invalid_path",
        };
        Some(code)
    }
}
