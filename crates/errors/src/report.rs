//! Reporting sink error types
//!
//! Any of these aborts the run: every component writes through the sink.

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum ReportError {
    #[error("failed to open report output {path}: {message}")]
    OpenFailed { path: String, message: String },

    #[error("failed to write report record: {message}")]
    WriteFailed { message: String },

    #[error("failed to flush report output: {message}")]
    FlushFailed { message: String },
}

impl From<std::io::Error> for ReportError {
    fn from(err: std::io::Error) -> Self {
        Self::WriteFailed {
            message: err.to_string(),
        }
    }
}

impl UserFacingError for ReportError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::OpenFailed { .. } => {
                Some("Ensure the report directory exists and is writable.")
            }
            _ => Some("Check free disk space for the report output."),
        }
    }

    fn is_retryable(&self) -> bool {
        true
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::OpenFailed { .. } => "report.open_failed",
            Self::WriteFailed { .. } => "report.write_failed",
            Self::FlushFailed { .. } => "report.flush_failed",
        };
        Some(code)
    }
}
