//! Package recognition error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum PackageError {
    #[error("not a valid content package path: {path}")]
    NotAPackage { path: String },

    #[error("package not found: {path}")]
    NotFound { path: String },

    #[error("no content packages found under {path}")]
    NoPackages { path: String },
}

impl UserFacingError for PackageError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::NotAPackage { .. } => Some(
                "A package has imsmanifest.xml at its root or sibling Items and Stimuli folders.",
            ),
            Self::NoPackages { .. } => {
                Some("Point at a folder containing package directories or .zip archives.")
            }
            Self::NotFound { .. } => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::NotAPackage { .. } => "package.not_a_package",
            Self::NotFound { .. } => "package.not_found",
            Self::NoPackages { .. } => "package.none_found",
        };
        Some(code)
    }
}
