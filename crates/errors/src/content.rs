//! Item and stimulus document error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum ContentError {
    #[error("file not found: {filename}")]
    NotFound { filename: String },

    #[error("invalid XML in {filename}: {message}")]
    InvalidXml { filename: String, message: String },

    #[error("expected element {element} not found in {filename}")]
    MissingElement { element: String, filename: String },

    #[error("{filename} is not valid UTF-8")]
    InvalidEncoding { filename: String },

    #[error("invalid {attribute} value '{value}' in {filename}")]
    InvalidValue {
        filename: String,
        attribute: String,
        value: String,
    },
}

impl ContentError {
    /// The file this error refers to.
    #[must_use]
    pub fn filename(&self) -> &str {
        match self {
            Self::NotFound { filename }
            | Self::InvalidXml { filename, .. }
            | Self::MissingElement { filename, .. }
            | Self::InvalidEncoding { filename }
            | Self::InvalidValue { filename, .. } => filename,
        }
    }

    /// Detail text for load findings: `filename='<name>' detail='<reason>'`
    #[must_use]
    pub fn load_detail(&self) -> String {
        let filename = self.filename();
        let name = filename.rsplit('/').next().unwrap_or(filename);
        let reason = match self {
            Self::NotFound { .. } => "File not found".to_string(),
            Self::InvalidXml { message, .. } => message.clone(),
            Self::MissingElement { element, .. } => format!("missing element {element}"),
            Self::InvalidEncoding { .. } => "not valid UTF-8".to_string(),
            Self::InvalidValue {
                attribute, value, ..
            } => format!("invalid {attribute} '{value}'"),
        };
        format!("filename='{name}' detail='{reason}'")
    }
}

impl UserFacingError for ContentError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::NotFound { .. } => "content.not_found",
            Self::InvalidXml { .. } => "content.invalid_xml",
            Self::MissingElement { .. } => "content.missing_element",
            Self::InvalidEncoding { .. } => "content.invalid_encoding",
            Self::InvalidValue { .. } => "content.invalid_value",
        };
        Some(code)
    }
}
