//! Error records written to the reporting sink

use serde::{Deserialize, Serialize};

use crate::{ErrorCategory, Identity, Severity};

/// The part of the package a record is filed against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportSubject {
    pub folder: String,
    pub bank_key: String,
    pub item_id: String,
    pub item_type: String,
}

impl ReportSubject {
    /// Subject for a folder whose identity is not (yet) known
    #[must_use]
    pub fn folder(folder: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_bank_key(mut self, bank_key: impl Into<String>) -> Self {
        self.bank_key = bank_key.into();
        self
    }

    #[must_use]
    pub fn with_item_id(mut self, item_id: impl Into<String>) -> Self {
        self.item_id = item_id.into();
        self
    }

    #[must_use]
    pub fn with_item_type(mut self, item_type: impl Into<String>) -> Self {
        self.item_type = item_type.into();
        self
    }
}

impl From<&Identity> for ReportSubject {
    fn from(identity: &Identity) -> Self {
        Self {
            folder: identity.folder.clone(),
            bank_key: identity.bank_key.clone(),
            item_id: identity.item_id.clone(),
            item_type: identity.item_type.clone(),
        }
    }
}

/// One finding. Never mutated after it reaches the sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRecord {
    pub folder: String,
    pub bank_key: String,
    pub item_id: String,
    pub item_type: String,
    pub category: ErrorCategory,
    pub severity: Severity,
    pub message: String,
    pub detail: String,
}

impl ErrorRecord {
    #[must_use]
    pub fn new(
        subject: ReportSubject,
        category: ErrorCategory,
        severity: Severity,
        message: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            folder: subject.folder,
            bank_key: subject.bank_key,
            item_id: subject.item_id,
            item_type: subject.item_type,
            category,
            severity,
            message: message.into(),
            detail: detail.into(),
        }
    }
}
