//! Item and stimulus identities discovered while indexing a package

use serde::{Deserialize, Serialize};

use crate::names::names_equal;

/// One item or stimulus as recorded by the indexing pass.
///
/// Identities are read-only once indexed; later stages borrow them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub item_id: String,
    pub item_type: String,
    pub bank_key: String,
    pub is_passage: bool,
    /// Tree-relative path of the owning folder, e.g. `Items/item-200-1234`
    pub folder: String,
}

impl Identity {
    #[must_use]
    pub fn new(
        item_id: impl Into<String>,
        item_type: impl Into<String>,
        bank_key: impl Into<String>,
        is_passage: bool,
        folder: impl Into<String>,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            item_type: item_type.into(),
            bank_key: bank_key.into(),
            is_passage,
            folder: folder.into(),
        }
    }

    /// Last path segment of the owning folder
    #[must_use]
    pub fn folder_name(&self) -> &str {
        self.folder.rsplit('/').next().unwrap_or(&self.folder)
    }

    /// Folder name required by the package naming convention
    #[must_use]
    pub fn expected_folder_name(&self) -> String {
        let prefix = if self.is_passage { "stim" } else { "item" };
        format!("{prefix}-{}-{}", self.bank_key, self.item_id)
    }

    /// Whether the owning folder follows the naming convention (case-insensitive)
    #[must_use]
    pub fn folder_matches_convention(&self) -> bool {
        names_equal(self.folder_name(), &self.expected_folder_name())
    }

    /// Path of the primary document, `<folder>/<folder-name>.xml`
    #[must_use]
    pub fn primary_document(&self) -> String {
        format!("{}/{}.xml", self.folder, self.folder_name())
    }

    /// Path of the sibling metadata document
    #[must_use]
    pub fn metadata_document(&self) -> String {
        format!("{}/metadata.xml", self.folder)
    }

    #[must_use]
    pub fn key(&self) -> IdentityKey {
        IdentityKey {
            is_passage: self.is_passage,
            item_id: self.item_id.clone(),
        }
    }
}

/// Uniqueness key for identities: items and stimuli live in separate id spaces.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityKey {
    pub is_passage: bool,
    pub item_id: String,
}

/// Lifecycle of an identity through the two passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityState {
    Unindexed,
    Indexed,
    Validated,
    /// Terminal; the fault has been reported
    FaultedDuringValidation,
}

impl IdentityState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Validated | Self::FaultedDuringValidation)
    }
}

/// Validator an identity is dispatched to in the validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemRoute {
    /// Generic interaction validator
    Interaction,
    /// Reported unsupported, then validated as an interaction
    UnsupportedInteraction,
    Wordlist,
    Passage,
    Tutorial,
    /// Reported unsupported and not validated further
    Unrecognized,
}

impl ItemRoute {
    /// Route for an item type code. Codes are matched exactly.
    #[must_use]
    pub fn for_type(item_type: &str) -> Self {
        match item_type {
            "EBSR" | "eq" | "er" | "gi" | "htq" | "mc" | "mi" | "ms" | "sa" | "ti" | "wer" => {
                Self::Interaction
            }
            "nl" | "SIM" => Self::UnsupportedInteraction,
            "wordList" => Self::Wordlist,
            "pass" => Self::Passage,
            "tut" => Self::Tutorial,
            _ => Self::Unrecognized,
        }
    }
}
