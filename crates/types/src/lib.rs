#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for the content package tabulator
//!
//! This crate provides the vocabulary shared by every stage of a run:
//! severities and categories, item identities, error records, the option
//! query surface and the summary aggregator.

pub mod identity;
pub mod names;
pub mod options;
pub mod record;
pub mod severity;
pub mod summary;

// Re-export commonly used types
pub use identity::{Identity, IdentityKey, IdentityState, ItemRoute};
pub use names::{fold_case, names_equal};
pub use options::{option_keys, OptionSource};
pub use record::{ErrorRecord, ReportSubject};
pub use severity::{ErrorCategory, Severity};
pub use summary::{TabulationSummary, WordlistStats};

use serde::{Deserialize, Serialize};

/// Output format for report records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// One JSON object per line
    #[default]
    Jsonl,
    /// Tab separated columns
    Text,
}

impl ReportFormat {
    /// File extension used for report files in this format
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jsonl => "jsonl",
            Self::Text => "tsv",
        }
    }
}

// Implement clap::ValueEnum for ReportFormat
impl clap::ValueEnum for ReportFormat {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Jsonl, Self::Text]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Jsonl => clap::builder::PossibleValue::new("jsonl"),
            Self::Text => clap::builder::PossibleValue::new("text"),
        })
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Jsonl => write!(f, "jsonl"),
            Self::Text => write!(f, "text"),
        }
    }
}
