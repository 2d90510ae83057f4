//! Severity and category taxonomy for report records

use serde::{Deserialize, Serialize};
use std::fmt;

/// Impact of a finding, in ascending order.
///
/// `Message` is informational and sorts below every real finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Informational only
    Message,
    /// No runtime effect, development-time signal
    Benign,
    /// Invisible to the end user
    Tolerable,
    /// A feature partially fails
    Degraded,
    /// Functional or scoring failure
    Severe,
}

impl Severity {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Message => "Message",
            Self::Benign => "Benign",
            Self::Tolerable => "Tolerable",
            Self::Degraded => "Degraded",
            Self::Severe => "Severe",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What part of the package a record is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Run-level conditions (package could not be opened, etc.)
    System,
    /// Internal fault caught at the identity barrier
    Exception,
    /// Item type the delivery system does not fully support
    Unsupported,
    Item,
    Metadata,
    Manifest,
    Wordlist,
}

impl ErrorCategory {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "System",
            Self::Exception => "Exception",
            Self::Unsupported => "Unsupported",
            Self::Item => "Item",
            Self::Metadata => "Metadata",
            Self::Manifest => "Manifest",
            Self::Wordlist => "Wordlist",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
