use serde::{Deserialize, Serialize};

use super::FailureContext;

/// Which of the two passes an event refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabulationPass {
    Indexing,
    Validation,
}

/// Lifecycle of a tabulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TabulationEvent {
    /// A run over one or more packages started
    RunStarted { mode: String, path: String },

    /// Package opened and recognized
    PackageOpened { package: String, backing: String },

    /// Manifest graph built
    ManifestParsed {
        package: String,
        resources: usize,
        dependencies: usize,
    },

    /// Package has no usable manifest; presence checks are suppressed
    ManifestSuppressed { package: String, reason: String },

    PassStarted {
        package: String,
        pass: TabulationPass,
        identities: usize,
    },

    PassCompleted {
        package: String,
        pass: TabulationPass,
        identities: usize,
    },

    /// One identity faulted and was reported; siblings continue
    IdentityFaulted {
        package: String,
        folder: String,
        error: String,
    },

    /// Package finished
    PackageCompleted {
        package: String,
        errors: u64,
        items: u64,
        wordlists: u64,
    },

    /// Package could not be opened and was skipped
    PackageSkipped {
        package: String,
        failure: FailureContext,
    },

    /// Whole run finished
    RunCompleted { packages: usize, errors: u64 },
}
