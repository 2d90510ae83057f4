use serde::{Deserialize, Serialize};

use crate::EventSource;
use tabulator_errors::UserFacingError;

/// Structured failure information shared across domains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Short user-facing message.
    pub message: String,
    /// Optional remediation hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Whether retrying the operation might succeed.
    pub retryable: bool,
}

impl FailureContext {
    /// Build failure context from a `UserFacingError` implementation.
    #[must_use]
    pub fn from_error<E: UserFacingError + ?Sized>(error: &E) -> Self {
        Self {
            code: error.user_code().map(Into::into),
            message: error.user_message().into_owned(),
            hint: error.user_hint().map(Into::into),
            retryable: error.is_retryable(),
        }
    }
}

pub mod general;
pub mod tabulation;

pub use general::*;
pub use tabulation::*;

/// Top-level application event enum that aggregates all domain-specific events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// General utility events (warnings, errors, debug output)
    General(GeneralEvent),

    /// Run, package and pass lifecycle
    Tabulation(TabulationEvent),
}

impl AppEvent {
    /// Identify the source domain for this event (used for metadata/logging).
    #[must_use]
    pub fn event_source(&self) -> EventSource {
        match self {
            Self::General(_) => EventSource::General,
            Self::Tabulation(event) => match event {
                TabulationEvent::PackageOpened { .. } | TabulationEvent::PackageSkipped { .. } => {
                    EventSource::Tree
                }
                TabulationEvent::ManifestParsed { .. }
                | TabulationEvent::ManifestSuppressed { .. } => EventSource::Manifest,
                TabulationEvent::PassStarted { pass, .. }
                | TabulationEvent::PassCompleted { pass, .. } => match pass {
                    TabulationPass::Indexing => EventSource::Index,
                    TabulationPass::Validation => EventSource::Validate,
                },
                TabulationEvent::IdentityFaulted { .. } => EventSource::Validate,
                _ => EventSource::Run,
            },
        }
    }

    /// Determine the appropriate tracing log level for this event
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        use tracing::Level;

        match self {
            Self::Tabulation(TabulationEvent::PackageSkipped { .. }) => Level::ERROR,

            Self::General(GeneralEvent::Warning { .. })
            | Self::Tabulation(
                TabulationEvent::IdentityFaulted { .. } | TabulationEvent::ManifestSuppressed { .. },
            ) => Level::WARN,

            Self::General(GeneralEvent::DebugLog { .. })
            | Self::Tabulation(
                TabulationEvent::PassStarted { .. } | TabulationEvent::PassCompleted { .. },
            ) => Level::DEBUG,

            _ => Level::INFO,
        }
    }
}
