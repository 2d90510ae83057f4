use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::Level;
use uuid::Uuid;

/// Envelope data stamped on an event when it is emitted.
///
/// Events raised while a package is being tabulated carry the package name
/// as their correlation id, so a log reader can pull out one package's
/// lifecycle from an aggregate run.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMeta {
    pub event_id: Uuid,
    /// Package name, when the event belongs to one package
    pub correlation_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub level: EventLevel,
    /// Pipeline stage that raised the event
    pub source: EventSource,
}

impl EventMeta {
    #[must_use]
    pub fn new(level: Level, source: EventSource) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            correlation_id: None,
            timestamp: Utc::now(),
            level: level.into(),
            source,
        }
    }

    /// Tie the event to a package
    #[must_use]
    pub fn with_correlation_id(mut self, package: impl Into<String>) -> Self {
        self.correlation_id = Some(package.into());
        self
    }
}

/// Serializable mirror of [`tracing::Level`]
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum EventLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<Level> for EventLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::TRACE => EventLevel::Trace,
            Level::DEBUG => EventLevel::Debug,
            Level::INFO => EventLevel::Info,
            Level::WARN => EventLevel::Warn,
            Level::ERROR => EventLevel::Error,
        }
    }
}

/// Pipeline stage an event came from; used as the `source` log field.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    General,
    /// Opening and recognizing packages
    Tree,
    Manifest,
    /// First pass over item and stimulus folders
    Index,
    /// Second pass, per-identity validators
    Validate,
    /// Run drivers: modes, report files, totals
    Run,
}

impl EventSource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Tree => "tree",
            Self::Manifest => "manifest",
            Self::Index => "index",
            Self::Validate => "validate",
            Self::Run => "run",
        }
    }
}
