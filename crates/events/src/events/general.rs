use serde::{Deserialize, Serialize};

/// Notices that are not tied to a lifecycle step
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeneralEvent {
    /// Something the user should look at; the run carries on
    Warning {
        message: String,
        /// Path or package the warning concerns
        context: String,
    },

    DebugLog { message: String },
}

impl GeneralEvent {
    /// Warning about a specific path or package
    #[must_use]
    pub fn warning(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Warning {
            message: message.into(),
            context: context.into(),
        }
    }

    #[must_use]
    pub fn debug(message: impl Into<String>) -> Self {
        Self::DebugLog {
            message: message.into(),
        }
    }
}
