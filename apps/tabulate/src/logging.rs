//! Structured logging integration for events
//!
//! Converts tabulation events into tracing records with structured fields.

use tabulator_events::{AppEvent, EventMessage, GeneralEvent, TabulationEvent};
use tracing::{debug, error, info, warn};

/// Log one event with structured fields at the level suited to its kind
pub fn log_event_with_tracing(message: &EventMessage) {
    let meta = &message.meta;
    let source = meta.source.as_str();
    let correlation = meta.correlation_id.as_deref();

    match &message.event {
        AppEvent::Tabulation(event) => match event {
            TabulationEvent::RunStarted { mode, path } => {
                info!(source, event_id = %meta.event_id, mode = %mode, path = %path, "Run started");
            }
            TabulationEvent::PackageOpened { package, backing } => {
                info!(source, event_id = %meta.event_id, package = %package, backing = %backing, "Package opened");
            }
            TabulationEvent::ManifestParsed {
                package,
                resources,
                dependencies,
            } => {
                debug!(
                    source,
                    event_id = %meta.event_id,
                    package = %package,
                    resources,
                    dependencies,
                    "Manifest parsed"
                );
            }
            TabulationEvent::ManifestSuppressed { package, reason } => {
                info!(
                    source,
                    event_id = %meta.event_id,
                    package = %package,
                    reason = %reason,
                    "Manifest checks suppressed"
                );
            }
            TabulationEvent::PassStarted {
                package,
                pass,
                identities,
            } => {
                debug!(source, event_id = %meta.event_id, package = %package, pass = ?pass, identities, "Pass started");
            }
            TabulationEvent::PassCompleted {
                package,
                pass,
                identities,
            } => {
                debug!(source, event_id = %meta.event_id, package = %package, pass = ?pass, identities, "Pass completed");
            }
            TabulationEvent::IdentityFaulted {
                package,
                folder,
                error,
            } => {
                warn!(
                    source,
                    event_id = %meta.event_id,
                    package = %package,
                    folder = %folder,
                    error = %error,
                    "Identity faulted"
                );
            }
            TabulationEvent::PackageCompleted {
                package,
                errors,
                items,
                wordlists,
            } => {
                info!(
                    source,
                    event_id = %meta.event_id,
                    package = %package,
                    errors,
                    items,
                    wordlists,
                    "Package completed"
                );
            }
            TabulationEvent::PackageSkipped { package, failure } => {
                error!(
                    source,
                    event_id = %meta.event_id,
                    package = %package,
                    code = ?failure.code,
                    message = %failure.message,
                    hint = ?failure.hint,
                    "Package skipped"
                );
            }
            TabulationEvent::RunCompleted { packages, errors } => {
                info!(source, event_id = %meta.event_id, packages, errors, "Run completed");
            }
        },

        AppEvent::General(event) => match event {
            GeneralEvent::Warning { message, context } => {
                warn!(source, event_id = %meta.event_id, correlation = ?correlation, context = %context, "{message}");
            }
            GeneralEvent::DebugLog { message } => {
                debug!(source, event_id = %meta.event_id, correlation = ?correlation, message = %message, "Debug log");
            }
        },
    }
}
