#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Event system for the tabulator
//!
//! Library crates never print. Everything a user or log file should see is
//! emitted as an [`AppEvent`] wrapped in an [`EventMessage`] and sent over a
//! channel; the CLI drains the channel and forwards each message to
//! `tracing`.
//!
//! ## Architecture
//!
//! - **Domain-driven events**: `General` for cross-cutting notices,
//!   `Tabulation` for the run/package/pass lifecycle
//! - **Unified `EventEmitter` trait**: one API whether you hold a raw sender
//!   or a struct that owns one
//! - **Tracing integration**: each event knows its level and log target

pub mod meta;
pub use meta::{EventLevel, EventMeta, EventSource};

pub mod events;
pub use events::{AppEvent, FailureContext, GeneralEvent, TabulationEvent, TabulationPass};

use crossbeam::channel::{Receiver, Sender};
use serde::{Deserialize, Serialize};

/// An event together with the metadata captured when it was emitted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub meta: EventMeta,
    pub event: AppEvent,
}

impl EventMessage {
    /// Wrap an event with metadata derived from the event itself
    #[must_use]
    pub fn from_event(event: AppEvent) -> Self {
        let meta = EventMeta::new(event.log_level(), event.event_source());
        Self { meta, event }
    }
}

/// Type alias for the sending half of the event channel
pub type EventSender = Sender<EventMessage>;

/// Type alias for the receiving half of the event channel
pub type EventReceiver = Receiver<EventMessage>;

/// Create a new unbounded event channel
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    crossbeam::channel::unbounded()
}

/// The unified trait for emitting events throughout the tabulator
///
/// This trait provides a single, consistent API for emitting events regardless of
/// whether you have a raw `EventSender` or a struct that contains one.
pub trait EventEmitter {
    /// Get the event sender for this emitter
    fn event_sender(&self) -> Option<&EventSender>;

    /// Correlation id stamped on every emitted event (usually the package name)
    fn correlation_id(&self) -> Option<&str> {
        None
    }

    /// Emit an event through this emitter
    fn emit(&self, event: AppEvent) {
        if let Some(sender) = self.event_sender() {
            let mut message = EventMessage::from_event(event);
            if let Some(id) = self.correlation_id() {
                message.meta = message.meta.with_correlation_id(id);
            }
            // Ignore send errors - if receiver is dropped, we just continue
            let _ = sender.send(message);
        }
    }

    /// Emit a debug log event
    fn emit_debug(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::debug(message)));
    }

    /// Emit a warning about `context`, a path or package name
    fn emit_warning(&self, message: impl Into<String>, context: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::warning(message, context)));
    }

    /// Emit a tabulation lifecycle event
    fn emit_tabulation(&self, event: TabulationEvent) {
        self.emit(AppEvent::Tabulation(event));
    }
}

impl EventEmitter for EventSender {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(self)
    }
}
