//! Integration tests for events

#[cfg(test)]
mod tests {
    use tabulator_events::*;

    struct PackageScoped {
        sender: EventSender,
    }

    impl EventEmitter for PackageScoped {
        fn event_sender(&self) -> Option<&EventSender> {
            Some(&self.sender)
        }

        fn correlation_id(&self) -> Option<&str> {
            Some("pkg-a")
        }
    }

    #[test]
    fn test_event_sender_emit() {
        let (tx, rx) = channel();

        tx.emit_warning("report file reused", "/out/pkg_Errors.jsonl");
        tx.emit_debug("test debug");

        let first = rx.try_recv().unwrap();
        assert!(matches!(
            first.event,
            AppEvent::General(GeneralEvent::Warning { .. })
        ));
        assert_eq!(first.meta.level, EventLevel::Warn);

        let second = rx.try_recv().unwrap();
        assert!(matches!(
            second.event,
            AppEvent::General(GeneralEvent::DebugLog { .. })
        ));
        assert_eq!(second.meta.source, EventSource::General);
    }

    #[test]
    fn test_dropped_receiver() {
        let (tx, rx) = channel();
        drop(rx);

        // Should not panic when receiver is dropped
        tx.emit_debug("ignored");
    }

    #[test]
    fn test_correlation_id_is_stamped() {
        let (sender, rx) = channel();
        let emitter = PackageScoped { sender };
        emitter.emit_tabulation(TabulationEvent::IdentityFaulted {
            package: "pkg-a".into(),
            folder: "Items/item-1-1".into(),
            error: "boom".into(),
        });

        let message = rx.try_recv().unwrap();
        assert_eq!(message.meta.correlation_id.as_deref(), Some("pkg-a"));
        assert_eq!(message.meta.level, EventLevel::Warn);
        assert_eq!(message.meta.source, EventSource::Validate);
    }

    #[test]
    fn test_pass_events_route_by_pass() {
        let indexing = AppEvent::Tabulation(TabulationEvent::PassStarted {
            package: "p".into(),
            pass: TabulationPass::Indexing,
            identities: 0,
        });
        assert_eq!(indexing.event_source(), EventSource::Index);
        assert_eq!(indexing.log_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_event_serialization() {
        let event = AppEvent::Tabulation(TabulationEvent::RunCompleted {
            packages: 2,
            errors: 7,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["domain"], "tabulation");
        assert_eq!(json["event"]["type"], "RunCompleted");
    }
}
