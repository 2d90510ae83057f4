//! Integration tests for types crate

#[cfg(test)]
mod tests {
    use tabulator_types::*;

    #[test]
    fn severity_orders_by_impact() {
        let mut severities = vec![
            Severity::Severe,
            Severity::Benign,
            Severity::Message,
            Severity::Degraded,
            Severity::Tolerable,
        ];
        severities.sort();
        assert_eq!(
            severities,
            vec![
                Severity::Message,
                Severity::Benign,
                Severity::Tolerable,
                Severity::Degraded,
                Severity::Severe,
            ]
        );
    }

    #[test]
    fn record_carries_identity_fields() {
        let identity = Identity::new("42", "mc", "187", false, "Items/item-187-42");
        let record = ErrorRecord::new(
            ReportSubject::from(&identity),
            ErrorCategory::Item,
            Severity::Degraded,
            "Item text does not match wordlist term.",
            "termIndex='3'",
        );
        assert_eq!(record.folder, "Items/item-187-42");
        assert_eq!(record.bank_key, "187");
        assert_eq!(record.item_id, "42");
        assert_eq!(record.item_type, "mc");

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["bankKey"], "187");
        assert_eq!(json["severity"], "Degraded");
    }

    #[test]
    fn passage_and_item_ids_are_separate_spaces() {
        let item = Identity::new("7", "mc", "100", false, "Items/item-100-7");
        let passage = Identity::new("7", "pass", "100", true, "Stimuli/stim-100-7");
        assert_ne!(item.key(), passage.key());
        assert_eq!(passage.primary_document(), "Stimuli/stim-100-7/stim-100-7.xml");
        assert!(passage.folder_matches_convention());
    }

    #[test]
    fn routes() {
        assert_eq!(ItemRoute::for_type("EBSR"), ItemRoute::Interaction);
        assert_eq!(ItemRoute::for_type("SIM"), ItemRoute::UnsupportedInteraction);
        assert_eq!(ItemRoute::for_type("wordList"), ItemRoute::Wordlist);
        assert_eq!(ItemRoute::for_type("pass"), ItemRoute::Passage);
        assert_eq!(ItemRoute::for_type("tut"), ItemRoute::Tutorial);
        assert_eq!(ItemRoute::for_type("MC"), ItemRoute::Unrecognized);
    }

    #[test]
    fn report_format_serialization() {
        let json = serde_json::to_string(&ReportFormat::Text).unwrap();
        assert_eq!(json, r#""text""#);
        assert_eq!(ReportFormat::default(), ReportFormat::Jsonl);
        assert_eq!(ReportFormat::Text.extension(), "tsv");
    }
}
