//! Loading a wordlist folder and checking an item against it

#[cfg(test)]
mod tests {
    use std::fs;
    use tabulator_content::TermReference;
    use tabulator_report::{MemoryWriter, ReportSink, Reporter};
    use tabulator_tree::DirTree;
    use tabulator_types::{Identity, OptionSource, Severity};
    use tabulator_wordlist::{AttachmentPatterns, StemMatcher, WordlistChecker, WordlistRecord};

    struct Defaults;

    impl OptionSource for Defaults {
        fn is_enabled(&self, _key: &str) -> bool {
            false
        }
    }

    const WORDLIST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<itemrelease version="2.0">
  <item format="wordList" id="9" version="1" bankkey="100">
    <keywordList>
      <keyword text="Whale" index="0">
        <html listType="glossary"><![CDATA[<p>A large sea animal</p>]]></html>
        <html listType="esnGlossary"><![CDATA[<p>ballena</p><a href="item_9_v1_9_0spanish_glossary_ogg_m4a.ogg">play</a>]]></html>
      </keyword>
    </keywordList>
  </item>
</itemrelease>"#;

    #[test]
    fn folder_files_become_attachments() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("Items/item-100-9");
        fs::create_dir_all(&folder).unwrap();
        fs::write(folder.join("item-100-9.xml"), WORDLIST).unwrap();
        fs::write(folder.join("metadata.xml"), "<metadata/>").unwrap();
        fs::write(folder.join("item_9_v1_9_0spanish_glossary_ogg_m4a.ogg"), "ogg").unwrap();
        fs::write(folder.join("item_9_v1_9_0spanish_glossary_ogg_m4a.m4a"), "m4a").unwrap();
        let tree = DirTree::open(dir.path()).unwrap();

        let wordlist = Identity::new("9", "wordList", "100", false, "Items/item-100-9");
        let record = WordlistRecord::load(&tree, &wordlist).unwrap();
        assert_eq!(record.attachments.len(), 2);
        assert_eq!(
            record.attachments.get("item_9_v1_9_0spanish_glossary_ogg_m4a.ogg"),
            Some(&3)
        );

        let patterns = AttachmentPatterns::new().unwrap();
        let matcher = StemMatcher::english();
        let checker = WordlistChecker::new(&patterns, &matcher, &Defaults);
        let item = Identity::new("1", "mc", "100", false, "Items/item-100-1");
        let mut sink = ReportSink::new(MemoryWriter::new());
        checker
            .check(
                &item,
                &record,
                &[TermReference {
                    index: 0,
                    text: "whales".into(),
                }],
                &mut sink,
            )
            .unwrap();

        // only Spanish of the ten expected translations is present
        let records = sink.writer().records();
        assert_eq!(sink.error_count(), 1);
        assert_eq!(records[0].severity, Severity::Tolerable);
        assert_eq!(records[0].item_id, "1");
        assert!(records[0].detail.starts_with("wordlistId='9' term='Whale' missing='arabicGlossary, cantoneseGlossary"));
    }
}
