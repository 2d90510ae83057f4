//! Reading a primary document out of a directory package

#[cfg(test)]
mod tests {
    use std::fs;
    use tabulator_content::{DocumentKind, Release, SourceDocument, TermScanner};
    use tabulator_tree::DirTree;

    const ITEM: &str = concat!(
        "\u{feff}<?xml version=\"1.0\" encoding=\"utf-8\"?>",
        "<itemrelease version=\"2.0\"><item format=\"sa\" id=\"1\" bankkey=\"100\">",
        "<resourceslist><resource type=\"wordList\" id=\"9\" bankkey=\"100\"/></resourceslist>",
        "<content language=\"ENU\"><stem><![CDATA[<p>Find the ",
        "<span id=\"item_1_TAG_1\" data-tag=\"word\" data-tag-boundary=\"start\" data-word-index=\"0\"></span>",
        "whales",
        "<span data-tag-ref=\"item_1_TAG_1\" data-tag-boundary=\"end\"></span>.</p>]]></stem></content>",
        "</item></itemrelease>"
    );

    #[test]
    fn item_document_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("Items").join("item-100-1");
        fs::create_dir_all(&folder).unwrap();
        fs::write(folder.join("item-100-1.xml"), ITEM).unwrap();
        let tree = DirTree::open(dir.path()).unwrap();

        let source = SourceDocument::load(&tree, "Items/item-100-1/item-100-1.xml").unwrap();
        let document = source.parse().unwrap();
        let release = Release::find(&document, DocumentKind::Item).unwrap();
        assert_eq!(release.id(), "1");
        assert_eq!(release.bank_key(), "100");
        assert_eq!(release.wordlist_id(), Some("9"));

        let scanner = TermScanner::new().unwrap();
        let scan = scanner.scan_content(release.content().unwrap());
        assert!(scan.findings.is_empty());
        assert_eq!(scan.references.len(), 1);
        assert_eq!(scan.references[0].index, 0);
        assert_eq!(scan.references[0].text, "whales");
    }
}
