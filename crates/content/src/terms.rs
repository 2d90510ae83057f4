//! Glossary term references embedded in item content
//!
//! Content elements carry HTML as CDATA. A glossary reference is a pair of
//! empty marker spans around the referenced text:
//!
//! ```html
//! <span id="item_998_TAG_2" class="its-tag" data-tag="word" data-tag-boundary="start" data-word-index="1"></span>
//! What
//! <span class="its-tag" data-tag-ref="item_998_TAG_2" data-tag-boundary="end"></span>
//! ```

use roxmltree::Node;
use scraper::{ElementRef, Html, Selector};
use tabulator_errors::Error;

const START_MARKER: &str = r#"span[data-tag="word"][data-tag-boundary="start"]"#;

/// One glossary reference found in content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermReference {
    /// Declared wordlist index; may be out of range for the wordlist
    pub index: i64,
    /// Referenced text with surrounding whitespace and punctuation removed
    pub text: String,
}

/// Malformed reference markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermFinding {
    MissingId,
    NonIntegerIndex { id: String, index: String },
    MissingEndTag { id: String, index: i64, text: String },
}

impl TermFinding {
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingId => "WordList reference lacks an ID",
            Self::NonIntegerIndex { .. } => "WordList reference term index is not integer",
            Self::MissingEndTag { .. } => "WordList reference missing end tag.",
        }
    }

    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::MissingId => String::new(),
            Self::NonIntegerIndex { id, index } => format!("id='{id}' index='{index}'"),
            Self::MissingEndTag { id, index, text } => {
                format!("id='{id}' index='{index}' term='{text}'")
            }
        }
    }

    /// Whether the finding breaks the reference (as opposed to a markup
    /// slip the reference survives)
    #[must_use]
    pub fn is_severe(&self) -> bool {
        !matches!(self, Self::MissingEndTag { .. })
    }
}

/// Everything found while scanning one document's content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermScan {
    pub references: Vec<TermReference>,
    pub findings: Vec<TermFinding>,
}

/// Extracts glossary references from HTML fragments
#[derive(Debug)]
pub struct TermScanner {
    start: Selector,
}

impl TermScanner {
    /// # Errors
    ///
    /// Returns an internal error if the marker selector fails to compile.
    pub fn new() -> Result<Self, Error> {
        let start = Selector::parse(START_MARKER)
            .map_err(|e| Error::internal(format!("term marker selector: {e}")))?;
        Ok(Self { start })
    }

    /// Scan every text fragment below a `content` element, in document
    /// order.
    #[must_use]
    pub fn scan_content(&self, content: Node<'_, '_>) -> TermScan {
        let mut scan = TermScan::default();
        for fragment in content
            .descendants()
            .filter(Node::is_text)
            .filter_map(|n| n.text())
            .filter(|t| t.contains('<'))
        {
            self.scan_fragment(fragment, &mut scan);
        }
        scan
    }

    /// Scan one HTML fragment, appending to `scan`
    pub fn scan_fragment(&self, fragment: &str, scan: &mut TermScan) {
        let html = Html::parse_fragment(fragment);
        // pre-order, so "after the start marker" is a suffix of this list
        let nodes: Vec<_> = html.tree.root().descendants().collect();

        for (position, node) in nodes.iter().enumerate() {
            let Some(element) = ElementRef::wrap(*node) else {
                continue;
            };
            if !self.start.matches(&element) {
                continue;
            }

            let id = element.value().attr("id").unwrap_or_default();
            if id.is_empty() {
                scan.findings.push(TermFinding::MissingId);
                continue;
            }
            let raw_index = element.value().attr("data-word-index").unwrap_or_default();
            let Ok(index) = raw_index.trim().parse::<i64>() else {
                scan.findings.push(TermFinding::NonIntegerIndex {
                    id: id.to_string(),
                    index: raw_index.to_string(),
                });
                continue;
            };

            let mut text = String::new();
            let mut closed = false;
            for next in &nodes[position + 1..] {
                if let Some(end) = ElementRef::wrap(*next) {
                    let value = end.value();
                    if value.attr("data-tag-boundary") == Some("end")
                        && value.attr("data-tag-ref") == Some(id)
                    {
                        closed = true;
                        break;
                    }
                } else if let Some(fragment_text) = next.value().as_text() {
                    text.push_str(fragment_text);
                }
            }

            if !closed {
                scan.findings.push(TermFinding::MissingEndTag {
                    id: id.to_string(),
                    index,
                    text: text.clone(),
                });
            }
            scan.references.push(TermReference {
                index,
                text: trim_term(&text).to_string(),
            });
        }
    }
}

/// Strip leading and trailing whitespace and ASCII punctuation
#[must_use]
pub fn trim_term(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SourceDocument;

    fn start(id: &str, index: &str) -> String {
        format!(
            r#"<span id="{id}" class="its-tag" data-tag="word" data-tag-boundary="start" data-word-index="{index}"></span>"#
        )
    }

    fn end(id: &str) -> String {
        format!(r#"<span class="its-tag" data-tag-ref="{id}" data-tag-boundary="end"></span>"#)
    }

    fn scan(fragment: &str) -> TermScan {
        let mut scan = TermScan::default();
        TermScanner::new().unwrap().scan_fragment(fragment, &mut scan);
        scan
    }

    #[test]
    fn extracts_marked_text() {
        let html = format!(
            "<p>The {}<b>whales</b>,{} swim. {} Ocean {}</p>",
            start("t1", "0"),
            end("t1"),
            start("t2", " 3 "),
            end("t2")
        );
        let result = scan(&html);
        assert!(result.findings.is_empty());
        assert_eq!(
            result.references,
            vec![
                TermReference {
                    index: 0,
                    text: "whales".into()
                },
                TermReference {
                    index: 3,
                    text: "Ocean".into()
                },
            ]
        );
    }

    #[test]
    fn reports_malformed_markers() {
        let html = format!(
            "<p>{}a{} {}b{} {}dangling</p>",
            start("", "1"),
            end(""),
            start("t2", "x"),
            end("t2"),
            start("t3", "4"),
        );
        let result = scan(&html);
        assert_eq!(
            result.findings,
            vec![
                TermFinding::MissingId,
                TermFinding::NonIntegerIndex {
                    id: "t2".into(),
                    index: "x".into()
                },
                TermFinding::MissingEndTag {
                    id: "t3".into(),
                    index: 4,
                    text: "dangling".into()
                },
            ]
        );
        // an unterminated reference still counts
        assert_eq!(result.references.len(), 1);
        assert_eq!(result.references[0].text, "dangling");
        assert!(!result.findings[2].is_severe());
        assert!(result.findings[0].is_severe());
    }

    #[test]
    fn scans_cdata_fragments_in_content() {
        let xml = format!(
            "<content><stem><![CDATA[<p>{}Whale{}</p>]]></stem><rubric>plain</rubric></content>",
            start("a", "0"),
            end("a")
        );
        let source = SourceDocument::from_text("x.xml", xml);
        let doc = source.parse().unwrap();
        let result = TermScanner::new().unwrap().scan_content(doc.root_element());
        assert_eq!(result.references.len(), 1);
        assert_eq!(result.references[0].text, "Whale");
    }

    #[test]
    fn trimming() {
        assert_eq!(trim_term("  \"Whale!\"\n"), "Whale");
        assert_eq!(trim_term("sea-lion"), "sea-lion");
        assert_eq!(trim_term("..."), "");
    }

    proptest::proptest! {
        #[test]
        fn trim_is_idempotent(text in "\\PC{0,20}") {
            let once = trim_term(&text);
            proptest::prop_assert_eq!(trim_term(once), once);
        }
    }
}
