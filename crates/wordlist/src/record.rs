//! A loaded wordlist: keyword slots, glosses and attachment files

use std::collections::BTreeMap;

use tabulator_content::{child, children, inner_text, DocumentKind, Release, SourceDocument};
use tabulator_errors::{ContentError, Error};
use tabulator_tree::PackageTree;
use tabulator_types::Identity;

/// One `<html listType=...>` gloss under a keyword
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gloss {
    pub list_type: String,
    pub html: String,
}

/// One `<keyword>` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword {
    pub text: String,
    pub index: i64,
    pub glosses: Vec<Gloss>,
}

/// Wordlist contents as needed by the consistency checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordlistRecord {
    pub wordlist_id: String,
    /// Keywords in document order
    pub keywords: Vec<Keyword>,
    /// Term text by declared index; the first non-empty term wins
    pub slots: BTreeMap<i64, String>,
    /// Indices declared by more than one non-empty term, one entry per
    /// repeat
    pub duplicate_indices: Vec<i64>,
    /// Non-XML files in the wordlist folder, name to size
    pub attachments: BTreeMap<String, u64>,
}

impl WordlistRecord {
    /// Load the wordlist whose identity was indexed in the first pass.
    ///
    /// # Errors
    ///
    /// Content errors for an unreadable or malformed document, including a
    /// keyword index that is not a non-negative integer; tree errors for
    /// I/O faults.
    pub fn load(tree: &dyn PackageTree, identity: &Identity) -> Result<Self, Error> {
        let source = SourceDocument::load(tree, &identity.primary_document())?;
        let mut record = Self::parse(&source, &identity.item_id)?;

        for file in tree.list_files(&identity.folder)? {
            if !file.has_extension("xml") {
                record.attachments.insert(file.name, file.len);
            }
        }
        tracing::debug!(
            wordlist = %identity.item_id,
            terms = record.keywords.len(),
            attachments = record.attachments.len(),
            "loaded wordlist"
        );
        Ok(record)
    }

    /// Parse keywords from a wordlist document
    ///
    /// # Errors
    ///
    /// Returns a content error if the document is malformed, is not a
    /// wordlist for `wordlist_id`, or declares an invalid keyword index.
    pub fn parse(source: &SourceDocument, wordlist_id: &str) -> Result<Self, Error> {
        let document = source.parse()?;
        let release =
            Release::find(&document, DocumentKind::Item).ok_or_else(|| ContentError::MissingElement {
                element: "itemrelease/item".to_string(),
                filename: source.path().to_string(),
            })?;
        if release.id() != wordlist_id {
            return Err(Error::internal(format!(
                "wordlist id changed between passes: expected '{wordlist_id}' found '{}'",
                release.id()
            )));
        }

        let mut record = Self {
            wordlist_id: wordlist_id.to_string(),
            keywords: Vec::new(),
            slots: BTreeMap::new(),
            duplicate_indices: Vec::new(),
            attachments: BTreeMap::new(),
        };

        let keywords = child(release.element(), "keywordList")
            .into_iter()
            .flat_map(|list| children(list, "keyword"));
        for node in keywords {
            let text = node.attribute("text").unwrap_or_default().to_string();
            let raw_index = node.attribute("index").unwrap_or_default();
            let index = raw_index
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|i| *i >= 0)
                .ok_or_else(|| ContentError::InvalidValue {
                    filename: source.path().to_string(),
                    attribute: "keyword index".to_string(),
                    value: raw_index.to_string(),
                })?;

            match record.slots.get(&index) {
                Some(existing) if !existing.is_empty() => record.duplicate_indices.push(index),
                _ => {
                    record.slots.insert(index, text.clone());
                }
            }

            let glosses = children(node, "html")
                .map(|html| Gloss {
                    list_type: html.attribute("listType").unwrap_or_default().to_string(),
                    html: inner_text(html),
                })
                .collect();
            record.keywords.push(Keyword {
                text,
                index,
                glosses,
            });
        }

        Ok(record)
    }

    /// Term at `index`, if a non-empty one was declared
    #[must_use]
    pub fn term(&self, index: i64) -> Option<&str> {
        self.slots
            .get(&index)
            .map(String::as_str)
            .filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wordlist(keywords: &str) -> SourceDocument {
        SourceDocument::from_text(
            "Items/item-100-9/item-100-9.xml",
            format!(
                r#"<itemrelease><item format="wordList" id="9" bankkey="100"><keywordList>{keywords}</keywordList></item></itemrelease>"#
            ),
        )
    }

    #[test]
    fn slots_and_duplicates() {
        let source = wordlist(
            r#"<keyword text="Whale" index="0"><html listType="esnGlossary"><![CDATA[<p>ballena</p>]]></html></keyword>
               <keyword text="" index="4"/>
               <keyword text="Shark" index="4"/>
               <keyword text="Dolphin" index="4"/>
               <keyword text="Ocean" index="7"/>"#,
        );
        let record = WordlistRecord::parse(&source, "9").unwrap();
        assert_eq!(record.keywords.len(), 5);
        assert_eq!(record.term(0), Some("Whale"));
        assert_eq!(record.term(4), Some("Shark"));
        assert_eq!(record.term(2), None);
        assert_eq!(record.term(1_000_000), None);
        assert_eq!(record.duplicate_indices, vec![4]);
        assert_eq!(record.keywords[0].glosses[0].list_type, "esnGlossary");
        assert_eq!(record.keywords[0].glosses[0].html, "<p>ballena</p>");
    }

    #[test]
    fn invalid_index_is_an_error() {
        let source = wordlist(r#"<keyword text="Whale" index="first"/>"#);
        let err = WordlistRecord::parse(&source, "9").unwrap_err();
        assert!(matches!(
            err,
            Error::Content(ContentError::InvalidValue { .. })
        ));

        let negative = wordlist(r#"<keyword text="Whale" index="-1"/>"#);
        assert!(WordlistRecord::parse(&negative, "9").is_err());
    }

    #[test]
    fn id_must_match_index() {
        let source = wordlist("");
        assert!(matches!(
            WordlistRecord::parse(&source, "10"),
            Err(Error::Internal(_))
        ));
    }
}
