//! The `itemrelease` envelope shared by items, stimuli and wordlists

use roxmltree::{Document, Node};

use crate::document::{child, children, inner_text};

/// Which element the envelope wraps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// `itemrelease/item`: interactions, tutorials and wordlists
    Item,
    /// `itemrelease/passage`: stimuli
    Passage,
}

impl DocumentKind {
    #[must_use]
    pub fn for_passage(is_passage: bool) -> Self {
        if is_passage {
            Self::Passage
        } else {
            Self::Item
        }
    }

    fn element_name(self) -> &'static str {
        match self {
            Self::Item => "item",
            Self::Passage => "passage",
        }
    }
}

/// Tutorial reference on an item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tutorial<'a> {
    pub id: &'a str,
    pub bank_key: &'a str,
}

/// Read access to the `item` or `passage` element of a primary document
#[derive(Debug, Clone, Copy)]
pub struct Release<'a, 'input> {
    element: Node<'a, 'input>,
    kind: DocumentKind,
}

impl<'a, 'input: 'a> Release<'a, 'input> {
    /// Locate the wrapped element; `None` when the root is not
    /// `itemrelease` or the element is absent.
    #[must_use]
    pub fn find(document: &'a Document<'input>, kind: DocumentKind) -> Option<Self> {
        let root = document.root_element();
        if root.tag_name().name() != "itemrelease" {
            return None;
        }
        child(root, kind.element_name()).map(|element| Self { element, kind })
    }

    #[must_use]
    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    #[must_use]
    pub fn element(&self) -> Node<'a, 'input> {
        self.element
    }

    /// `@id`, empty when absent
    #[must_use]
    pub fn id(&self) -> &'a str {
        self.element.attribute("id").unwrap_or_default()
    }

    /// `@bankkey`, empty when absent
    #[must_use]
    pub fn bank_key(&self) -> &'a str {
        self.element.attribute("bankkey").unwrap_or_default()
    }

    /// Declared type. Items carry `@format`, falling back to `@type`;
    /// passages are always `pass`.
    #[must_use]
    pub fn item_type(&self) -> Option<&'a str> {
        match self.kind {
            DocumentKind::Passage => Some("pass"),
            DocumentKind::Item => self
                .element
                .attribute("format")
                .or_else(|| self.element.attribute("type")),
        }
    }

    /// Ids of every `resourceslist/resource[@type='wordList']`, in document
    /// order. A resource without an id yields an empty string.
    #[must_use]
    pub fn wordlist_references(&self) -> Vec<&'a str> {
        self.wordlist_resources()
            .map(|r| r.attribute("id").unwrap_or_default())
            .collect()
    }

    /// The wordlist this document uses: the first wordlist resource that
    /// carries an id. `None` when that id is empty or there is none.
    #[must_use]
    pub fn wordlist_id(&self) -> Option<&'a str> {
        self.wordlist_resources()
            .find_map(|r| r.attribute("id"))
            .filter(|id| !id.is_empty())
    }

    fn wordlist_resources(&self) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
        children(self.element, "resourceslist")
            .flat_map(|list| children(list, "resource"))
            .filter(|r| r.attribute("type") == Some("wordList"))
    }

    /// Text of `attriblist/attrib[@attid=<attid>]/val`
    #[must_use]
    pub fn attribute_value(&self, attid: &str) -> Option<String> {
        children(self.element, "attriblist")
            .flat_map(|list| children(list, "attrib"))
            .find(|a| a.attribute("attid") == Some(attid))
            .and_then(|a| child(a, "val"))
            .map(inner_text)
    }

    /// `tutorial/@id` and `tutorial/@bankkey`; `None` without an id
    #[must_use]
    pub fn tutorial(&self) -> Option<Tutorial<'a>> {
        let tutorial = child(self.element, "tutorial")?;
        Some(Tutorial {
            id: tutorial.attribute("id")?,
            bank_key: tutorial.attribute("bankkey").unwrap_or_default(),
        })
    }

    /// First `content` element
    #[must_use]
    pub fn content(&self) -> Option<Node<'a, 'input>> {
        child(self.element, "content")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SourceDocument;

    const ITEM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<itemrelease version="2.0">
  <item format="mc" id="1234" version="7" bankkey="200">
    <attriblist>
      <attrib attid="itm_item_subject"><name>Item: Subject</name><val>ELA</val></attrib>
      <attrib attid="stm_pass_id"><name>Stim: Pass ID</name><val>77</val></attrib>
    </attriblist>
    <tutorial id="9" bankkey="200" />
    <resourceslist>
      <resource type="passage" id="77" index="1" bankkey="200" />
      <resource type="wordList" id="555" index="1" bankkey="200" />
    </resourceslist>
    <content language="ENU" format="standard"><stem><![CDATA[<p>Hello</p>]]></stem></content>
    <content language="ESN" format="standard"><stem><![CDATA[<p>Hola</p>]]></stem></content>
  </item>
</itemrelease>"#;

    #[test]
    fn reads_item_fields() {
        let source = SourceDocument::from_text("item-200-1234.xml", ITEM);
        let doc = source.parse().unwrap();
        let release = Release::find(&doc, DocumentKind::Item).unwrap();

        assert_eq!(release.id(), "1234");
        assert_eq!(release.bank_key(), "200");
        assert_eq!(release.item_type(), Some("mc"));
        assert_eq!(release.wordlist_references(), vec!["555"]);
        assert_eq!(release.wordlist_id(), Some("555"));
        assert_eq!(release.attribute_value("stm_pass_id").as_deref(), Some("77"));
        assert_eq!(release.attribute_value("itm_att_Grade"), None);
        assert_eq!(
            release.tutorial(),
            Some(Tutorial {
                id: "9",
                bank_key: "200"
            })
        );
        let content = release.content().unwrap();
        assert_eq!(content.attribute("language"), Some("ENU"));
        assert!(Release::find(&doc, DocumentKind::Passage).is_none());
    }

    #[test]
    fn type_falls_back_to_type_attribute() {
        let source = SourceDocument::from_text(
            "x.xml",
            r#"<itemrelease><item type="wordList" id="5" bankkey="1"/></itemrelease>"#,
        );
        let doc = source.parse().unwrap();
        let release = Release::find(&doc, DocumentKind::Item).unwrap();
        assert_eq!(release.item_type(), Some("wordList"));
        assert!(release.content().is_none());
        assert!(release.tutorial().is_none());
    }

    #[test]
    fn blank_wordlist_reference() {
        let source = SourceDocument::from_text(
            "x.xml",
            r#"<itemrelease><passage id="5" bankkey="1"><resourceslist>
                 <resource type="wordList" id="" /><resource type="wordList" id="8" />
               </resourceslist></passage></itemrelease>"#,
        );
        let doc = source.parse().unwrap();
        let release = Release::find(&doc, DocumentKind::Passage).unwrap();
        assert_eq!(release.item_type(), Some("pass"));
        assert_eq!(release.wordlist_references(), vec!["", "8"]);
        assert_eq!(release.wordlist_id(), None);
    }

    #[test]
    fn wrong_root_is_not_a_release() {
        let source = SourceDocument::from_text("x.xml", "<item id='1'/>");
        let doc = source.parse().unwrap();
        assert!(Release::find(&doc, DocumentKind::Item).is_none());
    }
}
