//! Loading XML documents out of a package tree

use roxmltree::{Document, Node, ParsingOptions};
use tabulator_errors::{ContentError, Error};
use tabulator_tree::PackageTree;

/// Text of one XML document read from the tree.
///
/// Parsing borrows from the text, so callers keep the `SourceDocument`
/// alive for as long as they hold the parsed [`Document`].
#[derive(Debug, Clone)]
pub struct SourceDocument {
    path: String,
    text: String,
}

impl SourceDocument {
    /// Read the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::NotFound`] when no such file exists,
    /// [`ContentError::InvalidEncoding`] for non UTF-8 text, and tree errors
    /// for I/O faults.
    pub fn load(tree: &dyn PackageTree, path: &str) -> Result<Self, Error> {
        let file = tree.get_file(path)?.ok_or_else(|| ContentError::NotFound {
            filename: path.to_string(),
        })?;
        let text = tree.read_to_string(&file)?;
        tracing::trace!(path = %file.path, bytes = text.len(), "loaded document");
        Ok(Self {
            path: file.path,
            text,
        })
    }

    /// Wrap text that did not come from a tree
    #[must_use]
    pub fn from_text(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Parse the text. Document type declarations are tolerated.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::InvalidXml`] if the text is not well formed.
    pub fn parse(&self) -> Result<Document<'_>, ContentError> {
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        Document::parse_with_options(&self.text, options).map_err(|err| {
            ContentError::InvalidXml {
                filename: self.path.clone(),
                message: err.to_string(),
            }
        })
    }
}

/// Child elements with the given local name
pub fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

/// First child element with the given local name
#[must_use]
pub fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

/// Concatenated text of every text node below `node`, CDATA included
#[must_use]
pub fn inner_text(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(Node::is_text)
        .filter_map(|n| n.text())
        .collect()
}
