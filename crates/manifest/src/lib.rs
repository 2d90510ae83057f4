#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Manifest dependency graph for content packages
//!
//! The package manifest (`imsmanifest.xml`) lists every resource with an
//! identifier, a file reference and the identifiers it depends on. This
//! crate turns it into a filename -> resource id map plus a set of
//! dependency edges, reporting structural defects as it goes. Defects are
//! never fatal: the first occurrence of a resource id or filename wins.

mod coverage;

use std::collections::{BTreeSet, HashMap, HashSet};

use tabulator_errors::Error;
use tabulator_report::Reporter;
use tabulator_tree::{PackageTree, MANIFEST_FILE};
use tabulator_types::{fold_case, ErrorCategory, ReportSubject, Severity};

/// One `<resource>` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub resource_id: String,
    /// Normalized file reference
    pub filename: String,
    /// Identifiers this resource depends on
    pub dependencies: BTreeSet<String>,
}

/// Parsed manifest
#[derive(Debug, Clone, Default)]
pub struct ManifestGraph {
    entries: Vec<ManifestEntry>,
    filename_to_id: HashMap<String, String>,
    edges: HashSet<(String, String)>,
}

/// Case-fold, use `/` separators, drop a leading separator
#[must_use]
pub fn normalize_filename(filename: &str) -> String {
    let normalized = fold_case(filename).replace('\\', "/");
    match normalized.strip_prefix('/') {
        Some(stripped) => stripped.to_string(),
        None => normalized,
    }
}

impl ManifestGraph {
    /// A graph with no entries; every presence check is suppressed
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load and parse the manifest at the package root.
    ///
    /// A package without a manifest yields an empty graph and no record.
    /// An unreadable or malformed manifest is reported and also yields an
    /// empty graph.
    ///
    /// # Errors
    ///
    /// Returns an error only if the reporter or the tree fails.
    pub fn build(tree: &dyn PackageTree, reporter: &mut dyn Reporter) -> Result<Self, Error> {
        let Some(file) = tree.get_file(MANIFEST_FILE)? else {
            tracing::debug!(package = tree.name(), "package has no manifest");
            return Ok(Self::empty());
        };

        let text = match tree.read_to_string(&file) {
            Ok(text) => text,
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                report(
                    reporter,
                    "Invalid manifest.",
                    &format!("filename='{}' detail='{err}'", file.name),
                )?;
                return Ok(Self::empty());
            }
        };

        Self::parse(&text, tree, reporter)
    }

    /// Parse manifest text, checking file references against `tree`
    ///
    /// # Errors
    ///
    /// Returns an error only if the reporter fails.
    pub fn parse(
        text: &str,
        tree: &dyn PackageTree,
        reporter: &mut dyn Reporter,
    ) -> Result<Self, Error> {
        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        };
        let document = match roxmltree::Document::parse_with_options(text, options) {
            Ok(document) => document,
            Err(err) => {
                report(
                    reporter,
                    "Invalid manifest.",
                    &format!("filename='{MANIFEST_FILE}' detail='{err}'"),
                )?;
                return Ok(Self::empty());
            }
        };

        let root = document.root_element();
        if root.tag_name().name() != "manifest" {
            report(
                reporter,
                "Invalid manifest.",
                &format!(
                    "filename='{MANIFEST_FILE}' detail='root element is {}'",
                    root.tag_name().name()
                ),
            )?;
            return Ok(Self::empty());
        }

        let mut graph = Self::default();
        let mut ids = HashSet::new();

        let resources = children_named(root, "resources").flat_map(|r| children_named(r, "resource"));
        for resource in resources {
            let id = resource.attribute("identifier").unwrap_or_default();
            let href = children_named(resource, "file")
                .next()
                .and_then(|f| f.attribute("href"))
                .unwrap_or_default();

            if id.is_empty() {
                report(
                    reporter,
                    "Resource in manifest is missing id.",
                    &format!("Filename='{href}'"),
                )?;
            }
            if href.is_empty() {
                report(
                    reporter,
                    "Resource specified in manifest has no filename.",
                    &format!("ResourceId='{id}'"),
                )?;
            } else if !tree.file_exists(href) {
                report(
                    reporter,
                    "Resource specified in manifest does not exist.",
                    &format!("ResourceId='{id}' Filename='{href}'"),
                )?;
            }

            if !ids.insert(id.to_string()) {
                report(
                    reporter,
                    "Resource listed multiple times in manifest.",
                    &format!("ResourceId='{id}'"),
                )?;
            }

            let filename = normalize_filename(href);
            if !filename.is_empty() {
                if graph.filename_to_id.contains_key(&filename) {
                    report(
                        reporter,
                        "File listed multiple times in manifest.",
                        &format!("ResourceId='{id}' Filename='{filename}'"),
                    )?;
                } else {
                    graph.filename_to_id.insert(filename.clone(), id.to_string());
                }
            }

            let mut dependencies = BTreeSet::new();
            for dependency in children_named(resource, "dependency") {
                let depends_on = dependency.attribute("identifierref").unwrap_or_default();
                if depends_on.is_empty() {
                    report(
                        reporter,
                        "Dependency in manifest is missing identifierref attribute.",
                        &format!("ResourceId='{id}'"),
                    )?;
                    continue;
                }
                if !graph
                    .edges
                    .insert((id.to_string(), depends_on.to_string()))
                {
                    report(
                        reporter,
                        "Dependency in manifest repeated multiple times.",
                        &format!("ResourceId='{id}' DependsOnId='{depends_on}'"),
                    )?;
                }
                dependencies.insert(depends_on.to_string());
            }

            graph.entries.push(ManifestEntry {
                resource_id: id.to_string(),
                filename,
                dependencies,
            });
        }

        if graph.is_empty() {
            report(reporter, "Manifest is empty.", "")?;
        }

        tracing::debug!(
            resources = graph.entries.len(),
            files = graph.filename_to_id.len(),
            dependencies = graph.edges.len(),
            "parsed manifest"
        );
        Ok(graph)
    }

    /// True when the manifest maps no files; presence checks are then skipped
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filename_to_id.is_empty()
    }

    /// Resource id for a file, by normalized name. Resources declared
    /// without an id resolve to `None`.
    #[must_use]
    pub fn resource_id_for(&self, filename: &str) -> Option<&str> {
        self.filename_to_id
            .get(&normalize_filename(filename))
            .map(String::as_str)
            .filter(|id| !id.is_empty())
    }

    /// Whether the file is listed at all, even without an id
    #[must_use]
    pub fn contains_file(&self, filename: &str) -> bool {
        self.filename_to_id
            .contains_key(&normalize_filename(filename))
    }

    #[must_use]
    pub fn has_dependency(&self, from_id: &str, to_id: &str) -> bool {
        self.edges
            .contains(&(from_id.to_string(), to_id.to_string()))
    }

    /// Entries in document order
    #[must_use]
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    #[must_use]
    pub fn resource_count(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn dependency_count(&self) -> usize {
        self.edges.len()
    }
}

/// Element children matched by local name, ignoring namespaces
fn children_named<'a, 'input: 'a>(
    node: roxmltree::Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = roxmltree::Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |child| child.is_element() && child.tag_name().name() == name)
}

/// Manifest records are filed against the package root
fn report(reporter: &mut dyn Reporter, message: &str, detail: &str) -> Result<(), Error> {
    reporter.report(
        &ReportSubject::folder(""),
        ErrorCategory::Manifest,
        Severity::Benign,
        message,
        detail,
    )
}
