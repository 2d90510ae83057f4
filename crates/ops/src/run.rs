//! Per-package run context and the package entry point

use std::collections::HashMap;
use std::rc::Rc;

use tabulator_errors::Error;
use tabulator_events::{EventEmitter, EventSender, TabulationEvent};
use tabulator_manifest::ManifestGraph;
use tabulator_report::Reporter;
use tabulator_tree::{PackageTree, MANIFEST_FILE};
use tabulator_types::{
    ErrorCategory, Identity, IdentityKey, IdentityState, ReportSubject, Severity, TabulationSummary,
};
use tabulator_wordlist::WordlistRecord;

use crate::context::TabulateCtx;

/// An identity and where it is in its lifecycle
#[derive(Debug, Clone)]
pub(crate) struct IndexedIdentity {
    pub identity: Identity,
    pub state: IdentityState,
}

/// State for one package, built fresh when the package starts and dropped
/// when it ends.
pub(crate) struct PackageRun<'a> {
    pub ctx: &'a TabulateCtx,
    pub tree: &'a dyn PackageTree,
    pub package: String,
    pub manifest: ManifestGraph,
    /// Identities in indexing order: items, then stimuli
    pub entries: Vec<IndexedIdentity>,
    /// First identity registered under each key
    pub index: HashMap<IdentityKey, usize>,
    /// Wordlist id to number of referencing items and stimuli
    pub wordlist_refs: HashMap<String, u32>,
    /// Wordlists already read during validation
    pub wordlists: HashMap<String, Rc<WordlistRecord>>,
    pub summary: TabulationSummary,
}

impl<'a> PackageRun<'a> {
    pub fn new(ctx: &'a TabulateCtx, tree: &'a dyn PackageTree) -> Self {
        Self {
            ctx,
            tree,
            package: tree.name().to_string(),
            manifest: ManifestGraph::empty(),
            entries: Vec::new(),
            index: HashMap::new(),
            wordlist_refs: HashMap::new(),
            wordlists: HashMap::new(),
            summary: TabulationSummary::new(),
        }
    }

    /// Registered identity for `key`, the first one when duplicated
    pub fn lookup(&self, key: &IdentityKey) -> Option<&Identity> {
        self.index.get(key).map(|&i| &self.entries[i].identity)
    }

    pub fn reference_count(&self, wordlist_id: &str) -> u32 {
        self.wordlist_refs.get(wordlist_id).copied().unwrap_or(0)
    }

    fn load_manifest(&mut self, reporter: &mut dyn Reporter) -> Result<(), Error> {
        self.manifest = ManifestGraph::build(self.tree, reporter)?;
        if self.manifest.is_empty() {
            let reason = if self.tree.file_exists(MANIFEST_FILE) {
                "manifest lists no resources"
            } else {
                "no manifest file"
            };
            self.emit_tabulation(TabulationEvent::ManifestSuppressed {
                package: self.package.clone(),
                reason: reason.to_string(),
            });
            return Ok(());
        }

        self.emit_tabulation(TabulationEvent::ManifestParsed {
            package: self.package.clone(),
            resources: self.manifest.resource_count(),
            dependencies: self.manifest.dependency_count(),
        });
        self.manifest
            .validate_coverage(self.tree, self.ctx.options(), reporter)
    }

    /// Fault barrier around one identity's work. Fatal errors pass through;
    /// anything else becomes a Severe exception record for `subject` and
    /// `Ok(false)`.
    pub fn contain(
        &self,
        result: Result<(), Error>,
        subject: &ReportSubject,
        reporter: &mut dyn Reporter,
    ) -> Result<bool, Error> {
        match result {
            Ok(()) => Ok(true),
            Err(err) if err.is_fatal() => Err(err),
            Err(err) => {
                let text = err.to_string();
                tracing::debug!(folder = %subject.folder, error = %text, "identity faulted");
                self.emit_tabulation(TabulationEvent::IdentityFaulted {
                    package: self.package.clone(),
                    folder: subject.folder.clone(),
                    error: text.clone(),
                });
                reporter.report(
                    subject,
                    ErrorCategory::Exception,
                    Severity::Severe,
                    "Exception while tabulating.",
                    &text,
                )?;
                Ok(false)
            }
        }
    }
}

impl EventEmitter for PackageRun<'_> {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(&self.ctx.tx)
    }

    fn correlation_id(&self) -> Option<&str> {
        Some(&self.package)
    }
}

/// Tabulate one opened package into `reporter`.
///
/// Builds the manifest graph, runs the indexing pass, then the validation
/// pass. The returned summary's error count is the number of records this
/// package added to `reporter`.
///
/// # Errors
///
/// Returns an error if the reporter fails or the package tree cannot be
/// listed. Faults inside a single identity are recorded instead.
pub fn tabulate_package(
    ctx: &TabulateCtx,
    tree: &dyn PackageTree,
    reporter: &mut dyn Reporter,
) -> Result<TabulationSummary, Error> {
    let errors_before = reporter.error_count();
    let mut run = PackageRun::new(ctx, tree);
    run.emit_tabulation(TabulationEvent::PackageOpened {
        package: run.package.clone(),
        backing: tree.backing().as_str().to_string(),
    });

    run.load_manifest(reporter)?;
    run.index_package(reporter)?;
    run.validate_package(reporter)?;

    let mut summary = std::mem::take(&mut run.summary);
    summary.error_count = reporter.error_count().saturating_sub(errors_before);
    run.emit_tabulation(TabulationEvent::PackageCompleted {
        package: run.package.clone(),
        errors: summary.error_count,
        items: summary.item_count,
        wordlists: summary.wordlist_count,
    });
    Ok(summary)
}
