//! Indexing pass: register every item and stimulus identity

use tabulator_content::{DocumentKind, Release, SourceDocument};
use tabulator_errors::{ContentError, Error};
use tabulator_events::{EventEmitter, TabulationEvent, TabulationPass};
use tabulator_report::Reporter;
use tabulator_tree::{TreeFolder, ITEMS_FOLDER, STIMULI_FOLDER};
use tabulator_types::{ErrorCategory, Identity, IdentityState, ReportSubject, Severity};

use crate::run::{IndexedIdentity, PackageRun};

impl PackageRun<'_> {
    /// Index `Items/*` then `Stimuli/*`, each in name order
    pub(crate) fn index_package(&mut self, reporter: &mut dyn Reporter) -> Result<(), Error> {
        self.emit_tabulation(TabulationEvent::PassStarted {
            package: self.package.clone(),
            pass: TabulationPass::Indexing,
            identities: 0,
        });

        for (root, is_passage) in [(ITEMS_FOLDER, false), (STIMULI_FOLDER, true)] {
            for folder in self.tree.list_folders(root)? {
                let subject = ReportSubject::folder(&folder.path);
                let result = self.index_folder(&folder, is_passage, reporter);
                self.contain(result, &subject, reporter)?;
            }
        }

        self.emit_tabulation(TabulationEvent::PassCompleted {
            package: self.package.clone(),
            pass: TabulationPass::Indexing,
            identities: self.entries.len(),
        });
        Ok(())
    }

    fn index_folder(
        &mut self,
        folder: &TreeFolder,
        is_passage: bool,
        reporter: &mut dyn Reporter,
    ) -> Result<(), Error> {
        let subject = ReportSubject::folder(&folder.path);
        let invalid = if is_passage {
            "Invalid stimulus file."
        } else {
            "Invalid item file."
        };
        let path = folder.child_path(&format!("{}.xml", folder.name));

        let source = match SourceDocument::load(self.tree, &path) {
            Ok(source) => source,
            Err(Error::Content(err)) => return report_load_failure(reporter, &subject, invalid, &err),
            Err(err) => return Err(err),
        };
        let document = match source.parse() {
            Ok(document) => document,
            Err(err) => return report_load_failure(reporter, &subject, invalid, &err),
        };

        let release = Release::find(&document, DocumentKind::for_passage(is_passage));
        let Some(release) = release else {
            if is_passage {
                return Err(ContentError::MissingElement {
                    element: "itemrelease/passage".to_string(),
                    filename: path,
                }
                .into());
            }
            return item_error(reporter, &subject, "Item type not specified.");
        };

        let Some(item_type) = release.item_type() else {
            return item_error(reporter, &subject, "Item type not specified.");
        };
        if release.id().is_empty() {
            if is_passage {
                return Err(ContentError::MissingElement {
                    element: "passage/@id".to_string(),
                    filename: path,
                }
                .into());
            }
            return item_error(reporter, &subject, "Item ID not specified.");
        }

        let identity = Identity::new(
            release.id(),
            item_type,
            release.bank_key(),
            is_passage,
            &folder.path,
        );
        let subject = ReportSubject::from(&identity);
        self.summary.record_item(item_type);

        if self.index.contains_key(&identity.key()) {
            let message = if is_passage {
                "Multiple stimuli with the same ID."
            } else {
                "Multiple items with the same ID."
            };
            item_error(reporter, &subject, message)?;
        }

        if !identity.folder_matches_convention() {
            let message = if is_passage {
                "Stimulus ID doesn't match file/folder name"
            } else {
                "Item ID doesn't match file/folder name"
            };
            reporter.report(
                &subject,
                ErrorCategory::Item,
                Severity::Severe,
                message,
                &format!(
                    "bankKey='{}' itemId='{}' foldername='{}'",
                    identity.bank_key, identity.item_id, folder.name
                ),
            )?;
        }

        let mut counted = false;
        for wordlist_id in release.wordlist_references() {
            if wordlist_id.is_empty() {
                reporter.report(
                    &subject,
                    ErrorCategory::Item,
                    Severity::Degraded,
                    "Item references blank wordList id.",
                    "",
                )?;
                continue;
            }
            if counted {
                reporter.report(
                    &subject,
                    ErrorCategory::Item,
                    Severity::Degraded,
                    "Item references multiple wordlists.",
                    &format!("wordlistId='{wordlist_id}'"),
                )?;
            }
            counted = true;
            *self.wordlist_refs.entry(wordlist_id.to_string()).or_insert(0) += 1;
        }

        let position = self.entries.len();
        self.index.entry(identity.key()).or_insert(position);
        self.entries.push(IndexedIdentity {
            identity,
            state: IdentityState::Indexed,
        });
        Ok(())
    }
}

/// Severe item record for a document that failed to load or parse
pub(crate) fn report_load_failure(
    reporter: &mut dyn Reporter,
    subject: &ReportSubject,
    message: &str,
    err: &ContentError,
) -> Result<(), Error> {
    reporter.report(
        subject,
        ErrorCategory::Item,
        Severity::Severe,
        message,
        &err.load_detail(),
    )
}

fn item_error(reporter: &mut dyn Reporter, subject: &ReportSubject, message: &str) -> Result<(), Error> {
    reporter.report(subject, ErrorCategory::Item, Severity::Severe, message, "")
}
