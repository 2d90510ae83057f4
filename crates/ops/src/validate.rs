//! Validation pass: dispatch every indexed identity to its validator

use tabulator_content::{DocumentKind, Release, SourceDocument};
use tabulator_errors::{ContentError, Error};
use tabulator_events::{EventEmitter, TabulationEvent, TabulationPass};
use tabulator_report::Reporter;
use tabulator_types::{
    option_keys, ErrorCategory, Identity, IdentityKey, IdentityState, ItemRoute, OptionSource,
    ReportSubject, Severity,
};

use crate::index::report_load_failure;
use crate::run::PackageRun;

impl PackageRun<'_> {
    /// Validate identities in indexing order. Each ends `Validated` or
    /// `FaultedDuringValidation`.
    pub(crate) fn validate_package(&mut self, reporter: &mut dyn Reporter) -> Result<(), Error> {
        self.emit_tabulation(TabulationEvent::PassStarted {
            package: self.package.clone(),
            pass: TabulationPass::Validation,
            identities: self.entries.len(),
        });

        for position in 0..self.entries.len() {
            if self.entries[position].state.is_terminal() {
                continue;
            }
            let identity = self.entries[position].identity.clone();
            let result = self.validate_identity(&identity, reporter);
            let validated = self.contain(result, &ReportSubject::from(&identity), reporter)?;
            self.entries[position].state = if validated {
                IdentityState::Validated
            } else {
                IdentityState::FaultedDuringValidation
            };
        }

        self.emit_tabulation(TabulationEvent::PassCompleted {
            package: self.package.clone(),
            pass: TabulationPass::Validation,
            identities: self.entries.len(),
        });
        Ok(())
    }

    fn validate_identity(&mut self, identity: &Identity, reporter: &mut dyn Reporter) -> Result<(), Error> {
        match ItemRoute::for_type(&identity.item_type) {
            ItemRoute::Interaction => self.validate_interaction(identity, reporter),
            ItemRoute::UnsupportedInteraction => {
                reporter.report(
                    &ReportSubject::from(identity),
                    ErrorCategory::Unsupported,
                    Severity::Severe,
                    "Item type is not fully supported by the open source TDS.",
                    &format!("itemType='{}'", identity.item_type),
                )?;
                self.validate_interaction(identity, reporter)
            }
            ItemRoute::Wordlist => self.validate_wordlist(identity, reporter),
            ItemRoute::Passage => self.validate_passage(identity, reporter),
            ItemRoute::Tutorial => self.validate_tutorial(identity, reporter),
            ItemRoute::Unrecognized => reporter.report(
                &ReportSubject::from(identity),
                ErrorCategory::Unsupported,
                Severity::Severe,
                "Unexpected item type.",
                &format!("itemType='{}'", identity.item_type),
            ),
        }
    }

    fn validate_interaction(&mut self, identity: &Identity, reporter: &mut dyn Reporter) -> Result<(), Error> {
        let Some(source) = self.load_primary(identity, "Invalid item file.", reporter)? else {
            return Ok(());
        };
        let document = match source.parse() {
            Ok(document) => document,
            Err(err) => {
                return report_load_failure(reporter, &ReportSubject::from(identity), "Invalid item file.", &err)
            }
        };
        self.check_metadata(identity, reporter)?;

        let release = require_release(&document, identity, &source)?;
        let wordlist_id = self.validate_content_and_wordlist(identity, &release, reporter)?;
        self.check_stimulus_reference(identity, &release, reporter)?;
        self.check_tutorial_reference(identity, &release, reporter)?;
        if let Some(wordlist_id) = wordlist_id {
            self.check_wordlist_dependency(identity, &wordlist_id, reporter)?;
        }
        Ok(())
    }

    fn validate_passage(&mut self, identity: &Identity, reporter: &mut dyn Reporter) -> Result<(), Error> {
        let Some(source) = self.load_primary(identity, "Invalid item file.", reporter)? else {
            return Ok(());
        };
        let document = match source.parse() {
            Ok(document) => document,
            Err(err) => {
                return report_load_failure(reporter, &ReportSubject::from(identity), "Invalid item file.", &err)
            }
        };
        self.check_metadata(identity, reporter)?;

        let release = require_release(&document, identity, &source)?;
        if let Some(wordlist_id) = self.validate_content_and_wordlist(identity, &release, reporter)? {
            self.check_wordlist_dependency(identity, &wordlist_id, reporter)?;
        }
        Ok(())
    }

    fn validate_tutorial(&mut self, identity: &Identity, reporter: &mut dyn Reporter) -> Result<(), Error> {
        let Some(source) = self.load_primary(identity, "Invalid item file.", reporter)? else {
            return Ok(());
        };
        let document = match source.parse() {
            Ok(document) => document,
            Err(err) => {
                return report_load_failure(reporter, &ReportSubject::from(identity), "Invalid item file.", &err)
            }
        };
        self.check_metadata(identity, reporter)?;

        let release = require_release(&document, identity, &source)?;
        self.validate_content_and_wordlist(identity, &release, reporter)?;
        Ok(())
    }

    /// Read the primary document; a missing or unreadable one is reported
    /// as `message` and yields `None`
    pub(crate) fn load_primary(
        &self,
        identity: &Identity,
        message: &str,
        reporter: &mut dyn Reporter,
    ) -> Result<Option<SourceDocument>, Error> {
        match SourceDocument::load(self.tree, &identity.primary_document()) {
            Ok(source) => Ok(Some(source)),
            Err(Error::Content(err)) => {
                report_load_failure(reporter, &ReportSubject::from(identity), message, &err)?;
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn check_metadata(&self, identity: &Identity, reporter: &mut dyn Reporter) -> Result<(), Error> {
        let loaded = SourceDocument::load(self.tree, &identity.metadata_document())
            .and_then(|source| {
                let parsed = source.parse().map(|_| ());
                parsed.map_err(Error::from)
            });
        match loaded {
            Ok(()) => Ok(()),
            Err(Error::Content(err)) => report_load_failure(
                reporter,
                &ReportSubject::from(identity),
                "Invalid metadata.xml.",
                &err,
            ),
            Err(err) => Err(err),
        }
    }

    /// `stm_pass_id` names a stimulus under the item's bank key
    fn check_stimulus_reference(
        &self,
        identity: &Identity,
        release: &Release<'_, '_>,
        reporter: &mut dyn Reporter,
    ) -> Result<(), Error> {
        let Some(stimulus_id) = release
            .attribute_value("stm_pass_id")
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
        else {
            return Ok(());
        };

        let folder = format!("stim-{}-{stimulus_id}", release.bank_key());
        let filename = format!("Stimuli/{folder}/{folder}.xml");
        if !self.tree.file_exists(&filename) {
            reporter.report(
                &ReportSubject::from(identity),
                ErrorCategory::Item,
                Severity::Severe,
                "Item stimulus not found.",
                &format!("StimulusId='{stimulus_id}'"),
            )?;
        }
        self.manifest
            .check_dependency(identity, &filename, "Stimulus", self.ctx.options(), reporter)
    }

    fn check_tutorial_reference(
        &self,
        identity: &Identity,
        release: &Release<'_, '_>,
        reporter: &mut dyn Reporter,
    ) -> Result<(), Error> {
        let subject = ReportSubject::from(identity);
        let Some(tutorial) = release.tutorial() else {
            return reporter.report(
                &subject,
                ErrorCategory::Item,
                Severity::Degraded,
                "Tutorial id missing from item.",
                "",
            );
        };
        if !self.ctx.options().is_enabled(option_keys::TUTORIAL_REFERENCES) {
            return Ok(());
        }

        let folder = format!("item-{}-{}", tutorial.bank_key, tutorial.id);
        let filename = format!("Items/{folder}/{folder}.xml");
        if !self.tree.file_exists(&filename) {
            reporter.report(
                &subject,
                ErrorCategory::Item,
                Severity::Severe,
                "Tutorial not found.",
                &format!("TutorialId='{}'", tutorial.id),
            )?;
        }
        self.manifest
            .check_dependency(identity, &filename, "Tutorial", self.ctx.options(), reporter)
    }

    fn check_wordlist_dependency(
        &self,
        identity: &Identity,
        wordlist_id: &str,
        reporter: &mut dyn Reporter,
    ) -> Result<(), Error> {
        let key = IdentityKey {
            is_passage: false,
            item_id: wordlist_id.to_string(),
        };
        let Some(wordlist) = self.lookup(&key) else {
            return Ok(());
        };
        self.manifest.check_dependency(
            identity,
            &wordlist.primary_document(),
            "WordList",
            self.ctx.options(),
            reporter,
        )
    }
}

/// The envelope was present in the indexing pass; its absence now is a fault
fn require_release<'a, 'input>(
    document: &'a roxmltree::Document<'input>,
    identity: &Identity,
    source: &SourceDocument,
) -> Result<Release<'a, 'input>, Error> {
    let kind = DocumentKind::for_passage(identity.is_passage);
    Release::find(document, kind).ok_or_else(|| {
        ContentError::MissingElement {
            element: if identity.is_passage {
                "itemrelease/passage"
            } else {
                "itemrelease/item"
            }
            .to_string(),
            filename: source.path().to_string(),
        }
        .into()
    })
}
