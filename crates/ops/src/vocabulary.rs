//! Glossary validation: item content against its wordlist, and the
//! wordlists themselves

use std::rc::Rc;

use tabulator_content::{Release, TermScan};
use tabulator_errors::{ContentError, Error};
use tabulator_events::EventEmitter;
use tabulator_report::Reporter;
use tabulator_types::{ErrorCategory, Identity, IdentityKey, ReportSubject, Severity};
use tabulator_wordlist::{collect_stats, summarize, WordlistChecker, WordlistRecord};

use crate::index::report_load_failure;
use crate::run::PackageRun;

/// Outcome of reading a wordlist for validation
enum WordlistLoad {
    Loaded(Rc<WordlistRecord>),
    Invalid(ContentError),
}

impl PackageRun<'_> {
    /// Scan content for glossary references and check them against the
    /// referenced wordlist. Returns the wordlist id the document declares.
    pub(crate) fn validate_content_and_wordlist(
        &mut self,
        identity: &Identity,
        release: &Release<'_, '_>,
        reporter: &mut dyn Reporter,
    ) -> Result<Option<String>, Error> {
        let subject = ReportSubject::from(identity);
        let wordlist_id = release.wordlist_id().map(str::to_string);

        let scan = match release.content() {
            Some(content) => self.ctx.scanner.scan_content(content),
            None => {
                reporter.report(
                    &subject,
                    ErrorCategory::Item,
                    Severity::Severe,
                    "Item has no content element.",
                    "",
                )?;
                TermScan::default()
            }
        };
        for finding in &scan.findings {
            let severity = if finding.is_severe() {
                Severity::Severe
            } else {
                Severity::Tolerable
            };
            reporter.report(
                &subject,
                ErrorCategory::Item,
                severity,
                finding.message(),
                &finding.detail(),
            )?;
        }

        let Some(wordlist_id) = wordlist_id else {
            if !scan.references.is_empty() {
                reporter.report(
                    &subject,
                    ErrorCategory::Item,
                    Severity::Benign,
                    "Item has terms marked for glossary but does not reference a wordlist.",
                    "",
                )?;
            }
            return Ok(None);
        };

        let key = IdentityKey {
            is_passage: false,
            item_id: wordlist_id.clone(),
        };
        let Some(wordlist) = self.lookup(&key).cloned() else {
            reporter.report(
                &subject,
                ErrorCategory::Item,
                Severity::Degraded,
                "Item references non-existent wordlist (WIT)",
                &format!("wordlistId='{wordlist_id}'"),
            )?;
            return Ok(Some(wordlist_id));
        };

        match self.load_wordlist(&wordlist)? {
            WordlistLoad::Loaded(record) => {
                let ctx = self.ctx;
                let checker = WordlistChecker::new(&ctx.patterns, &ctx.matcher, ctx.options());
                checker.check(identity, &record, &scan.references, reporter)?;
            }
            WordlistLoad::Invalid(err) => {
                reporter.report(
                    &subject,
                    ErrorCategory::Wordlist,
                    Severity::Severe,
                    "Invalid wordlist file.",
                    &format!("wordlistId='{wordlist_id}' {}", err.load_detail()),
                )?;
            }
        }
        Ok(Some(wordlist_id))
    }

    /// Validator for `wordList` identities: reference count and statistics.
    /// Term-level checks run per referencing item.
    pub(crate) fn validate_wordlist(
        &mut self,
        identity: &Identity,
        reporter: &mut dyn Reporter,
    ) -> Result<(), Error> {
        let subject = ReportSubject::from(identity);
        let record = match self.load_wordlist(identity)? {
            WordlistLoad::Loaded(record) => record,
            WordlistLoad::Invalid(err) => {
                return report_load_failure(reporter, &subject, "Invalid wordlist file.", &err)
            }
        };

        let references = self.reference_count(&identity.item_id);
        if references == 0 {
            reporter.report(
                &subject,
                ErrorCategory::Wordlist,
                Severity::Benign,
                "Wordlist is not referenced by any item.",
                "",
            )?;
        }

        summarize(&record, &mut self.summary);
        let stats = collect_stats(&record, &self.package, &identity.folder, references);
        self.emit_debug(format!(
            "wordlist {} refs={} terms={}",
            stats.wordlist_id, stats.reference_count, stats.term_count
        ));
        self.summary.wordlists.push(stats);
        Ok(())
    }

    /// Read a wordlist once per package. Document and encoding problems come
    /// back as `Invalid`; a malformed keyword index is a fault.
    fn load_wordlist(&mut self, wordlist: &Identity) -> Result<WordlistLoad, Error> {
        if let Some(record) = self.wordlists.get(&wordlist.item_id) {
            return Ok(WordlistLoad::Loaded(Rc::clone(record)));
        }
        match WordlistRecord::load(self.tree, wordlist) {
            Ok(record) => {
                let record = Rc::new(record);
                self.wordlists
                    .insert(wordlist.item_id.clone(), Rc::clone(&record));
                Ok(WordlistLoad::Loaded(record))
            }
            Err(Error::Content(err)) if !matches!(err, ContentError::InvalidValue { .. }) => {
                Ok(WordlistLoad::Invalid(err))
            }
            Err(err) => Err(err),
        }
    }
}
