//! Reconciles one item's glossary references against its wordlist

use std::collections::{BTreeMap, BTreeSet};

use tabulator_content::TermReference;
use tabulator_errors::Error;
use tabulator_report::Reporter;
use tabulator_types::{
    names_equal, option_keys, ErrorCategory, Identity, OptionSource, ReportSubject, Severity,
};

use crate::attachment::{alternate_audio, AttachmentPatterns};
use crate::language::TranslationSet;
use crate::record::{Keyword, WordlistRecord};
use crate::stem::TermMatcher;

/// First gloss to claim an attachment
#[derive(Debug, Clone)]
struct AttachmentClaim {
    term_index: i64,
    list_type: String,
}

/// Runs the wordlist checks for one referencing item
pub struct WordlistChecker<'a> {
    patterns: &'a AttachmentPatterns,
    matcher: &'a dyn TermMatcher,
    options: &'a dyn OptionSource,
}

/// State for one item/wordlist pairing
struct Pairing<'r, 'w> {
    subject: ReportSubject,
    record: &'w WordlistRecord,
    reporter: &'r mut dyn Reporter,
    /// Attachment filename to the gloss that first referenced it
    claims: BTreeMap<String, AttachmentClaim>,
    /// Attachment files reached by any reference, including alternates
    touched: BTreeSet<String>,
}

impl Pairing<'_, '_> {
    fn report(&mut self, severity: Severity, message: &str, detail: &str) -> Result<(), Error> {
        let detail = format!("wordlistId='{}' {detail}", self.record.wordlist_id);
        self.reporter.report(
            &self.subject,
            ErrorCategory::Wordlist,
            severity,
            message,
            detail.trim_end(),
        )
    }

    fn term_text(&self, index: i64) -> &str {
        self.record.term(index).unwrap_or_default()
    }

    /// The stored name differing from `filename` only in letter case
    fn case_variant(&self, filename: &str) -> Option<&str> {
        self.record
            .attachments
            .keys()
            .find(|name| names_equal(name, filename))
            .map(String::as_str)
    }
}

impl<'a> WordlistChecker<'a> {
    #[must_use]
    pub fn new(
        patterns: &'a AttachmentPatterns,
        matcher: &'a dyn TermMatcher,
        options: &'a dyn OptionSource,
    ) -> Self {
        Self {
            patterns,
            matcher,
            options,
        }
    }

    /// Check `references` from `item` against `record`. All findings are
    /// filed against the item.
    ///
    /// # Errors
    ///
    /// Returns an error only if the reporter fails.
    pub fn check(
        &self,
        item: &Identity,
        record: &WordlistRecord,
        references: &[TermReference],
        reporter: &mut dyn Reporter,
    ) -> Result<(), Error> {
        let mut pairing = Pairing {
            subject: ReportSubject::from(item),
            record,
            reporter,
            claims: BTreeMap::new(),
            touched: BTreeSet::new(),
        };

        for index in &record.duplicate_indices {
            pairing.report(
                Severity::Severe,
                "Wordlist has multiple terms with the same index.",
                &format!("index='{index}'"),
            )?;
        }

        let referenced: BTreeSet<i64> = references.iter().map(|r| r.index).collect();
        for keyword in &record.keywords {
            self.check_keyword(&mut pairing, keyword, referenced.contains(&keyword.index))?;
        }

        for reference in references {
            match record.term(reference.index) {
                None => pairing.report(
                    Severity::Tolerable,
                    "Item references non-existent wordlist term.",
                    &format!("text='{}' termIndex='{}'", reference.text, reference.index),
                )?,
                Some(term) if !self.matcher.terms_match(&reference.text, term) => pairing.report(
                    Severity::Degraded,
                    "Item text does not match wordlist term.",
                    &format!(
                        "text='{}' term='{term}' termIndex='{}'",
                        reference.text, reference.index
                    ),
                )?,
                Some(_) => {}
            }
        }

        if self.options.is_enabled(option_keys::UNREFERENCED_ATTACHMENTS) {
            let unreferenced: Vec<&String> = record
                .attachments
                .keys()
                .filter(|name| !pairing.touched.contains(*name))
                .collect();
            for name in unreferenced {
                pairing.report(
                    Severity::Benign,
                    "Unreferenced wordlist attachment file.",
                    &format!("filename='{name}'"),
                )?;
            }
        }
        Ok(())
    }

    fn check_keyword(
        &self,
        pairing: &mut Pairing<'_, '_>,
        keyword: &Keyword,
        referenced: bool,
    ) -> Result<(), Error> {
        if !referenced && self.options.is_enabled(option_keys::UNREFERENCED_TERMS) {
            pairing.report(
                Severity::Benign,
                "Wordlist term is not referenced by item.",
                &format!("term='{}' termIndex='{}'", keyword.text, keyword.index),
            )?;
        }

        let mut translations = TranslationSet::default();
        for gloss in &keyword.glosses {
            translations.insert(&gloss.list_type);

            if let Some(filename) = self.patterns.audio_reference(&gloss.html) {
                self.check_attachment(pairing, filename, keyword.index, &gloss.list_type, referenced)?;
                if let Some(alternate) = alternate_audio(filename) {
                    self.check_alternate(pairing, &alternate, keyword.index, referenced)?;
                }
                self.check_naming(pairing, filename, &gloss.list_type)?;
            }

            if let Some(filename) = self.patterns.image_reference(&gloss.html) {
                self.check_attachment(pairing, filename, keyword.index, &gloss.list_type, referenced)?;
            }
        }

        if referenced && !translations.is_empty() && !translations.is_complete() {
            pairing.report(
                Severity::Tolerable,
                "Wordlist does not include all expected translations.",
                &format!(
                    "term='{}' missing='{}'",
                    keyword.text,
                    translations.missing().join(", ")
                ),
            )?;
        }
        Ok(())
    }

    fn check_attachment(
        &self,
        pairing: &mut Pairing<'_, '_>,
        filename: &str,
        term_index: i64,
        list_type: &str,
        referenced: bool,
    ) -> Result<(), Error> {
        if pairing.record.attachments.contains_key(filename) {
            pairing.touched.insert(filename.to_string());
        } else if let Some(actual) = pairing.case_variant(filename).map(str::to_string) {
            pairing.report(
                Severity::Severe,
                "Wordlist attachment filename differs in capitalization (will fail on certain platforms).",
                &format!(
                    "referenceFilename='{filename}' actualFilename='{actual}' termIndex='{term_index}'"
                ),
            )?;
            pairing.touched.insert(actual);
        } else {
            let term = pairing.term_text(term_index).to_string();
            let detail = format!("filename='{filename}' term='{term}' termIndex='{term_index}'");
            if referenced || self.options.is_enabled(option_keys::MISSING_ATTACHMENTS_SEVERE) {
                pairing.report(Severity::Severe, "Wordlist attachment not found.", &detail)?;
            } else {
                pairing.report(
                    Severity::Benign,
                    "Wordlist attachment not found. Benign because corresponding term is not referenced.",
                    &detail,
                )?;
            }
        }

        let Some(claim) = pairing.claims.get(filename).cloned() else {
            pairing.claims.insert(
                filename.to_string(),
                AttachmentClaim {
                    term_index,
                    list_type: list_type.to_string(),
                },
            );
            return Ok(());
        };

        let previous = pairing.term_text(claim.term_index).to_string();
        let current = pairing.term_text(term_index).to_string();
        if !names_equal(&previous, &current) {
            pairing.report(
                Severity::Severe,
                "Two different wordlist terms reference the same attachment.",
                &format!(
                    "filename='{filename}' termA='{previous}' termB='{current}' termIndexA='{}' termIndexB='{term_index}'",
                    claim.term_index
                ),
            )?;
        } else if claim.list_type != list_type {
            pairing.report(
                Severity::Severe,
                "Same wordlist attachment used for different languages or types.",
                &format!(
                    "filename='{filename}' term='{current}' typeA='{}' typeB='{list_type}' termIndexA='{}' termIndexB='{term_index}'",
                    claim.list_type, claim.term_index
                ),
            )?;
        }
        Ok(())
    }

    /// The other audio format is optional; its absence only matters for a
    /// referenced term and never makes the gloss ambiguous.
    fn check_alternate(
        &self,
        pairing: &mut Pairing<'_, '_>,
        filename: &str,
        term_index: i64,
        referenced: bool,
    ) -> Result<(), Error> {
        let found = if pairing.record.attachments.contains_key(filename) {
            Some(filename.to_string())
        } else {
            pairing.case_variant(filename).map(str::to_string)
        };
        match found {
            Some(name) => {
                pairing.touched.insert(name);
            }
            None if referenced => {
                let term = pairing.term_text(term_index).to_string();
                pairing.report(
                    Severity::Benign,
                    "Wordlist attachment alternate audio format not found.",
                    &format!("filename='{filename}' term='{term}' termIndex='{term_index}'"),
                )?;
            }
            None => {}
        }
        Ok(())
    }

    fn check_naming(
        &self,
        pairing: &mut Pairing<'_, '_>,
        filename: &str,
        list_type: &str,
    ) -> Result<(), Error> {
        let Some(name) = self.patterns.parse_name(filename) else {
            return Ok(());
        };

        let wordlist_id = pairing.record.wordlist_id.clone();
        if !name.names_wordlist(&wordlist_id) {
            pairing.report(
                Severity::Degraded,
                "Wordlist attachment filename indicates wordlist ID mismatch.",
                &format!(
                    "filename='{filename}' filenameItemId='{}' expectedItemId='{wordlist_id}'",
                    name.wordlist_id
                ),
            )?;
        }

        let filename_list_type = name.list_type();
        if filename_list_type != list_type {
            pairing.report(
                Severity::Degraded,
                "Wordlist attachment filename indicates attachment type mismatch.",
                &format!(
                    "filename='{filename}' filenameListType='{filename_list_type}' expectedListType='{list_type}'"
                ),
            )?;
        }

        if !name.suffix_matches_extension() {
            pairing.report(
                Severity::Degraded,
                "Wordlist attachment filename indicates type suffix mismatch.",
                &format!(
                    "filename='{filename}' suffix='{}' extension='{}'",
                    name.suffix, name.extension
                ),
            )?;
        }
        Ok(())
    }
}
