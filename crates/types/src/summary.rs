//! Whole-run statistics built from per-package partials

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Counters collected while tabulating one package.
///
/// Aggregate runs merge the per-package values instead of sharing one
/// mutable instance across packages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabulationSummary {
    pub error_count: u64,
    pub item_count: u64,
    pub wordlist_count: u64,
    pub glossary_term_count: u64,
    pub glossary_m4a_count: u64,
    pub glossary_ogg_count: u64,
    /// Item type code to number of identities
    pub type_counts: BTreeMap<String, u64>,
    /// Lower-cased glossary term to number of occurrences
    pub term_counts: BTreeMap<String, u64>,
    /// Gloss language/type to number of glosses
    pub translation_counts: BTreeMap<String, u64>,
    /// One row per wordlist, in validation order
    #[serde(default)]
    pub wordlists: Vec<WordlistStats>,
}

/// Reference and gloss figures for one wordlist
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordlistStats {
    pub package: String,
    pub folder: String,
    pub wordlist_id: String,
    /// Items referencing the wordlist
    pub reference_count: u32,
    pub term_count: u64,
    pub max_glosses: u64,
    pub min_glosses: u64,
    /// Mean glosses per term to two decimals, zero without terms
    pub average_glosses: f64,
}

impl TabulationSummary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_item(&mut self, item_type: &str) {
        self.item_count += 1;
        *self.type_counts.entry(item_type.to_string()).or_insert(0) += 1;
    }

    pub fn record_wordlist(&mut self) {
        self.wordlist_count += 1;
    }

    pub fn record_glossary_term(&mut self, term: &str) {
        self.glossary_term_count += 1;
        *self.term_counts.entry(term.to_lowercase()).or_insert(0) += 1;
    }

    pub fn record_translation(&mut self, gloss_type: &str) {
        *self
            .translation_counts
            .entry(gloss_type.to_string())
            .or_insert(0) += 1;
    }

    /// Count one audio attachment by its extension (`m4a` or `ogg`)
    pub fn record_audio(&mut self, extension: &str) {
        if extension.eq_ignore_ascii_case("m4a") {
            self.glossary_m4a_count += 1;
        } else if extension.eq_ignore_ascii_case("ogg") {
            self.glossary_ogg_count += 1;
        }
    }

    /// Number of distinct glossary terms
    #[must_use]
    pub fn unique_glossary_terms(&self) -> usize {
        self.term_counts.len()
    }

    /// Fold another partial into this one
    pub fn merge(&mut self, other: &Self) {
        self.error_count += other.error_count;
        self.item_count += other.item_count;
        self.wordlist_count += other.wordlist_count;
        self.glossary_term_count += other.glossary_term_count;
        self.glossary_m4a_count += other.glossary_m4a_count;
        self.glossary_ogg_count += other.glossary_ogg_count;
        merge_counts(&mut self.type_counts, &other.type_counts);
        merge_counts(&mut self.term_counts, &other.term_counts);
        merge_counts(&mut self.translation_counts, &other.translation_counts);
        self.wordlists.extend(other.wordlists.iter().cloned());
    }
}

fn merge_counts(into: &mut BTreeMap<String, u64>, from: &BTreeMap<String, u64>) {
    for (key, count) in from {
        *into.entry(key.clone()).or_insert(0) += count;
    }
}
