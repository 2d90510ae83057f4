//! Named validation toggles
//!
//! Options are addressed by short keys (`uwt`, `pmd`, ...). Keys that were
//! never configured read as enabled so that new checks are on by default.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tabulator_errors::ConfigError;
use tabulator_types::OptionSource;

/// Options that are off unless explicitly enabled
const DISABLED_BY_DEFAULT: &[(&str, &str)] = &[
    ("ebt", "Embedded Braille Text checks"),
    ("tgs", "Target Grade Suffix checks"),
    ("umf", "Unreferenced Media File checks"),
    ("gtr", "Glossary Text Report"),
    ("uwt", "Unreferenced Wordlist Terms"),
    ("mwa", "Missing Wordlist Attachments on unreferenced terms"),
    ("iat", "Image Alternate Text checks"),
    ("css", "CSS color-contrast interference"),
];

/// Options that are on unless explicitly disabled
const ENABLED_BY_DEFAULT: &[(&str, &str)] = &[
    ("pmd", "Passage Manifest Dependency"),
    ("trd", "Tutorial References and Dependencies"),
    ("asl", "ASL video checks"),
    ("cdt", "CData validations"),
    ("tss", "Text-to-speech silencing tags"),
];

/// Registry of validation options.
///
/// Serialized as a flat table of `key = bool`; a partial table only
/// overrides the keys it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, bool>",
    into = "BTreeMap<String, bool>"
)]
pub struct ValidationOptions {
    values: BTreeMap<String, bool>,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        let mut values = BTreeMap::new();
        for (key, _) in DISABLED_BY_DEFAULT {
            values.insert((*key).to_string(), false);
        }
        for (key, _) in ENABLED_BY_DEFAULT {
            values.insert((*key).to_string(), true);
        }
        Self { values }
    }
}

impl From<BTreeMap<String, bool>> for ValidationOptions {
    fn from(overrides: BTreeMap<String, bool>) -> Self {
        let mut options = Self::default();
        for (key, enabled) in overrides {
            options.set(&key, enabled);
        }
        options
    }
}

impl From<ValidationOptions> for BTreeMap<String, bool> {
    fn from(options: ValidationOptions) -> Self {
        options.values
    }
}

impl ValidationOptions {
    /// Set one option. Keys are case-insensitive.
    pub fn set(&mut self, key: &str, enabled: bool) {
        self.values.insert(key.to_ascii_lowercase(), enabled);
    }

    /// Turn every known option on
    pub fn enable_all(&mut self) {
        for enabled in self.values.values_mut() {
            *enabled = true;
        }
    }

    /// Apply one `+key` / `-key` directive. `+all` enables everything.
    ///
    /// # Errors
    ///
    /// Returns an error for `-all`, a missing sign, or an empty key.
    pub fn apply_directive(&mut self, directive: &str) -> Result<(), ConfigError> {
        let directive = directive.trim();
        let invalid = || ConfigError::InvalidDirective {
            directive: directive.to_string(),
        };

        let (enabled, key) = if let Some(key) = directive.strip_prefix('+') {
            (true, key)
        } else if let Some(key) = directive.strip_prefix('-') {
            (false, key)
        } else {
            return Err(invalid());
        };

        if key.is_empty() {
            return Err(invalid());
        }

        if key.eq_ignore_ascii_case("all") {
            if !enabled {
                return Err(invalid());
            }
            self.enable_all();
        } else {
            self.set(key, enabled);
        }
        Ok(())
    }

    /// Apply a comma separated list of directives, e.g. `+uwt,-pmd`
    ///
    /// # Errors
    ///
    /// Returns the first invalid directive encountered.
    pub fn apply_directives(&mut self, list: &str) -> Result<(), ConfigError> {
        for directive in list.split(',').filter(|d| !d.trim().is_empty()) {
            self.apply_directive(directive)?;
        }
        Ok(())
    }

    /// Iterate `(key, enabled)` pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Human readable description of a known option
    #[must_use]
    pub fn describe(key: &str) -> Option<&'static str> {
        DISABLED_BY_DEFAULT
            .iter()
            .chain(ENABLED_BY_DEFAULT)
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, description)| *description)
    }
}

impl OptionSource for ValidationOptions {
    fn is_enabled(&self, key: &str) -> bool {
        self.values
            .get(&key.to_ascii_lowercase())
            .copied()
            .unwrap_or(true)
    }
}
