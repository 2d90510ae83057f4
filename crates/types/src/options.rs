//! Query surface for named validation toggles

/// Answers whether a named validation option is enabled.
///
/// The core only ever asks; storing and parsing option values belongs to the
/// configuration layer.
pub trait OptionSource {
    fn is_enabled(&self, key: &str) -> bool;
}

impl<T: OptionSource + ?Sized> OptionSource for &T {
    fn is_enabled(&self, key: &str) -> bool {
        (**self).is_enabled(key)
    }
}

/// Option keys consulted by the core validators
pub mod option_keys {
    /// Report missing manifest dependency edges
    pub const MANIFEST_DEPENDENCIES: &str = "pmd";
    /// Verify that referenced tutorials exist
    pub const TUTORIAL_REFERENCES: &str = "trd";
    /// Report wordlist terms no item references
    pub const UNREFERENCED_TERMS: &str = "uwt";
    /// Report attachment files no gloss references
    pub const UNREFERENCED_ATTACHMENTS: &str = "umf";
    /// Escalate missing attachments of unreferenced terms to Severe
    pub const MISSING_ATTACHMENTS_SEVERE: &str = "mwa";
}
