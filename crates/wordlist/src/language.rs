//! Gloss languages: the expected translation set and filename aliases

/// Gloss list types every fully translated term carries, in bit order
pub const EXPECTED_TRANSLATIONS: [&str; 10] = [
    "arabicGlossary",
    "cantoneseGlossary",
    "esnGlossary",
    "koreanGlossary",
    "mandarinGlossary",
    "punjabiGlossary",
    "russianGlossary",
    "tagalGlossary",
    "ukrainianGlossary",
    "vietnameseGlossary",
];

/// Attachment filename language tokens that do not follow the
/// `<token>Glossary` rule
pub const LANGUAGE_ALIASES: &[(&str, &str)] = &[
    ("spanish", "esnGlossary"),
    ("tagalog", "tagalGlossary"),
    ("atagalog", "tagalGlossary"),
    ("btagalog", "tagalGlossary"),
    ("ilocano", "tagalGlossary"),
    ("atagal", "tagalGlossary"),
    ("apunjabi", "punjabiGlossary"),
    ("bpunjabi", "punjabiGlossary"),
    ("punjabiwest", "punjabiGlossary"),
    ("punjabieast", "punjabiGlossary"),
];

/// Gloss list type named by a filename language token
#[must_use]
pub fn list_type_for_language(token: &str) -> String {
    let token = token.to_lowercase();
    LANGUAGE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == token)
        .map_or_else(|| format!("{token}Glossary"), |(_, list_type)| (*list_type).to_string())
}

/// Which expected translations a term carries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslationSet(u16);

impl TranslationSet {
    const COMPLETE: u16 = (1 << EXPECTED_TRANSLATIONS.len()) - 1;

    /// Note a gloss; list types outside the expected set are ignored
    pub fn insert(&mut self, list_type: &str) {
        if let Some(bit) = EXPECTED_TRANSLATIONS.iter().position(|t| *t == list_type) {
            self.0 |= 1 << bit;
        }
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub fn is_complete(self) -> bool {
        self.0 == Self::COMPLETE
    }

    /// Expected translations not present, in bit order
    #[must_use]
    pub fn missing(self) -> Vec<&'static str> {
        EXPECTED_TRANSLATIONS
            .iter()
            .enumerate()
            .filter(|(bit, _)| self.0 & (1 << bit) == 0)
            .map(|(_, t)| *t)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases() {
        assert_eq!(list_type_for_language("Spanish"), "esnGlossary");
        assert_eq!(list_type_for_language("btagalog"), "tagalGlossary");
        assert_eq!(list_type_for_language("ilocano"), "tagalGlossary");
        assert_eq!(list_type_for_language("PUNJABIEAST"), "punjabiGlossary");
        assert_eq!(list_type_for_language("Korean"), "koreanGlossary");
        assert_eq!(list_type_for_language("english"), "englishGlossary");
    }

    #[test]
    fn translation_set() {
        let mut set = TranslationSet::default();
        assert!(set.is_empty());
        set.insert("englishGlossary");
        assert!(set.is_empty());

        set.insert("esnGlossary");
        set.insert("arabicGlossary");
        assert!(!set.is_complete());
        let missing = set.missing();
        assert_eq!(missing.len(), 8);
        assert_eq!(missing[0], "cantoneseGlossary");

        for t in EXPECTED_TRANSLATIONS {
            set.insert(t);
        }
        assert!(set.is_complete());
        assert!(set.missing().is_empty());
    }
}
