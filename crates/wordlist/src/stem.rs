//! Morphology-insensitive term comparison

use rust_stemmers::{Algorithm, Stemmer};

/// Decides whether item text matches a wordlist term
pub trait TermMatcher {
    fn terms_match(&self, text: &str, term: &str) -> bool;
}

/// Snowball English stemming over each word of both texts
pub struct StemMatcher {
    stemmer: Stemmer,
}

impl StemMatcher {
    #[must_use]
    pub fn english() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
        }
    }

    fn stems(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(|w| self.stemmer.stem(w).into_owned())
            .collect()
    }
}

impl Default for StemMatcher {
    fn default() -> Self {
        Self::english()
    }
}

impl std::fmt::Debug for StemMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StemMatcher").finish_non_exhaustive()
    }
}

impl TermMatcher for StemMatcher {
    fn terms_match(&self, text: &str, term: &str) -> bool {
        self.stems(text) == self.stems(term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plural_and_tense() {
        let m = StemMatcher::english();
        assert!(m.terms_match("cats", "cat"));
        assert!(m.terms_match("whales", "Whale"));
        assert!(m.terms_match("jumped", "jumping"));
        assert!(m.terms_match("sea lions", "Sea-lion"));
        assert!(!m.terms_match("cat", "dog"));
        assert!(!m.terms_match("shark", "Whale"));
        assert!(!m.terms_match("blue whale", "whale"));
    }

    proptest::proptest! {
        #[test]
        fn reflexive(text in "[A-Za-z ,.'-]{0,30}") {
            let m = StemMatcher::english();
            proptest::prop_assert!(m.terms_match(&text, &text));
        }
    }
}
