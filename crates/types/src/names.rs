//! Case-insensitive name comparison
//!
//! Every place that treats package paths or file names as case-insensitive
//! folds through here, so zip and directory packages agree on non-ASCII
//! names as well.

/// Lookup key for a name or path: full Unicode lower-casing
#[must_use]
pub fn fold_case(name: &str) -> String {
    name.to_lowercase()
}

/// Whether two names are equal ignoring letter case
#[must_use]
pub fn names_equal(a: &str, b: &str) -> bool {
    a == b || fold_case(a) == fold_case(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_beyond_ascii() {
        assert!(names_equal("Élan.ogg", "élan.OGG"));
        assert!(names_equal("ITEM-100-1", "item-100-1"));
        assert!(!names_equal("élan.ogg", "elan.ogg"));
        assert_eq!(fold_case("Items/ÜBER"), "items/über");
    }
}
