#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Wordlist consistency checks
//!
//! Items mark glossary terms in their content and name one wordlist. For
//! each referencing item the checker reconciles the marked terms with the
//! wordlist's keyword slots (stemmed comparison), checks each term's gloss
//! translations, and resolves every embedded audio or image reference
//! against the files in the wordlist folder.

mod attachment;
mod checker;
mod language;
mod record;
mod stats;
mod stem;

pub use attachment::{alternate_audio, AttachmentName, AttachmentPatterns};
pub use checker::WordlistChecker;
pub use language::{list_type_for_language, TranslationSet, EXPECTED_TRANSLATIONS, LANGUAGE_ALIASES};
pub use record::{Gloss, Keyword, WordlistRecord};
pub use stats::{collect_stats, summarize};
pub use stem::{StemMatcher, TermMatcher};
