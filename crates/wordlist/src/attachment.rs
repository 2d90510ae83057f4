//! Attachment references inside gloss HTML and the glossary filename
//! convention

use regex::{Regex, RegexBuilder};
use tabulator_errors::Error;

use crate::language::list_type_for_language;

const AUDIO_REFERENCE: &str = r#"<a[^>]*href="([^"]*)"[^>]*>"#;
const IMAGE_REFERENCE: &str = r#"<img[^>]*src="([^"]*)"[^>]*>"#;
// e.g. item_116605_v1_116605_01btagalog_glossary_ogg_m4a.m4a
const NAMING_CONVENTION: &str =
    r"^item_(\d+)_v\d+_(\d+)_(\d+)([a-zA-Z]+)_glossary((?:_ogg)?(?:_m4a)?(?:_ogg)?)\.(ogg|m4a)$";

/// Fields encoded in a conventionally named audio attachment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentName {
    pub wordlist_id: String,
    pub sequence_id: String,
    pub term_index: String,
    pub language: String,
    /// `_ogg`/`_m4a` markers between `_glossary` and the extension
    pub suffix: String,
    pub extension: String,
}

impl AttachmentName {
    /// Whether either numeric id names `wordlist_id`
    #[must_use]
    pub fn names_wordlist(&self, wordlist_id: &str) -> bool {
        self.wordlist_id == wordlist_id || self.sequence_id == wordlist_id
    }

    /// Gloss list type named by the language token
    #[must_use]
    pub fn list_type(&self) -> String {
        list_type_for_language(&self.language)
    }

    /// Suffix markers, when present, must include the file's own format
    #[must_use]
    pub fn suffix_matches_extension(&self) -> bool {
        self.suffix.is_empty()
            || self
                .suffix
                .to_lowercase()
                .contains(&format!("_{}", self.extension.to_lowercase()))
    }
}

/// Compiled attachment patterns
#[derive(Debug, Clone)]
pub struct AttachmentPatterns {
    audio: Regex,
    image: Regex,
    naming: Regex,
}

impl AttachmentPatterns {
    /// # Errors
    ///
    /// Returns an internal error if a pattern fails to compile.
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            audio: compile(AUDIO_REFERENCE)?,
            image: compile(IMAGE_REFERENCE)?,
            naming: compile(NAMING_CONVENTION)?,
        })
    }

    /// First audio link target in gloss HTML
    #[must_use]
    pub fn audio_reference<'h>(&self, html: &'h str) -> Option<&'h str> {
        first_capture(&self.audio, html)
    }

    /// First image source in gloss HTML
    #[must_use]
    pub fn image_reference<'h>(&self, html: &'h str) -> Option<&'h str> {
        first_capture(&self.image, html)
    }

    /// Decode a filename that follows the glossary naming convention
    #[must_use]
    pub fn parse_name(&self, filename: &str) -> Option<AttachmentName> {
        let caps = self.naming.captures(filename)?;
        let group = |i: usize| caps.get(i).map_or("", |m| m.as_str()).to_string();
        Some(AttachmentName {
            wordlist_id: group(1),
            sequence_id: group(2),
            term_index: group(3),
            language: group(4),
            suffix: group(5),
            extension: group(6),
        })
    }
}

fn compile(pattern: &str) -> Result<Regex, Error> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| Error::internal(format!("attachment pattern: {e}")))
}

fn first_capture<'h>(regex: &Regex, html: &'h str) -> Option<&'h str> {
    regex
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// The other audio format of an `.ogg` or `.m4a` file, same stem
#[must_use]
pub fn alternate_audio(filename: &str) -> Option<String> {
    let (stem, extension) = filename.rsplit_once('.')?;
    if extension.eq_ignore_ascii_case("ogg") {
        Some(format!("{stem}.m4a"))
    } else if extension.eq_ignore_ascii_case("m4a") {
        Some(format!("{stem}.ogg"))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns() -> AttachmentPatterns {
        AttachmentPatterns::new().unwrap()
    }

    #[test]
    fn finds_references() {
        let p = patterns();
        let html = r#"<p>ballena</p><A class="x" HREF="item_9_v1_9_0spanish_glossary.ogg">play</A><img alt="" src="whale.png"/>"#;
        assert_eq!(p.audio_reference(html), Some("item_9_v1_9_0spanish_glossary.ogg"));
        assert_eq!(p.image_reference(html), Some("whale.png"));
        assert_eq!(p.audio_reference("<p>none</p>"), None);
    }

    #[test]
    fn decodes_convention() {
        let p = patterns();
        let name = p
            .parse_name("item_116605_v1_116605_01btagalog_glossary_ogg_m4a.m4a")
            .unwrap();
        assert_eq!(name.wordlist_id, "116605");
        assert_eq!(name.term_index, "01");
        assert_eq!(name.language, "btagalog");
        assert_eq!(name.list_type(), "tagalGlossary");
        assert!(name.names_wordlist("116605"));
        assert!(!name.names_wordlist("5"));
        assert!(name.suffix_matches_extension());

        let wrong = p.parse_name("item_1_v1_2_3korean_glossary_ogg.m4a").unwrap();
        assert!(!wrong.suffix_matches_extension());
        assert!(wrong.names_wordlist("2"));

        let bare = p.parse_name("ITEM_1_V1_2_3Korean_Glossary.OGG").unwrap();
        assert!(bare.suffix_matches_extension());
        assert_eq!(bare.list_type(), "koreanGlossary");

        assert!(p.parse_name("whale.ogg").is_none());
    }

    #[test]
    fn alternates() {
        assert_eq!(alternate_audio("a.b.OGG").as_deref(), Some("a.b.m4a"));
        assert_eq!(alternate_audio("a.m4a").as_deref(), Some("a.ogg"));
        assert_eq!(alternate_audio("a.png"), None);
        assert_eq!(alternate_audio("noext"), None);
    }
}
