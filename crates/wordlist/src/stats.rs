//! Per-wordlist glossary statistics

use tabulator_types::{TabulationSummary, WordlistStats};

use crate::record::WordlistRecord;

/// Reference and gloss figures for the wordlist report
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn collect_stats(
    record: &WordlistRecord,
    package: &str,
    folder: &str,
    reference_count: u32,
) -> WordlistStats {
    let counts: Vec<u64> = record.keywords.iter().map(|k| k.glosses.len() as u64).collect();
    let total: u64 = counts.iter().sum();
    let average_glosses = if counts.is_empty() {
        0.0
    } else {
        (total as f64 / counts.len() as f64 * 100.0).round() / 100.0
    };
    WordlistStats {
        package: package.to_string(),
        folder: folder.to_string(),
        wordlist_id: record.wordlist_id.clone(),
        reference_count,
        term_count: counts.len() as u64,
        max_glosses: counts.iter().copied().max().unwrap_or(0),
        min_glosses: counts.iter().copied().min().unwrap_or(0),
        average_glosses,
    }
}

/// Add a wordlist's terms, glosses and audio files to the run summary
pub fn summarize(record: &WordlistRecord, summary: &mut TabulationSummary) {
    summary.record_wordlist();
    for keyword in &record.keywords {
        summary.record_glossary_term(&keyword.text);
        for gloss in &keyword.glosses {
            summary.record_translation(&gloss.list_type);
        }
    }
    for name in record.attachments.keys() {
        if let Some((_, extension)) = name.rsplit_once('.') {
            summary.record_audio(extension);
        }
    }
}
