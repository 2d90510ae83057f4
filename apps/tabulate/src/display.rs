//! Final run output: a short text summary, or the whole report as JSON

use std::io::{self, Write};

use tabulator_ops::RunReport;
use tabulator_types::TabulationSummary;

use crate::error::CliError;

pub struct OutputRenderer {
    json: bool,
}

impl OutputRenderer {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn render_result(&self, report: &RunReport) -> Result<(), CliError> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        if self.json {
            serde_json::to_writer_pretty(&mut out, report).map_err(io::Error::other)?;
            writeln!(out)?;
        } else {
            write_text(&mut out, report)?;
        }
        out.flush()?;
        Ok(())
    }
}

fn write_text(out: &mut impl Write, report: &RunReport) -> io::Result<()> {
    for outcome in &report.packages {
        if outcome.skipped {
            writeln!(out, "{}: skipped", outcome.package)?;
        } else {
            writeln!(
                out,
                "{}: {} items, {} errors",
                outcome.package, outcome.summary.item_count, outcome.summary.error_count
            )?;
        }
    }
    if report.packages.len() > 1 {
        writeln!(out)?;
        writeln!(
            out,
            "{} packages ({} skipped)",
            report.packages.len(),
            report.skipped()
        )?;
    }
    write_summary(out, &report.summary)?;
    for file in &report.report_files {
        writeln!(out, "Report: {}", file.display())?;
    }
    Ok(())
}

fn write_summary(out: &mut impl Write, summary: &TabulationSummary) -> io::Result<()> {
    writeln!(out, "Errors: {}", summary.error_count)?;
    writeln!(out, "Items: {}", summary.item_count)?;
    for (item_type, count) in &summary.type_counts {
        writeln!(out, "  {item_type}: {count}")?;
    }
    writeln!(out, "Wordlists: {}", summary.wordlist_count)?;
    writeln!(
        out,
        "Glossary terms: {} ({} unique)",
        summary.glossary_term_count,
        summary.unique_glossary_terms()
    )?;
    for (gloss_type, count) in &summary.translation_counts {
        writeln!(out, "  {gloss_type}: {count}")?;
    }
    writeln!(
        out,
        "Glossary audio: {} m4a, {} ogg",
        summary.glossary_m4a_count, summary.glossary_ogg_count
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tabulator_ops::{PackageOutcome, RunMode};

    #[test]
    fn text_summary() {
        let mut summary = TabulationSummary::new();
        summary.record_item("mc");
        summary.error_count = 1;

        let mut report = RunReport::new(RunMode::Each);
        report.push(PackageOutcome {
            package: "a".into(),
            path: PathBuf::from("/p/a"),
            summary,
            skipped: false,
        });
        report.push(PackageOutcome {
            package: "b".into(),
            path: PathBuf::from("/p/b.zip"),
            summary: TabulationSummary::new(),
            skipped: true,
        });

        let mut out = Vec::new();
        write_text(&mut out, &report).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("a: 1 items, 1 errors\nb: skipped\n"));
        assert!(text.contains("2 packages (1 skipped)"));
        assert!(text.contains("  mc: 1"));
    }
}
