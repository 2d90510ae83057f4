//! Record writers

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tabulator_errors::{Error, ReportError};
use tabulator_types::{ErrorRecord, ReportFormat};

/// Output channel for error records
pub trait RecordWriter {
    /// Write one record
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying output fails.
    fn write_record(&mut self, record: &ErrorRecord) -> Result<(), ReportError>;

    /// Flush buffered output
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying output fails.
    fn flush(&mut self) -> Result<(), ReportError>;
}

impl<W: RecordWriter + ?Sized> RecordWriter for Box<W> {
    fn write_record(&mut self, record: &ErrorRecord) -> Result<(), ReportError> {
        (**self).write_record(record)
    }

    fn flush(&mut self) -> Result<(), ReportError> {
        (**self).flush()
    }
}

/// One JSON object per line
#[derive(Debug)]
pub struct JsonLinesWriter<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RecordWriter for JsonLinesWriter<W> {
    fn write_record(&mut self, record: &ErrorRecord) -> Result<(), ReportError> {
        serde_json::to_writer(&mut self.out, record).map_err(|e| ReportError::WriteFailed {
            message: e.to_string(),
        })?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ReportError> {
        self.out.flush().map_err(|e| ReportError::FlushFailed {
            message: e.to_string(),
        })
    }
}

const TEXT_HEADER: &str =
    "Folder\tBankKey\tItemId\tItemType\tCategory\tSeverity\tErrorMessage\tDetail";

/// Tab separated columns under a header row
#[derive(Debug)]
pub struct TextWriter<W: Write> {
    out: W,
}

impl<W: Write> TextWriter<W> {
    /// Start a report by writing the header row, so a package without
    /// findings still gets a well-formed file.
    ///
    /// # Errors
    ///
    /// Returns an error if the header cannot be written.
    pub fn new(mut out: W) -> Result<Self, ReportError> {
        writeln!(out, "{TEXT_HEADER}")?;
        Ok(Self { out })
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Tabs and line breaks would break the column layout
fn text_field(value: &str) -> String {
    value.replace(['\t', '\r', '\n'], " ")
}

impl<W: Write> RecordWriter for TextWriter<W> {
    fn write_record(&mut self, record: &ErrorRecord) -> Result<(), ReportError> {
        writeln!(
            self.out,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            text_field(&record.folder),
            text_field(&record.bank_key),
            text_field(&record.item_id),
            text_field(&record.item_type),
            record.category,
            record.severity,
            text_field(&record.message),
            text_field(&record.detail),
        )?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ReportError> {
        self.out.flush().map_err(|e| ReportError::FlushFailed {
            message: e.to_string(),
        })
    }
}

/// Keeps records in memory; used for embedding and tests
#[derive(Debug, Default, Clone)]
pub struct MemoryWriter {
    records: Vec<ErrorRecord>,
}

impl MemoryWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn records(&self) -> &[ErrorRecord] {
        &self.records
    }

    #[must_use]
    pub fn into_records(self) -> Vec<ErrorRecord> {
        self.records
    }
}

impl RecordWriter for MemoryWriter {
    fn write_record(&mut self, record: &ErrorRecord) -> Result<(), ReportError> {
        self.records.push(record.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ReportError> {
        Ok(())
    }
}

/// Create a report file in the requested format
///
/// # Errors
///
/// Returns an error if the file cannot be created.
pub fn open_report_file(path: &Path, format: ReportFormat) -> Result<Box<dyn RecordWriter>, Error> {
    let file = File::create(path).map_err(|e| ReportError::OpenFailed {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    tracing::debug!(path = %path.display(), %format, "opened report output");
    let out = BufWriter::new(file);
    Ok(match format {
        ReportFormat::Jsonl => Box::new(JsonLinesWriter::new(out)),
        ReportFormat::Text => Box::new(TextWriter::new(out)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabulator_types::{ErrorCategory, ReportSubject, Severity};

    fn sample() -> ErrorRecord {
        ErrorRecord::new(
            ReportSubject::folder("Items/item-1-2")
                .with_bank_key("1")
                .with_item_id("2")
                .with_item_type("mc"),
            ErrorCategory::Item,
            Severity::Severe,
            "Invalid item file.",
            "filename='item-1-2.xml'\tdetail='line\n3'",
        )
    }

    #[test]
    fn json_lines_round_trip() {
        let mut writer = JsonLinesWriter::new(Vec::new());
        writer.write_record(&sample()).unwrap();
        writer.write_record(&sample()).unwrap();
        let text = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: ErrorRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn text_writer_emits_header_once_and_flattens_fields() {
        let mut writer = TextWriter::new(Vec::new()).unwrap();
        writer.write_record(&sample()).unwrap();
        writer.write_record(&sample()).unwrap();
        let text = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], TEXT_HEADER);
        assert_eq!(lines[1].split('\t').count(), 8);
        assert!(lines[1].ends_with("filename='item-1-2.xml' detail='line 3'"));
    }

    #[test]
    fn empty_text_report_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clean_Errors.tsv");
        let mut writer = open_report_file(&path, ReportFormat::Text).unwrap();
        writer.flush().unwrap();
        drop(writer);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), format!("{TEXT_HEADER}\n"));
    }

    #[test]
    fn open_failure_is_a_report_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = open_report_file(&dir.path().join("missing/dir/report.jsonl"), ReportFormat::Jsonl);
        assert!(matches!(result, Err(Error::Report(ReportError::OpenFailed { .. }))));
    }
}
