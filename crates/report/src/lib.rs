#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Reporting sink for tabulation findings
//!
//! Every component files its findings through a [`Reporter`]. The concrete
//! [`ReportSink`] deduplicates records, prefixes folders in aggregate runs,
//! counts what it writes and hands records to a [`RecordWriter`]. Recording
//! a finding never fails for validation reasons; the only errors are output
//! failures, and those abort the run.

mod sink;
mod writer;

pub use sink::ReportSink;
pub use writer::{open_report_file, JsonLinesWriter, MemoryWriter, RecordWriter, TextWriter};

use tabulator_errors::Error;
use tabulator_types::{ErrorCategory, ErrorRecord, ReportSubject, Severity};

/// Destination for findings
pub trait Reporter {
    /// File one record
    ///
    /// # Errors
    ///
    /// Returns an error only if the output channel fails.
    fn record(&mut self, record: ErrorRecord) -> Result<(), Error>;

    /// Number of records written so far in this run
    fn error_count(&self) -> u64;

    /// Build and file a record for `subject`
    ///
    /// # Errors
    ///
    /// Returns an error only if the output channel fails.
    fn report(
        &mut self,
        subject: &ReportSubject,
        category: ErrorCategory,
        severity: Severity,
        message: &str,
        detail: &str,
    ) -> Result<(), Error> {
        self.record(ErrorRecord::new(
            subject.clone(),
            category,
            severity,
            message,
            detail,
        ))
    }
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn record(&mut self, record: ErrorRecord) -> Result<(), Error> {
        (**self).record(record)
    }

    fn error_count(&self) -> u64 {
        (**self).error_count()
    }
}
