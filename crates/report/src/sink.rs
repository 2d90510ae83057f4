//! Deduplicating sink

use std::collections::HashSet;

use tabulator_errors::Error;
use tabulator_types::ErrorRecord;
use xxhash_rust::xxh3::xxh3_128;

use crate::{RecordWriter, Reporter};

/// How long a deduplication hash is remembered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DedupeScope {
    /// Cleared at the start of every package
    Package,
    /// Kept for the whole run; used by aggregate runs
    Run,
}

/// The reporting sink.
///
/// With deduplication on, a record whose (item type, bank key, item id,
/// message) was already written within the current scope is dropped.
#[derive(Debug)]
pub struct ReportSink<W: RecordWriter> {
    writer: W,
    deduplicate: bool,
    scope: DedupeScope,
    seen: HashSet<u128>,
    package_prefix: Option<String>,
    error_count: u64,
    package_error_count: u64,
}

impl<W: RecordWriter> ReportSink<W> {
    /// Deduplicating, package scoped sink
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            deduplicate: true,
            scope: DedupeScope::Package,
            seen: HashSet::new(),
            package_prefix: None,
            error_count: 0,
            package_error_count: 0,
        }
    }

    #[must_use]
    pub fn with_deduplication(mut self, deduplicate: bool) -> Self {
        self.deduplicate = deduplicate;
        self
    }

    /// Aggregate mode: dedupe spans the run and folders carry the package name
    #[must_use]
    pub fn aggregate(mut self) -> Self {
        self.scope = DedupeScope::Run;
        self
    }

    /// Start reporting for a new package
    pub fn begin_package(&mut self, package: &str) {
        if self.scope == DedupeScope::Package {
            self.seen.clear();
        } else {
            self.package_prefix = Some(package.to_string());
        }
        self.package_error_count = 0;
        tracing::trace!(package, scope = ?self.scope, "report scope started");
    }

    /// Records written since the last `begin_package`
    #[must_use]
    pub fn package_error_count(&self) -> u64 {
        self.package_error_count
    }

    #[must_use]
    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Flush the writer and give it back
    ///
    /// # Errors
    ///
    /// Returns an error if the final flush fails.
    pub fn finish(mut self) -> Result<W, Error> {
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn is_repeat(&mut self, record: &ErrorRecord) -> bool {
        if !self.deduplicate {
            return false;
        }
        let mut key = String::with_capacity(
            record.item_type.len() + record.bank_key.len() + record.item_id.len() + record.message.len() + 3,
        );
        for field in [&record.item_type, &record.bank_key, &record.item_id, &record.message] {
            key.push_str(field);
            key.push('\u{1f}');
        }
        !self.seen.insert(xxh3_128(key.as_bytes()))
    }
}

impl<W: RecordWriter> Reporter for ReportSink<W> {
    fn record(&mut self, mut record: ErrorRecord) -> Result<(), Error> {
        if self.is_repeat(&record) {
            return Ok(());
        }
        if let Some(prefix) = &self.package_prefix {
            record.folder = if record.folder.is_empty() {
                prefix.clone()
            } else {
                format!("{prefix}/{}", record.folder)
            };
        }
        self.writer.write_record(&record)?;
        self.error_count += 1;
        self.package_error_count += 1;
        Ok(())
    }

    fn error_count(&self) -> u64 {
        self.error_count
    }
}
