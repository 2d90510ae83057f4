//! Run context shared by every package of a tabulation run

use std::path::Path;

use tabulator_config::{Config, ValidationOptions};
use tabulator_content::TermScanner;
use tabulator_errors::Error;
use tabulator_events::{EventEmitter, EventSender};
use tabulator_types::ReportFormat;
use tabulator_wordlist::{AttachmentPatterns, StemMatcher};

/// Everything a run needs that outlives a single package
pub struct TabulateCtx {
    /// Event sender for progress reporting
    pub tx: EventSender,
    /// Run configuration
    pub config: Config,
    pub(crate) patterns: AttachmentPatterns,
    pub(crate) scanner: TermScanner,
    pub(crate) matcher: StemMatcher,
}

impl TabulateCtx {
    // No public constructor - use TabulateCtxBuilder instead

    #[must_use]
    pub fn options(&self) -> &ValidationOptions {
        &self.config.validation
    }

    #[must_use]
    pub fn deduplicate(&self) -> bool {
        self.config.general.deduplicate
    }

    #[must_use]
    pub fn report_format(&self) -> ReportFormat {
        self.config.general.report_format
    }

    /// Directory for report files; `None` puts them next to the input
    #[must_use]
    pub fn output_dir(&self) -> Option<&Path> {
        self.config.general.output_dir.as_deref()
    }
}

impl std::fmt::Debug for TabulateCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabulateCtx")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl EventEmitter for TabulateCtx {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(&self.tx)
    }
}

/// Builder for [`TabulateCtx`]
#[derive(Default)]
pub struct TabulateCtxBuilder {
    tx: Option<EventSender>,
    config: Option<Config>,
}

impl TabulateCtxBuilder {
    /// Create new context builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set event sender
    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Set configuration; defaults apply when unset
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the context and compile the shared matchers
    ///
    /// # Errors
    ///
    /// Returns an error if the event sender is missing or a built-in
    /// pattern fails to compile.
    pub fn build(self) -> Result<TabulateCtx, Error> {
        let tx = self
            .tx
            .ok_or_else(|| Error::internal("missing component: event_sender"))?;

        Ok(TabulateCtx {
            tx,
            config: self.config.unwrap_or_default(),
            patterns: AttachmentPatterns::new()?,
            scanner: TermScanner::new()?,
            matcher: StemMatcher::english(),
        })
    }
}
