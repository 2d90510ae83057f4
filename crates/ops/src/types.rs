//! Results handed back to the CLI

use std::path::PathBuf;

use serde::Serialize;
use tabulator_types::TabulationSummary;

/// How the input path is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// The path is one package
    One,
    /// Every package under the path, one report each
    Each,
    /// Every package under the path into a single report
    Aggregate,
}

impl RunMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::One => "one",
            Self::Each => "each",
            Self::Aggregate => "aggregate",
        }
    }
}

/// Result of tabulating one package
#[derive(Debug, Clone, Serialize)]
pub struct PackageOutcome {
    pub package: String,
    pub path: PathBuf,
    pub summary: TabulationSummary,
    /// The package could not be opened or was abandoned part way
    pub skipped: bool,
}

/// Result of a whole run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub mode: RunMode,
    pub packages: Vec<PackageOutcome>,
    /// Per-package summaries merged
    pub summary: TabulationSummary,
    /// Error report files written, in creation order
    pub report_files: Vec<PathBuf>,
}

impl RunReport {
    #[must_use]
    pub fn new(mode: RunMode) -> Self {
        Self {
            mode,
            packages: Vec::new(),
            summary: TabulationSummary::new(),
            report_files: Vec::new(),
        }
    }

    /// Add a package result and fold its summary into the run total
    pub fn push(&mut self, outcome: PackageOutcome) {
        self.summary.merge(&outcome.summary);
        self.packages.push(outcome);
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.packages.iter().filter(|p| p.skipped).count()
    }
}
