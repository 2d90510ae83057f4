//! Report file naming and the summary file

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tabulator_errors::{Error, ReportError};
use tabulator_tree::package_name;
use tabulator_types::{ReportFormat, TabulationSummary};

use crate::context::TabulateCtx;

/// Common prefix for a package's report files: `<dir>/<package name>`,
/// where `<dir>` is the configured output directory or the directory
/// holding the package. Aggregate runs use `<folder>/Aggregate`.
#[must_use]
pub fn report_prefix(ctx: &TabulateCtx, input: &Path, aggregate: bool) -> PathBuf {
    if aggregate {
        return ctx.output_dir().unwrap_or(input).join("Aggregate");
    }
    let dir = ctx
        .output_dir()
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    dir.join(package_name(input))
}

#[must_use]
pub fn errors_report_path(prefix: &Path, format: ReportFormat) -> PathBuf {
    with_suffix(prefix, &format!("_Errors.{}", format.extension()))
}

#[must_use]
pub fn summary_report_path(prefix: &Path) -> PathBuf {
    with_suffix(prefix, "_Summary.json")
}

fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut path = prefix.as_os_str().to_os_string();
    path.push(suffix);
    PathBuf::from(path)
}

/// Write `summary` as pretty JSON
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_summary(path: &Path, summary: &TabulationSummary) -> Result<(), Error> {
    let file = File::create(path).map_err(|e| ReportError::OpenFailed {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, summary).map_err(|e| ReportError::WriteFailed {
        message: e.to_string(),
    })?;
    out.write_all(b"\n").map_err(ReportError::from)?;
    out.flush().map_err(ReportError::from)?;
    tracing::debug!(path = %path.display(), "wrote summary");
    Ok(())
}
