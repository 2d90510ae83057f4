//! Run drivers: one package, each package separately, or every package
//! into one aggregate report

use std::path::{Path, PathBuf};

use tabulator_errors::{Error, PackageError};
use tabulator_events::{EventEmitter, FailureContext, TabulationEvent};
use tabulator_report::{open_report_file, RecordWriter, ReportSink, Reporter};
use tabulator_tree::{discover_packages, open_package, package_name};
use tabulator_types::{ErrorCategory, ReportSubject, Severity, TabulationSummary};

use crate::context::TabulateCtx;
use crate::output::{errors_report_path, report_prefix, summary_report_path, write_summary};
use crate::run::tabulate_package;
use crate::types::{PackageOutcome, RunMode, RunReport};

/// Tabulate the package at `path` into `sink`.
///
/// # Errors
///
/// Any failure is fatal here: the package cannot be opened or is not a
/// package, its tree cannot be listed, or the sink fails.
pub fn tabulate_one<W: RecordWriter>(
    ctx: &TabulateCtx,
    path: &Path,
    sink: &mut ReportSink<W>,
) -> Result<RunReport, Error> {
    run_started(ctx, RunMode::One, path);
    let tree = open_package(path)?;
    sink.begin_package(tree.name());
    let summary = tabulate_package(ctx, tree.as_ref(), sink)?;

    let mut report = RunReport::new(RunMode::One);
    report.push(PackageOutcome {
        package: tree.name().to_string(),
        path: path.to_path_buf(),
        summary,
        skipped: false,
    });
    run_completed(ctx, &report);
    Ok(report)
}

/// Tabulate every package under `folder`, each into its own sink from
/// `open_sink`. A package that cannot be opened or listed is recorded in
/// its sink and skipped.
///
/// # Errors
///
/// Returns an error if `folder` cannot be listed, holds no packages, or a
/// sink fails.
pub fn tabulate_each<W, F>(ctx: &TabulateCtx, folder: &Path, mut open_sink: F) -> Result<RunReport, Error>
where
    W: RecordWriter,
    F: FnMut(&Path) -> Result<ReportSink<W>, Error>,
{
    run_started(ctx, RunMode::Each, folder);
    let mut report = RunReport::new(RunMode::Each);
    for path in packages_under(folder)? {
        let mut sink = open_sink(&path)?;
        let outcome = tabulate_contained(ctx, &path, &mut sink)?;
        sink.finish()?;
        report.push(outcome);
    }
    run_completed(ctx, &report);
    Ok(report)
}

/// Tabulate every package under `folder` into one sink. The sink should be
/// in aggregate scope so deduplication spans the run and folders carry the
/// package name.
///
/// # Errors
///
/// Returns an error if `folder` cannot be listed, holds no packages, or the
/// sink fails.
pub fn tabulate_aggregate<W: RecordWriter>(
    ctx: &TabulateCtx,
    folder: &Path,
    sink: &mut ReportSink<W>,
) -> Result<RunReport, Error> {
    run_started(ctx, RunMode::Aggregate, folder);
    let mut report = RunReport::new(RunMode::Aggregate);
    for path in packages_under(folder)? {
        report.push(tabulate_contained(ctx, &path, sink)?);
    }
    run_completed(ctx, &report);
    Ok(report)
}

/// Run `mode` over `path` with file-backed reports named after the input:
/// `<prefix>_Errors.<ext>` and `<prefix>_Summary.json`.
///
/// # Errors
///
/// Returns an error if the input is missing, a report file cannot be
/// written, or a fatal package error occurs in `One` mode.
pub fn run(ctx: &TabulateCtx, mode: RunMode, path: &Path) -> Result<RunReport, Error> {
    if !path.exists() {
        return Err(PackageError::NotFound {
            path: path.display().to_string(),
        }
        .into());
    }
    let format = ctx.report_format();

    match mode {
        RunMode::One => {
            let prefix = report_prefix(ctx, path, false);
            let errors_path = errors_report_path(&prefix, format);
            let mut sink = ReportSink::new(open_report_file(&errors_path, format)?)
                .with_deduplication(ctx.deduplicate());
            let mut report = tabulate_one(ctx, path, &mut sink)?;
            sink.finish()?;
            write_summary(&summary_report_path(&prefix), &report.summary)?;
            report.report_files.push(errors_path);
            Ok(report)
        }
        RunMode::Each => {
            let mut files: Vec<PathBuf> = Vec::new();
            let mut report = tabulate_each(ctx, path, |package| {
                let errors_path = errors_report_path(&report_prefix(ctx, package, false), format);
                if files.contains(&errors_path) {
                    ctx.emit_warning(
                        "two packages share a report name; the later one overwrites the earlier",
                        errors_path.display().to_string(),
                    );
                }
                let writer = open_report_file(&errors_path, format)?;
                files.push(errors_path);
                Ok(ReportSink::new(writer).with_deduplication(ctx.deduplicate()))
            })?;
            for outcome in &report.packages {
                let prefix = report_prefix(ctx, &outcome.path, false);
                write_summary(&summary_report_path(&prefix), &outcome.summary)?;
            }
            report.report_files = files;
            Ok(report)
        }
        RunMode::Aggregate => {
            let prefix = report_prefix(ctx, path, true);
            let errors_path = errors_report_path(&prefix, format);
            let mut sink = ReportSink::new(open_report_file(&errors_path, format)?)
                .with_deduplication(ctx.deduplicate())
                .aggregate();
            let mut report = tabulate_aggregate(ctx, path, &mut sink)?;
            sink.finish()?;
            write_summary(&summary_report_path(&prefix), &report.summary)?;
            report.report_files.push(errors_path);
            Ok(report)
        }
    }
}

fn packages_under(folder: &Path) -> Result<Vec<PathBuf>, Error> {
    let packages = discover_packages(folder)?;
    if packages.is_empty() {
        return Err(PackageError::NoPackages {
            path: folder.display().to_string(),
        }
        .into());
    }
    Ok(packages)
}

/// Tabulate one package of a multi-package run. Anything but a sink
/// failure skips the package with a System record.
fn tabulate_contained<W: RecordWriter>(
    ctx: &TabulateCtx,
    path: &Path,
    sink: &mut ReportSink<W>,
) -> Result<PackageOutcome, Error> {
    let package = package_name(path);
    sink.begin_package(&package);
    let errors_before = sink.error_count();

    let result = match open_package(path) {
        Ok(tree) => tabulate_package(ctx, tree.as_ref(), sink),
        Err(err) => Err(err),
    };
    let (summary, skipped) = match result {
        Ok(summary) => (summary, false),
        Err(err @ Error::Report(_)) => return Err(err),
        Err(err) => {
            tracing::debug!(package = %package, error = %err, "package skipped");
            ctx.emit_tabulation(TabulationEvent::PackageSkipped {
                package: package.clone(),
                failure: FailureContext::from_error(&err),
            });
            sink.report(
                &ReportSubject::folder(""),
                ErrorCategory::System,
                Severity::Severe,
                "Package could not be tabulated.",
                &format!("package='{package}' error='{err}'"),
            )?;
            let mut summary = TabulationSummary::new();
            summary.error_count = sink.error_count().saturating_sub(errors_before);
            (summary, true)
        }
    };

    Ok(PackageOutcome {
        package,
        path: path.to_path_buf(),
        summary,
        skipped,
    })
}

fn run_started(ctx: &TabulateCtx, mode: RunMode, path: &Path) {
    ctx.emit_tabulation(TabulationEvent::RunStarted {
        mode: mode.as_str().to_string(),
        path: path.display().to_string(),
    });
}

fn run_completed(ctx: &TabulateCtx, report: &RunReport) {
    ctx.emit_tabulation(TabulationEvent::RunCompleted {
        packages: report.packages.len(),
        errors: report.summary.error_count,
    });
}
