#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Tabulation orchestration
//!
//! This crate sits between the CLI and the component crates. A package is
//! tabulated in two passes over a fresh [`PackageRun`](run) context:
//! indexing registers every item and stimulus identity, validation
//! dispatches each identity to its validator. Faults are contained per
//! identity; only the report channel and the package itself can end a run.

mod context;
mod driver;
mod index;
mod output;
mod run;
mod types;
mod validate;
mod vocabulary;

pub use context::{TabulateCtx, TabulateCtxBuilder};
pub use driver::{run, tabulate_aggregate, tabulate_each, tabulate_one};
pub use output::{errors_report_path, report_prefix, summary_report_path, write_summary};
pub use run::tabulate_package;
pub use types::{PackageOutcome, RunMode, RunReport};
