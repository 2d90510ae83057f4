//! Command line interface definition

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tabulator_ops::RunMode;
use tabulator_types::ReportFormat;

/// tabulate - audit content packages and tabulate their defects
#[derive(Parser)]
#[command(name = "tabulate")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Audit content packages and tabulate their defects")]
#[command(long_about = None)]
pub struct Cli {
    /// Package (zip or directory), or a folder of packages with --mode each|aggregate
    #[arg(value_name = "PATH", required_unless_present = "list_options")]
    pub path: Option<PathBuf>,

    /// How PATH is interpreted
    #[arg(short, long, value_enum, default_value_t = ModeArg::One)]
    pub mode: ModeArg,

    /// Validation option directives, e.g. `+uwt,-pmd` or `+all`
    #[arg(short = 'v', long = "validate", value_name = "DIRECTIVES")]
    pub validate: Vec<String>,

    /// Report every occurrence instead of one record per distinct finding
    #[arg(long)]
    pub no_dedupe: bool,

    /// Error report format
    #[arg(long, value_enum)]
    pub format: Option<ReportFormat>,

    /// Write report files here instead of next to the input
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Print the run result as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging to a log file
    #[arg(long)]
    pub debug: bool,

    /// Use alternate config file
    #[arg(long, value_name = "PATH", env = "TABULATOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// List validation options with their effective values and exit
    #[arg(long)]
    pub list_options: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    One,
    Each,
    Aggregate,
}

impl From<ModeArg> for RunMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::One => RunMode::One,
            ModeArg::Each => RunMode::Each,
            ModeArg::Aggregate => RunMode::Aggregate,
        }
    }
}
