//! tabulate - audit content packages and tabulate their defects
//!
//! Parses arguments, assembles configuration, runs the tabulation through
//! the ops crate and forwards its events to tracing.

mod cli;
mod display;
mod error;
mod logging;

use crate::cli::Cli;
use crate::display::OutputRenderer;
use crate::error::CliError;
use clap::Parser;
use std::process;
use tabulator_config::{Config, ValidationOptions};
use tabulator_ops::{RunReport, TabulateCtxBuilder};
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();
    let json_mode = cli.json;

    init_tracing(json_mode, cli.debug);

    match run(cli) {
        Ok(()) => {}
        Err(e) => {
            error!("Application error: {}", e);
            eprintln!("Error: {e}");
            process::exit(e.exit_code());
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    info!("Starting tabulate v{}", env!("CARGO_PKG_VERSION"));

    // defaults < file < environment < flags
    let mut config = Config::load_or_default(cli.config.as_deref())?;
    config.merge_env()?;
    apply_cli_config(&mut config, &cli)?;

    if cli.list_options {
        list_options(&config.validation);
        return Ok(());
    }
    let Some(path) = cli.path.as_deref() else {
        return Err(CliError::Usage("PATH is required".to_string()));
    };

    let report = run_with_event_logging(config, cli.mode.into(), path)?;
    OutputRenderer::new(cli.json).render_result(&report)?;

    info!("Command completed successfully");
    Ok(())
}

/// Run the tabulation while a logging thread drains the event channel.
/// The thread ends once the context, and with it the last sender, is dropped.
fn run_with_event_logging(
    config: Config,
    mode: tabulator_ops::RunMode,
    path: &std::path::Path,
) -> Result<RunReport, CliError> {
    let (event_sender, event_receiver) = tabulator_events::channel();
    let logger = std::thread::spawn(move || {
        for message in event_receiver {
            logging::log_event_with_tracing(&message);
        }
    });

    let ctx = TabulateCtxBuilder::new()
        .with_event_sender(event_sender)
        .with_config(config)
        .build()?;
    let result = tabulator_ops::run(&ctx, mode, path);
    drop(ctx);

    if logger.join().is_err() {
        eprintln!("Warning: event logging thread panicked");
    }
    Ok(result?)
}

/// Apply CLI configuration overrides (highest precedence)
fn apply_cli_config(config: &mut Config, cli: &Cli) -> Result<(), CliError> {
    for directives in &cli.validate {
        config.validation.apply_directives(directives)?;
    }
    if cli.no_dedupe {
        config.general.deduplicate = false;
    }
    if let Some(format) = cli.format {
        config.general.report_format = format;
    }
    if let Some(dir) = &cli.output_dir {
        if !dir.is_dir() {
            return Err(CliError::Usage(format!(
                "output directory does not exist: {}",
                dir.display()
            )));
        }
        config.general.output_dir = Some(dir.clone());
    }
    Ok(())
}

fn list_options(options: &ValidationOptions) {
    for (key, enabled) in options.iter() {
        let sign = if enabled { '+' } else { '-' };
        let description = ValidationOptions::describe(key).unwrap_or("");
        println!("{sign}{key:<6} {description}");
    }
}

/// Initialize tracing/logging
fn init_tracing(json_mode: bool, debug_enabled_flag: bool) {
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_enabled_flag;

    if debug_enabled {
        // Debug mode: structured JSON logs to file
        let log_dir = dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("tabulator")
            .join("logs");
        if let Err(e) = std::fs::create_dir_all(&log_dir) {
            eprintln!("Warning: Failed to create log directory: {e}");
        }

        let log_file = log_dir.join(format!(
            "tabulate-{}.log",
            chrono::Utc::now().format("%Y%m%d-%H%M%S")
        ));

        match std::fs::File::create(&log_file) {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(file)
                    .with_env_filter(
                        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(
                            |_| {
                                tracing_subscriber::EnvFilter::new(
                                    "info,tabulate=debug,tabulator_ops=debug",
                                )
                            },
                        ),
                    )
                    .init();

                if !json_mode {
                    eprintln!("Debug logging enabled: {}", log_file.display());
                }
            }
            Err(e) => {
                eprintln!("Warning: Failed to create log file: {e}");
                tracing_subscriber::fmt()
                    .with_writer(std::io::stderr)
                    .with_env_filter(
                        tracing_subscriber::EnvFilter::try_from_default_env()
                            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
                    )
                    .init();
            }
        }
    } else if json_mode {
        // keep stdout clean for the JSON result
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter("off")
            .init();
    } else {
        // Normal mode: minimal logging to stderr
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new("warn,tabulate=warn,tabulator_ops=warn")
                }),
            )
            .init();
    }
}
