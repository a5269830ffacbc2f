mod cli;
mod config;
mod confirm;
mod engine;
mod error;
mod manifest;
mod progress;
mod signal;
mod ui;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use config::RunConfig;
use confirm::{AutoConfirm, ConfirmCallback, TypedConfirm};
use engine::{RunStatus, Tools};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    signal::install();

    match run(&cli) {
        Ok(status) => {
            log::debug!("run finished: {status:?}");
            ExitCode::SUCCESS
        }
        Err(err) => report(&err),
    }
}

fn run(cli: &Cli) -> Result<RunStatus> {
    let config = RunConfig::from_cli(cli)?;
    log::info!(
        "workspace {}, {} plan jobs, plans in {}",
        config.workspace_root.display(),
        config.jobs,
        config.plan_dir.display()
    );

    let tools = Tools::from_config(&config);
    let mut confirm: Box<dyn ConfirmCallback> = if config.assume_yes {
        Box::new(AutoConfirm)
    } else {
        Box::new(TypedConfirm)
    };

    Ok(engine::run(&config, &tools, confirm.as_mut())?)
}

/// Print a fatal error with the failing tool's output and pick the exit code.
fn report(err: &anyhow::Error) -> ExitCode {
    ui::error(&format!("{err:#}"));

    match err.downcast_ref::<error::Error>() {
        Some(run_err) => {
            if let Some(diagnostic) = run_err.diagnostic() {
                eprintln!("{}", diagnostic.trim_end());
            }
            ExitCode::from(run_err.exit_code())
        }
        None => ExitCode::FAILURE,
    }
}
