//! Entry point for the `porytools` binary.

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

mod cli;

use cli::Cli;
use porytools::Error;

/// Application exit codes
#[repr(u8)]
pub enum Exit {
    Success = 0,
    GeneralError = 1,
    ConfigError = 2,
    IoError = 3,
    ValidationError = 5,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        ExitCode::from(exit as u8)
    }
}

impl From<&Error> for Exit {
    fn from(err: &Error) -> Self {
        match err {
            Error::Config { .. } => Exit::ConfigError,
            Error::Io { .. } | Error::Build { .. } => Exit::IoError,
            Error::Json { .. } | Error::InvalidInput { .. } => Exit::ValidationError,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(exit) => exit.into(),
        Err(e) => {
            error!("{e}");
            Exit::from(&e).into()
        }
    }
}

fn run(cli: &Cli) -> porytools::Result<Exit> {
    let project = cli.load_project()?;
    let report = cli.execute(&project)?;

    if let Some(path) = cli.report_path(&project) {
        report.write(&path)?;
    }

    Ok(if report.has_failures() {
        Exit::GeneralError
    } else {
        Exit::Success
    })
}

fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = match cli.verbose {
        0 if cli.quiet => EnvFilter::new("error"),
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(cli.verbose >= 2).with_writer(std::io::stderr))
        .init();
}
