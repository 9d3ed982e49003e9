//! The unitrun command-line entry points.
//!
//! A program registers its cases into a [`Registry`] and then hands its own
//! argument vector to [`main_with_registry`]. The flags are interpreted, the
//! registry filtered and run, and the outcome mapped to a process exit code.

use std::ffi::OsString;
use std::process::ExitCode;

use termcolor::WriteColor;

use crate::cli::args::{parse_invocation, Invocation};
use crate::cli::output::{ReportConfig, Reporter};
use crate::errors::UnitTestError;
use crate::registry::Registry;
use crate::runner::{RunSummary, Runner};

pub mod args;
pub mod output;

/// How an invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Usage text was printed; nothing ran.
    Help,
    /// The selected cases ran to completion.
    Completed(RunSummary),
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        match self {
            RunOutcome::Help => true,
            RunOutcome::Completed(summary) => summary.is_success(),
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

/// Interpret `args` (program name first), filter `registry`, and run it.
pub fn run_with_args<I, T, W>(
    registry: &mut Registry,
    args: I,
    reporter: &mut Reporter<W>,
) -> Result<RunOutcome, UnitTestError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    W: WriteColor,
{
    match parse_invocation(args)? {
        Invocation::Help(usage) => {
            reporter.usage(&usage)?;
            Ok(RunOutcome::Help)
        }
        Invocation::Run(selection) => {
            selection.apply(registry);
            let summary = Runner::new(reporter).run(registry)?;
            Ok(RunOutcome::Completed(summary))
        }
    }
}

/// Run `registry` against the process's own arguments and report to stdout.
pub fn main_with_registry(registry: &mut Registry) -> ExitCode {
    let mut reporter = Reporter::stdout(&ReportConfig::default());
    match run_with_args(registry, std::env::args_os(), &mut reporter) {
        Ok(outcome) => outcome.exit_code(),
        Err(UnitTestError::Usage(err)) => err.exit(),
        Err(err) => {
            eprintln!("{:?}", miette::Report::new(err));
            ExitCode::FAILURE
        }
    }
}
