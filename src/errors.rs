//! Unitrun error handling.
//!
//! Operator-facing failures of the runner: a missing `--test` flag, a full
//! registry, a malformed command line, or a report stream that can no longer
//! be written. Assertion failures inside a test case are deliberately absent:
//! they are contained by the runner's phase boundaries and only ever show up
//! as a failed [`CaseResult`](crate::registry::CaseResult).

use miette::Diagnostic;
use thiserror::Error;

/// Errors surfaced to whoever drives the runner.
#[derive(Debug, Error, Diagnostic)]
pub enum UnitTestError {
    /// `--test` was not present anywhere in the argument vector.
    #[error("the unit test runner was not activated")]
    #[diagnostic(
        code(unitrun::missing_test_flag),
        help("pass --test to run the registered test cases")
    )]
    MissingTestFlag,

    /// A registration was attempted on a registry that is already full.
    #[error("cannot register {suite}::{name}: the registry is full ({capacity} cases)")]
    #[diagnostic(
        code(unitrun::capacity_exceeded),
        help("raise the registry's capacity limit or register fewer cases")
    )]
    CapacityExceeded {
        suite: String,
        name: String,
        capacity: usize,
    },

    /// A recognised flag carried a value clap could not accept.
    #[error(transparent)]
    #[diagnostic(code(unitrun::usage))]
    Usage(#[from] clap::Error),

    /// The report stream rejected a write.
    #[error("failed to write the test report")]
    #[diagnostic(code(unitrun::io))]
    Io(#[from] std::io::Error),
}

impl UnitTestError {
    /// Stable diagnostic code, handy for matching in tests.
    pub fn code_str(&self) -> &'static str {
        match self {
            UnitTestError::MissingTestFlag => "unitrun::missing_test_flag",
            UnitTestError::CapacityExceeded { .. } => "unitrun::capacity_exceeded",
            UnitTestError::Usage(_) => "unitrun::usage",
            UnitTestError::Io(_) => "unitrun::io",
        }
    }
}
