//! # unitrun
//!
//! A tiny unit-test runner for programs that register their own test cases.
//!
//! Cases are registered explicitly into a [`Registry`], selected with
//! command-line flags (`--test`, `--all`, `--enable-suite`, `--disable-case`,
//! ...), and executed one at a time through setup, test and teardown phases.
//! Assertions abort only the phase they fail in; the run always finishes with
//! a summary and an exit status that is successful iff no case failed.
//!
//! ```no_run
//! use std::process::ExitCode;
//! use unitrun::{assert_equal, register_case, Registry};
//!
//! fn test_addition() {
//!     assert_equal!(4, 2 + 2);
//! }
//!
//! fn main() -> ExitCode {
//!     let mut registry = Registry::new();
//!     register_case!(registry, MathSuite, test_addition).expect("registry has room");
//!     unitrun::main_with_registry(&mut registry)
//! }
//! ```

pub mod assertion;
pub mod cli;
pub mod errors;
pub mod filter;
pub mod registry;
pub mod runner;

pub use crate::assertion::{AssertionFailure, Phase, PhaseFailure};
pub use crate::cli::output::{ReportConfig, Reporter};
pub use crate::cli::{main_with_registry, run_with_args, RunOutcome};
pub use crate::errors::UnitTestError;
pub use crate::filter::{CaseRef, Selection};
pub use crate::registry::{CaseResult, Registry, TestCase, TestFn, DEFAULT_CAPACITY};
pub use crate::runner::{RunSummary, Runner};
