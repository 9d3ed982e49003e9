//! Defines the command-line flags understood by the runner.
//!
//! This module uses the `clap` crate with its "derive" feature. Clap's own
//! help flag is disabled: `--test` must be checked before `--help` is
//! honoured, so `-h/--help` is an ordinary boolean flag here.
//!
//! The runner usually receives the host program's whole argument vector, so
//! tokens it does not know are skipped before clap sees them. See
//! [`runner_args`].

use std::ffi::OsString;

use clap::{ArgAction, CommandFactory, Parser};

use crate::errors::UnitTestError;
use crate::filter::{CaseRef, Selection};

/// The runner's argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "unitrun",
    about = "Run the registered unit test cases.",
    disable_help_flag = true,
    args_override_self = true
)]
pub struct UnitTestArgs {
    /// Activate the unit test runner.
    #[arg(long)]
    pub test: bool,

    /// Print this help message.
    #[arg(short = 'h', long)]
    pub help: bool,

    /// Enable all unit test suites and test cases.
    #[arg(short = 'a', long)]
    pub all: bool,

    /// Enable the named unit test suite.
    #[arg(
        long = "enable-suite",
        value_name = "SUITE",
        allow_hyphen_values = true,
        action = ArgAction::Append
    )]
    pub enable_suite: Vec<String>,

    /// Disable the named unit test suite.
    #[arg(
        long = "disable-suite",
        value_name = "SUITE",
        allow_hyphen_values = true,
        action = ArgAction::Append
    )]
    pub disable_suite: Vec<String>,

    /// Enable the named unit test case.
    #[arg(
        long = "enable-case",
        num_args = 2,
        value_names = ["SUITE", "NAME"],
        allow_hyphen_values = true,
        action = ArgAction::Append
    )]
    pub enable_case: Vec<String>,

    /// Disable the named unit test case.
    #[arg(
        long = "disable-case",
        num_args = 2,
        value_names = ["SUITE", "NAME"],
        allow_hyphen_values = true,
        action = ArgAction::Append
    )]
    pub disable_case: Vec<String>,
}

/// What the runner should do for a given command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Print the usage text and stop.
    Help(String),
    /// Filter the registry with the selection and run it.
    Run(Selection),
}

impl UnitTestArgs {
    /// Usage text shown for `--help`.
    pub fn usage() -> String {
        Self::command().render_help().to_string()
    }

    pub fn into_invocation(self) -> Result<Invocation, UnitTestError> {
        if !self.test {
            return Err(UnitTestError::MissingTestFlag);
        }
        if self.help {
            return Ok(Invocation::Help(Self::usage()));
        }
        Ok(Invocation::Run(Selection {
            all: self.all,
            enable_suites: self.enable_suite,
            enable_cases: case_refs(&self.enable_case),
            disable_suites: self.disable_suite,
            disable_cases: case_refs(&self.disable_case),
        }))
    }
}

/// Parse a full argument vector, program name first.
pub fn parse_invocation<I, T>(args: I) -> Result<Invocation, UnitTestError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = args.into_iter().map(Into::into).collect();
    UnitTestArgs::try_parse_from(runner_args(args))?.into_invocation()
}

/// Pick the runner's own flags out of a host program's argument vector.
///
/// Every position is examined on its own, so a token is still recognised as
/// a flag where it also serves as another flag's value. Everything else is
/// dropped, including a value flag cut short by the end of the vector.
fn runner_args(args: Vec<OsString>) -> Vec<OsString> {
    let mut tokens = args.into_iter();
    let mut picked: Vec<OsString> = tokens.next().into_iter().collect();
    let tokens: Vec<OsString> = tokens.collect();

    for (n, token) in tokens.iter().enumerate() {
        let arity = match token.to_str() {
            Some("--test" | "--help" | "-h" | "--all" | "-a") => 0,
            Some("--enable-suite" | "--disable-suite") => 1,
            Some("--enable-case" | "--disable-case") => 2,
            _ => continue,
        };
        if let Some(values) = tokens.get(n + 1..n + 1 + arity) {
            picked.push(token.clone());
            picked.extend(values.iter().cloned());
        }
    }
    picked
}

// Every occurrence contributes exactly two values, so pairing them is lossless.
fn case_refs(values: &[String]) -> Vec<CaseRef> {
    values
        .chunks_exact(2)
        .map(|pair| CaseRef::new(pair[0].as_str(), pair[1].as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Invocation, UnitTestError> {
        parse_invocation(std::iter::once("unitrun").chain(args.iter().copied()))
    }

    #[test]
    fn missing_test_flag_wins_over_help() {
        assert!(matches!(parse(&[]), Err(UnitTestError::MissingTestFlag)));
        assert!(matches!(
            parse(&["--help"]),
            Err(UnitTestError::MissingTestFlag)
        ));
        assert!(matches!(
            parse(&["--all", "-h"]),
            Err(UnitTestError::MissingTestFlag)
        ));
    }

    #[test]
    fn help_is_honoured_once_test_is_present() {
        for flag in ["--help", "-h"] {
            let Ok(Invocation::Help(usage)) = parse(&[flag, "--test"]) else {
                panic!("expected help for {flag}");
            };
            assert!(usage.contains("--enable-suite"));
            assert!(usage.contains("--disable-case"));
        }
    }

    #[test]
    fn test_alone_selects_nothing() {
        assert_eq!(
            parse(&["--test"]).unwrap(),
            Invocation::Run(Selection::default())
        );
    }

    #[test]
    fn flags_are_grouped_by_kind_regardless_of_order() {
        let invocation = parse(&[
            "--disable-case",
            "S",
            "b",
            "--test",
            "--enable-suite",
            "S",
            "-a",
            "--enable-case",
            "T",
            "x",
            "--disable-suite",
            "U",
            "--enable-case",
            "T",
            "y",
        ])
        .unwrap();

        assert_eq!(
            invocation,
            Invocation::Run(Selection {
                all: true,
                enable_suites: vec!["S".to_string()],
                enable_cases: vec![CaseRef::new("T", "x"), CaseRef::new("T", "y")],
                disable_suites: vec!["U".to_string()],
                disable_cases: vec![CaseRef::new("S", "b")],
            })
        );
    }

    #[test]
    fn repeated_boolean_flags_are_accepted() {
        let invocation = parse(&["--test", "--all", "--test", "-a"]).unwrap();
        assert_eq!(invocation, Invocation::Run(Selection::everything()));
    }

    #[test]
    fn host_arguments_do_not_block_help() {
        let invocation = parse(&["--test", "--help", "--verbose"]).unwrap();
        assert!(matches!(invocation, Invocation::Help(_)));
    }

    #[test]
    fn host_arguments_are_ignored() {
        let invocation =
            parse(&["--verbose", "--test", "-j", "4", "--all", "input.txt"]).unwrap();
        assert_eq!(invocation, Invocation::Run(Selection::everything()));
    }

    #[test]
    fn dangling_value_flags_are_ignored() {
        let invocation = parse(&["--test", "--all", "--enable-suite"]).unwrap();
        assert_eq!(invocation, Invocation::Run(Selection::everything()));

        let invocation = parse(&["--test", "--disable-case", "OnlySuite"]).unwrap();
        assert_eq!(invocation, Invocation::Run(Selection::default()));

        let invocation = parse(&["--test", "-h", "--enable-case", "S"]).unwrap();
        assert!(matches!(invocation, Invocation::Help(_)));
    }

    #[test]
    fn values_may_start_with_a_hyphen() {
        let invocation = parse(&[
            "--test",
            "--enable-suite",
            "-x",
            "--disable-case",
            "-s",
            "-n",
        ])
        .unwrap();
        assert_eq!(
            invocation,
            Invocation::Run(Selection {
                enable_suites: vec!["-x".to_string()],
                disable_cases: vec![CaseRef::new("-s", "-n")],
                ..Selection::default()
            })
        );
    }

    #[test]
    fn a_value_that_is_also_a_flag_counts_as_both() {
        let invocation = parse(&["--enable-suite", "--test"]).unwrap();
        assert_eq!(
            invocation,
            Invocation::Run(Selection {
                enable_suites: vec!["--test".to_string()],
                ..Selection::default()
            })
        );
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_value_is_a_usage_error() {
        use std::os::unix::ffi::OsStringExt;

        let args = [
            OsString::from("unitrun"),
            OsString::from("--test"),
            OsString::from("--enable-suite"),
            OsString::from_vec(vec![0xff, 0xfe]),
        ];
        let err = parse_invocation(args).unwrap_err();
        assert_eq!(err.code_str(), "unitrun::usage");
    }
}
