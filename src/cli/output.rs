//! Handles all user-facing output of a test run.
//!
//! The reporter only formats state that the runner has already produced: case
//! headers, assertion diagnostics, per-case timing and outcome, and the final
//! summary. Colour is applied to the PASS/FAIL words when the sink supports
//! it; everything else is plain line-oriented text.

use std::io::{self, Write};
use std::time::Duration;

use termcolor::{Buffer, Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::assertion::{Phase, PhaseFailure};
use crate::registry::CaseResult;
use crate::runner::RunSummary;

// ============================================================================
// REPORT LAYOUT: banners and configuration
// ============================================================================

const CASE_BANNER: &str = "----------------------------- TEST CASE -----------------------------";
const END_CASE_BANNER: &str = "--------------------------- END TEST CASE ---------------------------";
const SUMMARY_BANNER: &str = "-------------------------- RESULTS SUMMARY --------------------------";
const PASSED_BANNER: &str = "------------------------------ PASSED -------------------------------";
const FAILED_BANNER: &str = "------------------------------ FAILED -------------------------------";

/// Configuration for report output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportConfig {
    pub use_colors: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            use_colors: atty::is(atty::Stream::Stdout),
        }
    }
}

// ============================================================================
// OUTPUT SINKS: stdout and in-memory reporters
// ============================================================================

/// Writes the human-readable report to any colour-capable sink.
pub struct Reporter<W: WriteColor> {
    out: W,
}

impl Reporter<StandardStream> {
    /// A reporter on stdout.
    pub fn stdout(config: &ReportConfig) -> Self {
        let choice = if config.use_colors {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self::new(StandardStream::stdout(choice))
    }
}

impl Reporter<Buffer> {
    /// A colourless in-memory reporter, for capturing output.
    pub fn buffered() -> Self {
        Self::new(Buffer::no_color())
    }

    /// Everything written so far.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(self.out.as_slice()).into_owned()
    }
}

// ============================================================================
// CORE OUTPUT FUNCTIONS: case blocks, diagnostics and the summary
// ============================================================================

impl<W: WriteColor> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn usage(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", text.trim_end())?;
        self.out.flush()
    }

    pub fn case_header(&mut self, suite: &str, name: &str) -> io::Result<()> {
        writeln!(self.out, "{}", CASE_BANNER)?;
        writeln!(self.out, "Suite: {}", suite)?;
        writeln!(self.out, "Name: {}", name)?;
        self.out.flush()
    }

    /// Diagnostic for a phase that did not complete.
    pub fn phase_failure(&mut self, phase: Phase, failure: &PhaseFailure) -> io::Result<()> {
        match failure {
            PhaseFailure::Assertion(assertion) => {
                self.colored(Color::Red, "Failed Assertion:")?;
                writeln!(self.out)?;
                writeln!(self.out, "    Phase: {}", phase)?;
                writeln!(self.out, "    File: {}", assertion.file)?;
                writeln!(self.out, "    Line: {}", assertion.line)?;
                if let Some(message) = &assertion.message {
                    writeln!(self.out, "    Message: {}", message)?;
                }
            }
            PhaseFailure::Panic(message) => {
                self.colored(Color::Red, "Unexpected Panic:")?;
                writeln!(self.out)?;
                writeln!(self.out, "    Phase: {}", phase)?;
                writeln!(self.out, "    Message: {}", message)?;
            }
        }
        self.out.flush()
    }

    pub fn case_footer(&mut self, result: &CaseResult) -> io::Result<()> {
        writeln!(self.out, "Elapsed Time: {} seconds", seconds(result.elapsed))?;
        write!(self.out, "Result: ")?;
        if result.passed {
            self.colored(Color::Green, "PASS")?;
        } else {
            self.colored(Color::Red, "FAIL")?;
        }
        writeln!(self.out)?;
        writeln!(self.out, "{}", END_CASE_BANNER)?;
        writeln!(self.out)?;
        writeln!(self.out)?;
        self.out.flush()
    }

    pub fn summary(&mut self, summary: &RunSummary) -> io::Result<()> {
        writeln!(self.out, "{}", SUMMARY_BANNER)?;
        writeln!(self.out, "Passed Tests: {}", summary.passed)?;
        writeln!(self.out, "Failed Tests: {}", summary.failed)?;
        writeln!(self.out, "Total  Tests: {}", summary.total())?;
        writeln!(self.out, "Elapsed Time: {} seconds", seconds(summary.elapsed))?;
        if summary.is_success() {
            self.colored(Color::Green, PASSED_BANNER)?;
        } else {
            self.colored(Color::Red, FAILED_BANNER)?;
        }
        writeln!(self.out)?;
        self.out.flush()
    }

    fn colored(&mut self, color: Color, text: &str) -> io::Result<()> {
        self.out
            .set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(self.out, "{}", text)?;
        self.out.reset()
    }
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn seconds(elapsed: Duration) -> String {
    format!("{:.4}", elapsed.as_secs_f64())
}
