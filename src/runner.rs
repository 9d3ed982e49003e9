//! Sequential case execution.
//!
//! Each enabled case runs setup, test and teardown, in that order, with a
//! fresh recovery point armed for every phase. A failed setup skips the test
//! phase; teardown is always attempted. Cases run one at a time in
//! registration order, and a case that never returns blocks the run.

use std::time::{Duration, Instant};

use termcolor::WriteColor;

use crate::assertion::{self, Phase};
use crate::cli::output::Reporter;
use crate::errors::UnitTestError;
use crate::registry::{CaseResult, Registry, TestCase, TestFn};

/// Aggregate counts of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    /// Sum of the elapsed times of every executed case.
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    /// True iff no executed case failed, including when nothing ran.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    fn record(&mut self, result: &CaseResult) {
        if result.passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.elapsed += result.elapsed;
    }
}

/// Drives the enabled cases of a registry and reports as it goes.
pub struct Runner<'r, W: WriteColor> {
    reporter: &'r mut Reporter<W>,
}

impl<'r, W: WriteColor> Runner<'r, W> {
    pub fn new(reporter: &'r mut Reporter<W>) -> Self {
        Self { reporter }
    }

    /// Run every enabled case, store its result on the case, and print the
    /// summary.
    pub fn run(&mut self, registry: &mut Registry) -> Result<RunSummary, UnitTestError> {
        let mut summary = RunSummary::default();
        for case in registry.cases_mut() {
            if !case.is_enabled() {
                continue;
            }
            let result = self.run_case(case)?;
            summary.record(&result);
        }
        self.reporter.summary(&summary)?;
        Ok(summary)
    }

    fn run_case(&mut self, case: &mut TestCase) -> Result<CaseResult, UnitTestError> {
        self.reporter.case_header(case.suite(), case.name())?;

        let mut result = CaseResult::started(Instant::now());
        if let Some(setup) = case.setup() {
            self.run_phase(Phase::Setup, setup, &mut result)?;
        }
        if result.passed {
            self.run_phase(Phase::Test, case.test(), &mut result)?;
        }
        if let Some(teardown) = case.teardown() {
            self.run_phase(Phase::Teardown, teardown, &mut result)?;
        }
        result.finish(Instant::now());

        case.record_result(result);
        self.reporter.case_footer(&result)?;
        Ok(result)
    }

    fn run_phase(
        &mut self,
        phase: Phase,
        body: TestFn,
        result: &mut CaseResult,
    ) -> Result<(), UnitTestError> {
        if let Err(failure) = assertion::recover(phase, body) {
            result.passed = false;
            self.reporter.phase_failure(phase, &failure)?;
        }
        Ok(())
    }
}
