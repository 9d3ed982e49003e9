//! # Unitrun: Test Case Registry
//!
//! The registry is the single source of truth for which test cases exist and
//! in what order they run. It is constructed once by the caller, filled by
//! explicit registration calls before the runner starts, and then passed by
//! reference to the filter and the runner. Cases are never removed; only their
//! `enabled` flag and last result change after registration.

use std::time::{Duration, Instant};

use crate::errors::UnitTestError;

/// Signature of a setup, test, or teardown function.
pub type TestFn = fn();

/// Bound applied by [`Registry::bounded`].
pub const DEFAULT_CAPACITY: usize = 65_536;

/// Outcome and timing of the most recent execution of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaseResult {
    pub passed: bool,
    pub start: Instant,
    /// Unset until the case has finished all of its phases.
    pub end: Option<Instant>,
    pub elapsed: Duration,
}

impl CaseResult {
    /// A fresh, passing result that started at `start`.
    pub fn started(start: Instant) -> Self {
        Self {
            passed: true,
            start,
            end: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Stamp the end time; `elapsed` is always `end - start` and never negative.
    pub fn finish(&mut self, end: Instant) {
        self.end = Some(end);
        self.elapsed = end.saturating_duration_since(self.start);
    }
}

/// One registered test case.
///
/// Identity (suite, name and the three functions) is fixed at registration
/// and only readable afterwards.
#[derive(Debug, Clone)]
pub struct TestCase {
    suite: String,
    name: String,
    test: TestFn,
    setup: Option<TestFn>,
    teardown: Option<TestFn>,
    enabled: bool,
    result: Option<CaseResult>,
}

impl TestCase {
    pub fn suite(&self) -> &str {
        &self.suite
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn test(&self) -> TestFn {
        self.test
    }

    pub fn setup(&self) -> Option<TestFn> {
        self.setup
    }

    pub fn teardown(&self) -> Option<TestFn> {
        self.teardown
    }

    /// Every case held by a registry occupies a slot.
    pub fn is_allocated(&self) -> bool {
        true
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Result of the last run, if the case has been executed.
    pub fn result(&self) -> Option<&CaseResult> {
        self.result.as_ref()
    }

    pub(crate) fn record_result(&mut self, result: CaseResult) {
        self.result = Some(result);
    }

    pub fn matches(&self, suite: &str, name: &str) -> bool {
        self.suite == suite && self.name == name
    }
}

/// Append-only, ordered collection of test cases.
#[derive(Debug, Default)]
pub struct Registry {
    cases: Vec<TestCase>,
    capacity_limit: Option<usize>,
}

impl Registry {
    /// An unbounded registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry that refuses registrations beyond `limit` cases.
    pub fn with_capacity_limit(limit: usize) -> Self {
        Self {
            cases: Vec::new(),
            capacity_limit: Some(limit),
        }
    }

    /// A registry bounded at [`DEFAULT_CAPACITY`].
    pub fn bounded() -> Self {
        Self::with_capacity_limit(DEFAULT_CAPACITY)
    }

    pub fn capacity_limit(&self) -> Option<usize> {
        self.capacity_limit
    }

    /// Append a case and return its position in execution order.
    ///
    /// Duplicate (suite, name) pairs are accepted; each runs independently.
    pub fn register(
        &mut self,
        suite: impl Into<String>,
        name: impl Into<String>,
        test: TestFn,
        setup: Option<TestFn>,
        teardown: Option<TestFn>,
    ) -> Result<usize, UnitTestError> {
        let suite = suite.into();
        let name = name.into();
        if let Some(capacity) = self.capacity_limit {
            if self.cases.len() >= capacity {
                return Err(UnitTestError::CapacityExceeded {
                    suite,
                    name,
                    capacity,
                });
            }
        }

        self.cases.push(TestCase {
            suite,
            name,
            test,
            setup,
            teardown,
            enabled: false,
            result: None,
        });
        Ok(self.cases.len() - 1)
    }

    /// All registered cases, in registration order.
    pub fn all_cases(&self) -> &[TestCase] {
        &self.cases
    }

    pub(crate) fn cases_mut(&mut self) -> impl Iterator<Item = &mut TestCase> {
        self.cases.iter_mut()
    }

    pub fn get(&self, index: usize) -> Option<&TestCase> {
        self.cases.get(index)
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn enabled_count(&self) -> usize {
        self.cases.iter().filter(|case| case.enabled).count()
    }
}

/// Register a case whose suite and case names are the given identifiers.
///
/// ```
/// use unitrun::{register_case, Registry};
///
/// fn test_sum() {
///     unitrun::assert_equal!(4, 2 + 2);
/// }
///
/// let mut registry = Registry::new();
/// register_case!(registry, MathSuite, test_sum).unwrap();
/// assert_eq!(registry.all_cases()[0].name(), "test_sum");
/// ```
#[macro_export]
macro_rules! register_case {
    ($registry:expr, $suite:ident, $function:ident $(,)?) => {
        $registry.register(
            stringify!($suite),
            stringify!($function),
            $function,
            None,
            None,
        )
    };
}

/// Like [`register_case!`], with setup and teardown functions.
#[macro_export]
macro_rules! register_case_with {
    ($registry:expr, $suite:ident, $function:ident, $setup:expr, $teardown:expr $(,)?) => {
        $registry.register(
            stringify!($suite),
            stringify!($function),
            $function,
            Some($setup),
            Some($teardown),
        )
    };
}
