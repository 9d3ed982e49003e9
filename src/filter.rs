//! Case selection.
//!
//! A [`Selection`] is the parsed form of the filtering flags. Each flag kind is
//! kept in its own list so that the order in which flags appeared on the
//! command line cannot influence the outcome: [`Selection::apply`] always runs
//! reset, all, enable-suite, enable-case, disable-suite, disable-case, each as
//! a full pass over the registry, and a later pass overrides an earlier one.

use crate::registry::{Registry, TestCase};

/// A `(suite, name)` pair naming a single case.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CaseRef {
    pub suite: String,
    pub name: String,
}

impl CaseRef {
    pub fn new(suite: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            suite: suite.into(),
            name: name.into(),
        }
    }

    fn matches(&self, case: &TestCase) -> bool {
        case.matches(&self.suite, &self.name)
    }
}

/// Which cases to enable for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub all: bool,
    pub enable_suites: Vec<String>,
    pub enable_cases: Vec<CaseRef>,
    pub disable_suites: Vec<String>,
    pub disable_cases: Vec<CaseRef>,
}

impl Selection {
    /// Selects every registered case.
    pub fn everything() -> Self {
        Self {
            all: true,
            ..Self::default()
        }
    }

    /// Recompute every case's `enabled` flag from scratch.
    pub fn apply(&self, registry: &mut Registry) {
        set_where(registry, |_| true, false);
        if self.all {
            set_where(registry, |_| true, true);
        }

        for suite in &self.enable_suites {
            set_where(registry, |case| case.suite() == suite, true);
        }
        for case_ref in &self.enable_cases {
            set_where(registry, |case| case_ref.matches(case), true);
        }
        for suite in &self.disable_suites {
            set_where(registry, |case| case.suite() == suite, false);
        }
        for case_ref in &self.disable_cases {
            set_where(registry, |case| case_ref.matches(case), false);
        }
    }
}

fn set_where<P>(registry: &mut Registry, predicate: P, enabled: bool)
where
    P: Fn(&TestCase) -> bool,
{
    for case in registry.cases_mut() {
        if predicate(case) {
            case.set_enabled(enabled);
        }
    }
}
