//! Assertions and the failure signal.
//!
//! A failed assertion unwinds with an [`AssertionFailure`] payload to the
//! recovery point armed by the runner for the phase currently executing. The
//! recovery point is armed by [`recover`] immediately before each phase body
//! runs and restored as soon as the body returns or unwinds, so a failure can
//! never land in the recovery point of an earlier phase.
//!
//! Every assertion macro takes an optional trailing format message:
//!
//! ```
//! use unitrun::assertion::{recover, Phase};
//! use unitrun::assert_equal;
//!
//! let outcome = recover(Phase::Test, || assert_equal!(5, 2 + 2, "5 != {}", 2 + 2));
//! assert!(outcome.is_err());
//! ```

use std::any::Any;
use std::cell::Cell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use once_cell::sync::Lazy;

/// The three phases of a test case, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Setup,
    Test,
    Teardown,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Setup => "setup",
            Phase::Test => "test",
            Phase::Teardown => "teardown",
        };
        f.write_str(name)
    }
}

/// Payload carried by a failed assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionFailure {
    pub file: &'static str,
    pub line: u32,
    pub message: Option<String>,
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Failed Assertion:")?;
        writeln!(f, "    File: {}", self.file)?;
        write!(f, "    Line: {}", self.line)?;
        if let Some(message) = &self.message {
            write!(f, "\n    Message: {}", message)?;
        }
        Ok(())
    }
}

/// Why a phase did not complete normally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseFailure {
    /// An assertion failed inside the phase.
    Assertion(AssertionFailure),
    /// Something other than an assertion panicked inside the phase.
    Panic(String),
}

impl PhaseFailure {
    fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let payload = match payload.downcast::<AssertionFailure>() {
            Ok(failure) => return PhaseFailure::Assertion(*failure),
            Err(other) => other,
        };
        if let Some(message) = payload.downcast_ref::<&str>() {
            PhaseFailure::Panic((*message).to_string())
        } else if let Some(message) = payload.downcast_ref::<String>() {
            PhaseFailure::Panic(message.clone())
        } else {
            PhaseFailure::Panic("non-string panic payload".to_string())
        }
    }
}

thread_local! {
    static ARMED: Cell<Option<Phase>> = const { Cell::new(None) };
}

/// Silences the default panic report for assertions caught by an armed
/// recovery point. Unarmed assertions print their diagnostic to stderr; every
/// other panic goes to the hook that was installed before.
static FAILURE_HOOK: Lazy<()> = Lazy::new(|| {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        match info.payload().downcast_ref::<AssertionFailure>() {
            Some(_) if armed_phase().is_some() => {}
            Some(failure) => eprintln!("{}", failure),
            None => previous(info),
        }
    }));
});

/// The phase whose recovery point is currently armed on this thread.
pub fn armed_phase() -> Option<Phase> {
    ARMED.with(Cell::get)
}

/// Run `body` with the recovery point armed for `phase`.
///
/// Returns `Err` if the body failed an assertion or panicked; the unwind
/// never travels past this call.
pub fn recover<F: FnOnce()>(phase: Phase, body: F) -> Result<(), PhaseFailure> {
    Lazy::force(&FAILURE_HOOK);
    let previous = ARMED.with(|armed| armed.replace(Some(phase)));
    let outcome = panic::catch_unwind(AssertUnwindSafe(body));
    ARMED.with(|armed| armed.set(previous));
    outcome.map_err(PhaseFailure::from_payload)
}

/// Raise the failure signal. Use the [`fail!`](crate::fail) macro instead of
/// calling this directly.
pub fn fail(file: &'static str, line: u32, message: Option<fmt::Arguments<'_>>) -> ! {
    Lazy::force(&FAILURE_HOOK);
    panic::panic_any(AssertionFailure {
        file,
        line,
        message: message.map(|arguments| arguments.to_string()),
    })
}

/// `strncmp`-style equality over the first `length` bytes.
pub fn strn_equal(expected: &str, actual: &str, length: usize) -> bool {
    expected
        .bytes()
        .take(length)
        .eq(actual.bytes().take(length))
}

/// True iff both slices hold at least `length` bytes and those bytes match.
pub fn mem_equal(expected: &[u8], actual: &[u8], length: usize) -> bool {
    match (expected.get(..length), actual.get(..length)) {
        (Some(expected), Some(actual)) => expected == actual,
        _ => false,
    }
}

/// True iff both slices hold at least `length` bytes and those bytes differ.
pub fn mem_not_equal(expected: &[u8], actual: &[u8], length: usize) -> bool {
    match (expected.get(..length), actual.get(..length)) {
        (Some(expected), Some(actual)) => expected != actual,
        _ => false,
    }
}

/// Fail the current phase, with an optional format message.
#[macro_export]
macro_rules! fail {
    () => {
        $crate::assertion::fail(file!(), line!(), None)
    };
    ($($arg:tt)+) => {
        $crate::assertion::fail(file!(), line!(), Some(format_args!($($arg)+)))
    };
}

#[macro_export]
macro_rules! assert_true {
    ($condition:expr $(,)?) => {
        if !($condition) {
            $crate::fail!()
        }
    };
    ($condition:expr, $($arg:tt)+) => {
        if !($condition) {
            $crate::fail!($($arg)+)
        }
    };
}

#[macro_export]
macro_rules! assert_false {
    ($condition:expr $(,)?) => {
        $crate::assert_true!(!($condition))
    };
    ($condition:expr, $($arg:tt)+) => {
        $crate::assert_true!(!($condition), $($arg)+)
    };
}

/// Only checks `right` when `left` holds.
#[macro_export]
macro_rules! assert_implies {
    ($left:expr, $right:expr $(,)?) => {
        if $left {
            $crate::assert_true!($right)
        }
    };
    ($left:expr, $right:expr, $($arg:tt)+) => {
        if $left {
            $crate::assert_true!($right, $($arg)+)
        }
    };
}

#[macro_export]
macro_rules! assert_equal {
    ($expected:expr, $actual:expr $(, $($arg:tt)+)?) => {
        $crate::assert_true!(($expected) == ($actual) $(, $($arg)+)?)
    };
}

#[macro_export]
macro_rules! assert_not_equal {
    ($expected:expr, $actual:expr $(, $($arg:tt)+)?) => {
        $crate::assert_false!(($expected) == ($actual) $(, $($arg)+)?)
    };
}

#[macro_export]
macro_rules! assert_less {
    ($left:expr, $right:expr $(, $($arg:tt)+)?) => {
        $crate::assert_true!(($left) < ($right) $(, $($arg)+)?)
    };
}

#[macro_export]
macro_rules! assert_less_equal {
    ($left:expr, $right:expr $(, $($arg:tt)+)?) => {
        $crate::assert_true!(($left) <= ($right) $(, $($arg)+)?)
    };
}

#[macro_export]
macro_rules! assert_greater {
    ($left:expr, $right:expr $(, $($arg:tt)+)?) => {
        $crate::assert_true!(($left) > ($right) $(, $($arg)+)?)
    };
}

#[macro_export]
macro_rules! assert_greater_equal {
    ($left:expr, $right:expr $(, $($arg:tt)+)?) => {
        $crate::assert_true!(($left) >= ($right) $(, $($arg)+)?)
    };
}

/// Passes when the `Option` is `None`.
#[macro_export]
macro_rules! assert_none {
    ($value:expr $(, $($arg:tt)+)?) => {
        $crate::assert_true!(($value).is_none() $(, $($arg)+)?)
    };
}

/// Passes when the `Option` is `Some`.
#[macro_export]
macro_rules! assert_some {
    ($value:expr $(, $($arg:tt)+)?) => {
        $crate::assert_true!(($value).is_some() $(, $($arg)+)?)
    };
}

#[macro_export]
macro_rules! assert_str_equal {
    ($expected:expr, $actual:expr $(, $($arg:tt)+)?) => {
        $crate::assert_true!(
            ::core::convert::AsRef::<str>::as_ref(&$expected)
                == ::core::convert::AsRef::<str>::as_ref(&$actual)
            $(, $($arg)+)?
        )
    };
}

#[macro_export]
macro_rules! assert_str_not_equal {
    ($expected:expr, $actual:expr $(, $($arg:tt)+)?) => {
        $crate::assert_false!(
            ::core::convert::AsRef::<str>::as_ref(&$expected)
                == ::core::convert::AsRef::<str>::as_ref(&$actual)
            $(, $($arg)+)?
        )
    };
}

#[macro_export]
macro_rules! assert_strn_equal {
    ($expected:expr, $actual:expr, $length:expr $(, $($arg:tt)+)?) => {
        $crate::assert_true!(
            $crate::assertion::strn_equal(
                ::core::convert::AsRef::<str>::as_ref(&$expected),
                ::core::convert::AsRef::<str>::as_ref(&$actual),
                $length,
            )
            $(, $($arg)+)?
        )
    };
}

#[macro_export]
macro_rules! assert_strn_not_equal {
    ($expected:expr, $actual:expr, $length:expr $(, $($arg:tt)+)?) => {
        $crate::assert_false!(
            $crate::assertion::strn_equal(
                ::core::convert::AsRef::<str>::as_ref(&$expected),
                ::core::convert::AsRef::<str>::as_ref(&$actual),
                $length,
            )
            $(, $($arg)+)?
        )
    };
}

#[macro_export]
macro_rules! assert_mem_equal {
    ($expected:expr, $actual:expr, $length:expr $(, $($arg:tt)+)?) => {
        $crate::assert_true!(
            $crate::assertion::mem_equal(
                ::core::convert::AsRef::<[u8]>::as_ref(&$expected),
                ::core::convert::AsRef::<[u8]>::as_ref(&$actual),
                $length,
            )
            $(, $($arg)+)?
        )
    };
}

#[macro_export]
macro_rules! assert_mem_not_equal {
    ($expected:expr, $actual:expr, $length:expr $(, $($arg:tt)+)?) => {
        $crate::assert_true!(
            $crate::assertion::mem_not_equal(
                ::core::convert::AsRef::<[u8]>::as_ref(&$expected),
                ::core::convert::AsRef::<[u8]>::as_ref(&$actual),
                $length,
            )
            $(, $($arg)+)?
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure_of(outcome: Result<(), PhaseFailure>) -> AssertionFailure {
        match outcome {
            Err(PhaseFailure::Assertion(failure)) => failure,
            other => panic!("expected an assertion failure, got {:?}", other),
        }
    }

    #[test]
    fn passing_body_leaves_no_failure() {
        assert_eq!(recover(Phase::Test, || assert_true!(1 + 1 == 2)), Ok(()));
    }

    #[test]
    fn fail_carries_file_line_and_message() {
        let failure = failure_of(recover(Phase::Test, || fail!("value was {}", 7)));
        assert_eq!(failure.file, file!());
        assert!(failure.line > 0);
        assert_eq!(failure.message.as_deref(), Some("value was 7"));
    }

    #[test]
    fn fail_without_message_has_none() {
        let failure = failure_of(recover(Phase::Setup, || fail!()));
        assert_eq!(failure.message, None);
        assert!(!failure.to_string().contains("Message:"));
    }

    #[test]
    fn failure_aborts_the_rest_of_the_body() {
        let mut reached = false;
        let outcome = recover(Phase::Test, || {
            assert_equal!(1, 2);
            reached = true;
        });
        assert!(outcome.is_err());
        assert!(!reached);
    }

    #[test]
    fn failure_deep_in_a_call_chain_stops_at_the_phase() {
        fn inner(depth: u32) {
            if depth == 0 {
                assert_true!(false, "bottom of the chain");
            }
            inner(depth - 1);
        }
        let failure = failure_of(recover(Phase::Test, || inner(8)));
        assert_eq!(failure.message.as_deref(), Some("bottom of the chain"));
    }

    #[test]
    fn recovery_point_is_rearmed_per_phase_and_restored() {
        assert_eq!(armed_phase(), None);
        let _ = recover(Phase::Setup, || {
            assert_eq!(armed_phase(), Some(Phase::Setup));
            fail!();
        });
        assert_eq!(armed_phase(), None);
        let _ = recover(Phase::Teardown, || {
            assert_eq!(armed_phase(), Some(Phase::Teardown));
        });
        assert_eq!(armed_phase(), None);
    }

    #[test]
    fn foreign_panic_is_contained() {
        let outcome = recover(Phase::Test, || panic!("plain panic"));
        assert_eq!(outcome, Err(PhaseFailure::Panic("plain panic".to_string())));
    }

    #[test]
    fn comparison_family() {
        assert!(recover(Phase::Test, || assert_not_equal!(1, 2)).is_ok());
        assert!(recover(Phase::Test, || assert_less!(1, 2)).is_ok());
        assert!(recover(Phase::Test, || assert_less_equal!(2, 2)).is_ok());
        assert!(recover(Phase::Test, || assert_greater!(3, 2)).is_ok());
        assert!(recover(Phase::Test, || assert_greater_equal!(2, 2)).is_ok());
        assert!(recover(Phase::Test, || assert_greater!(2, 3)).is_err());
        assert!(recover(Phase::Test, || assert_false!(true, "was {}", true)).is_err());
    }

    #[test]
    fn option_and_implication() {
        let missing: Option<u8> = None;
        assert!(recover(Phase::Test, || assert_none!(missing)).is_ok());
        assert!(recover(Phase::Test, || assert_some!(Some(3))).is_ok());
        assert!(recover(Phase::Test, || assert_implies!(false, false)).is_ok());
        assert!(recover(Phase::Test, || assert_implies!(true, false)).is_err());
    }

    #[test]
    fn string_and_memory_comparisons() {
        let owned = String::from("hello");
        assert!(recover(Phase::Test, || assert_str_equal!("hello", owned)).is_ok());
        assert!(recover(Phase::Test, || assert_str_not_equal!("hello", "world")).is_ok());
        assert!(recover(Phase::Test, || assert_strn_equal!("help", "hello", 3)).is_ok());
        assert!(recover(Phase::Test, || assert_strn_not_equal!("help", "hello", 4)).is_ok());
        assert!(recover(Phase::Test, || assert_mem_equal!(b"abcx", b"abcy", 3)).is_ok());
        assert!(recover(Phase::Test, || assert_mem_not_equal!(b"abcx", b"abcy", 4)).is_ok());
        assert!(recover(Phase::Test, || assert_mem_equal!(b"ab", b"ab", 3)).is_err());
    }

    #[test]
    fn strn_equal_stops_at_the_shorter_string() {
        assert!(strn_equal("ab", "ab", 10));
        assert!(!strn_equal("ab", "abc", 10));
        assert!(strn_equal("", "anything", 0));
    }

    #[test]
    fn diagnostic_layout() {
        let failure = AssertionFailure {
            file: "tests/example.rs",
            line: 12,
            message: Some("5 != 4".to_string()),
        };
        assert_eq!(
            failure.to_string(),
            "Failed Assertion:\n    File: tests/example.rs\n    Line: 12\n    Message: 5 != 4"
        );
    }
}
