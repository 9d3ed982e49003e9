// Demo program: registers the fib example suite and hands its arguments to
// the runner.
// Usage: cargo run --bin fib-demo -- --test --all

use std::process::ExitCode;

use unitrun::{assert_equal, register_case, register_case_with, Registry, UnitTestError};

/// The function under test.
fn fib(n: u32) -> u64 {
    match n {
        0 => 0,
        1 => 1,
        _ => fib(n - 1) + fib(n - 2),
    }
}

fn setup() {
    println!("Preparing fixture.");
}

fn teardown() {
    println!("Releasing fixture.");
}

fn test_basecase_0() {
    assert_equal!(0, fib(0));
}

fn test_basecase_1() {
    assert_equal!(1, fib(1));
}

fn test_additive_case() {
    assert_equal!(1, fib(2));
    assert_equal!(2, fib(3));
    assert_equal!(3, fib(4));
    assert_equal!(5, fib(5), "5 != {}", fib(5));
}

fn declare_tests(registry: &mut Registry) -> Result<(), UnitTestError> {
    register_case_with!(registry, ExampleSuite, test_basecase_0, setup, teardown)?;
    register_case_with!(registry, ExampleSuite, test_basecase_1, setup, teardown)?;
    register_case!(registry, ExampleSuite, test_additive_case)?;
    Ok(())
}

fn main() -> ExitCode {
    let mut registry = Registry::bounded();
    if let Err(err) = declare_tests(&mut registry) {
        eprintln!("{:?}", miette::Report::new(err));
        return ExitCode::FAILURE;
    }
    unitrun::main_with_registry(&mut registry)
}
