//! Table-driven test helpers shared by the ndview crates.

use std::fmt::Debug;
use std::panic::{catch_unwind, AssertUnwindSafe, RefUnwindSafe, UnwindSafe};

/// Run every case in a table of test cases, collecting failures instead of
/// stopping at the first one.
///
/// Define a `Debug` struct (conventionally `Case`) describing one case, build
/// an array of them and call `test_each` with the check to run:
///
/// ```
/// use ndview_testing::TestCases;
///
/// #[derive(Debug)]
/// struct Case {
///     shape: Vec<usize>,
///     len: usize,
/// }
///
/// let cases = [
///     Case { shape: vec![2, 3], len: 6 },
///     Case { shape: vec![], len: 1 },
/// ];
///
/// cases.test_each(|case| {
///     assert_eq!(case.shape.iter().product::<usize>(), case.len);
/// });
/// ```
///
/// If any case panics, `test_each` panics after all cases have run, with a
/// message containing the number of failures and the `Debug` form of each
/// failing case.
///
/// Cases and anything captured by the check must be unwind safe. Values that
/// use interior mutability (such as arrays, which share their buffer through a
/// `RefCell`) should be constructed inside the check from plain case data.
pub trait TestCases {
    /// Type of a single test case.
    type Case;

    /// Run `test` with a reference to each case.
    fn test_each(self, test: impl Fn(&Self::Case) + RefUnwindSafe)
    where
        Self::Case: Debug + RefUnwindSafe;

    /// Run `test` with each case by value.
    ///
    /// The `Debug` form of each case is captured before the check runs, so it
    /// can be reported if the check fails.
    fn test_each_value(self, test: impl Fn(Self::Case) + RefUnwindSafe)
    where
        Self::Case: Debug + UnwindSafe;
}

fn report_failures(failures: &[String]) {
    assert!(
        failures.is_empty(),
        "{} test cases failed: {:?}",
        failures.len(),
        failures
    );
}

impl<I: IntoIterator> TestCases for I {
    type Case = I::Item;

    fn test_each(self, test: impl Fn(&I::Item) + RefUnwindSafe)
    where
        I::Item: Debug + RefUnwindSafe,
    {
        let failures: Vec<String> = self
            .into_iter()
            .filter(|case| catch_unwind(|| test(case)).is_err())
            .map(|case| format!("{:?}", case))
            .collect();
        report_failures(&failures);
    }

    fn test_each_value(self, test: impl Fn(I::Item) + RefUnwindSafe)
    where
        I::Item: Debug + UnwindSafe,
    {
        let test = AssertUnwindSafe(&test);
        let mut failures = Vec::new();
        for case in self {
            let desc = format!("{:?}", case);
            if catch_unwind(|| (test.0)(case)).is_err() {
                failures.push(desc);
            }
        }
        report_failures(&failures);
    }
}
