//! Expectation helpers for test bodies.
//!
//! These return [`TestError`] so a body can use `?` and have the mismatch
//! classified as a test failure instead of an unclassified error.

use std::fmt::Debug;

use crate::error::TestError;

/// Succeeds when `lhs == rhs`, otherwise fails with `message`.
pub fn expect<L, R>(lhs: L, rhs: R, message: impl Into<String>) -> Result<(), TestError>
where
    L: PartialEq<R> + Debug,
    R: Debug,
{
    if lhs == rhs {
        Ok(())
    } else {
        Err(TestError::Expectation {
            message: message.into(),
            left: format!("{lhs:?}"),
            right: format!("{rhs:?}"),
        })
    }
}

/// Succeeds when `lhs != rhs`.
pub fn expect_ne<L, R>(lhs: L, rhs: R, message: impl Into<String>) -> Result<(), TestError>
where
    L: PartialEq<R> + Debug,
    R: Debug,
{
    if lhs != rhs {
        Ok(())
    } else {
        Err(TestError::Expectation {
            message: message.into(),
            left: format!("{lhs:?}"),
            right: format!("{rhs:?}"),
        })
    }
}

pub fn fail(message: impl Into<String>) -> TestError {
    TestError::Failed(Some(message.into()))
}

/// Runtime skip signal: the driver reports the test as skipped with `reason`.
pub fn skip_now(reason: impl Into<String>) -> TestError {
    TestError::Skipped(reason.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expect_passes_on_equal_values() {
        assert_eq!(expect(1 + 2, 3, "1 + 2 should be equal to 3"), Ok(()));
    }

    #[test]
    fn expect_reports_both_sides() {
        let err = expect("a", "b", "letters differ").unwrap_err();
        assert_eq!(
            err,
            TestError::Expectation {
                message: "letters differ".into(),
                left: "\"a\"".into(),
                right: "\"b\"".into(),
            }
        );
    }

    #[test]
    fn expect_ne_fails_on_equal_values() {
        assert!(expect_ne(4, 4, "should differ").is_err());
        assert!(expect_ne(4, 5, "should differ").is_ok());
    }
}
