pub mod invoke;

use std::time::Instant;

use serde_json::Value;

use crate::models::{Argument, Counters, Outcome, OutcomeRecord, TagSet, TestMetadata};
use crate::report::Reporter;
use crate::resolver::{self, Resolution};
use crate::suite::{RegisteredTest, TestBody, TestSuite};

pub use invoke::{InvocationError, Invoker};

pub const UNEXPECTED_PASS_MESSAGE: &str = "XPASS";

/// Sequential execution driver. Owns the run-scoped state: counters and
/// the result of the last successfully executed test.
pub struct Runner<'s> {
    suite: &'s TestSuite,
    invoker: Invoker,
    counters: Counters,
    previous: Option<Value>,
}

impl<'s> Runner<'s> {
    pub fn new(suite: &'s TestSuite) -> Self {
        Self {
            suite,
            invoker: Invoker::new(),
            counters: Counters::default(),
            previous: None,
        }
    }

    /// Run every test in registration order. A failing test never stops
    /// the chain.
    pub fn launch_test_chain(mut self, filter_tags: &TagSet, reporter: &mut dyn Reporter) -> Counters {
        let suite = self.suite;
        let total = suite.len();
        for (index, test) in suite.tests().iter().enumerate() {
            let record = self.process(index + 1, total, test, filter_tags);
            self.counters.record(&record);
            if record.outcome.fails_session() {
                tracing::info!(test = test.name(), "test failed");
            }

            if let Err(e) = reporter.test_finished(&record) {
                tracing::warn!(test = test.name(), error = %e, "reporter failed to record a test");
            }
        }
        self.counters
    }

    fn process(
        &mut self,
        index: usize,
        total: usize,
        test: &RegisteredTest,
        filter_tags: &TagSet,
    ) -> OutcomeRecord {
        let _span = tracing::debug_span!(
            "test",
            name = test.name(),
            is_async = test.body().is_async()
        )
        .entered();
        let percent = progress_percent(index, total);
        let label = test.label();

        let fallback = TestMetadata::default();
        let suite = self.suite;
        let meta = suite.metadata(test.name()).unwrap_or(&fallback);
        let comment = meta.comment.clone();

        let resolution = resolver::resolve(&meta.tags, filter_tags, meta.marker.as_ref());
        tracing::debug!(?resolution, "resolved");
        if let Some(reason) = resolution.skip_reason() {
            return OutcomeRecord::new(percent, label, Outcome::Skip)
                .with_postmessage(reason)
                .with_comment(comment);
        }
        let expected_failure = match &resolution {
            Resolution::ExpectFailure(reason) => Some(reason.as_str()),
            _ => None,
        };

        let start = Instant::now();
        let result = self.run_cycle(test.body(), meta);
        let elapsed = start.elapsed();
        tracing::debug!(?elapsed, ok = result.is_ok(), "finished");

        let record = match result {
            Ok(value) => self.classify_success(percent, label, value, expected_failure),
            Err(InvocationError::Skipped(reason)) => {
                OutcomeRecord::new(percent, label, Outcome::Skip).with_postmessage(reason)
            }
            Err(err @ (InvocationError::Assertion(_) | InvocationError::Domain(_))) => {
                match expected_failure {
                    Some(reason) => OutcomeRecord::new(percent, label, Outcome::ExpectedFail)
                        .with_output(err.trace())
                        .with_postmessage(reason),
                    None => {
                        OutcomeRecord::new(percent, label, Outcome::Fail).with_output(err.trace())
                    }
                }
            }
            // Only assertion and domain failures can be expected.
            Err(err) => OutcomeRecord::new(percent, label, Outcome::Fail).with_output(err.trace()),
        };

        record.with_comment(comment).with_duration(elapsed)
    }

    /// Run `launch_count` passes over the argument list. The first failing
    /// invocation ends the cycle; otherwise the last value is the result.
    fn run_cycle(&mut self, body: &TestBody, meta: &TestMetadata) -> Result<Value, InvocationError> {
        let no_arguments = [Argument::default()];
        let arguments: &[Argument] = if meta.arguments.is_empty() {
            &no_arguments
        } else {
            &meta.arguments
        };

        let mut last = Value::Null;
        for launch in 1..=meta.launch_count {
            for argument in arguments {
                tracing::trace!(launch, ?argument, "invoking");
                last = self.invoker.invoke(body, argument)?;
            }
        }
        Ok(last)
    }

    fn classify_success(
        &mut self,
        percent: u8,
        label: String,
        value: Value,
        expected_failure: Option<&str>,
    ) -> OutcomeRecord {
        let previous = self.previous.replace(value.clone());
        let repeated = previous
            .filter(|previous| !value.is_null() && *previous == value)
            .map(|previous| format!("Last result is equals current result ({previous} == {value})"));

        match (expected_failure, repeated) {
            (Some(_), repeated) => {
                let record = OutcomeRecord::new(percent, label, Outcome::UnexpectedPass)
                    .with_postmessage(UNEXPECTED_PASS_MESSAGE);
                match repeated {
                    Some(output) => record.with_output(output).with_repeated_result(),
                    None => record,
                }
            }
            (None, Some(output)) => OutcomeRecord::new(percent, label, Outcome::Warning)
                .with_output(output)
                .with_repeated_result(),
            (None, None) => OutcomeRecord::new(percent, label, Outcome::Pass),
        }
    }
}

/// `round(index / total * 100)`, with `index` 1-based.
fn progress_percent(index: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let index = u32::try_from(index).unwrap_or(u32::MAX);
    let total = u32::try_from(total).unwrap_or(u32::MAX);
    let percent = (f64::from(index) / f64::from(total) * 100.0).round();
    percent.clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(1, 1, 100)]
    #[case(1, 2, 50)]
    #[case(1, 3, 33)]
    #[case(2, 3, 67)]
    #[case(3, 3, 100)]
    #[case(1, 0, 0)]
    fn progress_is_rounded(#[case] index: usize, #[case] total: usize, #[case] expected: u8) {
        assert_eq!(progress_percent(index, total), expected);
    }
}
