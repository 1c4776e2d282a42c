use std::process::ExitCode;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::status::{Outcome, Status};

/// What the driver tells the reporting boundary about one test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    /// Progress through the suite, 0-100.
    pub percent: u8,
    pub label: String,
    pub status: Status,
    pub outcome: Outcome,
    /// Failure trace or warning text.
    pub output: Option<String>,
    /// Skip reason, expected-failure reason, or `XPASS`.
    pub postmessage: Option<String>,
    pub comment: Option<String>,
    pub duration_ms: u64,
    /// Same non-null value as the previous successful test. Counted as a
    /// warning whatever the outcome.
    #[serde(default)]
    pub repeated_result: bool,
}

impl OutcomeRecord {
    pub fn new(percent: u8, label: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            percent,
            label: label.into(),
            status: outcome.status(),
            outcome,
            output: None,
            postmessage: None,
            comment: None,
            duration_ms: 0,
            repeated_result: outcome == Outcome::Warning,
        }
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_postmessage(mut self, postmessage: impl Into<String>) -> Self {
        self.postmessage = Some(postmessage.into());
        self
    }

    pub fn with_comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment;
        self
    }

    pub fn with_repeated_result(mut self) -> Self {
        self.repeated_result = true;
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self
    }
}

/// Run-scoped counters. Mutated only by the execution driver.
///
/// `warnings` and `unexpected_passes` overlap with `passed`;
/// `expected_failures` overlaps with `errors`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub passed: usize,
    pub errors: usize,
    pub warnings: usize,
    pub skipped: usize,
    pub expected_failures: usize,
    pub unexpected_passes: usize,
}

impl Counters {
    pub fn record(&mut self, record: &OutcomeRecord) {
        match record.outcome {
            Outcome::Pass | Outcome::Warning => self.passed += 1,
            Outcome::UnexpectedPass => {
                self.passed += 1;
                self.unexpected_passes += 1;
            }
            Outcome::Fail => self.errors += 1,
            Outcome::ExpectedFail => {
                self.errors += 1;
                self.expected_failures += 1;
            }
            Outcome::Skip => self.skipped += 1,
        }
        if record.repeated_result {
            self.warnings += 1;
        }
    }
}

/// Session summary, built once after the last test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub total: usize,
    pub passed: usize,
    pub warnings: usize,
    pub errors: usize,
    pub skipped: usize,
    pub expected_failures: usize,
    pub unexpected_passes: usize,
    pub duration_ms: u64,
}

impl Report {
    pub fn new(total: usize, counters: Counters, elapsed: Duration) -> Self {
        Self {
            total,
            passed: counters.passed,
            warnings: counters.warnings,
            errors: counters.errors,
            skipped: counters.skipped,
            expected_failures: counters.expected_failures,
            unexpected_passes: counters.unexpected_passes,
            duration_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }

    pub fn passed_percent(&self) -> f64 {
        self.percent_of(self.passed)
    }

    pub fn warnings_percent(&self) -> f64 {
        self.percent_of(self.warnings)
    }

    pub fn errors_percent(&self) -> f64 {
        self.percent_of(self.errors)
    }

    pub fn skipped_percent(&self) -> f64 {
        self.percent_of(self.skipped)
    }

    fn percent_of(&self, count: usize) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        // Clamp to u32 for a lossless f64 conversion.
        let count = u32::try_from(count).unwrap_or(u32::MAX);
        let total = u32::try_from(self.total).unwrap_or(u32::MAX);
        f64::from(count) / f64::from(total) * 100.0
    }

    /// Errors that were not expected.
    pub fn failures(&self) -> usize {
        self.errors.saturating_sub(self.expected_failures)
    }

    pub fn is_success(&self) -> bool {
        self.failures() == 0
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn tally(counters: &mut Counters, outcomes: &[Outcome]) {
        for &outcome in outcomes {
            counters.record(&OutcomeRecord::new(0, "t:[line 1]", outcome));
        }
    }

    #[test]
    fn percentages_of_an_empty_report_are_zero() {
        let report = Report::default();
        assert_eq!(report.passed_percent(), 0.0);
        assert_eq!(report.warnings_percent(), 0.0);
        assert_eq!(report.errors_percent(), 0.0);
        assert_eq!(report.skipped_percent(), 0.0);
    }

    #[test]
    fn percentages_divide_by_total() {
        let mut counters = Counters::default();
        tally(
            &mut counters,
            &[Outcome::Pass, Outcome::Warning, Outcome::Fail, Outcome::Skip],
        );
        let report = Report::new(4, counters, Duration::ZERO);

        assert_eq!(report.passed_percent(), 50.0);
        assert_eq!(report.warnings_percent(), 25.0);
        assert_eq!(report.errors_percent(), 25.0);
        assert_eq!(report.skipped_percent(), 25.0);
    }

    #[test]
    fn expected_failures_do_not_fail_the_session() {
        let mut counters = Counters::default();
        tally(&mut counters, &[Outcome::ExpectedFail, Outcome::UnexpectedPass]);
        let report = Report::new(2, counters, Duration::ZERO);

        assert_eq!(report.errors, 1);
        assert_eq!(report.passed, 1);
        assert!(report.is_success());

        tally(&mut counters, &[Outcome::Fail]);
        let report = Report::new(3, counters, Duration::ZERO);
        assert_eq!(report.failures(), 1);
        assert!(!report.is_success());
    }

    #[test]
    fn repeated_unexpected_pass_counts_as_a_warning() {
        let mut counters = Counters::default();
        counters.record(
            &OutcomeRecord::new(100, "b:[line 4]", Outcome::UnexpectedPass).with_repeated_result(),
        );

        assert_eq!(counters.passed, 1);
        assert_eq!(counters.unexpected_passes, 1);
        assert_eq!(counters.warnings, 1);
    }

    #[test]
    fn record_builder_derives_status_from_outcome() {
        let record = OutcomeRecord::new(50, "a:[line 3]", Outcome::ExpectedFail)
            .with_postmessage("XFAIL")
            .with_duration(Duration::from_millis(12));
        assert_eq!(record.status, Status::Error);
        assert_eq!(record.postmessage.as_deref(), Some("XFAIL"));
        assert_eq!(record.duration_ms, 12);
    }
}
