use crossterm::style::Color;
use serde::{Deserialize, Serialize};

use crate::report::theme;

/// Presentation bucket of an outcome record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Success,
    Error,
    Warning,
    Skip,
}

impl Status {
    pub fn icon(&self) -> &'static str {
        match self {
            Status::Success => "✔",
            Status::Error => "✘",
            Status::Warning => "⚠",
            Status::Skip => "⊘",
        }
    }

    pub fn badge(&self) -> &'static str {
        match self {
            Status::Success => "PASS",
            Status::Error => "ERR ",
            Status::Warning => "WARN",
            Status::Skip => "SKIP",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Status::Success => theme::GREEN,
            Status::Error => theme::RED,
            Status::Warning => theme::YELLOW,
            Status::Skip => theme::BLUE,
        }
    }
}

/// Terminal classification of one test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    Pass,
    Fail,
    Skip,
    /// Expected to fail and it did.
    ExpectedFail,
    /// Expected to fail but passed.
    UnexpectedPass,
    /// Passed, but returned the same value as the previous passing test.
    Warning,
}

impl Outcome {
    pub fn display_name(&self) -> &'static str {
        match self {
            Outcome::Pass => "Passes",
            Outcome::Fail => "Failures",
            Outcome::Skip => "Skips",
            Outcome::ExpectedFail => "Expected Failures",
            Outcome::UnexpectedPass => "Unexpected Passes",
            Outcome::Warning => "Warnings",
        }
    }

    pub fn status(&self) -> Status {
        match self {
            Outcome::Pass => Status::Success,
            Outcome::Fail | Outcome::ExpectedFail => Status::Error,
            Outcome::Warning | Outcome::UnexpectedPass => Status::Warning,
            Outcome::Skip => Status::Skip,
        }
    }

    /// Only unexpected failures fail the session.
    pub fn fails_session(&self) -> bool {
        matches!(self, Outcome::Fail)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Outcome::Pass, Status::Success, false)]
    #[case(Outcome::Fail, Status::Error, true)]
    #[case(Outcome::ExpectedFail, Status::Error, false)]
    #[case(Outcome::UnexpectedPass, Status::Warning, false)]
    #[case(Outcome::Warning, Status::Warning, false)]
    #[case(Outcome::Skip, Status::Skip, false)]
    fn outcome_classification(
        #[case] outcome: Outcome,
        #[case] status: Status,
        #[case] fails: bool,
    ) {
        assert_eq!(outcome.status(), status);
        assert_eq!(outcome.fails_session(), fails);
    }

    #[test]
    fn serialized_names_match_the_wire_format() {
        assert_eq!(
            serde_json::to_string(&Outcome::ExpectedFail).unwrap(),
            "\"expected-fail\""
        );
        assert_eq!(serde_json::to_string(&Status::Skip).unwrap(), "\"skip\"");
    }
}
