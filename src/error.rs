use thiserror::Error;

/// Failure signals a test body can raise on purpose.
///
/// Bodies return `anyhow::Result`, so these travel boxed inside an
/// `anyhow::Error` and are recovered by downcasting when the driver
/// classifies the invocation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TestError {
    /// Two values that were expected to compare equal (or unequal) did not.
    #[error("{message} (left: {left}, right: {right})")]
    Expectation {
        message: String,
        left: String,
        right: String,
    },

    /// Explicit failure requested by the test body.
    #[error("{}", explanation(.0))]
    Failed(Option<String>),

    /// The body decided at run time that it cannot run here.
    #[error("{0}")]
    Skipped(String),
}

fn explanation(message: &Option<String>) -> String {
    format!("Message: {}", message.as_deref().unwrap_or("missing"))
}

impl TestError {
    pub fn is_skip(&self) -> bool {
        matches!(self, TestError::Skipped(_))
    }
}

/// Malformed registration. Returned immediately by the registration call,
/// never deferred to run time.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("comment template `{template}` references unknown placeholder `{placeholder}`")]
    UnresolvedPlaceholder {
        template: String,
        placeholder: String,
    },

    #[error("comment template `{template}` has an unmatched `{brace}` at byte {offset}")]
    MalformedTemplate {
        template: String,
        brace: char,
        offset: usize,
    },

    #[error("test `{name}` must be launched at least once")]
    ZeroLaunchCount { name: String },
}
