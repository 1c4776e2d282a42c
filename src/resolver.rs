use crate::models::{Marker, MarkerKind, TagSet};

pub const DEFAULT_SKIP_REASON: &str = "SkippedTest";
pub const DEFAULT_XFAIL_REASON: &str = "XFAIL";

/// Eligibility of one test for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    RunNormally,
    SkipBecauseFilter(String),
    SkipBecauseMarker(String),
    /// Run it, and treat a failure as expected. Carries the postmessage.
    ExpectFailure(String),
}

impl Resolution {
    pub fn skip_reason(&self) -> Option<&str> {
        match self {
            Resolution::SkipBecauseFilter(reason) | Resolution::SkipBecauseMarker(reason) => {
                Some(reason)
            }
            _ => None,
        }
    }
}

/// Decide what happens to a test. First match wins:
///
/// 1. any filter tag on the test excludes it (filter tags are exclusion
///    groups, not inclusion groups)
/// 2. an active skip marker
/// 3. an active expect-fail marker
///
/// An inactive expect-fail marker resolves to [`Resolution::RunNormally`].
pub fn resolve(test_tags: &TagSet, filter_tags: &TagSet, marker: Option<&Marker>) -> Resolution {
    if !filter_tags.is_empty() && !filter_tags.is_disjoint(test_tags) {
        return Resolution::SkipBecauseFilter(DEFAULT_SKIP_REASON.to_string());
    }

    let Some(marker) = marker else {
        return Resolution::RunNormally;
    };
    if !marker.is_active() {
        return Resolution::RunNormally;
    }

    let reason = marker.reason();
    match marker.kind() {
        MarkerKind::Skip => {
            Resolution::SkipBecauseMarker(reason.unwrap_or(DEFAULT_SKIP_REASON).to_string())
        }
        MarkerKind::ExpectFail => {
            Resolution::ExpectFailure(reason.unwrap_or(DEFAULT_XFAIL_REASON).to_string())
        }
    }
}
