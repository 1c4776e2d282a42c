pub mod marker;
pub mod metadata;
pub mod result;
pub mod status;

pub use marker::{Condition, Marker, MarkerKind, MarkerOptions};
pub use metadata::{Argument, TagSet, TestConfig, TestMetadata, each, render_comment, tag_set};
pub use result::{Counters, OutcomeRecord, Report};
pub use status::{Outcome, Status};
