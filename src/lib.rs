//! A small test-authoring and execution framework.
//!
//! Tests are registered on a [`TestSuite`] with a [`TestConfig`], optionally
//! marked with `skip` or `expectfail`, and run sequentially in registration
//! order. Every test produces one [`OutcomeRecord`]; the run ends with a
//! [`Report`]. Both are delivered to a [`Reporter`].
//!
//! ```no_run
//! use std::process::ExitCode;
//!
//! use verdict::{TestConfig, TestSuite, each, expect};
//!
//! fn main() -> ExitCode {
//!     let mut suite = TestSuite::new("arithmetic");
//!     suite
//!         .test(TestConfig::new().arguments(each([2, 3])))
//!         .add("adds_two", |arg| {
//!             let a: i64 = arg.arg(0).unwrap_or(0);
//!             expect(a + 2, 2 + a, "addition commutes")?;
//!             Ok(a + 2)
//!         })
//!         .unwrap();
//!     suite.skip("adds_two", "not today");
//!
//!     suite.main()
//! }
//! ```

pub mod config;
pub mod error;
pub mod expect;
pub mod logging;
pub mod models;
pub mod report;
pub mod resolver;
pub mod runner;
pub mod suite;

pub use config::Config;
pub use error::{ConfigError, TestError};
pub use expect::{expect, expect_ne, fail, skip_now};
pub use models::{
    Argument, Condition, Counters, Marker, MarkerKind, MarkerOptions, Outcome, OutcomeRecord,
    Report, Status, TagSet, TestConfig, TestMetadata, each, tag_set,
};
pub use report::{ConsoleReporter, JsonReporter, ReportTap, Reporter, SessionEvent};
pub use resolver::{Resolution, resolve};
pub use runner::Runner;
pub use suite::{Registration, TestSuite};
