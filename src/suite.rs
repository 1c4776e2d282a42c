use std::collections::HashMap;
use std::future::Future;
use std::panic::Location;
use std::process::ExitCode;
use std::time::Instant;

use futures_util::FutureExt;
use futures_util::future::LocalBoxFuture;
use serde::Serialize;
use serde_json::Value;

use crate::config::Config;
use crate::error::ConfigError;
use crate::logging;
use crate::models::{
    Argument, Marker, MarkerKind, MarkerOptions, Report, TagSet, TestConfig, TestMetadata,
};
use crate::report::{ReportTap, Reporter};
use crate::runner::Runner;

pub(crate) type SyncBody = Box<dyn Fn(&Argument) -> anyhow::Result<Value>>;
pub(crate) type AsyncBody = Box<dyn Fn(Argument) -> LocalBoxFuture<'static, anyhow::Result<Value>>>;

/// A test callable, with its return value already serialized.
pub enum TestBody {
    Sync(SyncBody),
    /// Driven to completion on the runner's event loop.
    Async(AsyncBody),
}

impl TestBody {
    pub fn is_async(&self) -> bool {
        matches!(self, TestBody::Async(_))
    }
}

pub struct RegisteredTest {
    name: String,
    line: u32,
    body: TestBody,
}

impl RegisteredTest {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `name:[line N]`, N being the line of the registration call.
    pub fn label(&self) -> String {
        format!("{}:[line {}]", self.name, self.line)
    }

    pub fn body(&self) -> &TestBody {
        &self.body
    }
}

/// Registered but never resolved by the runner. Reserved for dependency
/// injection.
pub struct Fixture {
    name: String,
    handler: Box<dyn Fn() -> anyhow::Result<Value>>,
}

impl Fixture {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Call the handler directly.
    pub fn invoke(&self) -> anyhow::Result<Value> {
        (self.handler)()
    }
}

/// Ordered test registry with out-of-band metadata keyed by test name.
pub struct TestSuite {
    label: String,
    tests: Vec<RegisteredTest>,
    metadata: HashMap<String, TestMetadata>,
    fixtures: Vec<Fixture>,
}

impl Default for TestSuite {
    fn default() -> Self {
        Self::new("TestCase")
    }
}

impl TestSuite {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            tests: Vec::new(),
            metadata: HashMap::new(),
            fixtures: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    pub fn tests(&self) -> &[RegisteredTest] {
        &self.tests
    }

    pub fn metadata(&self, name: &str) -> Option<&TestMetadata> {
        self.metadata.get(name)
    }

    /// Union of the tags of the currently registered tests.
    pub fn tags(&self) -> TagSet {
        self.tests
            .iter()
            .filter_map(|t| self.metadata.get(&t.name))
            .flat_map(|m| m.tags.iter().cloned())
            .collect()
    }

    pub fn fixtures(&self) -> &[Fixture] {
        &self.fixtures
    }

    /// Start a `test(...)` registration. The returned handle wraps the
    /// callable and merges `config` into its metadata.
    pub fn test(&mut self, config: TestConfig) -> Registration<'_> {
        Registration {
            suite: self,
            config,
        }
    }

    /// Attach a skip marker, replacing any previous marker on `name`.
    pub fn skip(&mut self, name: &str, options: impl Into<MarkerOptions>) -> &mut Self {
        self.set_marker(name, Marker::new(MarkerKind::Skip, options.into()))
    }

    /// Attach an expect-fail marker, replacing any previous marker on `name`.
    pub fn expectfail(&mut self, name: &str, options: impl Into<MarkerOptions>) -> &mut Self {
        self.set_marker(name, Marker::new(MarkerKind::ExpectFail, options.into()))
    }

    fn set_marker(&mut self, name: &str, marker: Marker) -> &mut Self {
        self.metadata.entry(name.to_string()).or_default().marker = Some(marker);
        self
    }

    pub fn fixture<F, T>(&mut self, name: &str, handler: F) -> &mut Self
    where
        F: Fn() -> anyhow::Result<T> + 'static,
        T: Serialize,
    {
        self.metadata.entry(name.to_string()).or_default().is_fixture = true;
        self.fixtures.retain(|f| f.name != name);
        self.fixtures.push(Fixture {
            name: name.to_string(),
            handler: Box::new(move || -> anyhow::Result<Value> {
                Ok(serde_json::to_value(handler()?)?)
            }),
        });
        tracing::warn!(fixture = name, "fixtures are registered but not resolved");
        self
    }

    /// Insert or overwrite by name. An overwrite keeps the original position.
    fn register(&mut self, name: &str, line: u32, body: TestBody) {
        let test = RegisteredTest {
            name: name.to_string(),
            line,
            body,
        };
        match self.tests.iter_mut().find(|t| t.name == name) {
            Some(existing) => *existing = test,
            None => self.tests.push(test),
        }
    }

    /// Execute every test once, in registration order. Outcomes and the
    /// final report go to `reporter`.
    pub fn run(&self, filter_tags: &TagSet, reporter: &mut dyn Reporter) {
        let _session = tracing::info_span!("session", suite = %self.label).entered();
        let start = Instant::now();

        if let Err(e) = reporter.session_started(&self.label, self.len()) {
            tracing::warn!(error = %e, "reporter failed to start the session");
        }

        let counters = Runner::new(self).launch_test_chain(filter_tags, reporter);
        let report = Report::new(self.len(), counters, start.elapsed());
        tracing::info!(
            total = report.total,
            passed = report.passed,
            errors = report.errors,
            skipped = report.skipped,
            "session finished"
        );

        if let Err(e) = reporter.session_finished(&report) {
            tracing::warn!(error = %e, "reporter failed to finish the session");
        }
    }

    /// Process entry point: reads `verdict.toml` from the working directory,
    /// runs with the configured reporter on stdout, and maps the report to
    /// an exit code.
    pub fn main(&self) -> ExitCode {
        logging::init_tracing();
        let workspace = std::env::current_dir().unwrap_or_else(|_| ".".into());
        let config = Config::load(&workspace);

        let mut tap = ReportTap::new(config.reporter(std::io::stdout()));
        self.run(&config.filter_tags(), &mut tap);
        tap.report()
            .map(Report::exit_code)
            .unwrap_or(ExitCode::FAILURE)
    }
}

/// Handle returned by [`TestSuite::test`].
pub struct Registration<'s> {
    suite: &'s mut TestSuite,
    config: TestConfig,
}

impl Registration<'_> {
    /// Register a synchronous test body.
    #[track_caller]
    pub fn add<F, T>(self, name: &str, body: F) -> Result<(), ConfigError>
    where
        F: Fn(&Argument) -> anyhow::Result<T> + 'static,
        T: Serialize,
    {
        let line = Location::caller().line();
        let body: SyncBody = Box::new(move |arg: &Argument| -> anyhow::Result<Value> {
            Ok(serde_json::to_value(body(arg)?)?)
        });
        self.finish(name, line, TestBody::Sync(body))
    }

    /// Register an asynchronous test body.
    #[track_caller]
    pub fn add_async<F, Fut, T>(self, name: &str, body: F) -> Result<(), ConfigError>
    where
        F: Fn(Argument) -> Fut + 'static,
        Fut: Future<Output = anyhow::Result<T>> + 'static,
        T: Serialize,
    {
        let line = Location::caller().line();
        let body: AsyncBody = Box::new(
            move |arg: Argument| -> LocalBoxFuture<'static, anyhow::Result<Value>> {
                let fut = body(arg);
                async move { Ok::<_, anyhow::Error>(serde_json::to_value(fut.await?)?) }
                    .boxed_local()
            },
        );
        self.finish(name, line, TestBody::Async(body))
    }

    fn finish(self, name: &str, line: u32, body: TestBody) -> Result<(), ConfigError> {
        let mut meta = self.suite.metadata.remove(name).unwrap_or_default();
        let applied = self.config.apply(name, &mut meta);
        self.suite.metadata.insert(name.to_string(), meta);
        applied?;

        self.suite.register(name, line, body);
        tracing::debug!(test = name, line, "registered");
        Ok(())
    }
}
