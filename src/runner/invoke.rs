use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};

use futures_util::FutureExt;
use serde_json::Value;
use tokio::runtime::{Builder, Handle, Runtime};

use crate::error::TestError;
use crate::models::Argument;
use crate::suite::TestBody;

/// Why one invocation of a test body did not return a value.
#[derive(Debug)]
pub enum InvocationError {
    /// The body panicked, typically a failed `assert!`.
    Assertion(String),
    /// The body returned a [`TestError`] other than a skip.
    Domain(TestError),
    /// The body asked to be skipped.
    Skipped(String),
    /// Anything else the body returned, or the event loop could not start.
    Unclassified(anyhow::Error),
}

impl InvocationError {
    fn classify(err: anyhow::Error) -> Self {
        match err.downcast::<TestError>() {
            Ok(TestError::Skipped(reason)) => InvocationError::Skipped(reason),
            Ok(domain) => InvocationError::Domain(domain),
            Err(other) => InvocationError::Unclassified(other),
        }
    }

    /// Text shown as the record's output.
    pub fn trace(&self) -> String {
        match self {
            InvocationError::Assertion(message) => format!("panicked: {message}"),
            InvocationError::Domain(err) => format!("TestError: {err}"),
            InvocationError::Skipped(reason) => reason.clone(),
            InvocationError::Unclassified(err) => format!("{err:?}"),
        }
    }
}

/// Calls test bodies one at a time. Async bodies are driven on a
/// current-thread runtime built on first use and reused for the whole run.
#[derive(Default)]
pub struct Invoker {
    event_loop: Option<Runtime>,
}

impl Invoker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invoke(&mut self, body: &TestBody, argument: &Argument) -> Result<Value, InvocationError> {
        match body {
            TestBody::Sync(f) => match panic::catch_unwind(AssertUnwindSafe(|| f(argument))) {
                Ok(result) => result.map_err(InvocationError::classify),
                Err(payload) => Err(InvocationError::Assertion(panic_message(payload.as_ref()))),
            },
            TestBody::Async(f) => {
                // Bodies are not `Send`, so they cannot be moved off a
                // thread that is already driving a runtime.
                if Handle::try_current().is_ok() {
                    return Err(InvocationError::Unclassified(anyhow::anyhow!(
                        "async test called from inside a tokio runtime; run the suite from synchronous code"
                    )));
                }
                let event_loop = self.event_loop().map_err(|e| {
                    InvocationError::Unclassified(
                        anyhow::Error::new(e).context("failed to start the event loop"),
                    )
                })?;
                let caught = event_loop
                    .block_on(AssertUnwindSafe(async { f(argument.clone()).await }).catch_unwind());
                match caught {
                    Ok(result) => result.map_err(InvocationError::classify),
                    Err(payload) => {
                        Err(InvocationError::Assertion(panic_message(payload.as_ref())))
                    }
                }
            }
        }
    }

    fn event_loop(&mut self) -> io::Result<&Runtime> {
        if self.event_loop.is_none() {
            tracing::debug!("starting event loop");
            self.event_loop = Some(Builder::new_current_thread().enable_all().build()?);
        }
        self.event_loop
            .as_ref()
            .ok_or_else(|| io::Error::other("event loop missing"))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Box<dyn Any>".to_string()
    }
}
