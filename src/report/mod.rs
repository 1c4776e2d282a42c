pub mod console;
pub mod json;
pub mod theme;

use std::io;

use tokio::sync::mpsc;

use crate::models::{OutcomeRecord, Report};

pub use console::ConsoleReporter;
pub use json::JsonReporter;

/// Consumer of everything a run produces. The driver logs reporter errors
/// and keeps going.
pub trait Reporter {
    fn session_started(&mut self, _label: &str, _total: usize) -> io::Result<()> {
        Ok(())
    }

    fn test_finished(&mut self, record: &OutcomeRecord) -> io::Result<()>;

    fn session_finished(&mut self, report: &Report) -> io::Result<()>;
}

impl<R: Reporter + ?Sized> Reporter for Box<R> {
    fn session_started(&mut self, label: &str, total: usize) -> io::Result<()> {
        (**self).session_started(label, total)
    }

    fn test_finished(&mut self, record: &OutcomeRecord) -> io::Result<()> {
        (**self).test_finished(record)
    }

    fn session_finished(&mut self, report: &Report) -> io::Result<()> {
        (**self).session_finished(report)
    }
}

/// Events streamed to a channel reporter.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    RunStarted { label: String, total: usize },
    TestFinished { record: OutcomeRecord },
    RunFinished { report: Report },
}

impl Reporter for mpsc::UnboundedSender<SessionEvent> {
    fn session_started(&mut self, label: &str, total: usize) -> io::Result<()> {
        send(
            self,
            SessionEvent::RunStarted {
                label: label.to_string(),
                total,
            },
        )
    }

    fn test_finished(&mut self, record: &OutcomeRecord) -> io::Result<()> {
        send(
            self,
            SessionEvent::TestFinished {
                record: record.clone(),
            },
        )
    }

    fn session_finished(&mut self, report: &Report) -> io::Result<()> {
        send(self, SessionEvent::RunFinished { report: *report })
    }
}

fn send(tx: &mpsc::UnboundedSender<SessionEvent>, event: SessionEvent) -> io::Result<()> {
    tx.send(event)
        .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "session event receiver dropped"))
}

/// Forwards to an inner reporter and keeps the final report.
pub struct ReportTap<R> {
    inner: R,
    report: Option<Report>,
}

impl<R: Reporter> ReportTap<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            report: None,
        }
    }

    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Reporter> Reporter for ReportTap<R> {
    fn session_started(&mut self, label: &str, total: usize) -> io::Result<()> {
        self.report = None;
        self.inner.session_started(label, total)
    }

    fn test_finished(&mut self, record: &OutcomeRecord) -> io::Result<()> {
        self.inner.test_finished(record)
    }

    fn session_finished(&mut self, report: &Report) -> io::Result<()> {
        self.report = Some(*report);
        self.inner.session_finished(report)
    }
}
