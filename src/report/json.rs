use std::io::{self, Write};

use serde::Serialize;

use super::Reporter;
use crate::models::{OutcomeRecord, Report};

/// NDJSON reporter: one event object per line.
///
/// ```text
/// {"type":"run-started","label":"math","total":2}
/// {"type":"test-finished","percent":50,"label":"a:[line 3]",...}
/// {"type":"run-finished","total":2,"passed":2,...}
/// ```
pub struct JsonReporter<W> {
    out: W,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum JsonEvent<'a> {
    RunStarted { label: &'a str, total: usize },
    TestFinished(&'a OutcomeRecord),
    RunFinished(&'a Report),
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, event: &JsonEvent<'_>) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, event)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn session_started(&mut self, label: &str, total: usize) -> io::Result<()> {
        self.emit(&JsonEvent::RunStarted { label, total })
    }

    fn test_finished(&mut self, record: &OutcomeRecord) -> io::Result<()> {
        self.emit(&JsonEvent::TestFinished(record))
    }

    fn session_finished(&mut self, report: &Report) -> io::Result<()> {
        self.emit(&JsonEvent::RunFinished(report))
    }
}
