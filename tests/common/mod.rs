#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use tokio::sync::mpsc;
use verdict::{OutcomeRecord, Report, SessionEvent, TagSet, TestSuite};

/// Everything one run handed to its reporter.
pub struct Session {
    pub records: Vec<OutcomeRecord>,
    pub report: Report,
}

impl Session {
    pub fn record(&self, name: &str) -> &OutcomeRecord {
        let prefix = format!("{name}:[line ");
        self.records
            .iter()
            .find(|r| r.label.starts_with(&prefix))
            .unwrap_or_else(|| panic!("no record for {name}"))
    }
}

pub fn run(suite: &TestSuite) -> Session {
    run_filtered(suite, &TagSet::new())
}

pub fn run_filtered(suite: &TestSuite, filter: &TagSet) -> Session {
    let (mut tx, mut rx) = mpsc::unbounded_channel();
    suite.run(filter, &mut tx);
    drop(tx);

    let mut records = Vec::new();
    let mut report = None;
    while let Ok(event) = rx.try_recv() {
        match event {
            SessionEvent::RunStarted { total, .. } => assert_eq!(total, suite.len()),
            SessionEvent::TestFinished { record } => records.push(record),
            SessionEvent::RunFinished { report: r } => report = Some(r),
        }
    }

    Session {
        records,
        report: report.expect("run finished without a report"),
    }
}

/// Shared call counter for observing side effects of test bodies.
#[derive(Clone, Default)]
pub struct Calls(Rc<RefCell<Vec<String>>>);

impl Calls {
    pub fn push(&self, call: impl Into<String>) {
        self.0.borrow_mut().push(call.into());
    }

    pub fn count(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}
