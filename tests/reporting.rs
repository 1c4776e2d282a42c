use pretty_assertions::assert_eq;
use serde_json::Value;
use verdict::{
    ConsoleReporter, JsonReporter, ReportTap, TagSet, TestConfig, TestSuite, expect, fail,
};

fn mixed_suite() -> TestSuite {
    let mut suite = TestSuite::new("mixed");
    suite
        .test(TestConfig::new().comment("default a = {a}").comment_arg("a", 2))
        .add("adds", |_| {
            expect(2 + 2, 4, "2 + 2 should be equal to 4")?;
            Ok(4)
        })
        .unwrap();
    suite
        .test(TestConfig::new())
        .add("breaks", |_| -> anyhow::Result<()> { Err(fail("no luck").into()) })
        .unwrap();
    suite.test(TestConfig::new()).add("later", |_| Ok(())).unwrap();
    suite.skip("later", "not yet");
    suite
}

#[test]
fn json_run_streams_one_line_per_event() {
    let suite = mixed_suite();
    let mut tap = ReportTap::new(JsonReporter::new(Vec::new()));
    suite.run(&TagSet::new(), &mut tap);

    let report = *tap.report().unwrap();
    assert_eq!((report.passed, report.errors, report.skipped), (1, 1, 1));
    assert!(!report.is_success());

    let out = String::from_utf8(tap.into_inner().into_inner()).unwrap();
    let events: Vec<Value> = out
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    let kinds: Vec<&str> = events.iter().map(|e| e["type"].as_str().unwrap()).collect();
    assert_eq!(
        kinds,
        vec![
            "run-started",
            "test-finished",
            "test-finished",
            "test-finished",
            "run-finished"
        ]
    );
    assert_eq!(events[1]["comment"], "default a = 2");
    assert_eq!(events[2]["status"], "error");
    assert_eq!(events[2]["output"], "TestError: Message: no luck");
    assert_eq!(events[3]["postmessage"], "not yet");
    assert_eq!(events[4]["total"], 3);
}

#[test]
fn console_run_prints_lines_and_summary() {
    let suite = mixed_suite();
    let mut tap = ReportTap::new(ConsoleReporter::with_width(Vec::new(), false, 60));
    suite.run(&TagSet::new(), &mut tap);

    let out = String::from_utf8(tap.into_inner().into_inner()).unwrap();
    assert!(out.contains("mixed: runner session starts"), "{out}");
    assert!(out.contains("Collected 3 items"), "{out}");
    assert!(out.contains("PASS adds:[line "), "{out}");
    assert!(out.contains("default a = 2"), "{out}");
    assert!(out.contains("ERROR: breaks:[line "), "{out}");
    assert!(out.contains("not yet"), "{out}");
    assert!(out.contains("3 tests ran in"), "{out}");
    assert!(out.contains("Skipped"), "{out}");
}
