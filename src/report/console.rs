use std::io::{self, Write};

use crossterm::style::{Color, ContentStyle, Stylize};

use super::{Reporter, theme};
use crate::models::{Outcome, OutcomeRecord, Report, Status};

const DEFAULT_WIDTH: usize = 80;

/// Human-readable reporter: one line per test, a failure block for errors,
/// and a results table at the end.
pub struct ConsoleReporter<W> {
    out: W,
    color: bool,
    width: usize,
}

impl<W: Write> ConsoleReporter<W> {
    /// Width follows the terminal, falling back to 80 columns.
    pub fn new(out: W, color: bool) -> Self {
        let width = crossterm::terminal::size()
            .map(|(cols, _)| usize::from(cols))
            .unwrap_or(DEFAULT_WIDTH);
        Self::with_width(out, color, width)
    }

    pub fn with_width(out: W, color: bool, width: usize) -> Self {
        Self { out, color, width }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, text: &str, style: ContentStyle) -> String {
        if self.color {
            style.apply(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn header(&mut self, label: &str, fg: Color) -> io::Result<()> {
        let inner = format!(" {label} ");
        let fill = self.width.saturating_sub(inner.chars().count());
        let left = "=".repeat(fill / 2);
        let right = "=".repeat(fill - fill / 2);
        let line = self.paint(
            &format!("{left}{inner}{right}"),
            ContentStyle::new().with(fg).bold(),
        );
        writeln!(self.out, "{line}")
    }

    fn badge(&self, status: Status) -> String {
        self.paint(
            status.badge(),
            ContentStyle::new().with(theme::CRUST).on(status.color()).bold(),
        )
    }

    fn table_row(&mut self, count: usize, name: &str, percent: f64, fg: Color) -> io::Result<()> {
        let row = format!("  {count:>5}  {name:<18} {percent:>6.1}%");
        let row = self.paint(&row, ContentStyle::new().with(fg));
        writeln!(self.out, "{row}")
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn session_started(&mut self, label: &str, total: usize) -> io::Result<()> {
        self.header(&format!("{label}: runner session starts"), theme::TEXT)?;
        writeln!(
            self.out,
            "platform: {}-{}",
            std::env::consts::OS,
            std::env::consts::ARCH
        )?;
        let collected = self.paint(
            &format!("Collected {total} items"),
            ContentStyle::new().with(theme::TEXT).bold(),
        );
        writeln!(self.out, "{collected}\n")
    }

    fn test_finished(&mut self, record: &OutcomeRecord) -> io::Result<()> {
        let status = record.status;
        let badge = self.badge(status);

        let mut label = record.label.clone();
        if let Some(comment) = &record.comment {
            label.push(' ');
            label.push_str(comment);
        }
        let postmessage = record.postmessage.as_deref().unwrap_or_default();
        // icon + badge + spaces + postmessage + "[100%]"
        let reserved = 1 + 4 + 4 + postmessage.chars().count() + 6;
        let pad = self.width.saturating_sub(reserved);
        let label = self.paint(
            &format!("{label:<pad$}"),
            ContentStyle::new().with(status.color()),
        );
        let postmessage = if postmessage.is_empty() {
            String::new()
        } else {
            self.paint(
                postmessage,
                ContentStyle::new().with(theme::CRUST).on(theme::BLUE),
            )
        };
        let percent = self.paint(
            &format!("[{:>3}%]", record.percent),
            ContentStyle::new().with(status.color()).dim(),
        );

        if status == Status::Error {
            writeln!(self.out)?;
        }
        let icon = self.paint(status.icon(), ContentStyle::new().with(status.color()));
        writeln!(self.out, "{icon} {badge} {label} {postmessage} {percent}")?;

        match (status, &record.output) {
            (Status::Error, Some(output)) => {
                self.header(&format!("ERROR: {}", record.label), theme::RED)?;
                let output = self.paint(output, ContentStyle::new().with(theme::RED));
                writeln!(self.out, "{output}")
            }
            (Status::Warning, Some(output)) => {
                let output = self.paint(
                    &format!(" > {output}"),
                    ContentStyle::new().with(theme::YELLOW),
                );
                writeln!(self.out, "{output}\n")
            }
            _ => Ok(()),
        }
    }

    fn session_finished(&mut self, report: &Report) -> io::Result<()> {
        let seconds = report.duration_ms as f64 / 1000.0;
        self.header(
            &format!("{} tests ran in {seconds:.2}s", report.total),
            theme::TEAL,
        )?;

        let heading = self.paint(
            &format!("  {:>5}  {:<18} {:>7}", "N", "Tests encountered", "Percent"),
            ContentStyle::new().with(theme::TEAL).bold(),
        );
        writeln!(self.out, "{heading}")?;
        let total_pct = if report.total == 0 { 0.0 } else { 100.0 };
        self.table_row(report.total, "Total", total_pct, theme::TEAL)?;
        self.table_row(report.passed, "Passed", report.passed_percent(), theme::GREEN)?;
        self.table_row(report.warnings, "Warnings", report.warnings_percent(), theme::YELLOW)?;
        self.table_row(report.errors, "Errors", report.errors_percent(), theme::RED)?;
        self.table_row(report.skipped, "Skipped", report.skipped_percent(), theme::BLUE)?;

        if report.expected_failures > 0 || report.unexpected_passes > 0 {
            let note = self.paint(
                &format!(
                    "  ({} {}, {} {})",
                    report.expected_failures,
                    Outcome::ExpectedFail.display_name(),
                    report.unexpected_passes,
                    Outcome::UnexpectedPass.display_name(),
                ),
                ContentStyle::new().with(theme::OVERLAY0),
            );
            writeln!(self.out, "{note}")?;
        }
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut ConsoleReporter<Vec<u8>>) -> io::Result<()>) -> String {
        let mut reporter = ConsoleReporter::with_width(Vec::new(), false, 60);
        f(&mut reporter).unwrap();
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn header_is_centered() {
        let out = render(|r| r.session_started("math", 2));
        let first = out.lines().next().unwrap();
        assert_eq!(first.chars().count(), 60);
        assert!(first.contains(" math: runner session starts "));
        assert!(out.contains("Collected 2 items"));
    }

    #[test]
    fn passing_line_has_badge_label_and_percent() {
        let record = OutcomeRecord::new(50, "a:[line 3]", Outcome::Pass)
            .with_comment(Some("adds".into()));
        let out = render(|r| r.test_finished(&record));
        assert!(out.starts_with("✔ PASS a:[line 3] adds"));
        assert!(out.trim_end().ends_with("[ 50%]"));
    }

    #[test]
    fn failures_print_their_trace() {
        let record = OutcomeRecord::new(100, "b:[line 9]", Outcome::ExpectedFail)
            .with_output("panicked: boom")
            .with_postmessage("XFAIL");
        let out = render(|r| r.test_finished(&record));
        assert!(out.contains("ERR  b:[line 9]"));
        assert!(out.contains("XFAIL"));
        assert!(out.contains("ERROR: b:[line 9]"));
        assert!(out.contains("panicked: boom"));
    }

    #[test]
    fn warnings_print_their_output() {
        let record = OutcomeRecord::new(100, "c:[line 1]", Outcome::Warning)
            .with_output("Last result is equals current result (3 == 3)");
        let out = render(|r| r.test_finished(&record));
        assert!(out.contains(" > Last result is equals current result (3 == 3)"));
    }

    #[test]
    fn summary_table_lists_counts_and_percentages() {
        let report = Report {
            total: 4,
            passed: 2,
            warnings: 1,
            errors: 1,
            skipped: 1,
            ..Default::default()
        };
        let out = render(|r| r.session_finished(&report));
        assert!(out.contains("4 tests ran in 0.00s"));
        assert!(out.contains("Passed"));
        assert!(out.contains("50.0%"));
        assert!(out.contains("25.0%"));
        assert!(!out.contains("Expected Failures"));
    }
}
