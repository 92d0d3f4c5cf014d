//! Handles all user-facing output for the CLI.
//!
//! This module is responsible for colourising the report, printing per-test
//! details and the summary line. Writers are passed in so output can be
//! captured in tests with a `termcolor::Buffer`.

use std::io;

use termcolor::{Color, ColorSpec, WriteColor};

use crate::report::{ReportSummary, ReportTable, TestStatus};

fn status_color(status: TestStatus) -> Color {
    match status {
        TestStatus::Pass => Color::Green,
        TestStatus::Fail => Color::Red,
        TestStatus::Error => Color::Yellow,
    }
}

/// Writes one line per row: status, query name, validator, and result message.
pub fn write_report(out: &mut dyn WriteColor, table: &ReportTable) -> io::Result<()> {
    for row in table.rows() {
        out.set_color(
            ColorSpec::new()
                .set_fg(Some(status_color(row.status)))
                .set_bold(true),
        )?;
        write!(out, "{:<5}", row.status.as_str().to_uppercase())?;
        out.reset()?;
        writeln!(out, " {} [{}]: {}", row.name, row.validator, row.message)?;
        if !row.description.is_empty() {
            writeln!(out, "      {}", row.description)?;
        }
        writeln!(out, "      {}", row.url)?;
    }
    write_summary(out, &table.summary())
}

/// Writes the `total, passed, failed, errored` line.
pub fn write_summary(out: &mut dyn WriteColor, summary: &ReportSummary) -> io::Result<()> {
    write!(out, "\nTest summary: total {}, ", summary.total)?;
    let parts = [
        ("passed", summary.passed, TestStatus::Pass),
        ("failed", summary.failed, TestStatus::Fail),
        ("errored", summary.errored, TestStatus::Error),
    ];
    for (i, (label, count, status)) in parts.iter().enumerate() {
        if i > 0 {
            write!(out, ", ")?;
        }
        out.set_color(ColorSpec::new().set_fg(Some(status_color(*status))))?;
        write!(out, "{}", label)?;
        out.reset()?;
        write!(out, " {}", count)?;
    }
    writeln!(out)
}

/// Writes a block of text followed by a blank line.
pub fn write_detail(out: &mut dyn WriteColor, detail: &str) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_dimmed(true))?;
    write!(out, "{}", detail)?;
    out.reset()?;
    writeln!(out)
}
