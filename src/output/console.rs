//! Console progress and end-of-run summary
//!
//! These lines are the tool's user-facing output and go straight to stdout,
//! colored when stdout is a terminal; diagnostics go through `tracing`.

use crate::audit::{AuditOutcome, CheckDetail};
use crate::session::CrawlSession;
use std::io::{self, IsTerminal, Write};
use termcolor::{Buffer, Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

const CROSS: &str = "\u{2717}";
const CHECK: &str = "\u{2713}";

/// Timestamp format for the run start line
const STARTED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn heading() -> ColorSpec {
    let mut spec = ColorSpec::new();
    spec.set_bold(true).set_underline(true);
    spec
}

fn fg(color: Color) -> ColorSpec {
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(color));
    spec
}

/// Writes `text` in `spec`, then resets the color
fn colored<W: WriteColor>(out: &mut W, spec: &ColorSpec, text: &str) -> io::Result<()> {
    out.set_color(spec)?;
    write!(out, "{}", text)?;
    out.reset()
}

/// Writes the failing checks of one page, grouped under category headers
pub fn write_page_progress<W: WriteColor>(out: &mut W, outcome: &AuditOutcome) -> io::Result<()> {
    let page = outcome.url.as_str().trim_end_matches('/');
    let grey = fg(Color::Ansi256(8));

    for category in outcome.failing_categories() {
        writeln!(out)?;
        colored(out, &heading(), &category.name)?;
        writeln!(out)?;

        for check in &category.failed_checks {
            write!(out, "{} ", page)?;
            colored(out, &fg(Color::Red), CROSS)?;
            writeln!(out, " {} - {}", check.id, check.description)?;

            match &check.detail {
                CheckDetail::Resources(urls) => {
                    for url in urls {
                        colored(out, &grey, &format!("   {}", url))?;
                        writeln!(out)?;
                    }
                }
                CheckDetail::NodeGroups(groups) => {
                    for group in groups {
                        writeln!(out, "   {}", group.message)?;
                        for node in &group.nodes {
                            colored(out, &grey, &format!("     {}", node))?;
                            writeln!(out)?;
                        }
                    }
                }
                CheckDetail::CountOnly => {}
            }
        }
    }

    Ok(())
}

/// Writes the end-of-run summary block
pub fn write_summary<W: WriteColor>(out: &mut W, session: &CrawlSession) -> io::Result<()> {
    let red = fg(Color::Red);

    writeln!(out)?;
    writeln!(out)?;
    colored(out, &heading(), "Lighthouse Summary")?;
    writeln!(out)?;
    writeln!(
        out,
        "  Started At: {}",
        session.started_at().format(STARTED_AT_FORMAT)
    )?;
    writeln!(out, "  Total Pages Scanned: {}", session.pages_scanned())?;
    writeln!(
        out,
        "  Total Auditing Time: {} ms",
        session.elapsed().as_millis()
    )?;
    writeln!(
        out,
        "  Average Page Audit Time: {} ms",
        session.average_audit_time().as_millis()
    )?;
    write!(out, "  Total Audits Passed: {} ", session.passed_audits())?;
    colored(out, &fg(Color::Green), CHECK)?;
    writeln!(out)?;

    if session.audit_failures() > 0 {
        write!(out, "  Audit Failures: {} ", session.audit_failures())?;
        colored(out, &red, CROSS)?;
        writeln!(out)?;
    }

    if session.total_violations() == 0 {
        writeln!(out, "  Total Violations: None! \\o/")?;
        return Ok(());
    }

    writeln!(out, "  Total Violations:")?;
    for (category, count) in session.violation_counts() {
        write!(out, "    {}: {} ", category, count)?;
        colored(out, &red, CROSS)?;
        writeln!(out)?;
    }
    if session.audit_failures() > 0 {
        write!(out, "    Failed Audits: {} ", session.audit_failures())?;
        colored(out, &red, CROSS)?;
        writeln!(out)?;
    }

    Ok(())
}

/// Renders the summary block as plain text
pub fn format_summary(session: &CrawlSession) -> String {
    let mut buffer = Buffer::no_color();
    // writes into memory cannot fail
    let _ = write_summary(&mut buffer, session);
    String::from_utf8_lossy(buffer.as_slice()).into_owned()
}

/// Color only when stdout is a terminal
fn stdout_color_choice() -> ColorChoice {
    if io::stdout().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

/// Prints the failing checks of one page to stdout
pub fn print_page_progress(outcome: &AuditOutcome) {
    let stdout = StandardStream::stdout(stdout_color_choice());
    let mut out = stdout.lock();
    if let Err(e) = write_page_progress(&mut out, outcome) {
        tracing::debug!("Failed to print progress for {}: {}", outcome.url, e);
    }
}

/// Prints the end-of-run summary block to stdout
pub fn print_summary(session: &CrawlSession) {
    let stdout = StandardStream::stdout(stdout_color_choice());
    let mut out = stdout.lock();
    if let Err(e) = write_summary(&mut out, session) {
        tracing::debug!("Failed to print summary: {}", e);
    }
}
