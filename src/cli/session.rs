//! One interactive plan check session.
//!
//! Evaluate, show the grid, wait for the operator to dismiss it, then
//! persist the report. The report is written after the interactive view
//! closes and from the same result set.

use crate::cli::output::get_formatter;
use crate::cli::report::{save_report, ReportError};
use crate::engine::result::RunReport;
use crate::host::PlanHost;
use crate::{run_plan_check, PlanCheckConfig, PlanCheckError, ResultSummary};
use chrono::Local;
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{error, info};

/// Exit code when every result is informational
pub const EXIT_CLEAN: u8 = 0;
/// Exit code when any result is an error
pub const EXIT_ERRORS: u8 = 1;
/// Exit code when there are warnings but no errors
pub const EXIT_WARNINGS: u8 = 2;
/// Exit code for fatal failures, and for display or persistence failures
pub const EXIT_FATAL: u8 = 3;

/// Outcome of a completed session
#[derive(Debug)]
pub struct SessionSummary {
    pub report: RunReport,
    pub summary: ResultSummary,
    pub report_path: Option<PathBuf>,
    pub report_error: Option<ReportError>,
    /// First failure writing to the terminal or reading the dismissal
    pub display_error: Option<io::Error>,
}

impl SessionSummary {
    pub fn exit_code(&self) -> u8 {
        if self.report_error.is_some() || self.display_error.is_some() {
            EXIT_FATAL
        } else if self.summary.errors > 0 {
            EXIT_ERRORS
        } else if self.summary.warnings > 0 {
            EXIT_WARNINGS
        } else {
            EXIT_CLEAN
        }
    }
}

/// Run a full session against `host`, writing to `out` and reading the
/// dismissal from `input`.
///
/// Terminal failures do not stop the report from being saved; they are
/// logged and surface through [`SessionSummary::display_error`].
pub fn run_session<H: PlanHost + ?Sized>(
    host: &H,
    config: &PlanCheckConfig,
    out: &mut dyn Write,
    input: &mut dyn BufRead,
) -> Result<SessionSummary, PlanCheckError> {
    let report = run_plan_check(host, config)?;
    let summary = report.summary();
    let mut display_error = None;

    let formatter = get_formatter(config.format, config.color, config.quiet);
    note_display(&mut display_error, "write results", writeln!(out, "{}", formatter.format(&report)));

    let Some(dir) = config.report_dir.as_deref() else {
        return Ok(SessionSummary {
            report,
            summary,
            report_path: None,
            report_error: None,
            display_error,
        });
    };

    // Nothing to dismiss if the grid never reached the terminal
    if config.wait_for_user && display_error.is_none() {
        note_display(&mut display_error, "prompt for dismissal", wait_for_dismissal(out, input));
    }

    let (report_path, report_error) = match save_report(dir, &report, Local::now()) {
        Ok(path) => {
            info!(path = %path.display(), "report saved");
            let shown = writeln!(out, "Plan check complete. Report saved to:\n{}", path.display());
            note_display(&mut display_error, "write confirmation", shown);
            (Some(path), None)
        }
        Err(e) => {
            error!(error = %e, cause = ?e.source().map(|s| s.to_string()), "failed to save report");
            let shown = writeln!(out, "Error while saving the report: {}", e);
            note_display(&mut display_error, "write confirmation", shown);
            (None, Some(e))
        }
    };

    Ok(SessionSummary {
        report,
        summary,
        report_path,
        report_error,
        display_error,
    })
}

fn wait_for_dismissal(out: &mut dyn Write, input: &mut dyn BufRead) -> io::Result<()> {
    write!(out, "Press Enter to save the report...")?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(())
}

/// Log a terminal failure and keep the first one.
fn note_display(slot: &mut Option<io::Error>, step: &str, result: io::Result<()>) {
    if let Err(e) = result {
        error!(step, error = %e, "terminal output failed");
        slot.get_or_insert(e);
    }
}
