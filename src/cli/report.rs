//! Persisted plain-text report.
//!
//! One section per category in the grouped order of the result grid, each a
//! fixed-width listing of item, pass/severity marker, actual and expected
//! value. Written once per run to
//! `PlanCheck_{patientId}_{patientName}_{planId}_{yyyyMMdd_HHmmss}.txt`.

use crate::engine::result::RunReport;
use crate::host::Patient;
use crate::{CheckResult, Severity};
use chrono::{DateTime, Local};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const TITLE: &str = "Plan Check Results";
const FRAME_WIDTH: usize = 82;
const RULE_WIDTH: usize = 80;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to create report folder {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write report {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Pass glyph plus `[E]`/`[W]` for failing severities
pub fn result_mark(result: &CheckResult) -> String {
    let glyph = if result.pass() { "✓" } else { "✗" };
    let tag = match result.severity() {
        Severity::Error => "[E]",
        Severity::Warning => "[W]",
        Severity::Info => "",
    };
    format!("{}{}", glyph, tag)
}

fn table_row(item: &str, mark: &str, actual: &str, expected: &str) -> String {
    format!("{:<30} {:<7} {:<20} {:<20}", item, mark, actual, expected)
        .trim_end()
        .to_string()
}

/// Render the report document.
pub fn render_report(report: &RunReport, generated_at: DateTime<Local>) -> String {
    let ordered = report.ordered();
    let summary = ordered.summary();
    let frame = "=".repeat(FRAME_WIDTH);
    let rule = "-".repeat(RULE_WIDTH);

    let mut out = String::new();
    let _ = writeln!(out, "{}", frame);
    let _ = writeln!(out, "{:^width$}", TITLE, width = FRAME_WIDTH);
    let _ = writeln!(out, "{}", frame);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Patient: {} ({})    Plan: {}",
        report.patient.id_label(),
        report.patient.name_label(),
        report.plan_id
    );
    let _ = writeln!(
        out,
        "Summary: {} errors, {} warnings, {} info items",
        summary.errors, summary.warnings, summary.infos
    );
    let _ = writeln!(out);

    for group in ordered.groups() {
        let _ = writeln!(out, "[{}]", group.category);
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "{}", table_row("Item", "Result", "Actual", "Expected"));
        let _ = writeln!(out, "{}", rule);

        for result in group.results {
            let _ = writeln!(
                out,
                "{}",
                table_row(
                    result.item(),
                    &result_mark(result),
                    result.actual_value().unwrap_or_default(),
                    result.expected_value().unwrap_or_default(),
                )
            );
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "{}", frame);
    let _ = writeln!(out, "Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S"));
    out
}

/// Replace characters that are not valid in file names
fn sanitize(component: &str) -> String {
    component
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

pub fn report_file_name(patient: &Patient, plan_id: &str, timestamp: DateTime<Local>) -> String {
    format!(
        "PlanCheck_{}_{}_{}_{}.txt",
        sanitize(patient.id_label()),
        sanitize(patient.name_label()),
        sanitize(plan_id),
        timestamp.format("%Y%m%d_%H%M%S")
    )
}

/// Write the report into `dir`, creating it if needed.
pub fn save_report(dir: &Path, report: &RunReport, now: DateTime<Local>) -> Result<PathBuf, ReportError> {
    fs::create_dir_all(dir).map_err(|source| ReportError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(report_file_name(&report.patient, &report.plan_id, now));
    fs::write(&path, render_report(report, now)).map_err(|source| ReportError::Write {
        path: path.clone(),
        source,
    })?;

    Ok(path)
}
