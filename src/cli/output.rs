//! Interactive output formatting for plan-check.
//!
//! Provides the result grid (terminal) and JSON formatters. Both render
//! the ordered view from [`RunReport::ordered`] and never sort on their own.
//!
//! # Graceful Degradation
//!
//! - Non-TTY output: color disabled via `--no-color` or the config file
//! - Empty reports: a header, no rows, and a zero summary
//! - Missing actual or expected values: empty cells
//!
//! All formatters produce valid output for any RunReport input.

use crate::cli::args::OutputFormat;
use crate::engine::result::{GroupStatus, RunReport};
use crate::{CheckResult, ResultSummary, Severity};
use serde::Serialize;

/// Trait for output formatters
pub trait OutputFormatter {
    fn format(&self, report: &RunReport) -> String;
}

/// Row coloring by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowTone {
    Error,
    Warning,
    Neutral,
}

impl From<Severity> for RowTone {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Error => RowTone::Error,
            Severity::Warning => RowTone::Warning,
            Severity::Info => RowTone::Neutral,
        }
    }
}

/// One grid row, already stringified
#[derive(Debug, Clone, PartialEq)]
pub struct GridRow {
    pub category: String,
    pub item: String,
    pub pass: bool,
    pub actual: String,
    pub expected: String,
    pub severity: Severity,
    pub tone: RowTone,
}

impl GridRow {
    fn from_result(result: &CheckResult) -> Self {
        GridRow {
            category: result.category().name().to_string(),
            item: result.item().to_string(),
            pass: result.pass(),
            actual: result.actual_value().unwrap_or_default().to_string(),
            expected: result.expected_value().unwrap_or_default().to_string(),
            severity: result.severity(),
            tone: result.severity().into(),
        }
    }

    fn cells(&self) -> [String; 6] {
        [
            self.category.clone(),
            self.item.clone(),
            self.pass.to_string(),
            self.actual.clone(),
            self.expected.clone(),
            self.severity.name().to_string(),
        ]
    }
}

/// Rows of the interactive view plus its summary counts
#[derive(Debug, Clone)]
pub struct ResultGrid {
    pub rows: Vec<GridRow>,
    pub summary: ResultSummary,
}

impl ResultGrid {
    pub const COLUMNS: [&'static str; 6] = ["Category", "Item", "Pass", "ActualValue", "ExpectedValue", "Severity"];

    /// Every result in presentation order
    pub fn build(report: &RunReport) -> Self {
        let ordered = report.ordered();
        ResultGrid {
            rows: ordered.iter().map(GridRow::from_result).collect(),
            summary: ordered.summary(),
        }
    }

    pub fn summary_line(&self) -> String {
        format!(
            "Summary: {} errors, {} warnings, {} info items",
            self.summary.errors, self.summary.warnings, self.summary.infos
        )
    }
}

/// Result grid for the terminal
pub struct TerminalFormatter {
    color: bool,
    quiet: bool,
}

impl TerminalFormatter {
    pub fn new(color: bool, quiet: bool) -> Self {
        TerminalFormatter { color, quiet }
    }

    fn tone(&self, text: &str, tone: RowTone) -> String {
        let code = match tone {
            RowTone::Error => "30;101",
            RowTone::Warning => "30;103",
            RowTone::Neutral => return text.to_string(),
        };
        if self.color {
            format!("\x1b[{}m{}\x1b[0m", code, text)
        } else {
            text.to_string()
        }
    }

    fn gray(&self, text: &str) -> String {
        if self.color {
            format!("\x1b[90m{}\x1b[0m", text)
        } else {
            text.to_string()
        }
    }
}

fn pad_row(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

impl OutputFormatter for TerminalFormatter {
    fn format(&self, report: &RunReport) -> String {
        let grid = ResultGrid::build(report);
        let rows: Vec<&GridRow> = grid
            .rows
            .iter()
            .filter(|row| !(self.quiet && row.severity == Severity::Info))
            .collect();

        let header: Vec<String> = ResultGrid::COLUMNS.iter().map(|c| c.to_string()).collect();
        let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
        let cells: Vec<[String; 6]> = rows.iter().map(|row| row.cells()).collect();
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row.iter()) {
                *width = (*width).max(cell.chars().count());
            }
        }
        let rule = "-".repeat(widths.iter().sum::<usize>() + 2 * (widths.len() - 1));

        let mut output = String::new();
        output.push_str(&format!(
            "Plan check: {} ({}) / {}\n",
            report.patient.id_label(),
            report.patient.name_label(),
            report.plan_id
        ));
        output.push_str(&rule);
        output.push('\n');
        output.push_str(&pad_row(&header, &widths));
        output.push('\n');
        output.push_str(&rule);
        output.push('\n');

        for (row, cells) in rows.iter().zip(&cells) {
            output.push_str(&self.tone(&pad_row(cells, &widths), row.tone));
            output.push('\n');
        }

        output.push_str(&rule);
        output.push('\n');

        for record in report.incomplete_groups() {
            let note = match &record.status {
                GroupStatus::Skipped { reason } => format!("{} skipped: {}", record.group, reason),
                GroupStatus::Failed { reason } => format!("{} failed: {}", record.group, reason),
                GroupStatus::Completed { .. } => continue,
            };
            output.push_str(&self.gray(&note));
            output.push('\n');
        }

        output.push_str(&grid.summary_line());
        output
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonGroup {
    group: &'static str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    patient_id: &'a str,
    patient_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    clinic: Option<&'a str>,
    plan_id: &'a str,
    started_at: String,
    summary: ResultSummary,
    results: Vec<&'a CheckResult>,
    groups: Vec<JsonGroup>,
}

/// JSON formatter
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        JsonFormatter { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &RunReport) -> String {
        let ordered = report.ordered();
        let groups = report
            .groups
            .iter()
            .map(|record| {
                let (status, reason) = match &record.status {
                    GroupStatus::Completed { .. } => ("completed", None),
                    GroupStatus::Skipped { reason } => ("skipped", Some(reason.clone())),
                    GroupStatus::Failed { reason } => ("failed", Some(reason.clone())),
                };
                JsonGroup {
                    group: record.group.name(),
                    status,
                    reason,
                }
            })
            .collect();

        let doc = JsonReport {
            patient_id: report.patient.id_label(),
            patient_name: report.patient.name_label(),
            clinic: report.patient.clinic.as_deref(),
            plan_id: &report.plan_id,
            started_at: report.started_at.to_rfc3339(),
            summary: ordered.summary(),
            results: ordered.iter().collect(),
            groups,
        };

        let rendered = if self.pretty {
            serde_json::to_string_pretty(&doc)
        } else {
            serde_json::to_string(&doc)
        };
        rendered.unwrap_or_else(|e| format!("{{\"error\":\"failed to serialize report: {}\"}}", e))
    }
}

/// Get the appropriate formatter for the output format
pub fn get_formatter(format: OutputFormat, color: bool, quiet: bool) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(TerminalFormatter::new(color, quiet)),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
    }
}
