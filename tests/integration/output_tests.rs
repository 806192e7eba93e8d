//! Output integration tests.
//!
//! The result grid and the persisted report must list results in the same
//! order and report the same counts.

use crate::mocks::{MockHost, Reply};
use chrono::Local;
use plan_check::cli::output::{get_formatter, ResultGrid};
use plan_check::cli::args::OutputFormat;
use plan_check::cli::report::render_report;
use plan_check::host::settle::StatisticsWait;
use plan_check::{run_plan_check, PlanCheckConfig};

fn config() -> PlanCheckConfig {
    PlanCheckConfig {
        statistics_wait: StatisticsWait::immediate(),
        ..PlanCheckConfig::default()
    }
}

/// `(category, items)` per report section, in document order
fn report_sections(text: &str) -> Vec<(String, Vec<String>)> {
    let mut sections: Vec<(String, Vec<String>)> = Vec::new();
    let mut lines = text.lines();

    while let Some(line) = lines.next() {
        let Some(category) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) else {
            continue;
        };
        // rule, header, rule
        lines.next();
        lines.next();
        lines.next();

        let mut items = Vec::new();
        for row in lines.by_ref() {
            if row.is_empty() {
                break;
            }
            let mark = row.find(['✓', '✗']).expect("result mark");
            items.push(row[..mark].trim_end().to_string());
        }
        sections.push((category.to_string(), items));
    }

    sections
}

fn assert_grid_matches_report(host: &MockHost) {
    let report = run_plan_check(host, &config()).unwrap();
    let grid = ResultGrid::build(&report);
    let text = render_report(&report, Local::now());
    let sections = report_sections(&text);

    let listed: usize = sections.iter().map(|(_, items)| items.len()).sum();
    assert_eq!(listed, grid.rows.len());

    for (category, items) in &sections {
        let grid_items: Vec<&str> = grid
            .rows
            .iter()
            .filter(|row| &row.category == category)
            .map(|row| row.item.as_str())
            .collect();
        assert_eq!(&grid_items, items, "order differs for {}", category);
    }

    assert!(text.contains(&grid.summary_line()));
}

#[test]
fn test_grid_and_report_agree_on_clean_plan() {
    assert_grid_matches_report(&MockHost::clean_plan());
}

#[test]
fn test_grid_and_report_agree_on_flawed_plan() {
    assert_grid_matches_report(&MockHost::flawed_plan());
}

#[test]
fn test_grid_and_report_agree_with_failed_group() {
    let mut host = MockHost::flawed_plan();
    host.geometry = Reply::Fault("spreadsheet unavailable");
    assert_grid_matches_report(&host);
}

#[test]
fn test_report_sections_follow_first_appearance() {
    let report = run_plan_check(&MockHost::flawed_plan(), &config()).unwrap();
    let text = render_report(&report, Local::now());
    let categories: Vec<String> = report_sections(&text).into_iter().map(|(c, _)| c).collect();

    assert_eq!(&categories[..3], &["Beam", "Plan", "Prescription"]);
    let unique: std::collections::HashSet<&String> = categories.iter().collect();
    assert_eq!(unique.len(), categories.len());
}

#[test]
fn test_text_grid_rows_are_ordered() {
    let report = run_plan_check(&MockHost::flawed_plan(), &config()).unwrap();
    let output = get_formatter(OutputFormat::Text, false, false).format(&report);

    let mu = output.find("Minimum MU (Beam 2)").unwrap();
    let plan = output.find("Plan ID format").unwrap();
    let ratio = output.find("Maximum dose ratio").unwrap();
    let patient = output.find("Patient ID").unwrap();
    assert!(mu < plan && plan < ratio && ratio < patient);
    assert!(output.ends_with("Summary: 3 errors, 2 warnings, 31 info items"));
}

#[test]
fn test_json_output_matches_grid_order() {
    let report = run_plan_check(&MockHost::flawed_plan(), &config()).unwrap();
    let grid = ResultGrid::build(&report);
    let output = get_formatter(OutputFormat::Json, false, false).format(&report);
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();

    let items: Vec<&str> = value["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["item"].as_str().unwrap())
        .collect();
    let grid_items: Vec<&str> = grid.rows.iter().map(|r| r.item.as_str()).collect();
    assert_eq!(items, grid_items);
    assert_eq!(value["summary"]["warnings"], 2);
}
