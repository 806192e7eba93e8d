//! Full run integration tests.
//!
//! Tests for complete plan check runs, including orchestration, group
//! isolation, and result aggregation.

use crate::mocks::{MockHost, Reply};
use plan_check::checks::RuleGroup;
use plan_check::engine::result::GroupStatus;
use plan_check::host::settle::StatisticsWait;
use plan_check::{run_plan_check, Category, PlanCheckConfig, PlanCheckError, Severity};
use std::time::Duration;

fn config() -> PlanCheckConfig {
    PlanCheckConfig {
        statistics_wait: StatisticsWait::immediate(),
        ..PlanCheckConfig::default()
    }
}

#[test]
fn test_clean_plan_is_all_info() {
    let report = run_plan_check(&MockHost::clean_plan(), &config()).unwrap();
    let summary = report.summary();

    assert_eq!(summary.errors, 0);
    assert_eq!(summary.warnings, 0);
    assert_eq!(summary.infos, 36);
    assert_eq!(summary.total, 36);
    assert_eq!(report.incomplete_groups().count(), 0);
    assert_eq!(report.plan_id, "VMAT001");
}

#[test]
fn test_groups_run_in_fixed_order() {
    let report = run_plan_check(&MockHost::clean_plan(), &config()).unwrap();
    let groups: Vec<RuleGroup> = report.groups.iter().map(|r| r.group).collect();
    assert_eq!(groups, RuleGroup::ALL.to_vec());

    let categories: Vec<Category> = report.results.iter().map(|r| r.category()).collect();
    let first_beam = categories.iter().position(|c| *c == Category::Beam).unwrap();
    let first_rx = categories.iter().position(|c| *c == Category::Prescription).unwrap();
    assert!(first_rx < first_beam);
    assert_eq!(categories[0], Category::Patient);
    assert_eq!(*categories.last().unwrap(), Category::CalculationSettings);
}

#[test]
fn test_flawed_plan_counts() {
    let report = run_plan_check(&MockHost::flawed_plan(), &config()).unwrap();
    let summary = report.summary();

    assert_eq!(summary.errors, 3);
    assert_eq!(summary.warnings, 2);
    assert_eq!(summary.total, 36);

    let failing: Vec<&str> = report
        .ordered()
        .iter()
        .filter(|r| !r.pass())
        .map(|r| r.item())
        .collect();
    assert_eq!(
        failing,
        vec![
            "Field ID format (Beam 2)",
            "Minimum MU (Beam 2)",
            "Plan ID format",
            "Maximum dose ratio",
            "Isocenter consistency",
        ]
    );
}

#[test]
fn test_unverified_max_dose_skips_ratio() {
    let mut host = MockHost::flawed_plan();
    host.max_dose_verified = false;
    let report = run_plan_check(&host, &config()).unwrap();

    assert!(report.results.iter().all(|r| r.item() != "Maximum dose ratio"));
    assert_eq!(report.summary().warnings, 1);
}

#[test]
fn test_missing_prescription_skips_group() {
    let mut host = MockHost::clean_plan();
    host.prescription = Reply::Absent;
    let report = run_plan_check(&host, &config()).unwrap();

    assert!(matches!(
        report.group_status(RuleGroup::Prescription),
        Some(GroupStatus::Skipped { .. })
    ));
    assert!(report.results.iter().all(|r| r.category() != Category::Prescription));
    assert_eq!(report.summary().total, 33);
}

#[test]
fn test_missing_beam_sheet_skips_beams() {
    let mut host = MockHost::clean_plan();
    host.aids = Reply::Absent;
    let report = run_plan_check(&host, &config()).unwrap();

    assert!(matches!(report.group_status(RuleGroup::Beams), Some(GroupStatus::Skipped { .. })));
    assert_eq!(report.summary().total, 13);
}

#[test]
fn test_beam_fault_is_isolated() {
    let mut host = MockHost::clean_plan();
    host.geometry = Reply::Fault("spreadsheet unavailable");
    let report = run_plan_check(&host, &config()).unwrap();

    match report.group_status(RuleGroup::Beams) {
        Some(GroupStatus::Failed { reason }) => assert!(reason.contains("geometry_properties")),
        other => panic!("expected failed beams group, got {:?}", other),
    }
    assert!(report.results.iter().all(|r| r.category() != Category::Beam));
    assert!(report.results.iter().any(|r| r.category() == Category::CalculationSettings));
}

#[test]
fn test_panicking_group_is_isolated() {
    let mut host = MockHost::clean_plan();
    host.calculation = Reply::Panic("calculation settings unreadable");
    let report = run_plan_check(&host, &config()).unwrap();

    assert!(matches!(
        report.group_status(RuleGroup::CalculationSettings),
        Some(GroupStatus::Failed { .. })
    ));
    assert_eq!(report.summary().total, 32);
}

#[test]
fn test_statistics_panic_fails_both_readers() {
    let mut host = MockHost::clean_plan();
    host.structures = Reply::Panic("statistics table corrupt");
    let report = run_plan_check(&host, &config()).unwrap();

    let failed: Vec<RuleGroup> = report.incomplete_groups().map(|r| r.group).collect();
    assert_eq!(failed, vec![RuleGroup::Prescription, RuleGroup::DvhStatistics]);
    assert_eq!(report.summary().total, 31);
}

#[test]
fn test_missing_patient_aborts() {
    let mut host = MockHost::clean_plan();
    host.patient = Reply::Absent;
    assert!(matches!(run_plan_check(&host, &config()), Err(PlanCheckError::NoPatient)));
}

#[test]
fn test_patient_fault_aborts() {
    let mut host = MockHost::clean_plan();
    host.patient = Reply::Fault("host not initialized");
    assert!(matches!(
        run_plan_check(&host, &config()),
        Err(PlanCheckError::PatientLookup(_))
    ));
}

#[test]
fn test_missing_plan_aborts() {
    let mut host = MockHost::clean_plan();
    host.plan_id = Reply::Absent;
    assert!(matches!(run_plan_check(&host, &config()), Err(PlanCheckError::NoActivePlan)));
}

#[test]
fn test_statistics_read_after_ready() {
    let host = MockHost::clean_plan().with_ready_after(3);
    let config = PlanCheckConfig {
        statistics_wait: StatisticsWait {
            settle: Duration::ZERO,
            timeout: Duration::from_secs(5),
            poll_interval: Duration::from_millis(1),
        },
        ..PlanCheckConfig::default()
    };
    let report = run_plan_check(&host, &config).unwrap();

    assert_eq!(host.statistics_requests.get(), 1);
    assert_eq!(host.readiness_probes.get(), 4);
    // One read for the dose ratio, one for the DVH group
    assert_eq!(host.statistics_reads.get(), 2);
    assert!(report
        .results
        .iter()
        .any(|r| r.category() == Category::DvhStatistics && r.severity() == Severity::Info));
}

#[test]
fn test_repeated_runs_are_identical() {
    let host = MockHost::flawed_plan();
    let first = run_plan_check(&host, &config()).unwrap();
    let second = run_plan_check(&host, &config()).unwrap();
    assert_eq!(first.ordered().to_vec(), second.ordered().to_vec());
}
