//! Session and report persistence tests.

use crate::mocks::{MockHost, Reply};
use plan_check::cli::session::{run_session, EXIT_CLEAN, EXIT_ERRORS, EXIT_FATAL, EXIT_WARNINGS};
use plan_check::host::settle::StatisticsWait;
use plan_check::{PlanCheckConfig, PlanCheckError};
use std::fs;
use std::io::{self, Cursor, Write};
use std::path::Path;

/// Stdout whose reader has gone away
struct ClosedPipe;

impl Write for ClosedPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "reader closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "reader closed"))
    }
}

/// Stdin that cannot be read
struct ClosedInput;

impl io::Read for ClosedInput {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::other("stdin closed"))
    }
}

impl io::BufRead for ClosedInput {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        Err(io::Error::other("stdin closed"))
    }

    fn consume(&mut self, _amt: usize) {}
}

fn config(report_dir: Option<&Path>) -> PlanCheckConfig {
    PlanCheckConfig {
        statistics_wait: StatisticsWait::immediate(),
        report_dir: report_dir.map(Path::to_path_buf),
        ..PlanCheckConfig::default()
    }
}

#[test]
fn test_session_saves_report() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("PlanCheck");
    let mut out = Vec::new();

    let session = run_session(
        &MockHost::clean_plan(),
        &config(Some(target.as_path())),
        &mut out,
        &mut Cursor::new(Vec::new()),
    )
    .unwrap();

    let path = session.report_path.as_ref().unwrap();
    let name = path.file_name().unwrap().to_string_lossy();
    assert!(name.starts_with("PlanCheck_12345_DOE^JANE_VMAT001_"));
    assert!(name.ends_with(".txt"));
    assert!(fs::read_to_string(path).unwrap().contains("Summary: 0 errors, 0 warnings, 36 info items"));

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("Report saved to:"));
    assert_eq!(session.exit_code(), EXIT_CLEAN);
}

#[test]
fn test_report_written_after_dismissal() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(Some(dir.path()));
    cfg.wait_for_user = true;
    let mut out = Vec::new();

    let session = run_session(&MockHost::flawed_plan(), &cfg, &mut out, &mut Cursor::new(b"\n".to_vec())).unwrap();

    let printed = String::from_utf8(out).unwrap();
    let grid = printed.find("Summary:").unwrap();
    let prompt = printed.find("Press Enter").unwrap();
    let saved = printed.find("Report saved to:").unwrap();
    assert!(grid < prompt && prompt < saved);
    assert_eq!(session.exit_code(), EXIT_ERRORS);
}

#[test]
fn test_no_report_dir_skips_persistence() {
    let mut out = Vec::new();
    let session = run_session(&MockHost::clean_plan(), &config(None), &mut out, &mut Cursor::new(Vec::new())).unwrap();

    assert!(session.report_path.is_none());
    assert!(session.report_error.is_none());
    assert!(session.display_error.is_none());
    assert!(!String::from_utf8(out).unwrap().contains("Report saved"));
}

#[test]
fn test_warnings_only_exit_code() {
    let mut host = MockHost::clean_plan();
    host.aids = Reply::Value(vec![crate::mocks::aids("1", false), crate::mocks::aids("2", true)]);

    let session = run_session(&host, &config(None), &mut Vec::new(), &mut Cursor::new(Vec::new())).unwrap();
    assert_eq!(session.summary.errors, 0);
    assert_eq!(session.summary.warnings, 1);
    assert_eq!(session.exit_code(), EXIT_WARNINGS);
}

#[test]
fn test_save_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-folder");
    fs::write(&blocker, "x").unwrap();
    let mut out = Vec::new();

    let session = run_session(
        &MockHost::clean_plan(),
        &config(Some(blocker.as_path())),
        &mut out,
        &mut Cursor::new(Vec::new()),
    )
    .unwrap();

    assert!(session.report_error.is_some());
    assert!(session.report_path.is_none());
    assert!(String::from_utf8(out).unwrap().contains("Error while saving the report"));
    assert_eq!(session.exit_code(), EXIT_FATAL);
}

#[test]
fn test_report_saved_when_terminal_is_gone() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(Some(dir.path()));
    cfg.wait_for_user = true;

    let session = run_session(&MockHost::flawed_plan(), &cfg, &mut ClosedPipe, &mut Cursor::new(Vec::new())).unwrap();

    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    assert!(session.report_path.is_some());
    assert_eq!(session.display_error.as_ref().unwrap().kind(), io::ErrorKind::BrokenPipe);
    assert_eq!(session.exit_code(), EXIT_FATAL);
}

#[test]
fn test_report_saved_when_dismissal_cannot_be_read() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(Some(dir.path()));
    cfg.wait_for_user = true;
    let mut out = Vec::new();

    let session = run_session(&MockHost::clean_plan(), &cfg, &mut out, &mut ClosedInput).unwrap();

    assert!(session.report_path.is_some());
    assert!(session.display_error.is_some());
    assert!(String::from_utf8(out).unwrap().contains("Report saved to:"));
    assert_eq!(session.exit_code(), EXIT_FATAL);
}

#[test]
fn test_fatal_error_produces_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let mut host = MockHost::clean_plan();
    host.plan_id = Reply::Fault("plan not loaded");
    let mut out = Vec::new();

    let result = run_session(&host, &config(Some(dir.path())), &mut out, &mut Cursor::new(Vec::new()));

    assert!(matches!(result, Err(PlanCheckError::PlanLookup(_))));
    assert!(out.is_empty());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}
