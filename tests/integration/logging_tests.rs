//! Logging integration tests.
//!
//! Skipped groups must leave a warning in the log, not just a status.

use crate::mocks::{MockHost, Reply};
use plan_check::checks::RuleGroup;
use plan_check::host::settle::StatisticsWait;
use plan_check::{run_plan_check, PlanCheckConfig};
use std::io;
use std::sync::{Arc, Mutex};
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

/// Log sink shared between the subscriber and the test
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes).lines().map(str::to_string).collect()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run against `host` and return the WARN lines it logged.
fn warnings_for(host: &MockHost) -> Vec<String> {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(Level::WARN)
        .finish();

    let config = PlanCheckConfig {
        statistics_wait: StatisticsWait::immediate(),
        ..PlanCheckConfig::default()
    };
    tracing::subscriber::with_default(subscriber, || run_plan_check(host, &config)).unwrap();

    logs.lines().into_iter().filter(|line| line.contains("WARN")).collect()
}

#[test]
fn test_missing_prescription_logs_one_warning() {
    let mut host = MockHost::clean_plan();
    host.prescription = Reply::Absent;

    let warnings = warnings_for(&host);
    assert_eq!(warnings.len(), 1, "{:?}", warnings);
    assert!(warnings[0].contains("rule group skipped"));
    assert!(warnings[0].contains(RuleGroup::Prescription.name()));
}

#[test]
fn test_missing_statistics_logs_one_warning() {
    let mut host = MockHost::clean_plan();
    host.structures = Reply::Absent;

    let warnings = warnings_for(&host);
    assert_eq!(warnings.len(), 1, "{:?}", warnings);
    assert!(warnings[0].contains("rule group skipped"));
    assert!(warnings[0].contains(RuleGroup::DvhStatistics.name()));
}

#[test]
fn test_clean_plan_logs_no_warnings() {
    assert!(warnings_for(&MockHost::clean_plan()).is_empty());
}
