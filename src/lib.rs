//! plan-check library
//!
//! Radiotherapy treatment plan checklist generator.
//!
//! The library evaluates a read-only snapshot of a treatment plan against a
//! fixed catalog of validation rules and produces a severity-ranked,
//! categorized result set for human review:
//! - Result model: [`CheckResult`], [`Severity`], [`Category`]
//! - Rule catalog: patient/plan identity, prescription and dose, beams,
//!   DVH statistics, calculation settings
//! - Ordering and grouping shared by every renderer
//! - Interactive grid, JSON, and persisted plain-text report renderers
//!
//! # Example
//!
//! ```no_run
//! use plan_check::host::snapshot::SnapshotHost;
//! use plan_check::{run_plan_check, PlanCheckConfig};
//!
//! let host = SnapshotHost::load("plan.json").expect("snapshot");
//! let report = run_plan_check(&host, &PlanCheckConfig::default()).expect("plan check");
//! println!("Errors: {}", report.summary().errors);
//! ```

pub mod checks;
pub mod cli;
pub mod config;
pub mod engine;
pub mod host;
pub mod logging;
pub mod version;

use cli::args::{CheckArgs, OutputFormat};
use config::ConfigFile;
use engine::orchestrator::RunOrchestrator;
use engine::result::RunReport;
use host::settle::StatisticsWait;
use host::{HostError, PlanHost};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub use engine::order::{order_results, CategoryGroup, OrderedResults};
pub use engine::result::ResultSummary;

/// Criticality tier of a check outcome.
///
/// The declaration order is the presentation order: `Error < Warning < Info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Severity {
    /// Blocking problem
    Error,
    /// Caution, review before approval
    Warning,
    /// Informational, always paired with a passing outcome
    Info,
}

impl Severity {
    pub fn name(&self) -> &'static str {
        match self {
            Severity::Error => "Error",
            Severity::Warning => "Warning",
            Severity::Info => "Info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Severity a rule assigns to its result when the predicate fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnFailure {
    Error,
    Warning,
}

impl From<OnFailure> for Severity {
    fn from(value: OnFailure) -> Self {
        match value {
            OnFailure::Error => Severity::Error,
            OnFailure::Warning => Severity::Warning,
        }
    }
}

/// Check category for grouping related results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    Patient,
    Plan,
    Prescription,
    Beam,
    Geometry,
    Collimator,
    TreatmentAids,
    #[serde(rename = "DVHStatistics")]
    DvhStatistics,
    CalculationSettings,
}

impl Category {
    /// Display name, also the category sort key.
    pub fn name(&self) -> &'static str {
        match self {
            Category::Patient => "Patient",
            Category::Plan => "Plan",
            Category::Prescription => "Prescription",
            Category::Beam => "Beam",
            Category::Geometry => "Geometry",
            Category::Collimator => "Collimator",
            Category::TreatmentAids => "TreatmentAids",
            Category::DvhStatistics => "DVHStatistics",
            Category::CalculationSettings => "CalculationSettings",
        }
    }

    /// Prescription results lead every severity band.
    pub fn priority(&self) -> u8 {
        match self {
            Category::Prescription => 0,
            _ => 1,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One evaluated check outcome.
///
/// Severity and pass are fixed together at construction; the only other
/// mutation points are the `with_*` builders applied before the rule hands
/// the value over.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    category: Category,
    item: String,
    pass: bool,
    actual_value: Option<String>,
    expected_value: Option<String>,
    severity: Severity,
}

impl CheckResult {
    /// An informational entry that always passes.
    pub fn info(category: Category, item: impl Into<String>) -> Self {
        CheckResult {
            category,
            item: item.into(),
            pass: true,
            actual_value: None,
            expected_value: None,
            severity: Severity::Info,
        }
    }

    /// A pass/fail entry; a passing result is `Info`, a failing one takes `on_failure`.
    pub fn evaluated(category: Category, item: impl Into<String>, pass: bool, on_failure: OnFailure) -> Self {
        CheckResult {
            category,
            item: item.into(),
            pass,
            actual_value: None,
            expected_value: None,
            severity: if pass { Severity::Info } else { on_failure.into() },
        }
    }

    pub fn with_actual(mut self, actual: impl Into<String>) -> Self {
        self.actual_value = Some(actual.into());
        self
    }

    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected_value = Some(expected.into());
        self
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn item(&self) -> &str {
        &self.item
    }

    pub fn pass(&self) -> bool {
        self.pass
    }

    pub fn actual_value(&self) -> Option<&str> {
        self.actual_value.as_deref()
    }

    pub fn expected_value(&self) -> Option<&str> {
        self.expected_value.as_deref()
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }
}

/// Run-aborting failures. Nothing is rendered when one of these occurs.
#[derive(Debug, Error)]
pub enum PlanCheckError {
    #[error("planning host is unavailable")]
    HostUnavailable(#[source] HostError),

    #[error("no current patient is open")]
    NoPatient,

    #[error("failed to retrieve the current patient")]
    PatientLookup(#[source] HostError),

    #[error("no active plan is loaded")]
    NoActivePlan,

    #[error("failed to retrieve the active plan")]
    PlanLookup(#[source] HostError),

    #[error("plan check aborted: {0}")]
    Aborted(String),
}

/// Settings for one plan check run.
#[derive(Debug, Clone)]
pub struct PlanCheckConfig {
    /// How long to wait for the host's DVH statistics
    pub statistics_wait: StatisticsWait,
    /// Folder for the persisted report (None = do not persist)
    pub report_dir: Option<PathBuf>,
    /// Interactive output format
    pub format: OutputFormat,
    /// Color-code grid rows by severity
    pub color: bool,
    /// Hide informational rows in the grid
    pub quiet: bool,
    /// Keep the grid open until the operator presses Enter
    pub wait_for_user: bool,
}

impl Default for PlanCheckConfig {
    fn default() -> Self {
        PlanCheckConfig {
            statistics_wait: StatisticsWait::default(),
            report_dir: None,
            format: OutputFormat::Text,
            color: false,
            quiet: false,
            wait_for_user: false,
        }
    }
}

impl PlanCheckConfig {
    /// Merge command line arguments over the configuration file.
    pub fn from_args(args: &CheckArgs, file: &ConfigFile) -> Self {
        let defaults = StatisticsWait::default();
        let statistics_wait = StatisticsWait {
            settle: args
                .dvh_settle_ms
                .or(file.dvh_settle_ms)
                .map(Duration::from_millis)
                .unwrap_or(defaults.settle),
            timeout: file.dvh_timeout_ms.map(Duration::from_millis).unwrap_or(defaults.timeout),
            poll_interval: file.dvh_poll_ms.map(Duration::from_millis).unwrap_or(defaults.poll_interval),
        };

        let report_dir = if args.no_report {
            None
        } else {
            Some(
                args.report_dir
                    .clone()
                    .or_else(|| file.report_dir.clone())
                    .unwrap_or_else(|| config::default_report_dir(file.report_folder.as_deref())),
            )
        };

        PlanCheckConfig {
            statistics_wait,
            report_dir,
            format: args.format,
            color: !args.no_color && file.color.unwrap_or(true),
            quiet: args.quiet,
            wait_for_user: !args.no_wait,
        }
    }
}

/// Run every rule group against the plan currently open in `host`.
///
/// This is the main library entry point. Rule groups fail independently;
/// only failure to identify the patient or plan aborts the run.
///
/// # Example
///
/// ```no_run
/// use plan_check::host::snapshot::SnapshotHost;
/// use plan_check::{run_plan_check, PlanCheckConfig, Severity};
///
/// let host = SnapshotHost::load("plan.json").expect("snapshot");
/// match run_plan_check(&host, &PlanCheckConfig::default()) {
///     Ok(report) => {
///         for result in report.ordered().iter() {
///             if result.severity() == Severity::Error {
///                 println!("{}: {}", result.category(), result.item());
///             }
///         }
///     }
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_plan_check<H: PlanHost + ?Sized>(host: &H, config: &PlanCheckConfig) -> Result<RunReport, PlanCheckError> {
    RunOrchestrator::new(config.statistics_wait.clone()).run(host)
}
