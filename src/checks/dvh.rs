//! DVH statistics checks for target structures.

use super::{GroupOutput, GroupResult};
use crate::host::settle::{wait_for_statistics, StatisticsWait, WaitOutcome};
use crate::host::{DvhSource, StructureStatistics};
use crate::{Category, CheckResult};

pub const CONFORMITY_INDEX: &str = "CI";
pub const HETEROGENEITY_INDEX: &str = "HI";

/// Structures whose name contains this marker are treated as targets.
pub const TARGET_MARKER: &str = "PTV";

pub fn is_target(structure: &StructureStatistics) -> bool {
    structure.name.contains(TARGET_MARKER)
}

pub fn structure_checks(structure: &StructureStatistics) -> [CheckResult; 2] {
    [
        CheckResult::info(
            Category::DvhStatistics,
            format!("{} ({})", CONFORMITY_INDEX, structure.name),
        )
        .with_actual(format!("{:.2}", structure.conformity_index))
        .with_expected("Conformity Index (CI)"),
        CheckResult::info(
            Category::DvhStatistics,
            format!("{} ({})", HETEROGENEITY_INDEX, structure.name),
        )
        .with_actual(format!("{:.2}", structure.heterogeneity_index))
        .with_expected("Heterogeneity Index (HI)"),
    ]
}

pub fn evaluate_statistics(structures: &[StructureStatistics]) -> Vec<CheckResult> {
    structures
        .iter()
        .filter(|s| is_target(s))
        .flat_map(structure_checks)
        .collect()
}

/// Request statistics, wait for the host, then read them once.
pub fn check_dvh_statistics<H: DvhSource + ?Sized>(host: &H, wait: &StatisticsWait) -> GroupResult {
    host.request_statistics()?;

    match wait_for_statistics(host, wait) {
        WaitOutcome::Ready { polls } => tracing::debug!(polls, "DVH statistics ready"),
        WaitOutcome::Settled => tracing::debug!(settle_ms = wait.settle.as_millis() as u64, "DVH statistics settled"),
        WaitOutcome::TimedOut { polls } => tracing::warn!(
            polls,
            timeout_ms = wait.timeout.as_millis() as u64,
            "DVH statistics still pending after timeout; reading current values"
        ),
    }

    match host.structure_statistics()? {
        Some(structures) => Ok(GroupOutput::Evaluated(evaluate_statistics(&structures))),
        None => Ok(GroupOutput::Unavailable("DVH statistics not available".to_string())),
    }
}
