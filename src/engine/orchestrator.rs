//! Run orchestration.
//!
//! Acquires the patient and plan from the host, then evaluates every rule
//! group in a fixed order, each inside its own failure boundary.
//!
//! # Graceful Degradation
//!
//! - Absent upstream data: group skipped with a warning, no results
//! - Host fault inside a group: logged as an error, group contributes nothing
//! - Panic inside a group: caught via std::panic::catch_unwind, same as a fault
//! - Missing patient or plan: the run aborts before any group runs
//!
//! A group that fails part way never leaves partial results behind, since
//! groups hand back their results only on success.

use crate::checks::{beams, calculation, dvh, identity, prescription, GroupOutput, GroupResult, RuleGroup};
use crate::engine::result::{GroupStatus, ResultAccumulator, RunReport};
use crate::host::settle::StatisticsWait;
use crate::host::PlanHost;
use crate::PlanCheckError;
use chrono::Local;
use std::any::Any;
use std::error::Error;
use std::panic::{self, AssertUnwindSafe};
use tracing::{error, info, warn};

/// Evaluates the rule catalog against one plan
#[derive(Debug, Clone, Default)]
pub struct RunOrchestrator {
    statistics_wait: StatisticsWait,
}

impl RunOrchestrator {
    pub fn new(statistics_wait: StatisticsWait) -> Self {
        RunOrchestrator { statistics_wait }
    }

    /// Run every rule group against the plan open in `host`.
    pub fn run<H: PlanHost + ?Sized>(&self, host: &H) -> Result<RunReport, PlanCheckError> {
        let started_at = Local::now();

        let patient = host
            .current_patient()
            .map_err(PlanCheckError::PatientLookup)?
            .ok_or(PlanCheckError::NoPatient)?;
        let plan_id = host
            .active_plan_id()
            .map_err(PlanCheckError::PlanLookup)?
            .ok_or(PlanCheckError::NoActivePlan)?;

        info!(plan_id = %plan_id, "starting plan check");

        let mut acc = ResultAccumulator::new();

        for group in RuleGroup::ALL {
            let status = run_group(group, || match group {
                RuleGroup::Identity => Ok(identity::check_identity(&patient, &plan_id)),
                RuleGroup::Prescription => prescription::check_prescription(host),
                RuleGroup::Beams => beams::check_beams(host),
                RuleGroup::DvhStatistics => dvh::check_dvh_statistics(host, &self.statistics_wait),
                RuleGroup::CalculationSettings => calculation::check_calculation_settings(host),
            });

            let status = match status {
                Ok(results) => {
                    let count = results.len();
                    acc.extend(results);
                    GroupStatus::Completed { results: count }
                }
                Err(status) => status,
            };
            acc.record(group, status);
        }

        info!(plan_id = %plan_id, results = acc.len(), "plan check evaluated");
        Ok(acc.into_report(patient, plan_id, started_at))
    }
}

/// Evaluate one group inside its failure boundary.
fn run_group<F>(group: RuleGroup, evaluate: F) -> Result<Vec<crate::CheckResult>, GroupStatus>
where
    F: FnOnce() -> GroupResult,
{
    match panic::catch_unwind(AssertUnwindSafe(evaluate)) {
        Ok(Ok(GroupOutput::Evaluated(results))) => Ok(results),
        Ok(Ok(GroupOutput::Unavailable(reason))) => {
            warn!(group = %group, %reason, "rule group skipped");
            Err(GroupStatus::Skipped { reason })
        }
        Ok(Err(e)) => {
            error!(group = %group, error = %e, cause = ?e.source().map(|s| s.to_string()), "rule group failed");
            Err(GroupStatus::Failed { reason: e.to_string() })
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!(group = %group, panic = %message, "rule group panicked");
            Err(GroupStatus::Failed {
                reason: format!("panicked: {}", message),
            })
        }
    }
}

pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
