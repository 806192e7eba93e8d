//! Result accumulation and run reports.

use crate::checks::RuleGroup;
use crate::engine::order::{order_results, OrderedResults};
use crate::host::Patient;
use crate::{CheckResult, Severity};
use chrono::{DateTime, Local};
use serde::Serialize;

/// Result counts by severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    pub errors: u32,
    pub warnings: u32,
    pub infos: u32,
    pub total: u32,
}

impl ResultSummary {
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a CheckResult>) -> Self {
        let mut summary = ResultSummary::default();

        for result in results {
            summary.total += 1;
            match result.severity() {
                Severity::Error => summary.errors += 1,
                Severity::Warning => summary.warnings += 1,
                Severity::Info => summary.infos += 1,
            }
        }

        summary
    }
}

/// How a rule group ended
#[derive(Debug, Clone, PartialEq)]
pub enum GroupStatus {
    Completed { results: usize },
    /// Upstream data absent
    Skipped { reason: String },
    /// Host fault or panic inside the group
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupRecord {
    pub group: RuleGroup,
    pub status: GroupStatus,
}

/// Run-scoped result accumulator.
///
/// Owned by the orchestrator for the duration of one run; results are only
/// appended, never edited.
#[derive(Debug, Default)]
pub struct ResultAccumulator {
    results: Vec<CheckResult>,
    groups: Vec<GroupRecord>,
}

impl ResultAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, results: Vec<CheckResult>) {
        self.results.extend(results);
    }

    pub fn record(&mut self, group: RuleGroup, status: GroupStatus) {
        self.groups.push(GroupRecord { group, status });
    }

    pub(crate) fn len(&self) -> usize {
        self.results.len()
    }

    pub fn into_report(self, patient: Patient, plan_id: String, started_at: DateTime<Local>) -> RunReport {
        RunReport {
            patient,
            plan_id,
            started_at,
            results: self.results,
            groups: self.groups,
        }
    }
}

/// Everything one run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    pub patient: Patient,
    pub plan_id: String,
    pub started_at: DateTime<Local>,
    /// Results in accumulation order
    pub results: Vec<CheckResult>,
    pub groups: Vec<GroupRecord>,
}

impl RunReport {
    pub fn ordered(&self) -> OrderedResults<'_> {
        order_results(&self.results)
    }

    pub fn summary(&self) -> ResultSummary {
        ResultSummary::from_results(&self.results)
    }

    pub fn group_status(&self, group: RuleGroup) -> Option<&GroupStatus> {
        self.groups.iter().find(|r| r.group == group).map(|r| &r.status)
    }

    /// Groups that failed or were skipped
    pub fn incomplete_groups(&self) -> impl Iterator<Item = &GroupRecord> {
        self.groups
            .iter()
            .filter(|r| !matches!(r.status, GroupStatus::Completed { .. }))
    }
}
