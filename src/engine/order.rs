//! Result ordering and grouping.
//!
//! The single source of presentation order. Results are sorted by severity
//! (`Error`, `Warning`, `Info`), then Prescription ahead of every other
//! category, then category name, then item name. The sort is stable, so
//! results that tie on every key keep their accumulation order and the
//! output is fully deterministic. Renderers consume [`OrderedResults`] and
//! never sort on their own.

use crate::engine::result::ResultSummary;
use crate::{Category, CheckResult};
use std::cmp::Ordering;

/// Presentation order of two results
pub fn compare(a: &CheckResult, b: &CheckResult) -> Ordering {
    a.severity()
        .cmp(&b.severity())
        .then_with(|| a.category().priority().cmp(&b.category().priority()))
        .then_with(|| a.category().name().cmp(b.category().name()))
        .then_with(|| a.item().cmp(b.item()))
}

/// Read-only ordered view over a result set
#[derive(Debug, Clone)]
pub struct OrderedResults<'a> {
    results: Vec<&'a CheckResult>,
}

/// Results of one category, in presentation order
#[derive(Debug, Clone)]
pub struct CategoryGroup<'a> {
    pub category: Category,
    pub results: Vec<&'a CheckResult>,
}

pub fn order_results(results: &[CheckResult]) -> OrderedResults<'_> {
    let mut ordered: Vec<&CheckResult> = results.iter().collect();
    ordered.sort_by(|a, b| compare(a, b));
    OrderedResults { results: ordered }
}

impl<'a> OrderedResults<'a> {
    pub fn iter(&self) -> impl Iterator<Item = &'a CheckResult> + '_ {
        self.results.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn summary(&self) -> ResultSummary {
        ResultSummary::from_results(self.iter())
    }

    /// Group by category. Groups appear in order of their first result and
    /// keep the sorted order within.
    pub fn groups(&self) -> Vec<CategoryGroup<'a>> {
        let mut groups: Vec<CategoryGroup<'a>> = Vec::new();

        for result in self.iter() {
            match groups.iter_mut().find(|g| g.category == result.category()) {
                Some(group) => group.results.push(result),
                None => groups.push(CategoryGroup {
                    category: result.category(),
                    results: vec![result],
                }),
            }
        }

        groups
    }

    /// Owned copy of the ordered results
    pub fn to_vec(&self) -> Vec<CheckResult> {
        self.iter().cloned().collect()
    }
}
