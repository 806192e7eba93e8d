//! Prescription and dose checks.

use super::{GroupOutput, GroupResult};
use crate::host::{DvhSource, HostError, Prescription, PrescriptionSource};
use crate::{Category, CheckResult, OnFailure};

pub const TOTAL_DOSE: &str = "Prescribed dose";
pub const FRACTION_DOSE: &str = "Fraction dose";
pub const MAX_DOSE_RATIO: &str = "Maximum dose ratio";

/// Minimum prescribed dose, total and per fraction (cGy)
pub const MIN_DOSE_CGY: f64 = 1.0;
/// Upper bound for plan maximum dose / prescribed dose
pub const MAX_DOSE_RATIO_LIMIT: f64 = 1.17;

fn dose_check(item: &str, dose_cgy: f64) -> CheckResult {
    CheckResult::evaluated(Category::Prescription, item, dose_cgy >= MIN_DOSE_CGY, OnFailure::Error)
        .with_actual(format!("{:.2} cGy", dose_cgy))
        .with_expected(format!(">= {:.1} cGy", MIN_DOSE_CGY))
}

/// Ratio of plan maximum dose to prescribed dose.
///
/// Only evaluated when both doses are positive; an excessive ratio is a
/// caution rather than a blocking error.
pub fn check_dose_ratio(max_dose_cgy: f64, prescribed_cgy: f64) -> Option<CheckResult> {
    if max_dose_cgy <= 0.0 || prescribed_cgy <= 0.0 {
        return None;
    }

    let ratio = max_dose_cgy / prescribed_cgy;
    Some(
        CheckResult::evaluated(Category::Prescription, MAX_DOSE_RATIO, ratio <= MAX_DOSE_RATIO_LIMIT, OnFailure::Warning)
            .with_actual(format!("{:.3} ({:.1} cGy / {:.1} cGy)", ratio, max_dose_cgy, prescribed_cgy))
            .with_expected(format!("<= {:.2}", MAX_DOSE_RATIO_LIMIT)),
    )
}

/// Highest max dose over all structures, or 0 when the host has not
/// verified the max dose or has no statistics.
pub fn max_plan_dose<H: DvhSource + ?Sized>(host: &H) -> Result<f64, HostError> {
    if !host.max_dose_verified()? {
        return Ok(0.0);
    }

    let max = host
        .structure_statistics()?
        .unwrap_or_default()
        .iter()
        .map(|s| s.max_dose_cgy)
        .fold(0.0, f64::max);

    tracing::debug!(max_dose_cgy = max, limit = MAX_DOSE_RATIO_LIMIT, "plan maximum dose");
    Ok(max)
}

/// Pure rule set over a prescription and the plan maximum dose.
pub fn evaluate_prescription(rx: &Prescription, max_dose_cgy: f64) -> Vec<CheckResult> {
    let mut results = vec![
        dose_check(TOTAL_DOSE, rx.total_dose_cgy),
        dose_check(FRACTION_DOSE, rx.fraction_dose_cgy),
    ];
    results.extend(check_dose_ratio(max_dose_cgy, rx.total_dose_cgy));
    results
}

pub fn check_prescription<H: PrescriptionSource + DvhSource + ?Sized>(host: &H) -> GroupResult {
    let Some(rx) = host.prescription()? else {
        return Ok(GroupOutput::Unavailable("prescription data not available".to_string()));
    };

    let max_dose = max_plan_dose(host)?;
    Ok(GroupOutput::Evaluated(evaluate_prescription(&rx, max_dose)))
}
