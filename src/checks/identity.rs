//! Patient and plan identity checks.

use super::{GroupOutput, NOT_AVAILABLE};
use crate::host::Patient;
use crate::{Category, CheckResult, OnFailure};
use regex::Regex;
use std::sync::LazyLock;

pub const PATIENT_ID: &str = "Patient ID";
pub const PATIENT_NAME: &str = "Patient name";
pub const CLINIC: &str = "Clinic";
pub const PLAN_ID_FORMAT: &str = "Plan ID format";

/// Technique prefix followed by a three-digit sequence number.
static PLAN_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(3D|VMAT|DCAT)[0-9]{3}$").expect("plan ID pattern"));

pub fn is_valid_plan_id(plan_id: &str) -> bool {
    PLAN_ID_PATTERN.is_match(plan_id)
}

/// Plan ID must be `3D`, `VMAT`, or `DCAT` followed by exactly three digits.
pub fn check_plan_id(plan_id: &str) -> CheckResult {
    CheckResult::evaluated(Category::Plan, PLAN_ID_FORMAT, is_valid_plan_id(plan_id), OnFailure::Error)
        .with_actual(plan_id)
        .with_expected("(3D|VMAT|DCAT) + 3 digits")
}

pub fn check_identity(patient: &Patient, plan_id: &str) -> GroupOutput {
    let field = |value: &Option<String>| value.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string());

    GroupOutput::Evaluated(vec![
        CheckResult::info(Category::Patient, PATIENT_ID).with_actual(field(&patient.id)),
        CheckResult::info(Category::Patient, PATIENT_NAME).with_actual(field(&patient.name)),
        CheckResult::info(Category::Patient, CLINIC).with_actual(field(&patient.clinic)),
        check_plan_id(plan_id),
    ])
}
