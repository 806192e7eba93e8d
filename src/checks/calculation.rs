//! Dose calculation settings.
//!
//! All entries are informational. The grid spacing range is a guideline for
//! the reviewer and is shown only in the expected value.

use super::{GroupOutput, GroupResult, NOT_AVAILABLE};
use crate::host::{CalculationProperties, CalculationSource};
use crate::{Category, CheckResult};

pub const DOSE_DEPOSITION: &str = "Dose deposition algorithm";
pub const FINAL_ALGORITHM: &str = "Final calculation algorithm";
pub const GRID_SPACING: &str = "Grid spacing";
pub const MAX_PARTICLES: &str = "Max particles per beam";

pub fn evaluate_calculation(props: &CalculationProperties) -> Vec<CheckResult> {
    vec![
        CheckResult::info(Category::CalculationSettings, DOSE_DEPOSITION)
            .with_actual(props.dose_deposition.as_deref().unwrap_or(NOT_AVAILABLE))
            .with_expected("Dose deposited to medium or water"),
        CheckResult::info(Category::CalculationSettings, FINAL_ALGORITHM)
            .with_actual(props.final_algorithm.as_deref().unwrap_or(NOT_AVAILABLE)),
        CheckResult::info(Category::CalculationSettings, GRID_SPACING)
            .with_actual(format!("{:.2}", props.grid_spacing_cm))
            .with_expected("0.1 - 0.8"),
        CheckResult::info(Category::CalculationSettings, MAX_PARTICLES)
            .with_actual(format!("{:.0}", props.max_particles_per_beam))
            .with_expected("Configured"),
    ]
}

pub fn check_calculation_settings<H: CalculationSource + ?Sized>(host: &H) -> GroupResult {
    match host.calculation_properties()? {
        Some(props) => Ok(GroupOutput::Evaluated(evaluate_calculation(&props))),
        None => Ok(GroupOutput::Unavailable(
            "calculation properties not available".to_string(),
        )),
    }
}
