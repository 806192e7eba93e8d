//! Rule catalog.
//!
//! Rules are organized into groups by subject:
//! - Identity: patient demographics and plan ID format
//! - Prescription: prescribed doses and the maximum dose ratio
//! - Beams: per-beam properties, isocenter consistency, geometry, jaws, aids
//! - DVH: conformity and heterogeneity of target structures
//! - Calculation: dose calculation settings
//!
//! Each group is a pure function of host facts. A group returns
//! [`GroupOutput::Unavailable`] when its upstream data is absent, so that
//! missing data never surfaces as an error, and propagates host faults as
//! `Err` for the orchestrator to isolate.

pub mod beams;
pub mod calculation;
pub mod dvh;
pub mod identity;
pub mod prescription;

use crate::host::HostError;
use crate::{Category, CheckResult, Severity};
use std::fmt;

/// Text shown when a host value is missing.
pub const NOT_AVAILABLE: &str = "N/A";

/// What a rule group produced
#[derive(Debug, Clone, PartialEq)]
pub enum GroupOutput {
    /// The group ran; zero or more results
    Evaluated(Vec<CheckResult>),
    /// Upstream data was absent; the group contributes nothing
    Unavailable(String),
}

pub type GroupResult = Result<GroupOutput, HostError>;

/// Rule groups, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleGroup {
    Identity,
    Prescription,
    Beams,
    DvhStatistics,
    CalculationSettings,
}

impl RuleGroup {
    pub const ALL: [RuleGroup; 5] = [
        RuleGroup::Identity,
        RuleGroup::Prescription,
        RuleGroup::Beams,
        RuleGroup::DvhStatistics,
        RuleGroup::CalculationSettings,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RuleGroup::Identity => "patient/plan identity",
            RuleGroup::Prescription => "prescription and dose",
            RuleGroup::Beams => "beam properties",
            RuleGroup::DvhStatistics => "DVH statistics",
            RuleGroup::CalculationSettings => "calculation settings",
        }
    }
}

impl fmt::Display for RuleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A rule as listed by `plan-check list`
#[derive(Debug, Clone, Copy)]
pub struct RuleEntry {
    pub group: RuleGroup,
    pub category: Category,
    pub item: &'static str,
    /// Severity on failure; `Info` for informational entries
    pub on_failure: Severity,
}

const fn rule(group: RuleGroup, category: Category, item: &'static str, on_failure: Severity) -> RuleEntry {
    RuleEntry {
        group,
        category,
        item,
        on_failure,
    }
}

/// The fixed rule catalog
pub fn catalog() -> Vec<RuleEntry> {
    use Category as C;
    use RuleGroup as G;
    use Severity as S;

    vec![
        rule(G::Identity, C::Patient, identity::PATIENT_ID, S::Info),
        rule(G::Identity, C::Patient, identity::PATIENT_NAME, S::Info),
        rule(G::Identity, C::Patient, identity::CLINIC, S::Info),
        rule(G::Identity, C::Plan, identity::PLAN_ID_FORMAT, S::Error),
        rule(G::Prescription, C::Prescription, prescription::TOTAL_DOSE, S::Error),
        rule(G::Prescription, C::Prescription, prescription::FRACTION_DOSE, S::Error),
        rule(G::Prescription, C::Prescription, prescription::MAX_DOSE_RATIO, S::Warning),
        rule(G::Beams, C::Beam, beams::FIELD_ID_FORMAT, S::Error),
        rule(G::Beams, C::Beam, beams::MINIMUM_MU, S::Error),
        rule(G::Beams, C::Beam, beams::ALGORITHM, S::Info),
        rule(G::Beams, C::Beam, beams::ENERGY, S::Info),
        rule(G::Beams, C::Beam, beams::ISOCENTER_POSITION, S::Info),
        rule(G::Beams, C::Beam, beams::ISOCENTER_CONSISTENCY, S::Warning),
        rule(G::Beams, C::Geometry, beams::ANGLES, S::Info),
        rule(G::Beams, C::Geometry, beams::ARC_DIRECTION, S::Info),
        rule(G::Beams, C::Geometry, beams::ARC_LENGTH, S::Info),
        rule(G::Beams, C::Collimator, beams::JAW_OPENING, S::Warning),
        rule(G::Beams, C::TreatmentAids, beams::COUCH_ENABLED, S::Warning),
        rule(G::Beams, C::TreatmentAids, beams::BOLUS, S::Info),
        rule(G::Beams, C::TreatmentAids, beams::WEDGE_ID, S::Info),
        rule(G::DvhStatistics, C::DvhStatistics, dvh::CONFORMITY_INDEX, S::Info),
        rule(G::DvhStatistics, C::DvhStatistics, dvh::HETEROGENEITY_INDEX, S::Info),
        rule(G::CalculationSettings, C::CalculationSettings, calculation::DOSE_DEPOSITION, S::Info),
        rule(G::CalculationSettings, C::CalculationSettings, calculation::FINAL_ALGORITHM, S::Info),
        rule(G::CalculationSettings, C::CalculationSettings, calculation::GRID_SPACING, S::Info),
        rule(G::CalculationSettings, C::CalculationSettings, calculation::MAX_PARTICLES, S::Info),
    ]
}

/// Item name qualified with the instance it applies to, e.g. `Minimum MU (Beam 1)`.
pub(crate) fn per_beam(item: &str, beam_id: &str) -> String {
    format!("{} (Beam {})", item, beam_id)
}
