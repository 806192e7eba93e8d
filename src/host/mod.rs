//! Read-only access to the planning host.
//!
//! The planning system owns all patient, plan, beam, and dose data. Rules
//! see it only through the narrow capability traits below, one per fact
//! group. Every accessor distinguishes a host fault (`Err`) from data that
//! is simply not available (`Ok(None)`).
//!
//! - [`snapshot`]: host backed by an exported JSON plan snapshot
//! - [`settle`]: waiting for asynchronously computed DVH statistics

pub mod settle;
pub mod snapshot;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the planning host.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("failed to read plan snapshot {path}")]
    ReadSnapshot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse plan snapshot {path}")]
    ParseSnapshot {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("host call {operation} failed: {message}")]
    Call { operation: &'static str, message: String },
}

/// Host accessor outcome: fault, absent, or present.
pub type HostResult<T> = Result<Option<T>, HostError>;

/// Demographics of the patient currently open.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Patient {
    pub id: Option<String>,
    pub name: Option<String>,
    pub clinic: Option<String>,
}

impl Patient {
    /// Patient ID, or `N/A` when the host has none
    pub fn id_label(&self) -> &str {
        self.id.as_deref().unwrap_or(crate::checks::NOT_AVAILABLE)
    }

    pub fn name_label(&self) -> &str {
        self.name.as_deref().unwrap_or(crate::checks::NOT_AVAILABLE)
    }
}

/// Prescribed dose, in centigray.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    pub total_dose_cgy: f64,
    pub fraction_dose_cgy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Isocenter {
    /// Named location the beam is attached to
    pub location: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// General beam properties (one row of the beam spreadsheet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamGeneral {
    pub beam_id: String,
    #[serde(default)]
    pub field_id: Option<String>,
    pub mu_per_fraction: f64,
    pub algorithm: String,
    #[serde(default)]
    pub energy: Option<String>,
    #[serde(default)]
    pub isocenter: Option<Isocenter>,
}

/// Gantry rotation for the beam.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArcDirection {
    /// Static field
    #[default]
    #[serde(alias = "NONE")]
    None,
    #[serde(rename = "CW")]
    Clockwise,
    #[serde(rename = "CCW")]
    CounterClockwise,
}

impl ArcDirection {
    pub fn is_arc(&self) -> bool {
        matches!(self, ArcDirection::Clockwise | ArcDirection::CounterClockwise)
    }
}

impl fmt::Display for ArcDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArcDirection::None => write!(f, "None"),
            ArcDirection::Clockwise => write!(f, "CW"),
            ArcDirection::CounterClockwise => write!(f, "CCW"),
        }
    }
}

/// Beam geometry: angles in degrees, jaw positions in cm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamGeometry {
    pub beam_id: String,
    pub gantry: f64,
    pub collimator: f64,
    pub couch: f64,
    #[serde(default)]
    pub direction: ArcDirection,
    #[serde(default)]
    pub arc_length: f64,
    pub width1: f64,
    pub width2: f64,
    pub length1: f64,
    pub length2: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentAids {
    pub beam_id: String,
    pub couch_enabled: bool,
    #[serde(default)]
    pub bolus: Option<String>,
    #[serde(default)]
    pub wedge_id: Option<String>,
}

/// DVH statistics for one structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureStatistics {
    pub name: String,
    pub max_dose_cgy: f64,
    pub conformity_index: f64,
    pub heterogeneity_index: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationProperties {
    #[serde(default)]
    pub dose_deposition: Option<String>,
    #[serde(default)]
    pub final_algorithm: Option<String>,
    pub grid_spacing_cm: f64,
    pub max_particles_per_beam: f64,
}

/// Whether asynchronously computed statistics can be read yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    Pending,
    /// The host cannot report progress
    Unknown,
}

pub trait PatientSource {
    fn current_patient(&self) -> HostResult<Patient>;
}

pub trait PlanSource {
    fn active_plan_id(&self) -> HostResult<String>;
}

pub trait PrescriptionSource {
    fn prescription(&self) -> HostResult<Prescription>;
}

/// The beam spreadsheet: one entry per beam in each list.
pub trait BeamSource {
    fn general_properties(&self) -> HostResult<Vec<BeamGeneral>>;
    fn geometry_properties(&self) -> HostResult<Vec<BeamGeometry>>;
    fn treatment_aids(&self) -> HostResult<Vec<TreatmentAids>>;
}

pub trait DvhSource {
    /// Ask the host to (re)compute DVH statistics.
    fn request_statistics(&self) -> Result<(), HostError>;

    fn statistics_ready(&self) -> Readiness {
        Readiness::Unknown
    }

    /// Whether the host has verified the plan maximum dose.
    fn max_dose_verified(&self) -> Result<bool, HostError>;

    fn structure_statistics(&self) -> HostResult<Vec<StructureStatistics>>;
}

pub trait CalculationSource {
    fn calculation_properties(&self) -> HostResult<CalculationProperties>;
}

/// Everything a plan check run reads from the host.
pub trait PlanHost:
    PatientSource + PlanSource + PrescriptionSource + BeamSource + DvhSource + CalculationSource
{
}

impl<T> PlanHost for T where
    T: PatientSource + PlanSource + PrescriptionSource + BeamSource + DvhSource + CalculationSource
{
}
