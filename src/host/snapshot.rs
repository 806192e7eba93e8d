//! Plan snapshot host.
//!
//! Serves host facts from a JSON document exported by the planning system.
//! Every section is optional; a missing section reads as absent data, not
//! as a fault.
//!
//! ```json
//! {
//!   "patient": { "id": "12345", "name": "DOE^JANE", "clinic": "Main" },
//!   "plan_id": "VMAT001",
//!   "prescriptions": [{ "total_dose_cgy": 6000.0, "fraction_dose_cgy": 200.0 }],
//!   "beams": { "general": [], "geometry": [], "treatment_aids": [] },
//!   "dvh": { "max_dose_verified": true, "structures": [] },
//!   "calculation": { "grid_spacing_cm": 0.3, "max_particles_per_beam": 1e8 }
//! }
//! ```

use super::{
    BeamGeneral, BeamGeometry, BeamSource, CalculationProperties, CalculationSource, DvhSource, HostError,
    HostResult, Patient, PatientSource, PlanSource, Prescription, PrescriptionSource, Readiness,
    StructureStatistics, TreatmentAids,
};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fs;
use std::path::Path;

/// Beam spreadsheet section of a snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BeamSheet {
    pub general: Option<Vec<BeamGeneral>>,
    pub geometry: Option<Vec<BeamGeometry>>,
    pub treatment_aids: Option<Vec<TreatmentAids>>,
}

/// DVH section of a snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DvhSheet {
    #[serde(default)]
    pub max_dose_verified: bool,
    /// Pending probes before the statistics report ready; absent means the
    /// snapshot cannot report readiness
    #[serde(default)]
    pub ready_after_polls: Option<u32>,
    pub structures: Option<Vec<StructureStatistics>>,
}

/// Serialized plan snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanSnapshot {
    pub patient: Option<Patient>,
    pub plan_id: Option<String>,
    pub prescriptions: Option<Vec<Prescription>>,
    pub beams: Option<BeamSheet>,
    pub dvh: Option<DvhSheet>,
    pub calculation: Option<CalculationProperties>,
}

/// Host backed by a [`PlanSnapshot`]
#[derive(Debug)]
pub struct SnapshotHost {
    snapshot: PlanSnapshot,
    pending_polls: Cell<u32>,
}

impl SnapshotHost {
    pub fn new(snapshot: PlanSnapshot) -> Self {
        let pending = snapshot.dvh.as_ref().and_then(|d| d.ready_after_polls).unwrap_or(0);
        SnapshotHost {
            snapshot,
            pending_polls: Cell::new(pending),
        }
    }

    /// Load a snapshot from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, HostError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| HostError::ReadSnapshot {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot = serde_json::from_str(&content).map_err(|source| HostError::ParseSnapshot {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(snapshot))
    }

    fn beams(&self) -> Option<&BeamSheet> {
        self.snapshot.beams.as_ref()
    }
}

impl PatientSource for SnapshotHost {
    fn current_patient(&self) -> HostResult<Patient> {
        Ok(self.snapshot.patient.clone())
    }
}

impl PlanSource for SnapshotHost {
    fn active_plan_id(&self) -> HostResult<String> {
        Ok(self.snapshot.plan_id.clone())
    }
}

impl PrescriptionSource for SnapshotHost {
    fn prescription(&self) -> HostResult<Prescription> {
        // The primary prescription is the first entry
        Ok(self
            .snapshot
            .prescriptions
            .as_ref()
            .and_then(|list| list.first().copied()))
    }
}

impl BeamSource for SnapshotHost {
    fn general_properties(&self) -> HostResult<Vec<BeamGeneral>> {
        Ok(self.beams().and_then(|b| b.general.clone()))
    }

    fn geometry_properties(&self) -> HostResult<Vec<BeamGeometry>> {
        Ok(self.beams().and_then(|b| b.geometry.clone()))
    }

    fn treatment_aids(&self) -> HostResult<Vec<TreatmentAids>> {
        Ok(self.beams().and_then(|b| b.treatment_aids.clone()))
    }
}

impl DvhSource for SnapshotHost {
    fn request_statistics(&self) -> Result<(), HostError> {
        Ok(())
    }

    fn statistics_ready(&self) -> Readiness {
        let reports_progress = self
            .snapshot
            .dvh
            .as_ref()
            .is_some_and(|d| d.ready_after_polls.is_some());
        if !reports_progress {
            return Readiness::Unknown;
        }
        match self.pending_polls.get() {
            0 => Readiness::Ready,
            n => {
                self.pending_polls.set(n - 1);
                Readiness::Pending
            }
        }
    }

    fn max_dose_verified(&self) -> Result<bool, HostError> {
        Ok(self.snapshot.dvh.as_ref().is_some_and(|d| d.max_dose_verified))
    }

    fn structure_statistics(&self) -> HostResult<Vec<StructureStatistics>> {
        Ok(self.snapshot.dvh.as_ref().and_then(|d| d.structures.clone()))
    }
}

impl CalculationSource for SnapshotHost {
    fn calculation_properties(&self) -> HostResult<CalculationProperties> {
        Ok(self.snapshot.calculation.clone())
    }
}
