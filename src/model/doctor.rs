use serde::{Deserialize, Serialize};
use std::fmt;

use super::PatientId;
use crate::framework::ContractViolation;

/// Dense doctor identifier in `0..doctor_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DoctorId(pub usize);

impl fmt::Display for DoctorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DoctorState {
    /// Not on duty: before the first iteration, and permanently after retirement.
    #[default]
    Unset,
    Resting,
    Working,
}

/// Bookkeeping row for one doctor.
///
/// `assigned_patient` is `Some` exactly when `state == Working`. Once
/// [`retire`](DoctorRecord::retire)d the record stays `Unset` for good.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DoctorRecord {
    pub id: DoctorId,
    state: DoctorState,
    assigned_patient: Option<PatientId>,
    retired: bool,
}

impl DoctorRecord {
    pub fn new(id: DoctorId) -> Self {
        Self {
            id,
            state: DoctorState::Unset,
            assigned_patient: None,
            retired: false,
        }
    }

    pub fn state(&self) -> DoctorState {
        self.state
    }

    pub fn assigned_patient(&self) -> Option<PatientId> {
        self.assigned_patient
    }

    pub fn is_retired(&self) -> bool {
        self.retired
    }

    pub fn set(&mut self, state: DoctorState, patient: Option<PatientId>) -> Result<(), ContractViolation> {
        if self.retired {
            return Err(ContractViolation::DoctorRetired(self.id));
        }
        match (state, patient) {
            (DoctorState::Working, None) => {
                return Err(ContractViolation::MissingPatient { doctor: self.id, state })
            }
            (DoctorState::Working, Some(_)) => {
                if let Some(current) = self.assigned_patient {
                    return Err(ContractViolation::DoctorBusy {
                        doctor: self.id,
                        patient: current,
                    });
                }
            }
            (_, Some(patient)) => {
                return Err(ContractViolation::UnexpectedPatient {
                    doctor: self.id,
                    state,
                    patient,
                })
            }
            (_, None) => {}
        }
        self.state = state;
        self.assigned_patient = patient;
        Ok(())
    }

    /// Resets to `Unset` and locks the record. Returns `false` if it was already retired.
    pub fn retire(&mut self) -> bool {
        if self.retired {
            return false;
        }
        self.state = DoctorState::Unset;
        self.assigned_patient = None;
        self.retired = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn working_requires_patient() {
        let mut record = DoctorRecord::new(DoctorId(0));
        assert!(matches!(
            record.set(DoctorState::Working, None),
            Err(ContractViolation::MissingPatient { .. })
        ));
        assert!(matches!(
            record.set(DoctorState::Resting, Some(PatientId(3))),
            Err(ContractViolation::UnexpectedPatient { .. })
        ));
    }

    #[test]
    fn cannot_take_second_patient_while_working() {
        let mut record = DoctorRecord::new(DoctorId(1));
        record.set(DoctorState::Working, Some(PatientId(0))).unwrap();
        let err = record.set(DoctorState::Working, Some(PatientId(1))).unwrap_err();
        assert_eq!(
            err,
            ContractViolation::DoctorBusy {
                doctor: DoctorId(1),
                patient: PatientId(0)
            }
        );
    }

    #[test]
    fn retire_is_permanent_and_once() {
        let mut record = DoctorRecord::new(DoctorId(2));
        record.set(DoctorState::Working, Some(PatientId(5))).unwrap();
        assert!(record.retire());
        assert_eq!(record.state(), DoctorState::Unset);
        assert_eq!(record.assigned_patient(), None);
        assert!(!record.retire());
        assert_eq!(
            record.set(DoctorState::Resting, None),
            Err(ContractViolation::DoctorRetired(DoctorId(2)))
        );
    }
}
