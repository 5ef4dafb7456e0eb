use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use super::DoctorId;
use crate::framework::ContractViolation;

/// Dense patient identifier in `0..patient_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PatientId(pub usize);

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of a patient inside the clinic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PatientState {
    /// Actor spawned, admission not yet attempted.
    #[default]
    Unset,
    /// Holding a ticket and sitting in the wait queue.
    Waiting,
    /// Claimed by a doctor; the only state that carries a doctor id.
    BeingTreated,
    /// Treated and gone.
    Departed,
    /// Turned away at the gate because no tickets were left.
    Rejected,
}

impl PatientState {
    pub fn is_terminal(self) -> bool {
        matches!(self, PatientState::Departed | PatientState::Rejected)
    }
}

/// Bookkeeping row for one patient.
///
/// `assigned_doctor` is `Some` exactly when `state == BeingTreated`. The only way to
/// change a record is [`PatientRecord::set`], which enforces that pairing and refuses
/// to leave a terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatientRecord {
    pub id: PatientId,
    state: PatientState,
    assigned_doctor: Option<DoctorId>,
}

impl PatientRecord {
    pub fn new(id: PatientId) -> Self {
        Self {
            id,
            state: PatientState::Unset,
            assigned_doctor: None,
        }
    }

    pub fn state(&self) -> PatientState {
        self.state
    }

    pub fn assigned_doctor(&self) -> Option<DoctorId> {
        self.assigned_doctor
    }

    /// Moves the record to `state`, validating the doctor pairing.
    pub fn set(&mut self, state: PatientState, doctor: Option<DoctorId>) -> Result<(), ContractViolation> {
        if self.state.is_terminal() {
            return Err(ContractViolation::PatientTerminal {
                patient: self.id,
                state: self.state,
            });
        }
        match (state, doctor) {
            (PatientState::BeingTreated, None) => {
                return Err(ContractViolation::MissingDoctor {
                    patient: self.id,
                    state,
                })
            }
            (PatientState::BeingTreated, Some(_)) => {}
            (_, Some(doctor)) => {
                return Err(ContractViolation::UnexpectedDoctor {
                    patient: self.id,
                    state,
                    doctor,
                })
            }
            (_, None) => {}
        }
        self.state = state;
        self.assigned_doctor = doctor;
        Ok(())
    }
}

/// Terminal outcome reported by a finished patient actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PatientOutcome {
    /// No ticket was available.
    Rejected,
    /// Treated by `doctor` after sitting in the queue for `waited`.
    Departed { doctor: DoctorId, waited: Duration },
}

impl PatientOutcome {
    pub fn doctor(&self) -> Option<DoctorId> {
        match self {
            PatientOutcome::Rejected => None,
            PatientOutcome::Departed { doctor, .. } => Some(*doctor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn being_treated_requires_doctor() {
        let mut record = PatientRecord::new(PatientId(4));
        let err = record.set(PatientState::BeingTreated, None).unwrap_err();
        assert_eq!(
            err,
            ContractViolation::MissingDoctor {
                patient: PatientId(4),
                state: PatientState::BeingTreated
            }
        );
        assert_eq!(record.state(), PatientState::Unset);
    }

    #[test]
    fn doctor_only_while_being_treated() {
        let mut record = PatientRecord::new(PatientId(1));
        assert!(record.set(PatientState::Waiting, Some(DoctorId(0))).is_err());

        record.set(PatientState::Waiting, None).unwrap();
        record.set(PatientState::BeingTreated, Some(DoctorId(2))).unwrap();
        assert_eq!(record.assigned_doctor(), Some(DoctorId(2)));

        record.set(PatientState::Departed, None).unwrap();
        assert_eq!(record.assigned_doctor(), None);
    }

    #[test]
    fn terminal_states_are_final() {
        let mut record = PatientRecord::new(PatientId(0));
        record.set(PatientState::Rejected, None).unwrap();
        let err = record.set(PatientState::Waiting, None).unwrap_err();
        assert!(matches!(err, ContractViolation::PatientTerminal { .. }));
    }
}
