use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use super::context::ClinicContext;
use crate::framework::ContractViolation;
use crate::model::{DoctorId, PatientId, PatientOutcome, PatientState};
use crate::ward::Assignment;

/// Final statistics of a clinic run.
///
/// Built after every actor has stopped. Each patient's own view of its doctor is checked
/// against the assignment ledger and its record in the store while collecting, so a
/// report only exists if all three agree.
#[derive(Debug, Clone, Serialize)]
pub struct ClinicReport {
    pub patient_count: usize,
    pub doctor_count: usize,
    pub ticket_capacity: usize,
    pub tickets_remaining: usize,
    /// Outcome per patient, indexed by patient id.
    pub outcomes: Vec<PatientOutcome>,
    /// Every claim, in claim order.
    pub assignments: Vec<Assignment>,
    /// Every admitted patient, in queue arrival order.
    pub enqueue_order: Vec<PatientId>,
    pub queue_len: usize,
    pub pending_availability: usize,
    pub doctors_retired: usize,
}

impl ClinicReport {
    pub(crate) fn collect(
        context: &ClinicContext,
        outcomes: BTreeMap<PatientId, PatientOutcome>,
    ) -> Result<Self, ContractViolation> {
        let store = &context.store;
        let mut ordered = Vec::with_capacity(context.config.patient_count);

        for record in store.patients() {
            let id = record.id;
            let outcome = *outcomes
                .get(&id)
                .ok_or(ContractViolation::UnknownPatient(id))?;

            let expected_state = match outcome {
                PatientOutcome::Rejected => PatientState::Rejected,
                PatientOutcome::Departed { .. } => PatientState::Departed,
            };
            if record.state() != expected_state {
                return Err(ContractViolation::OutcomeMismatch {
                    patient: id,
                    state: record.state(),
                });
            }

            let recorded = store.assignment(id).map(|a| a.doctor);
            if recorded != outcome.doctor() {
                return Err(ContractViolation::LedgerMismatch {
                    patient: id,
                    observed: outcome.doctor(),
                    recorded,
                });
            }
            ordered.push(outcome);
        }

        Ok(Self {
            patient_count: context.config.patient_count,
            doctor_count: context.config.doctor_count,
            ticket_capacity: context.gate.capacity(),
            tickets_remaining: context.gate.remaining(),
            outcomes: ordered,
            assignments: store.assignments(),
            enqueue_order: store.enqueue_order(),
            queue_len: store.queue_len(),
            pending_availability: context.availability.pending(),
            doctors_retired: store.retirements(),
        })
    }

    pub fn tickets_consumed(&self) -> usize {
        self.ticket_capacity - self.tickets_remaining
    }

    pub fn departed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, PatientOutcome::Departed { .. }))
            .count()
    }

    pub fn rejected(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, PatientOutcome::Rejected))
            .count()
    }

    pub fn outcome(&self, patient: PatientId) -> Option<PatientOutcome> {
        self.outcomes.get(patient.0).copied()
    }

    /// Patients treated by `doctor`, in claim order.
    pub fn treated_by(&self, doctor: DoctorId) -> Vec<PatientId> {
        self.assignments
            .iter()
            .filter(|a| a.doctor == doctor)
            .map(|a| a.patient)
            .collect()
    }
}

impl fmt::Display for ClinicReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "################################################")?;
        writeln!(
            f,
            "There were {} patients and {} doctors.",
            self.patient_count, self.doctor_count
        )?;
        writeln!(f, "There were {} tickets left.", self.tickets_remaining)?;
        for (i, outcome) in self.outcomes.iter().enumerate() {
            match outcome {
                PatientOutcome::Departed { doctor, .. } => {
                    writeln!(f, "\tPatient {i} was treated by doctor {doctor}.")?
                }
                PatientOutcome::Rejected => writeln!(f, "\tPatient {i} was not treated.")?,
            }
        }
        Ok(())
    }
}
