use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::framework::ContractViolation;
use crate::model::{DoctorId, PatientId};

/// One claim: which doctor took which patient, and when.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Assignment {
    /// Global claim order, starting at 0.
    pub sequence: u64,
    pub patient: PatientId,
    pub doctor: DoctorId,
    /// Time since the clinic opened.
    pub claimed_after: Duration,
    /// Time since the clinic opened, once the patient has left.
    pub departed_after: Option<Duration>,
}

/// Append-only record of every claim made during a run.
#[derive(Debug, Default)]
pub struct AssignmentLedger {
    entries: BTreeMap<PatientId, Assignment>,
    next_sequence: u64,
}

impl AssignmentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        patient: PatientId,
        doctor: DoctorId,
        claimed_after: Duration,
    ) -> Result<Assignment, ContractViolation> {
        if self.entries.contains_key(&patient) {
            return Err(ContractViolation::AlreadyClaimed(patient));
        }
        let assignment = Assignment {
            sequence: self.next_sequence,
            patient,
            doctor,
            claimed_after,
            departed_after: None,
        };
        self.next_sequence += 1;
        self.entries.insert(patient, assignment);
        Ok(assignment)
    }

    /// Stamps the departure of a claimed patient.
    pub fn close(&mut self, patient: PatientId, departed_after: Duration) -> Result<Assignment, ContractViolation> {
        let entry = self
            .entries
            .get_mut(&patient)
            .ok_or(ContractViolation::LedgerMismatch {
                patient,
                observed: None,
                recorded: None,
            })?;
        entry.departed_after = Some(departed_after);
        Ok(*entry)
    }

    pub fn get(&self, patient: PatientId) -> Option<Assignment> {
        self.entries.get(&patient).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All assignments in claim order.
    pub fn in_claim_order(&self) -> Vec<Assignment> {
        let mut all: Vec<_> = self.entries.values().copied().collect();
        all.sort_by_key(|a| a.sequence);
        all
    }
}
