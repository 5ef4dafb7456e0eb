//! # Entity State Store
//!
//! Two lock-guarded tables addressed by dense id:
//!
//! - the **patient table**, which also owns the [`WaitQueue`] and the
//!   [`AssignmentLedger`], so "set `Waiting` and enqueue" and "pop and record the claim"
//!   are each one critical section;
//! - the **doctor table**.
//!
//! When both are needed (a claim) they are always taken patients-first.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::ledger::{Assignment, AssignmentLedger};
use super::queue::WaitQueue;
use super::lock;
use crate::framework::ContractViolation;
use crate::model::{DoctorId, DoctorRecord, DoctorState, PatientId, PatientRecord, PatientState};

#[derive(Debug)]
struct PatientTable {
    records: Vec<PatientRecord>,
    queue: WaitQueue,
    ledger: AssignmentLedger,
}

impl PatientTable {
    fn record_mut(&mut self, id: PatientId) -> Result<&mut PatientRecord, ContractViolation> {
        self.records
            .get_mut(id.0)
            .ok_or(ContractViolation::UnknownPatient(id))
    }
}

fn doctor_mut(doctors: &mut [DoctorRecord], id: DoctorId) -> Result<&mut DoctorRecord, ContractViolation> {
    doctors.get_mut(id.0).ok_or(ContractViolation::UnknownDoctor(id))
}

#[derive(Debug)]
pub struct EntityStore {
    patients: Mutex<PatientTable>,
    doctors: Mutex<Vec<DoctorRecord>>,
    retirements: AtomicUsize,
    opened_at: Instant,
}

impl EntityStore {
    pub fn new(patient_count: usize, doctor_count: usize) -> Self {
        Self {
            patients: Mutex::new(PatientTable {
                records: (0..patient_count).map(|i| PatientRecord::new(PatientId(i))).collect(),
                queue: WaitQueue::new(),
                ledger: AssignmentLedger::new(),
            }),
            doctors: Mutex::new((0..doctor_count).map(|i| DoctorRecord::new(DoctorId(i))).collect()),
            retirements: AtomicUsize::new(0),
            opened_at: Instant::now(),
        }
    }

    // --- Single-record access ---

    pub fn patient(&self, id: PatientId) -> Result<PatientRecord, ContractViolation> {
        lock(&self.patients)
            .records
            .get(id.0)
            .cloned()
            .ok_or(ContractViolation::UnknownPatient(id))
    }

    pub fn set_patient_state(
        &self,
        id: PatientId,
        state: PatientState,
        doctor: Option<DoctorId>,
    ) -> Result<(), ContractViolation> {
        lock(&self.patients).record_mut(id)?.set(state, doctor)
    }

    pub fn doctor(&self, id: DoctorId) -> Result<DoctorRecord, ContractViolation> {
        lock(&self.doctors)
            .get(id.0)
            .cloned()
            .ok_or(ContractViolation::UnknownDoctor(id))
    }

    pub fn set_doctor_state(
        &self,
        id: DoctorId,
        state: DoctorState,
        patient: Option<PatientId>,
    ) -> Result<(), ContractViolation> {
        doctor_mut(&mut lock(&self.doctors), id)?.set(state, patient)
    }

    /// The doctor treating `id`, or `None` while it is still waiting.
    ///
    /// This is the check a waiting patient re-runs after every wake.
    pub fn assigned_doctor(&self, id: PatientId) -> Result<Option<DoctorId>, ContractViolation> {
        let table = lock(&self.patients);
        let record = table
            .records
            .get(id.0)
            .ok_or(ContractViolation::UnknownPatient(id))?;
        match (record.state(), record.assigned_doctor()) {
            (PatientState::BeingTreated, Some(doctor)) => Ok(Some(doctor)),
            (PatientState::BeingTreated, None) => Err(ContractViolation::MissingDoctor {
                patient: id,
                state: PatientState::BeingTreated,
            }),
            _ => Ok(None),
        }
    }

    // --- Composite operations ---

    /// Marks `id` as `Waiting` and appends it to the queue in one step.
    ///
    /// Returns the patient's position in line.
    pub fn admit_and_enqueue(&self, id: PatientId) -> Result<usize, ContractViolation> {
        let mut table = lock(&self.patients);
        table.record_mut(id)?.set(PatientState::Waiting, None)?;
        table.queue.enqueue(id)
    }

    /// Pops the next waiting patient and binds it to `doctor`.
    ///
    /// Both tables are held for the whole update, so anyone who later sees the patient
    /// as `BeingTreated` also sees the doctor as `Working` on that same patient.
    pub fn claim_next(&self, doctor: DoctorId) -> Result<Assignment, ContractViolation> {
        let mut table = lock(&self.patients);
        let mut doctors = lock(&self.doctors);

        let record = doctor_mut(&mut doctors, doctor)?;
        if record.is_retired() {
            return Err(ContractViolation::DoctorRetired(doctor));
        }
        if let Some(patient) = record.assigned_patient() {
            return Err(ContractViolation::DoctorBusy { doctor, patient });
        }
        // The doctor record may already be back to `Resting`; the patient's own record
        // decides whether the previous treatment is over.
        if let Some(inside) = table
            .records
            .iter()
            .find(|r| r.state() == PatientState::BeingTreated && r.assigned_doctor() == Some(doctor))
        {
            return Err(ContractViolation::DoctorBusy {
                doctor,
                patient: inside.id,
            });
        }

        let patient = table.queue.claim_next()?;
        table.record_mut(patient)?.set(PatientState::BeingTreated, Some(doctor))?;
        record.set(DoctorState::Working, Some(patient))?;
        let assignment = table.ledger.record(patient, doctor, self.opened_at.elapsed())?;

        debug!(%doctor, %patient, sequence = assignment.sequence, "Claimed");
        Ok(assignment)
    }

    /// Marks a patient under treatment as `Departed` and stamps the ledger.
    pub fn depart(&self, id: PatientId) -> Result<Assignment, ContractViolation> {
        let mut table = lock(&self.patients);
        let record = table.record_mut(id)?;
        let Some(doctor) = record.assigned_doctor() else {
            return Err(ContractViolation::NotBeingTreated {
                patient: id,
                state: record.state(),
            });
        };
        record.set(PatientState::Departed, None)?;
        let assignment = table.ledger.close(id, self.opened_at.elapsed())?;
        debug!(%doctor, patient = %id, "Departed");
        Ok(assignment)
    }

    /// Finalizer for a cancelled doctor: back to `Unset`, permanently.
    ///
    /// Returns `false` if the doctor was already retired (or does not exist).
    pub fn retire_doctor(&self, id: DoctorId) -> bool {
        let mut doctors = lock(&self.doctors);
        let Some(record) = doctors.get_mut(id.0) else {
            warn!(doctor = %id, "Retire requested for unknown doctor");
            return false;
        };
        let retired = record.retire();
        if retired {
            self.retirements.fetch_add(1, Ordering::SeqCst);
        }
        retired
    }

    // --- Inspection ---

    pub fn retirements(&self) -> usize {
        self.retirements.load(Ordering::SeqCst)
    }

    pub fn queue_len(&self) -> usize {
        lock(&self.patients).queue.len()
    }

    pub fn enqueue_order(&self) -> Vec<PatientId> {
        lock(&self.patients).queue.history().to_vec()
    }

    pub fn assignment(&self, patient: PatientId) -> Option<Assignment> {
        lock(&self.patients).ledger.get(patient)
    }

    pub fn assignments(&self) -> Vec<Assignment> {
        lock(&self.patients).ledger.in_claim_order()
    }

    pub fn patients(&self) -> Vec<PatientRecord> {
        lock(&self.patients).records.clone()
    }

    pub fn doctors(&self) -> Vec<DoctorRecord> {
        lock(&self.doctors).clone()
    }
}
