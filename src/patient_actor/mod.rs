//! Patient workflow: ticket, queue, wait for a doctor, treatment, departure.
//!
//! A patient runs to completion on its own; nothing ever cancels it. Its only
//! suspension points are the wait on its own pairing signal and the treatment hold.

use std::sync::Arc;
use tokio::time::{sleep, Instant};
use tracing::{error, info};

use crate::framework::ClinicError;
use crate::lifecycle::ClinicContext;
use crate::model::{PatientId, PatientOutcome, PatientState};

/// Creates the actor for patient `id`.
pub fn new(id: PatientId) -> PatientActor {
    PatientActor { id }
}

pub struct PatientActor {
    id: PatientId,
}

impl PatientActor {
    pub fn id(&self) -> PatientId {
        self.id
    }

    /// Runs the whole visit and reports how it ended.
    ///
    /// A contract violation stops this patient immediately and is returned to the
    /// orchestrator.
    pub async fn run(self, context: Arc<ClinicContext>) -> Result<PatientOutcome, ClinicError> {
        let result = self.visit(&context).await;
        if let Err(e) = &result {
            error!(patient = %self.id, error = %e, "Patient aborted");
        }
        result
    }

    async fn visit(&self, context: &ClinicContext) -> Result<PatientOutcome, ClinicError> {
        let id = self.id;
        let store = &context.store;

        if !context.gate.try_admit() {
            store.set_patient_state(id, PatientState::Rejected, None)?;
            info!(patient = %id, "No ticket left, leaving");
            return Ok(PatientOutcome::Rejected);
        }
        info!(patient = %id, "Got a ticket");

        let position = store.admit_and_enqueue(id)?;
        let queued_at = Instant::now();
        context.availability.notify_one();
        info!(patient = %id, position, "Waiting for a doctor");

        let doctor = context
            .pairing
            .wait_for(id, || store.assigned_doctor(id))
            .await?;
        let waited = queued_at.elapsed();
        info!(patient = %id, %doctor, waited_ms = waited.as_millis() as u64, "Being treated");

        sleep(context.config.treatment_duration).await;

        store.depart(id)?;
        context.pairing.notify_departed(id)?;
        info!(patient = %id, %doctor, "Left");

        Ok(PatientOutcome::Departed { doctor, waited })
    }
}
