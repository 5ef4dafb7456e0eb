//! Doctor workflow: rest, claim the next patient, treat, repeat until cancelled.
//!
//! # Cancellation
//!
//! A doctor looks at its [`CancelToken`] in exactly two places:
//!
//! 1. at the top of every iteration, before going back to `Resting`;
//! 2. while parked on the availability signal.
//!
//! Once a unit of availability has been taken the claim, the wake-up and the
//! treatment always run to the end. A claimed patient is never abandoned.
//!
//! A treatment ends when the patient has left, not when the doctor's own hold expires:
//! the doctor waits on the patient's departure signal before it goes back to `Resting`,
//! so it is never assigned to two patients at once.
//!
//! Whatever way the actor ends, the off-duty [`Finalizer`] resets the doctor's record to
//! `Unset` exactly once.

use std::sync::Arc;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::framework::{cancel_pair, CancelHandle, CancelToken, ClinicError, Finalizer};
use crate::lifecycle::ClinicContext;
use crate::model::{DoctorId, DoctorState, PatientState};

/// Creates the actor for doctor `id` and the handle used to stop it.
pub fn new(id: DoctorId) -> (DoctorActor, DoctorHandle) {
    let (cancel, token) = cancel_pair();
    (DoctorActor { id, token }, DoctorHandle { id, cancel })
}

/// Owner-side handle for a running doctor.
#[derive(Debug)]
pub struct DoctorHandle {
    id: DoctorId,
    cancel: CancelHandle,
}

impl DoctorHandle {
    pub fn id(&self) -> DoctorId {
        self.id
    }

    /// Asks the doctor to stop at its next safe point.
    ///
    /// Returns `true` for the first request only; later requests change nothing.
    pub fn cancel(&self) -> bool {
        let first = self.cancel.cancel();
        if first {
            debug!(doctor = %self.id, "Cancellation requested");
        }
        first
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

pub struct DoctorActor {
    id: DoctorId,
    token: CancelToken,
}

impl DoctorActor {
    /// Serves patients until cancelled.
    pub async fn run(self, context: Arc<ClinicContext>) -> Result<(), ClinicError> {
        let id = self.id;
        info!(doctor = %id, "Doctor on duty");

        let _off_duty = Finalizer::new({
            let context = context.clone();
            move || {
                if context.store.retire_doctor(id) {
                    info!(doctor = %id, "Doctor off duty");
                }
            }
        });

        let result = self.serve(&context).await;
        match &result {
            Ok(treated) => info!(doctor = %id, treated, "Shutdown"),
            Err(e) => error!(doctor = %id, error = %e, "Doctor aborted"),
        }
        result.map(|_| ())
    }

    async fn serve(&self, context: &ClinicContext) -> Result<usize, ClinicError> {
        let id = self.id;
        let store = &context.store;
        let mut treated = 0;

        loop {
            if self.token.is_cancelled() {
                break;
            }
            store.set_doctor_state(id, DoctorState::Resting, None)?;
            info!(doctor = %id, "Waiting for patient");

            tokio::select! {
                biased;
                _ = self.token.cancelled() => break,
                woke = context.availability.wait_one() => woke?,
            }

            let assignment = store.claim_next(id)?;
            let patient = assignment.patient;
            context.pairing.notify(patient)?;
            info!(doctor = %id, %patient, "Treating patient");

            sleep(context.config.treatment_duration).await;
            context
                .pairing
                .wait_departed(patient, || {
                    Ok((store.patient(patient)?.state() == PatientState::Departed).then_some(()))
                })
                .await?;

            info!(doctor = %id, %patient, "Finished treating patient");
            treated += 1;
        }

        Ok(treated)
    }
}
