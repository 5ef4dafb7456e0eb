use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use super::config::ClinicConfig;
use super::context::ClinicContext;
use super::report::ClinicReport;
use crate::doctor_actor::{self, DoctorHandle};
use crate::framework::ClinicError;
use crate::model::{DoctorId, PatientId, PatientOutcome};
use crate::patient_actor;

/// The orchestrator for one clinic run.
///
/// `Clinic` is responsible for:
/// - **Startup**: building the shared [`ClinicContext`] and spawning every patient and
///   doctor actor in its own Tokio task
/// - **Natural completion**: waiting until every patient has left or been turned away
/// - **Shutdown**: cancelling the doctors, who would otherwise wait forever, and
///   reaping them once their finalizers have run
/// - **Reporting**: producing a [`ClinicReport`] from the final bookkeeping
///
/// # Example
///
/// ```ignore
/// let clinic = Clinic::open(ClinicConfig::default())?;
/// let report = clinic.close().await?;
/// println!("{report}");
/// ```
pub struct Clinic {
    context: Arc<ClinicContext>,
    patients: JoinSet<(PatientId, Result<PatientOutcome, ClinicError>)>,
    doctors: JoinSet<(DoctorId, Result<(), ClinicError>)>,
    doctor_handles: Vec<DoctorHandle>,
}

impl Clinic {
    /// Validates `config` and starts every actor.
    ///
    /// Patients are spawned first, then doctors; both groups run concurrently from the
    /// moment they are spawned. Must be called from within a Tokio runtime.
    pub fn open(config: ClinicConfig) -> Result<Self, ClinicError> {
        config.validate()?;
        info!(
            patients = config.patient_count,
            doctors = config.doctor_count,
            tickets = config.ticket_capacity,
            treatment_ms = config.treatment_duration.as_millis() as u64,
            "Clinic opening"
        );

        let context = ClinicContext::new(config);

        let mut patients = JoinSet::new();
        for i in 0..context.config.patient_count {
            let actor = patient_actor::new(PatientId(i));
            let id = actor.id();
            let context = context.clone();
            patients.spawn(async move { (id, actor.run(context).await) });
        }

        let mut doctors = JoinSet::new();
        let mut doctor_handles = Vec::with_capacity(context.config.doctor_count);
        for i in 0..context.config.doctor_count {
            let (actor, handle) = doctor_actor::new(DoctorId(i));
            let id = handle.id();
            let context = context.clone();
            doctors.spawn(async move { (id, actor.run(context).await) });
            doctor_handles.push(handle);
        }

        Ok(Self {
            context,
            patients,
            doctors,
            doctor_handles,
        })
    }

    /// Opens a clinic with `config` and runs it to completion.
    pub async fn run(config: ClinicConfig) -> Result<ClinicReport, ClinicError> {
        Self::open(config)?.close().await
    }

    pub fn context(&self) -> &Arc<ClinicContext> {
        &self.context
    }

    /// Waits for every patient, then cancels and reaps every doctor.
    ///
    /// # Errors
    ///
    /// Returns the first failure observed. Any actor still running at that point is
    /// aborted when the clinic is dropped; doctors still run their finalizer.
    pub async fn close(mut self) -> Result<ClinicReport, ClinicError> {
        let mut outcomes = BTreeMap::new();

        // Step 1: patients finish on their own. A doctor exiting during this phase can
        // only be a failure, and would strand whoever it was about to serve.
        while !self.patients.is_empty() {
            tokio::select! {
                Some(joined) = self.patients.join_next() => {
                    let (id, outcome) = joined?;
                    outcomes.insert(id, outcome?);
                }
                Some(joined) = self.doctors.join_next() => {
                    let (id, result) = joined?;
                    result?;
                    error!(doctor = %id, "Doctor stopped while patients were still inside");
                    return Err(ClinicError::DoctorStopped(id));
                }
                else => break,
            }
        }
        info!(patients = outcomes.len(), "All patients done, cancelling doctors");

        // Step 2: doctors are idle or finishing a treatment; ask each one to stop.
        for handle in &self.doctor_handles {
            handle.cancel();
        }
        while let Some(joined) = self.doctors.join_next().await {
            let (id, result) = joined?;
            result?;
            debug!(doctor = %id, "Doctor reaped");
        }

        let report = ClinicReport::collect(&self.context, outcomes)?;
        info!(
            departed = report.departed(),
            rejected = report.rejected(),
            tickets_left = report.tickets_remaining,
            "Clinic closed"
        );
        Ok(report)
    }
}
