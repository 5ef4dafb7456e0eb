//! # Clinic Errors
//!
//! Error types shared by every actor in the clinic. The orchestrator surfaces a
//! failure from any patient or doctor task as one [`ClinicError`].
//!
//! Running out of admission tickets is not an error: a rejected patient is a normal
//! outcome (see [`PatientOutcome`](crate::model::PatientOutcome)).

use crate::lifecycle::ConfigError;
use crate::model::{DoctorId, DoctorState, PatientId, PatientState};

/// A breach of one of the bookkeeping invariants.
///
/// Every variant indicates a synchronization bug. Actors never recover from these;
/// they log the violation and return it so the run fails loudly.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ContractViolation {
    #[error("patient {0} does not exist")]
    UnknownPatient(PatientId),

    #[error("doctor {0} does not exist")]
    UnknownDoctor(DoctorId),

    #[error("patient {patient}: state {state:?} requires an assigned doctor")]
    MissingDoctor { patient: PatientId, state: PatientState },

    #[error("patient {patient}: state {state:?} cannot carry doctor {doctor}")]
    UnexpectedDoctor {
        patient: PatientId,
        state: PatientState,
        doctor: DoctorId,
    },

    #[error("doctor {doctor}: state {state:?} requires an assigned patient")]
    MissingPatient { doctor: DoctorId, state: DoctorState },

    #[error("doctor {doctor}: state {state:?} cannot carry patient {patient}")]
    UnexpectedPatient {
        doctor: DoctorId,
        state: DoctorState,
        patient: PatientId,
    },

    #[error("patient {patient} already reached terminal state {state:?}")]
    PatientTerminal { patient: PatientId, state: PatientState },

    #[error("patient {patient} cannot leave from state {state:?}")]
    NotBeingTreated { patient: PatientId, state: PatientState },

    #[error("doctor {0} was retired and cannot change state")]
    DoctorRetired(DoctorId),

    #[error("doctor {doctor} is still treating patient {patient}")]
    DoctorBusy { doctor: DoctorId, patient: PatientId },

    #[error("claim attempted on an empty wait queue")]
    EmptyQueue,

    #[error("patient {0} is already in the wait queue")]
    AlreadyQueued(PatientId),

    #[error("patient {0} was already claimed")]
    AlreadyClaimed(PatientId),

    #[error("patient {patient} saw doctor {observed:?} but the ledger records {recorded:?}")]
    LedgerMismatch {
        patient: PatientId,
        observed: Option<DoctorId>,
        recorded: Option<DoctorId>,
    },

    #[error("patient {patient} finished with record state {state:?}, which does not match its outcome")]
    OutcomeMismatch { patient: PatientId, state: PatientState },
}

/// Top-level error returned by actors and by the orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum ClinicError {
    #[error("contract violation: {0}")]
    Contract(#[from] ContractViolation),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("availability signal closed")]
    SignalClosed,

    #[error("doctor {0} stopped before being cancelled")]
    DoctorStopped(DoctorId),

    #[error("actor task failed: {0}")]
    ActorFailed(#[from] tokio::task::JoinError),
}
