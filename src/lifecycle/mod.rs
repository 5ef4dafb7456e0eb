//! # Clinic Lifecycle & Orchestration
//!
//! This module owns a run from start to finish: it validates the configuration, builds
//! the shared context, spawns the actors, and decides when and how they stop.
//!
//! ## The Orchestration Pattern
//!
//! Patients and doctors stop in different ways, and the orchestrator has to handle both:
//!
//! 1. **Patients finish naturally** - each one returns its [`PatientOutcome`](crate::model::PatientOutcome)
//! 2. **Doctors never finish on their own** - they block on the availability signal
//!    waiting for a patient that will never come
//! 3. **So the orchestrator cancels them** - once the last patient is done, every
//!    [`DoctorHandle`](crate::doctor_actor::DoctorHandle) is cancelled and the tasks
//!    are reaped
//! 4. **Then it reports** - a [`ClinicReport`] built from the store, the ledger and
//!    the patients' own outcomes
//!
//! ```rust,ignore
//! let report = Clinic::run(ClinicConfig::default()).await?;
//! assert_eq!(report.queue_len, 0);
//! ```
//!
//! ## Context Injection
//!
//! Actors are created without any shared state and receive an `Arc<ClinicContext>`
//! when their `run` future is spawned.
//!
//! ## Observability
//!
//! [`setup_tracing`] installs the subscriber used by the binary. See the [`tracing`]
//! module for the events each actor emits.

pub mod clinic;
pub mod config;
pub mod context;
pub mod report;
pub mod tracing;

pub use clinic::*;
pub use config::*;
pub use context::*;
pub use report::*;
pub use tracing::*;
