//! Generic synchronization building blocks for the clinic actors.
//!
//! Nothing in here knows about doctors or treatment. The actors in
//! [`patient_actor`](crate::patient_actor) and [`doctor_actor`](crate::doctor_actor)
//! are written on top of these pieces.
//!
//! # Main Components
//!
//! - [`AvailabilitySignal`] - counting gate idle doctors block on
//! - [`PairingSignals`] - per-patient wake slots
//! - [`CancelHandle`] / [`CancelToken`] - cooperative cancellation
//! - [`Finalizer`] - drop guard for cleanup that must always run
//! - [`ClinicError`] / [`ContractViolation`] - error taxonomy

pub mod cancel;
pub mod error;
pub mod signal;

pub use cancel::*;
pub use error::*;
pub use signal::*;
