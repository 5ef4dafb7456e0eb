//! Plain bookkeeping records for patients and doctors.
//!
//! These types hold no locks themselves; they live inside the lock-guarded tables of
//! [`ward`](crate::ward) and are only ever referenced across actors by id.

pub mod doctor;
pub mod patient;

pub use doctor::*;
pub use patient::*;
