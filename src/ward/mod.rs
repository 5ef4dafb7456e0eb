//! Shared bookkeeping for the clinic: tickets, the wait queue, entity records and the
//! assignment ledger.
//!
//! Everything here is synchronous. Locks are plain [`std::sync::Mutex`]es held only for
//! the few instructions of a bookkeeping update and never across an `.await`.

pub mod gate;
pub mod ledger;
pub mod queue;
pub mod store;

pub use gate::AdmissionGate;
pub use ledger::{Assignment, AssignmentLedger};
pub use queue::WaitQueue;
pub use store::EntityStore;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks `mutex`, ignoring poisoning. A panicking actor surfaces through its
/// `JoinHandle`; the tables stay readable for the final report.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
