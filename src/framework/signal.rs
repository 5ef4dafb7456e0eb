//! # Wake-up Primitives
//!
//! Two signals connect patients and doctors without either side polling:
//!
//! - [`AvailabilitySignal`]: a counting gate. Each enqueued patient adds one unit; each
//!   idle doctor blocks until it can take exactly one unit.
//! - [`PairingSignals`]: one wake slot per patient. A doctor that has claimed a patient
//!   wakes that patient and nobody else.
//!
//! Neither primitive carries data. The truth always lives in the
//! [`EntityStore`](crate::ward::EntityStore); a signal only says "go look again".

use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Notify, Semaphore};
use tracing::trace;

use super::error::{ClinicError, ContractViolation};
use crate::model::PatientId;

/// Counting gate that lets idle doctors sleep until a patient is queued.
///
/// Backed by a [`Semaphore`] that starts with zero permits: `notify_one` adds a permit
/// and `wait_one` acquires one and forgets it. A `wait_one` future that is dropped
/// before completing (a doctor being cancelled) never consumes a unit.
#[derive(Debug)]
pub struct AvailabilitySignal {
    units: Semaphore,
    notified: AtomicUsize,
    consumed: AtomicUsize,
}

impl AvailabilitySignal {
    pub fn new() -> Self {
        Self {
            units: Semaphore::new(0),
            notified: AtomicUsize::new(0),
            consumed: AtomicUsize::new(0),
        }
    }

    /// Publishes one unit of availability.
    pub fn notify_one(&self) {
        self.notified.fetch_add(1, Ordering::SeqCst);
        self.units.add_permits(1);
    }

    /// Blocks until a unit is available, then consumes it.
    pub async fn wait_one(&self) -> Result<(), ClinicError> {
        let permit = self
            .units
            .acquire()
            .await
            .map_err(|_| ClinicError::SignalClosed)?;
        permit.forget();
        self.consumed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    /// Units published but not yet consumed.
    pub fn pending(&self) -> usize {
        self.units.available_permits()
    }

    pub fn notified(&self) -> usize {
        self.notified.load(Ordering::SeqCst)
    }

    pub fn consumed(&self) -> usize {
        self.consumed.load(Ordering::SeqCst)
    }
}

impl Default for AvailabilitySignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry of per-patient wake slots, indexed by [`PatientId`].
///
/// Each patient has two slots: one a doctor uses to say "you have been claimed", and
/// one the patient uses to tell its doctor "I have left". Callers never touch the
/// underlying [`Notify`]s.
#[derive(Debug)]
pub struct PairingSignals {
    slots: Vec<PairingSlot>,
}

#[derive(Debug, Default)]
struct PairingSlot {
    claimed: Notify,
    departed: Notify,
}

impl PairingSignals {
    pub fn new(patient_count: usize) -> Self {
        Self {
            slots: (0..patient_count).map(|_| PairingSlot::default()).collect(),
        }
    }

    fn slot(&self, id: PatientId) -> Result<&PairingSlot, ContractViolation> {
        self.slots.get(id.0).ok_or(ContractViolation::UnknownPatient(id))
    }

    /// Wakes patient `id`. If it is not waiting yet the wake is kept until it does.
    pub fn notify(&self, id: PatientId) -> Result<(), ContractViolation> {
        self.slot(id)?.claimed.notify_one();
        Ok(())
    }

    /// Blocks patient `id` until `check` yields a value.
    ///
    /// `check` is evaluated once up front and again after every wake, so spurious or
    /// early wakes are harmless.
    pub async fn wait_for<T, F>(&self, id: PatientId, check: F) -> Result<T, ContractViolation>
    where
        F: FnMut() -> Result<Option<T>, ContractViolation>,
    {
        wait_on(&self.slot(id)?.claimed, id, check).await
    }

    /// Tells the doctor treating `id` that the patient has left.
    pub fn notify_departed(&self, id: PatientId) -> Result<(), ContractViolation> {
        self.slot(id)?.departed.notify_one();
        Ok(())
    }

    /// Blocks the doctor treating `id` until `check` confirms the departure.
    pub async fn wait_departed<T, F>(&self, id: PatientId, check: F) -> Result<T, ContractViolation>
    where
        F: FnMut() -> Result<Option<T>, ContractViolation>,
    {
        wait_on(&self.slot(id)?.departed, id, check).await
    }
}

/// The waiter is registered before each check, so a notify landing between the check
/// and the await is kept.
async fn wait_on<T, F>(slot: &Notify, id: PatientId, mut check: F) -> Result<T, ContractViolation>
where
    F: FnMut() -> Result<Option<T>, ContractViolation>,
{
    loop {
        let notified = slot.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();

        if let Some(value) = check()? {
            return Ok(value);
        }
        notified.await;
        trace!(patient = %id, "Woken");
    }
}
