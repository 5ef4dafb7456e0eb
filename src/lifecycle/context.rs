use std::sync::Arc;

use super::config::ClinicConfig;
use crate::framework::{AvailabilitySignal, PairingSignals};
use crate::ward::{AdmissionGate, EntityStore};

/// Shared state injected into every actor's `run`.
///
/// The orchestrator creates one context per run and hands each actor an `Arc` clone,
/// so the tables outlive every actor that touches them.
#[derive(Debug)]
pub struct ClinicContext {
    pub config: ClinicConfig,
    pub gate: AdmissionGate,
    pub store: EntityStore,
    pub pairing: PairingSignals,
    pub availability: AvailabilitySignal,
}

impl ClinicContext {
    pub fn new(config: ClinicConfig) -> Arc<Self> {
        Arc::new(Self {
            gate: AdmissionGate::new(config.ticket_capacity),
            store: EntityStore::new(config.patient_count, config.doctor_count),
            pairing: PairingSignals::new(config.patient_count),
            availability: AvailabilitySignal::new(),
            config,
        })
    }
}
