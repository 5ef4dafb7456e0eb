use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Default number of patient actors.
pub const PATIENT_COUNT: usize = 35;
/// Default size of the doctor pool.
pub const DOCTOR_COUNT: usize = 3;
/// Default number of admission tickets.
pub const TICKET_CAPACITY: usize = 30;
/// Default simulated service time.
pub const TREATMENT_DURATION: Duration = Duration::from_secs(2);

/// Everything that sizes a clinic run.
///
/// The defaults reproduce the classic setup: 35 patients competing for 30 tickets,
/// served by 3 doctors, 2 seconds per treatment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicConfig {
    /// Number of patient actors; patient ids are `0..patient_count`.
    pub patient_count: usize,
    /// Number of doctor actors; doctor ids are `0..doctor_count`.
    pub doctor_count: usize,
    /// Admission tickets available for the whole run. Must not exceed `patient_count`.
    pub ticket_capacity: usize,
    /// How long a treatment holds both the patient and the doctor.
    pub treatment_duration: Duration,
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self {
            patient_count: PATIENT_COUNT,
            doctor_count: DOCTOR_COUNT,
            ticket_capacity: TICKET_CAPACITY,
            treatment_duration: TREATMENT_DURATION,
        }
    }
}

impl ClinicConfig {
    pub fn with_patients(mut self, patient_count: usize) -> Self {
        self.patient_count = patient_count;
        self
    }

    pub fn with_doctors(mut self, doctor_count: usize) -> Self {
        self.doctor_count = doctor_count;
        self
    }

    pub fn with_tickets(mut self, ticket_capacity: usize) -> Self {
        self.ticket_capacity = ticket_capacity;
        self
    }

    pub fn with_treatment(mut self, treatment_duration: Duration) -> Self {
        self.treatment_duration = treatment_duration;
        self
    }

    /// Checks that the run can complete.
    ///
    /// Tickets beyond the number of patients are refused rather than left over: the
    /// ticket supply is a share of the population, so tickets consumed always equals
    /// `min(patient_count, ticket_capacity)` which is `ticket_capacity` here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ticket_capacity > self.patient_count {
            return Err(ConfigError::TooManyTickets {
                tickets: self.ticket_capacity,
                patients: self.patient_count,
            });
        }
        // Admitted patients would wait forever.
        if self.doctor_count == 0 && self.ticket_capacity > 0 {
            return Err(ConfigError::NoDoctors);
        }
        Ok(())
    }
}

/// Reasons a [`ClinicConfig`] cannot be run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{tickets} tickets for only {patients} patients")]
    TooManyTickets { tickets: usize, patients: usize },

    #[error("tickets are issued but there are no doctors")]
    NoDoctors,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ClinicConfig::default();
        assert_eq!(config.patient_count, 35);
        assert_eq!(config.doctor_count, 3);
        assert_eq!(config.ticket_capacity, 30);
        assert_eq!(config.treatment_duration, Duration::from_secs(2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn tickets_cannot_exceed_patients() {
        let config = ClinicConfig::default().with_patients(3).with_tickets(4);
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooManyTickets { tickets: 4, patients: 3 })
        );
    }

    #[test]
    fn doctors_required_once_tickets_exist() {
        let config = ClinicConfig::default().with_doctors(0);
        assert_eq!(config.validate(), Err(ConfigError::NoDoctors));

        let closed = config.with_tickets(0);
        assert!(closed.validate().is_ok());
    }
}
