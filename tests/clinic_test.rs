use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use clinic_sim::framework::ClinicError;
use clinic_sim::lifecycle::{Clinic, ClinicConfig, ClinicReport, ConfigError};
use clinic_sim::model::{DoctorId, DoctorState, PatientOutcome, PatientState};

const TREATMENT: Duration = Duration::from_secs(2);

fn config(patients: usize, doctors: usize, tickets: usize) -> ClinicConfig {
    ClinicConfig::default()
        .with_patients(patients)
        .with_doctors(doctors)
        .with_tickets(tickets)
        .with_treatment(TREATMENT)
}

/// Checks everything that must hold after any completed run.
fn assert_consistent(report: &ClinicReport, treatment: Duration) {
    // Every ticket handed out became exactly one departure.
    assert_eq!(report.departed(), report.tickets_consumed());
    assert_eq!(report.departed() + report.rejected(), report.patient_count);
    assert_eq!(report.outcomes.len(), report.patient_count);

    // Nobody left behind.
    assert_eq!(report.queue_len, 0);
    assert_eq!(report.pending_availability, 0);
    assert_eq!(report.doctors_retired, report.doctor_count);

    // Claim order is arrival order.
    let claimed: Vec<_> = report.assignments.iter().map(|a| a.patient).collect();
    assert_eq!(claimed, report.enqueue_order);

    // Sequences are dense.
    for (i, assignment) in report.assignments.iter().enumerate() {
        assert_eq!(assignment.sequence, i as u64);
    }

    // Each treatment lasts at least the hold, and a doctor only claims again once its
    // previous patient has left.
    let mut by_doctor: BTreeMap<DoctorId, Vec<(Duration, Duration)>> = BTreeMap::new();
    for assignment in &report.assignments {
        let departed = assignment.departed_after.expect("Claimed patient never left");
        assert!(departed - assignment.claimed_after >= treatment);
        by_doctor
            .entry(assignment.doctor)
            .or_default()
            .push((assignment.claimed_after, departed));
    }
    for visits in by_doctor.values() {
        for pair in visits.windows(2) {
            let (_, previous_left) = pair[0];
            let (next_claimed, _) = pair[1];
            assert!(
                next_claimed >= previous_left,
                "claim at {next_claimed:?} before previous patient left at {previous_left:?}"
            );
        }
    }
}

/// Three patients, two tickets, one doctor: the doctor treats both ticket holders
/// one after the other and the third patient is turned away.
#[tokio::test(start_paused = true)]
async fn test_single_doctor_serves_ticket_holders_in_turn() {
    let report = Clinic::run(config(3, 1, 2))
        .await
        .expect("Clinic run failed");

    assert_consistent(&report, TREATMENT);
    assert_eq!(report.departed(), 2);
    assert_eq!(report.rejected(), 1);
    assert_eq!(report.tickets_remaining, 0);

    assert_eq!(report.assignments.len(), 2);
    assert!(report.assignments.iter().all(|a| a.doctor == DoctorId(0)));
    assert!(report.assignments[1].claimed_after - report.assignments[0].claimed_after >= TREATMENT);
    assert_eq!(report.treated_by(DoctorId(0)).len(), 2);
}

/// With a doctor for every patient nobody waits for a treatment to finish.
#[tokio::test(start_paused = true)]
async fn test_enough_doctors_means_no_waiting() {
    let report = Clinic::run(config(5, 5, 5))
        .await
        .expect("Clinic run failed");

    assert_consistent(&report, TREATMENT);
    assert_eq!(report.departed(), 5);
    assert_eq!(report.rejected(), 0);

    let doctors: HashSet<_> = report.assignments.iter().map(|a| a.doctor).collect();
    assert_eq!(doctors.len(), 5);

    for outcome in &report.outcomes {
        match outcome {
            PatientOutcome::Departed { waited, .. } => assert!(*waited < TREATMENT),
            PatientOutcome::Rejected => panic!("Nobody should be rejected"),
        }
    }
}

/// The classic setup: 35 patients for 30 tickets and 3 doctors.
#[tokio::test(start_paused = true)]
async fn test_default_clinic() {
    let report = Clinic::run(ClinicConfig::default())
        .await
        .expect("Clinic run failed");

    assert_consistent(&report, TREATMENT);
    assert_eq!(report.departed(), 30);
    assert_eq!(report.rejected(), 5);
    assert_eq!(report.tickets_remaining, 0);

    // Every doctor pulled its weight.
    for i in 0..3 {
        assert!(!report.treated_by(DoctorId(i)).is_empty());
    }
}

/// Same invariants on a real multi-threaded runtime with real sleeps.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_multi_thread_run() {
    let config = ClinicConfig::default()
        .with_patients(20)
        .with_doctors(4)
        .with_tickets(16)
        .with_treatment(Duration::from_millis(20));
    let report = Clinic::run(config).await.expect("Clinic run failed");

    assert_consistent(&report, Duration::from_millis(20));
    assert_eq!(report.departed(), 16);
    assert_eq!(report.rejected(), 4);
}

/// A single doctor on a multi-threaded runtime never claims while its previous patient
/// is still inside. A claim that would overlap fails the run with `DoctorBusy`.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_single_doctor_never_overlaps() {
    let treatment = Duration::from_millis(5);
    for _ in 0..20 {
        let config = ClinicConfig::default()
            .with_patients(8)
            .with_doctors(1)
            .with_tickets(8)
            .with_treatment(treatment);
        let report = Clinic::run(config).await.expect("Clinic run failed");

        assert_consistent(&report, treatment);
        assert_eq!(report.treated_by(DoctorId(0)).len(), 8);
    }
}

/// A ticket for every patient, and a clinic with no patients at all.
#[tokio::test(start_paused = true)]
async fn test_ticket_supply_edges() {
    let report = Clinic::run(config(4, 2, 4))
        .await
        .expect("Clinic run failed");

    assert_consistent(&report, TREATMENT);
    assert_eq!(report.departed(), 4);
    assert_eq!(report.tickets_remaining, 0);

    let report = Clinic::run(config(0, 2, 0))
        .await
        .expect("Empty clinic failed");
    assert_consistent(&report, TREATMENT);
    assert!(report.outcomes.is_empty());
    assert_eq!(report.doctors_retired, 2);
}

/// No tickets at all: every patient is rejected and the doctors only ever rest.
#[tokio::test(start_paused = true)]
async fn test_no_tickets_rejects_everyone() {
    let clinic = Clinic::open(config(4, 2, 0)).expect("Failed to open clinic");
    let context = clinic.context().clone();
    let report = clinic.close().await.expect("Clinic run failed");

    assert_consistent(&report, TREATMENT);
    assert_eq!(report.rejected(), 4);
    assert!(report.assignments.is_empty());

    for record in context.store.patients() {
        assert_eq!(record.state(), PatientState::Rejected);
    }
    for record in context.store.doctors() {
        assert_eq!(record.state(), DoctorState::Unset);
        assert!(record.is_retired());
    }
}

/// After shutdown every record is in its final state.
#[tokio::test(start_paused = true)]
async fn test_final_records() {
    let clinic = Clinic::open(config(6, 2, 4)).expect("Failed to open clinic");
    let context = clinic.context().clone();
    let report = clinic.close().await.expect("Clinic run failed");

    for record in context.store.patients() {
        let outcome = report.outcome(record.id).expect("Missing outcome");
        match outcome {
            PatientOutcome::Departed { doctor, .. } => {
                assert_eq!(record.state(), PatientState::Departed);
                assert_eq!(context.store.assignment(record.id).map(|a| a.doctor), Some(doctor));
            }
            PatientOutcome::Rejected => {
                assert_eq!(record.state(), PatientState::Rejected);
                assert_eq!(context.store.assignment(record.id), None);
            }
        }
        assert_eq!(record.assigned_doctor(), None);
    }
    assert_eq!(context.availability.notified(), 4);
    assert_eq!(context.availability.consumed(), 4);
}

/// Invalid configurations never start any actor.
#[tokio::test]
async fn test_invalid_config_is_refused() {
    assert!(matches!(
        Clinic::open(config(3, 1, 4)),
        Err(ClinicError::Config(ConfigError::TooManyTickets {
            tickets: 4,
            patients: 3
        }))
    ));
    assert!(matches!(
        Clinic::run(config(3, 0, 2)).await,
        Err(ClinicError::Config(ConfigError::NoDoctors))
    ));
}

/// The printed summary lists every patient.
#[tokio::test(start_paused = true)]
async fn test_report_summary() {
    let report = Clinic::run(config(3, 1, 2))
        .await
        .expect("Clinic run failed");
    let summary = report.to_string();

    assert!(summary.contains("There were 3 patients and 1 doctors."));
    assert!(summary.contains("There were 0 tickets left."));
    assert_eq!(summary.matches("was treated by doctor 0.").count(), 2);
    assert_eq!(summary.matches("was not treated.").count(), 1);
}
