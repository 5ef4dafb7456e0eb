#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Clinic Simulator
//!
//! > **Patients, doctors and a ticket gate, one Tokio task each.**
//!
//! A fixed number of patients arrive at a clinic that hands out a limited number of
//! tickets. Ticket holders join a FIFO line; doctors take the line in order, treat each
//! patient for a fixed time, and rest until the next one shows up. When every patient
//! has either left or been turned away, the doctors are cancelled and a report is
//! printed.
//!
//! ## 🏗️ Design
//!
//! ### Shared state, short critical sections
//!
//! Actors never talk to each other directly. They share one [`ClinicContext`](lifecycle::ClinicContext):
//! - the [`AdmissionGate`](ward::AdmissionGate), a counter of tickets left;
//! - the [`EntityStore`](ward::EntityStore), which owns every record, the wait queue
//!   and the assignment ledger behind `std::sync::Mutex`;
//! - the signals that wake actors up.
//!
//! Every lock is taken for one bookkeeping step and released before any `.await`.
//!
//! ### Signals
//!
//! - **Availability** ([`AvailabilitySignal`](framework::AvailabilitySignal)): a counting
//!   semaphore. A patient publishes one unit after joining the line; a doctor consumes one
//!   before claiming. Units are never lost, so a patient who arrives while every doctor is
//!   busy is still picked up later.
//! - **Pairing** ([`PairingSignals`](framework::PairingSignals)): two `Notify`s per patient.
//!   The doctor that claims a patient wakes exactly that patient, who then re-checks its
//!   own record; the patient wakes its doctor again when it leaves.
//!
//! ### Cancellation
//!
//! Doctors loop forever on their own. Each one is spawned with a
//! [`DoctorHandle`](doctor_actor::DoctorHandle); cancelling it stops the doctor at its
//! next safe point, and a drop guard puts its record back to `Unset` however the task
//! ends. See [`doctor_actor`] for the exact points.
//!
//! ### Observability
//! `tracing` events carry `patient` and `doctor` fields. See the [`lifecycle::tracing`]
//! module for details.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. Primitives ([`framework`])
//! - **Role**: signals, cancellation and the error taxonomy. Nothing clinic-specific
//!   beyond the ids.
//! - **Key items**: [`AvailabilitySignal`](framework::AvailabilitySignal),
//!   [`CancelToken`](framework::CancelToken), [`ClinicError`](framework::ClinicError).
//!
//! ### 2. Records ([`model`])
//! - **Role**: patient and doctor records with their state-machine invariants.
//!
//! ### 3. Shared state ([`ward`])
//! - **Role**: the ticket gate, the FIFO line, the ledger of claims and the store that
//!   ties them together.
//!
//! ### 4. Actors ([`patient_actor`], [`doctor_actor`])
//! - **Role**: one workflow each, run as a Tokio task.
//!
//! ### 5. Orchestration ([`lifecycle`])
//! - **Role**: configuration, startup, shutdown and the final report.
//! - **Key items**: [`Clinic`](lifecycle::Clinic), [`ClinicReport`](lifecycle::ClinicReport).
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # 35 patients, 3 doctors, 30 tickets, 2 s per treatment
//! cargo run
//!
//! # More detail
//! RUST_LOG=debug cargo run
//! ```
//!
//! ```bash
//! cargo test
//! ```

pub mod doctor_actor;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod patient_actor;
pub mod ward;
