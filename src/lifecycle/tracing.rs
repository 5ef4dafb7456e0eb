//! # Observability & Tracing
//!
//! Every significant event in a run is a `tracing` event tagged with the actor that
//! emitted it (`patient = …` or `doctor = …`), so a single patient's story can be read
//! by filtering on its id.
//!
//! ## What Gets Traced
//!
//! - **Patients**: ticket granted or refused, position in line, the doctor that claimed
//!   them (with the time spent waiting), departure
//! - **Doctors**: on duty, waiting, claim, treatment start and end, shutdown and the
//!   off-duty finalizer
//! - **Clinic**: opening parameters, the switch to shutdown, final counts
//! - **Errors**: contract violations with the offending ids
//!
//! Lines emitted by one actor appear in the order the actor performed the steps; a
//! patient's `Left` line never precedes its own `Being treated` line.
//!
//! ## Usage Examples
//!
//! ```bash
//! # Event per line (default)
//! cargo run
//!
//! # Include claim sequence numbers and reaping
//! RUST_LOG=debug cargo run
//!
//! # Follow pairing-signal wake-ups as well
//! RUST_LOG=trace cargo run
//! ```
//!
//! ## Sample Output
//!
//! ```text
//! INFO Got a ticket patient=0
//! INFO Waiting for a doctor patient=0 position=1
//! INFO Waiting for patient doctor=0
//! INFO Treating patient doctor=0 patient=0
//! INFO Being treated patient=0 doctor=0 waited_ms=0
//! INFO No ticket left, leaving patient=31
//! INFO Left patient=0 doctor=0
//! ```

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for the binary.
///
/// Uses the compact format without module paths; the role fields already say who
/// is talking. `RUST_LOG` overrides the default `info` level.
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
