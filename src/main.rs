//! Runs one clinic with the default parameters and prints the summary.

use clinic_sim::framework::ClinicError;
use clinic_sim::lifecycle::{setup_tracing, Clinic, ClinicConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), ClinicError> {
    setup_tracing();

    let config = ClinicConfig::default();
    info!(?config, "Starting clinic");

    let report = match Clinic::run(config).await {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "Clinic run failed");
            return Err(e);
        }
    };

    println!("{report}");
    Ok(())
}
