//! Command line interface for the relay binary.

use std::net::IpAddr;

use clap::Parser;

/// Command line arguments for the `aeroscope-relay` binary.
#[derive(Debug, Parser)]
#[command(
    name = "aeroscope-relay",
    version,
    about = "Relay Aeroscope telemetry streams to the AeroTracker ingestion API"
)]
pub struct Cli {
    /// Interface to bind to.
    #[arg(long, default_value = "0.0.0.0")]
    pub bind: IpAddr,

    /// Port to listen on; the status endpoint uses the next port up.
    #[arg(long, default_value_t = 3333)]
    pub port: u16,
}
