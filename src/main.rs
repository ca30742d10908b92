//! Relay binary: parse arguments, wire the pipeline, run until signalled.

mod cli;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use aeroscope_relay::{
    DEFAULT_BASE_URL, DroneModelTable, HttpForwarder, RecordTranslator, RelayError, RelayServer,
};

#[tokio::main]
async fn main() -> Result<(), RelayError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = cli::Cli::parse();
    let models = Arc::new(DroneModelTable::new());
    let forwarder = Arc::new(HttpForwarder::new(DEFAULT_BASE_URL)?);
    let translator = RecordTranslator::new(models, forwarder);

    let server = RelayServer::bind(cli.bind, cli.port, translator).await?;
    server.run().await;
    Ok(())
}
