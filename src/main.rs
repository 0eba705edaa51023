//! Liveness server (v1)
//!
//! Announces that a labeled instance is alive by answering every HTTP
//! request with `200 OK <label>`.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │               LIVENESS SERVER                │
//!                        │                                              │
//!   Health-checker GET   │  ┌──────────┐   ┌──────────┐   ┌──────────┐  │
//!   ─────────────────────┼─▶│   net    │──▶│   http   │──▶│ template │  │
//!                        │  │ listener │   │  server  │   │  "200 OK │  │
//!   "200 OK <label>\n"   │  └──────────┘   └──────────┘   │  <label>"│  │
//!   ◀────────────────────┼─────────────────────────────── └──────────┘  │
//!                        │                                              │
//!                        │  ┌────────────────────────────────────────┐  │
//!                        │  │ lifecycle: start → probe up → ready    │  │
//!                        │  │            stop  → done → probe down   │  │
//!                        │  └────────────────────────────────────────┘  │
//!                        └──────────────────────────────────────────────┘
//! ```

use clap::Parser;

use liveness_server::config::CliArgs;
use liveness_server::lifecycle::{signals, LivenessServerBuilder};
use liveness_server::observability::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match CliArgs::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("liveness-server: invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    logging::init(&config.logging);

    tracing::info!("liveness-server v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        host = %config.listener.host,
        port = config.listener.port,
        label = %config.label,
        probe_interval_ms = config.probe.interval_ms,
        probe_max_attempts = config.probe.max_attempts,
        "Configuration loaded"
    );

    // A server that cannot reach its stated state must not keep running.
    let server = match LivenessServerBuilder::from_config(&config).launch().await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "Fatal: liveness server did not start");
            std::process::exit(1);
        }
    };

    signals::wait_for_termination().await?;

    if let Err(e) = server.stop().await {
        tracing::error!(address = %server.address(), error = %e, "Fatal: liveness server did not stop");
        std::process::exit(1);
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
