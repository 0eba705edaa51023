//! OS signal handling.
//!
//! SIGTERM and SIGINT both mean "stop announcing liveness and exit".

/// Wait for SIGTERM or SIGINT.
///
/// Returns the name of the signal received.
#[cfg(unix)]
pub async fn wait_for_termination() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    let name = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    tracing::info!(signal = name, "Shutdown signal received");
    Ok(name)
}

/// Wait for Ctrl+C.
#[cfg(not(unix))]
pub async fn wait_for_termination() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    tracing::info!(signal = "CTRL_C", "Shutdown signal received");
    Ok("CTRL_C")
}
