//! TCP listener binding.
//!
//! # Responsibilities
//! - Bind the listening socket
//! - Report the OS-assigned address (port `0` support)

use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The bound socket could not report its local address.
    #[error("Failed to read local address of {address}: {source}")]
    LocalAddr {
        address: String,
        #[source]
        source: std::io::Error,
    },
    /// Failed to bind to address.
    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Bind a listener to `address` (`host:port`).
///
/// Returns the listener and the address it is actually bound to.
pub async fn bind(address: &str) -> Result<(TcpListener, SocketAddr), ListenerError> {
    let listener = TcpListener::bind(address)
        .await
        .map_err(|source| ListenerError::Bind {
            address: address.to_string(),
            source,
        })?;

    let local_addr = listener
        .local_addr()
        .map_err(|source| ListenerError::LocalAddr {
            address: address.to_string(),
            source,
        })?;

    tracing::info!(
        address = %local_addr,
        "Listener bound"
    );

    Ok((listener, local_addr))
}
