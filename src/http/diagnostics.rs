//! Diagnostics endpoints under `/debug`.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use std::time::Instant;
use tokio::sync::watch;

use crate::lifecycle::{OneShot, ServerState};

/// Live view of a server instance, shared with the diagnostics handlers.
#[derive(Clone)]
pub struct DiagnosticsState {
    pub label: Arc<str>,
    pub address: Arc<str>,
    pub local_addr: Arc<OnceLock<SocketAddr>>,
    pub state: watch::Receiver<ServerState>,
    pub stop_requested: OneShot,
    pub created_at: Instant,
}

#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub version: &'static str,
    pub label: String,
    pub address: String,
    pub local_addr: Option<String>,
    pub state: ServerState,
    pub stop_requested: bool,
    pub uptime_secs: u64,
}

pub fn router(state: DiagnosticsState) -> Router {
    Router::new()
        .route("/debug/status", get(get_status))
        .with_state(state)
}

pub async fn get_status(State(state): State<DiagnosticsState>) -> Json<StatusReport> {
    let current = *state.state.borrow();
    Json(StatusReport {
        version: env!("CARGO_PKG_VERSION"),
        label: state.label.to_string(),
        address: state.address.to_string(),
        local_addr: state.local_addr.get().map(|addr| addr.to_string()),
        state: current,
        stop_requested: state.stop_requested.is_set(),
        uptime_secs: state.created_at.elapsed().as_secs(),
    })
}
