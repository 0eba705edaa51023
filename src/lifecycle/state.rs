//! Server lifecycle states.
//!
//! # State Transitions
//! ```text
//! Created → Starting → Listening → StopRequested → Stopped
//!              │                         │
//!              └──────→ Failed ←─────────┘
//! ```
//!
//! `Stopped` and `Failed` are terminal; an instance is never restarted.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerState {
    /// Constructed, `start` not yet called.
    Created,
    /// Listener bound, waiting for the probe to confirm it.
    Starting,
    /// Confirmed reachable.
    Listening,
    /// `stop` in progress.
    StopRequested,
    /// Serving task exited and the socket is released.
    Stopped,
    /// Start or stop could not confirm its target state.
    Failed,
}

impl ServerState {
    /// No transition leaves a terminal state.
    pub fn is_terminal(self) -> bool {
        matches!(self, ServerState::Stopped | ServerState::Failed)
    }
}

impl std::fmt::Display for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ServerState::Created => "created",
            ServerState::Starting => "starting",
            ServerState::Listening => "listening",
            ServerState::StopRequested => "stop_requested",
            ServerState::Stopped => "stopped",
            ServerState::Failed => "failed",
        };
        f.write_str(name)
    }
}
