//! Lifecycle errors.

use thiserror::Error;

use crate::net::{ListenerError, ProbeTimeout};

/// Which lifecycle operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Start,
    Stop,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Start => f.write_str("start"),
            Operation::Stop => f.write_str("stop"),
        }
    }
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("start failed: {0}")]
    Bind(#[from] ListenerError),

    #[error("{operation} failed: {source}")]
    Timeout {
        operation: Operation,
        #[source]
        source: ProbeTimeout,
    },

    #[error("stop called on {address} before start")]
    NotStarted { address: String },

    #[error("{address} failed to start earlier and cannot be restarted")]
    Failed { address: String },
}

impl LifecycleError {
    /// The operation a timeout belongs to, if this is a timeout.
    pub fn timed_out_operation(&self) -> Option<Operation> {
        match self {
            LifecycleError::Timeout { operation, .. } => Some(*operation),
            _ => None,
        }
    }
}
