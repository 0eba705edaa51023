//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Start (liveness.rs):
//!     Created → Starting: bind listener, spawn serving task
//!     → probe until connect succeeds → ready fired → Listening
//!
//! Stop (liveness.rs):
//!     stop_requested fired → close handle fired → StopRequested
//!     → wait on done → probe until connect refused → Stopped
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → binary calls stop
//! ```
//!
//! # Design Decisions
//! - Every transition point is a one-shot signal (signal.rs)
//! - Confirmation timeouts are typed errors; only the binary exits on them
//! - Stop before start fails fast; stop during start waits for it to settle

pub mod error;
pub mod liveness;
pub mod signal;
pub mod signals;
pub mod state;

pub use error::{LifecycleError, Operation};
pub use liveness::{LivenessServer, LivenessServerBuilder};
pub use signal::OneShot;
pub use state::ServerState;
