//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Start:
//!     listener.rs (bind host:port, explicit bound event)
//!     → probe.rs (connect until accepted)
//!
//! Stop:
//!     serving task exits, listener dropped
//!     → probe.rs (connect until refused)
//! ```
//!
//! # Design Decisions
//! - Binding happens on the caller so bind errors are returned, not logged
//! - Probing stays as the portable confirmation of OS socket state
//! - Probe policy (interval, cap, connect timeout) is configurable

pub mod listener;
pub mod probe;

pub use listener::ListenerError;
pub use probe::{port_is_bound, wait_until_down, wait_until_up, ProbePolicy, ProbeTimeout};
