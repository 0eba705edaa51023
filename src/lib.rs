//! Liveness announcement server library.
//!
//! Binds a TCP listener, answers every HTTP request with `200 OK <label>`,
//! and exposes start/stop/readiness primitives so an owning process can
//! coordinate with external health-checkers.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use config::LivenessConfig;
pub use http::fetch_url;
pub use lifecycle::{LifecycleError, LivenessServer, ServerState};
pub use net::port_is_bound;
