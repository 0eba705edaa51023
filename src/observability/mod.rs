//! Observability subsystem.
//!
//! Structured logging only; HTTP requests are traced by `TraceLayer` in the
//! HTTP server.

pub mod logging;
