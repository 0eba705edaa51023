//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, trace + timeout layers)
//!     → "/" and "/{*path}": response.rs renders "200 OK <label>\n"
//!     → "/debug/status": diagnostics.rs (JSON snapshot)
//! ```

pub mod diagnostics;
pub mod fetch;
pub mod response;
pub mod server;

pub use fetch::{fetch_url, FetchError};
pub use response::{PlainStatus, StatusTemplate};
pub use server::{HttpServer, StatusState};
