//! Status response rendering.
//!
//! The body served on every path comes from a [`StatusTemplate`]. The
//! lifecycle code never formats the payload itself, so the reporting format
//! can change without touching it.

/// Renders the status body for a label.
pub trait StatusTemplate: Send + Sync + 'static {
    fn render(&self, label: &str) -> String;
}

/// The default body: `200 OK <label>\n`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainStatus;

impl StatusTemplate for PlainStatus {
    fn render(&self, label: &str) -> String {
        format!("200 OK {}\n", label)
    }
}
