//! Structured logging.
//!
//! `tracing` events go through a `tracing-subscriber` registry with an
//! `EnvFilter`; `RUST_LOG` wins over the configured default directive.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Install the global subscriber. Call once, before anything logs.
pub fn init(config: &LoggingConfig) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| config.filter.as_str().into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
