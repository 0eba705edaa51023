//! Command-line arguments.
//!
//! Flags overlay the (optional) config file; whatever is not given on the
//! command line keeps its file or default value.

use clap::Parser;
use std::path::PathBuf;

use crate::config::loader::{load_config, ConfigError};
use crate::config::schema::LivenessConfig;
use crate::config::validation::validate_config;

#[derive(Debug, Parser)]
#[command(name = "liveness-server")]
#[command(about = "Announce liveness for a labeled instance over HTTP", long_about = None)]
pub struct CliArgs {
    /// Label to report as live
    #[arg(long = "color", visible_alias = "label")]
    pub label: Option<String>,

    /// Port to listen on and provide health reports
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Host to bind
    #[arg(long)]
    pub host: Option<String>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl CliArgs {
    /// Resolve the effective configuration: defaults, then file, then flags.
    pub fn into_config(self) -> Result<LivenessConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => LivenessConfig::default(),
        };

        if let Some(label) = self.label {
            config.label = label;
        }
        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if let Some(host) = self.host {
            config.listener.host = host;
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}
