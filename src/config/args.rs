//! Command-line arguments.
//!
//! Flags override values from the optional config file. Targets given on
//! the command line are appended to the ones from the file.

use std::path::PathBuf;

use clap::Parser;

use crate::config::loader::{read_config, ConfigError};
use crate::config::schema::ExporterConfig;
use crate::config::validation::validate_config;

#[derive(Debug, Parser)]
#[command(name = "url-probe-exporter", version)]
#[command(about = "Probe URLs on a schedule and export the results as Prometheus metrics", long_about = None)]
pub struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// The address to listen on for HTTP requests
    #[arg(long)]
    pub addr: Option<String>,

    /// Fetch interval in seconds
    #[arg(long)]
    pub interval: Option<u64>,

    /// Fetch timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Location of the exporter, attached to every metric
    #[arg(long)]
    pub location: Option<String>,

    /// URL target, optionally suffixed with `#<seconds>` (repeatable)
    #[arg(long = "target", value_name = "URL")]
    pub targets: Vec<String>,

    /// Verify TLS certificates of probed targets
    #[arg(long)]
    pub verify_tls: bool,

    /// Log level when RUST_LOG is not set
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Args {
    /// Merge the config file (if any) with the flags and validate the result.
    pub fn into_config(self) -> Result<ExporterConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => ExporterConfig::default(),
        };
        self.apply(&mut config);
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }

    /// Overlay the flags that were given onto `config`.
    pub fn apply(self, config: &mut ExporterConfig) {
        if let Some(addr) = self.addr {
            config.listener.bind_address = addr;
        }
        if let Some(interval) = self.interval {
            config.probe.interval_secs = interval;
        }
        if let Some(timeout) = self.timeout {
            config.probe.timeout_secs = timeout;
        }
        if let Some(location) = self.location {
            config.probe.location = location;
        }
        if self.verify_tls {
            config.probe.verify_tls = true;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
        config.targets.extend(self.targets);
    }
}
