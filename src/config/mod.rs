pub mod service_config;

#[cfg(feature = "cli")]
use crate::utils::{error::Result, validation::Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use service_config::ServiceConfig;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "invoice-service")]
#[command(about = "Serves invoices with their client and line items resolved, as JSON")]
pub struct CliConfig {
    #[arg(long, help = "TOML configuration file (defaults to AIRTABLE_* environment variables)")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Address to listen on, overrides the configuration")]
    pub bind: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Builds the validated service configuration from the file or the
    /// environment, then applies command-line overrides.
    pub fn load_service_config(&self) -> Result<ServiceConfig> {
        let mut config = match &self.config {
            Some(path) => ServiceConfig::from_file(path)?,
            None => ServiceConfig::from_env()?,
        };

        if let Some(bind) = &self.bind {
            config.server.bind_address = bind.clone();
        }

        config.validate()?;
        Ok(config)
    }
}
