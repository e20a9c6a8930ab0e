//! Print Config Demo
//!
//! Loads an application configuration from a YAML or JSON file, lets
//! environment variables override selected fields, validates the result and
//! prints it.
//!
//! # Usage
//!
//! ```bash
//! APP_HOST=localhost APP_OTHER_PARAM='${APP_HOST}_replica_0' \
//!     cargo run --package print-config -- demos/print_config/config.yaml
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use appconf::{
    ConfigError, ConfigResult, EnvOverlay, LogFormat, LoggingBuilder, Validate, load_config,
};
use clap::Parser;
use serde::Deserialize;
use tracing::info;

#[derive(Parser)]
#[command(about = "Load a configuration file with environment overrides")]
struct Args {
    /// Configuration file (YAML or JSON).
    path: PathBuf,

    /// Log format: compact, full or pretty.
    #[arg(long, default_value = "compact")]
    log_format: LogFormat,

    /// Show debug output from the loader.
    #[arg(short, long)]
    verbose: bool,

    /// List the environment variables the configuration reads, then exit.
    #[arg(long)]
    list_vars: bool,
}

#[derive(Debug, Default, Deserialize, EnvOverlay)]
#[serde(default)]
#[env(prefix = "APP_")]
struct AppConfig {
    #[env(var = "HOST")]
    app_host: Option<String>,
    #[env(var = "PORT")]
    app_port: Option<i64>,
    #[env(var = "ONLINE")]
    app_online: Option<bool>,
    #[env(var = "OTHER_PARAM")]
    app_other_param: String,
}

impl Validate for AppConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.app_host.is_none() {
            return Err(ConfigError::validation("field 'app_host' should be provided"));
        }
        if self.app_port.is_none() {
            return Err(ConfigError::validation("field 'app_port' should be provided"));
        }
        if self.app_online.is_none() {
            return Err(ConfigError::validation("field 'app_online' should be provided"));
        }
        if self.app_other_param.is_empty() {
            return Err(ConfigError::validation(
                "field 'app_other_param' should not be empty",
            ));
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    LoggingBuilder::new()
        .with_level(level)
        .format(args.log_format)
        .init();

    if args.list_vars {
        for binding in &AppConfig::env_bindings() {
            let optional = if binding.is_optional() { " (optional)" } else { "" };
            println!("{:<16} {:<20} {}{}", binding.var(), binding.field(), binding.kind(), optional);
        }
        return Ok(());
    }

    let mut config = AppConfig::default();
    load_config(&args.path, &mut config)
        .with_context(|| format!("error while loading {}", args.path.display()))?;
    config.validate().context("validation failed")?;

    info!(path = %args.path.display(), "Configuration loaded and validated");
    println!("{config:#?}");
    Ok(())
}
