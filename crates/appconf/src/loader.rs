//! Loads a configuration file and overlays environment variables on top.
//!
//! The file format is not taken from the extension. Content is parsed as YAML
//! first and, if that fails, as JSON. Both attempts deserialize a fresh value,
//! so a half-finished YAML parse never leaks into the JSON result.
//!
//! Records should carry `#[serde(default)]` (or `Option` fields) so that keys
//! missing from the file fall back to their zero value instead of failing.
//!
//! # Example
//!
//! ```rust,ignore
//! use appconf::{ConfigLoader, EnvOverlay, Validate};
//!
//! let config: AppConfig = ConfigLoader::new("config.yaml").load()?;
//! config.validate()?;
//!
//! // Same, with variables coming from a map instead of the process
//! let config: AppConfig = ConfigLoader::new("config.yaml")
//!     .env(vars)
//!     .max_substitutions(16)
//!     .load()?;
//! ```

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::binding::EnvOverlay;
use crate::env::{Environment, ProcessEnv};
use crate::error::{ConfigError, ConfigResult};
use crate::interpolate::DEFAULT_MAX_SUBSTITUTIONS;
use crate::overlay::Overlay;

/// Loads `path` into `target`, then overlays the process environment.
///
/// On success `target` holds the file content with environment overrides
/// applied. Validation is left to the caller.
pub fn load_config<T>(path: impl AsRef<Path>, target: &mut T) -> ConfigResult<()>
where
    T: DeserializeOwned + EnvOverlay,
{
    ConfigLoader::new(path.as_ref()).load_into(target)
}

/// Reads and parses `path` without touching the environment.
pub fn load_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> ConfigResult<T> {
    let path = path.as_ref();
    info!(path = %path.display(), "Loading configuration file");

    let content = std::fs::read(path).map_err(|e| ConfigError::read(path, e))?;
    parse_content(&content, path)
}

/// Parses configuration content, trying YAML and then JSON.
pub fn parse_config<T: DeserializeOwned>(content: &[u8]) -> ConfigResult<T> {
    parse_content(content, Path::new("<memory>"))
}

fn parse_content<T: DeserializeOwned>(content: &[u8], path: &Path) -> ConfigResult<T> {
    let yaml_err = match serde_yaml::from_slice(content) {
        Ok(config) => {
            debug!(path = %path.display(), format = "yaml", "Parsed configuration");
            return Ok(config);
        }
        Err(e) => e,
    };
    debug!(path = %path.display(), error = %yaml_err, "Not valid YAML, trying JSON");

    let config = serde_json::from_slice(content).map_err(|e| ConfigError::parse(path, e))?;
    debug!(path = %path.display(), format = "json", "Parsed configuration");
    Ok(config)
}

/// Configuration loader: one file plus environment overrides.
#[derive(Debug)]
pub struct ConfigLoader<E = ProcessEnv> {
    /// File to load.
    path: PathBuf,
    /// Source of override variables.
    env: E,
    /// Whether to apply environment overrides at all.
    load_env: bool,
    /// Substitution cap for `${NAME}` resolution.
    max_substitutions: usize,
}

impl ConfigLoader {
    /// Creates a loader for `path` reading overrides from the process environment.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            env: ProcessEnv,
            load_env: true,
            max_substitutions: DEFAULT_MAX_SUBSTITUTIONS,
        }
    }
}

impl<E: Environment> ConfigLoader<E> {
    /// Reads overrides from `env` instead of the process environment.
    pub fn env<F: Environment>(self, env: F) -> ConfigLoader<F> {
        ConfigLoader {
            path: self.path,
            env,
            load_env: self.load_env,
            max_substitutions: self.max_substitutions,
        }
    }

    /// Disables environment overrides; only the file is loaded.
    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Caps the substitutions performed while resolving one variable.
    pub fn max_substitutions(mut self, limit: usize) -> Self {
        self.max_substitutions = limit;
        self
    }

    /// Returns the configured file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and returns the record.
    pub fn load<T>(&self) -> ConfigResult<T>
    where
        T: DeserializeOwned + EnvOverlay,
    {
        let mut config: T = load_file(&self.path)?;

        if self.load_env {
            Overlay::new(&self.env)
                .max_substitutions(self.max_substitutions)
                .apply(&mut config)?;
        }

        debug!(path = %self.path.display(), "Configuration loaded successfully");
        Ok(config)
    }

    /// Loads into an existing record, replacing its contents.
    ///
    /// `target` is only written when the whole load succeeds.
    pub fn load_into<T>(&self, target: &mut T) -> ConfigResult<()>
    where
        T: DeserializeOwned + EnvOverlay,
    {
        *target = self.load()?;
        Ok(())
    }
}
