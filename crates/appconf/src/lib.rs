//! Typed application configuration from a YAML or JSON file, with selected
//! fields overridden by environment variables.
//!
//! Loading happens in two steps:
//!
//! 1. the file is deserialized into the record, trying YAML first and JSON
//!    second ([`loader`])
//! 2. every field bound to an environment variable is overwritten when that
//!    variable is set and non-empty ([`overlay`]). Values may reference other
//!    variables as `${NAME}`; references are resolved before the value is
//!    coerced to the field type ([`interpolate`]).
//!
//! # Declaring bindings
//!
//! ```rust
//! use std::collections::HashMap;
//!
//! use appconf::{ConfigLoader, EnvOverlay};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Default, Deserialize, EnvOverlay)]
//! #[serde(default)]
//! #[env(prefix = "APP_")]
//! struct AppConfig {
//!     #[env(var = "HOST")]
//!     app_host: Option<String>,
//!     #[env(var = "PORT")]
//!     app_port: Option<i64>,
//!     #[env(var = "ONLINE")]
//!     app_online: Option<bool>,
//!     #[env(var = "OTHER_PARAM")]
//!     app_other_param: String,
//!     // Only ever read from the file.
//!     banner: String,
//! }
//!
//! # let dir = tempfile::tempdir().unwrap();
//! # let path = dir.path().join("config.yaml");
//! # std::fs::write(&path, "app_host: file-host\napp_port: 80\napp_online: false\napp_other_param: x\n").unwrap();
//! let env = HashMap::from([
//!     ("APP_HOST".to_string(), "localhost".to_string()),
//!     ("APP_OTHER_PARAM".to_string(), "${APP_HOST}_replica_0".to_string()),
//! ]);
//! let config: AppConfig = ConfigLoader::new(&path).env(env).load()?;
//!
//! assert_eq!(config.app_host.as_deref(), Some("localhost"));
//! assert_eq!(config.app_port, Some(80));
//! assert_eq!(config.app_other_param, "localhost_replica_0");
//! # Ok::<(), appconf::ConfigError>(())
//! ```
//!
//! # `#[derive(EnvOverlay)]` attributes
//!
//! | Attribute | Where | Description |
//! |-----------|-------|-------------|
//! | `#[env(prefix = "APP_")]` | struct | Prefix prepended to every variable name |
//! | `#[env(var = "HOST")]` | field | Bind the field to `{prefix}HOST` |
//! | `#[env]` | field | Bind the field to `{prefix}{FIELD_NAME}` (upper-cased) |
//!
//! Fields without `#[env]` are never touched by the overlay. A bound field
//! must be a `String`, `bool`, primitive integer, or an `Option` of one of
//! those; anything else is a compile error.
//!
//! # Errors
//!
//! Read and parse failures, as well as environment values that cannot be
//! coerced, are returned as [`ConfigError`]. The overlay stops at the first
//! bad value. Unset `${NAME}` references resolve to the empty string; a
//! reference chain that keeps producing placeholders is cut off after
//! [`DEFAULT_MAX_SUBSTITUTIONS`] substitutions.

pub mod binding;
pub mod env;
pub mod error;
pub mod interpolate;
pub mod loader;
pub mod logging;
pub mod overlay;
pub mod validate;

// Re-exports
pub use binding::{BindingTable, EnvField, EnvOverlay, FieldBinding, FieldKind, parse_bool};
pub use env::{Environment, ProcessEnv};
pub use error::{CoerceError, ConfigError, ConfigResult, OverlayError};
pub use interpolate::{DEFAULT_MAX_SUBSTITUTIONS, Interpolator};
pub use loader::{ConfigLoader, load_config, load_file, parse_config};
pub use logging::{LogFormat, LoggingBuilder};
pub use overlay::Overlay;
pub use validate::Validate;

#[cfg(feature = "derive")]
pub use appconf_macros::EnvOverlay;

// Re-export tracing for use by other crates
pub use tracing;
