//! Record-level validation.

use crate::error::ConfigResult;

/// A record that can check its own required-field invariants.
///
/// Loading never calls this; run it after [`load_config`](crate::load_config)
/// returns.
///
/// ```rust
/// use appconf::{ConfigError, ConfigResult, Validate};
///
/// struct Settings {
///     host: Option<String>,
/// }
///
/// impl Validate for Settings {
///     fn validate(&self) -> ConfigResult<()> {
///         if self.host.is_none() {
///             return Err(ConfigError::validation("field 'host' should be provided"));
///         }
///         Ok(())
///     }
/// }
///
/// assert!(Settings { host: None }.validate().is_err());
/// ```
pub trait Validate {
    /// Returns an error describing the first violated invariant.
    fn validate(&self) -> ConfigResult<()>;
}
