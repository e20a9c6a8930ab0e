//! Applies environment variables to a record through its [`BindingTable`].
//!
//! For each binding, in declaration order:
//!
//! 1. look the variable up; an unset or empty variable leaves the field alone
//! 2. resolve `${NAME}` placeholders in the value
//! 3. coerce the result to the field's kind and store it
//!
//! The pass stops at the first value that cannot be coerced. Fields handled
//! before that point keep their new values.

use tracing::{debug, trace};

use crate::binding::{BindingTable, EnvOverlay};
use crate::env::Environment;
use crate::error::OverlayError;
use crate::interpolate::{DEFAULT_MAX_SUBSTITUTIONS, Interpolator};

/// Environment overlay pass over a record.
///
/// ```rust
/// use std::collections::HashMap;
/// use appconf::{EnvOverlay, Overlay};
///
/// #[derive(Default, EnvOverlay)]
/// struct Settings {
///     #[env(var = "PORT")]
///     port: u16,
/// }
///
/// let env = HashMap::from([("PORT".to_string(), "8080".to_string())]);
/// let mut settings = Settings::default();
/// Overlay::new(&env).apply(&mut settings).unwrap();
/// assert_eq!(settings.port, 8080);
/// ```
#[derive(Debug)]
pub struct Overlay<E> {
    env: E,
    max_substitutions: usize,
}

impl<E: Environment> Overlay<E> {
    pub fn new(env: E) -> Self {
        Self {
            env,
            max_substitutions: DEFAULT_MAX_SUBSTITUTIONS,
        }
    }

    /// Caps the substitutions performed while resolving a single value.
    pub fn max_substitutions(mut self, limit: usize) -> Self {
        self.max_substitutions = limit;
        self
    }

    /// Overlays the environment onto `target` using its own bindings.
    pub fn apply<T: EnvOverlay>(&self, target: &mut T) -> Result<(), OverlayError> {
        self.apply_with(&T::env_bindings(), target)
    }

    /// Overlays the environment onto `target` using an explicit table.
    pub fn apply_with<T>(
        &self,
        table: &BindingTable<T>,
        target: &mut T,
    ) -> Result<(), OverlayError> {
        let interpolator = Interpolator::new(&self.env).max_substitutions(self.max_substitutions);
        let mut applied = 0usize;

        for binding in table {
            let Some(raw) = self.env.var(binding.var()).filter(|v| !v.is_empty()) else {
                trace!(field = binding.field(), var = binding.var(), "Variable not set, keeping value");
                continue;
            };

            let value = interpolator.resolve(binding.var(), &raw)?;
            binding.assign(target, &value).map_err(|e| {
                OverlayError::type_mismatch(binding.field(), binding.var(), e.kind, raw.as_str())
            })?;

            debug!(
                field = binding.field(),
                var = binding.var(),
                kind = %binding.kind(),
                "Overrode field from environment"
            );
            applied += 1;
        }

        debug!(applied, bindings = table.len(), "Environment overlay finished");
        Ok(())
    }
}
