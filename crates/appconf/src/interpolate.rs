//! `${NAME}` interpolation inside environment values.
//!
//! Resolution is plain iterative text substitution: the leftmost
//! placeholder is replaced by the value of the referenced variable (empty if
//! unset) and the string is scanned again from the start. A value may
//! therefore introduce new placeholders that get resolved in turn.
//!
//! There is no cycle detection. Instead the number of substitutions per value
//! is capped, and hitting the cap is reported as
//! [`OverlayError::InterpolationLimit`].

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::env::Environment;
use crate::error::OverlayError;

/// Default cap on substitutions performed while resolving one value.
pub const DEFAULT_MAX_SUBSTITUTIONS: usize = 64;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([a-zA-Z0-9_-]*)\}").expect("valid placeholder regex"));

/// Finds the leftmost placeholder, returning its byte range and the referenced name.
fn next_placeholder(value: &str) -> Option<(Range<usize>, String)> {
    let caps = PLACEHOLDER.captures(value)?;
    let whole = caps.get(0)?;
    let name = caps.get(1).map_or("", |m| m.as_str());
    Some((whole.range(), name.to_owned()))
}

/// Resolves `${NAME}` placeholders against an [`Environment`].
#[derive(Debug)]
pub struct Interpolator<'a, E: ?Sized> {
    env: &'a E,
    max_substitutions: usize,
}

impl<'a, E: Environment + ?Sized> Interpolator<'a, E> {
    pub fn new(env: &'a E) -> Self {
        Self {
            env,
            max_substitutions: DEFAULT_MAX_SUBSTITUTIONS,
        }
    }

    /// Sets the substitution cap.
    pub fn max_substitutions(mut self, limit: usize) -> Self {
        self.max_substitutions = limit;
        self
    }

    /// Resolves every placeholder in `raw`, the value of variable `var`.
    ///
    /// `var` is only used for error reporting.
    pub fn resolve(&self, var: &str, raw: &str) -> Result<String, OverlayError> {
        let mut value = raw.to_owned();
        let mut substitutions = 0;

        while let Some((range, name)) = next_placeholder(&value) {
            if substitutions == self.max_substitutions {
                return Err(OverlayError::InterpolationLimit {
                    var: var.to_owned(),
                    limit: self.max_substitutions,
                });
            }

            trace!(var, reference = %name, "Substituting placeholder");
            let replacement = self.env.var(&name).unwrap_or_default();
            value.replace_range(range, &replacement);
            substitutions += 1;
        }

        Ok(value)
    }
}
