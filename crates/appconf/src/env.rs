//! Environment providers.
//!
//! The overlay never touches `std::env` directly; it reads through an
//! [`Environment`] so tests and embedders can supply their own variables.
//!
//! The process environment is read without taking a snapshot. Callers must
//! not modify it from another thread while a load is running.

use std::collections::{BTreeMap, HashMap};
use std::env::VarError;

use tracing::warn;

/// Read-only source of environment variables.
pub trait Environment {
    /// Returns the value of `name`, or `None` if it is not set.
    fn var(&self, name: &str) -> Option<String>;
}

/// The environment of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        match std::env::var(name) {
            Ok(value) => Some(value),
            Err(VarError::NotPresent) => None,
            Err(VarError::NotUnicode(_)) => {
                warn!(var = name, "Ignoring environment variable with non-Unicode value");
                None
            }
        }
    }
}

impl Environment for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl Environment for BTreeMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl<E: Environment + ?Sized> Environment for &E {
    fn var(&self, name: &str) -> Option<String> {
        (**self).var(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_environments() {
        let hash: HashMap<String, String> = [("A".to_string(), "1".to_string())].into();
        let btree: BTreeMap<String, String> = [("A".to_string(), "1".to_string())].into();

        assert_eq!(hash.var("A").as_deref(), Some("1"));
        assert_eq!(btree.var("A").as_deref(), Some("1"));
        assert_eq!(hash.var("B"), None);
        assert_eq!((&btree).var("B"), None);
    }

    #[test]
    fn test_process_env() {
        // SAFETY: the variable name is unique to this test and removed right after
        unsafe {
            std::env::set_var("APPCONF_TEST_PROCESS_ENV", "present");
        }
        assert_eq!(
            ProcessEnv.var("APPCONF_TEST_PROCESS_ENV").as_deref(),
            Some("present")
        );
        unsafe {
            std::env::remove_var("APPCONF_TEST_PROCESS_ENV");
        }
        assert_eq!(ProcessEnv.var("APPCONF_TEST_PROCESS_ENV"), None);
    }
}
