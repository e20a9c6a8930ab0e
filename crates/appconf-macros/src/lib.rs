//! Procedural macros for the appconf configuration loader.
//!
//! This crate provides:
//!
//! - `#[derive(EnvOverlay)]` - Generates the environment binding table of a record
//!
//! Use it through the `appconf` crate, which re-exports the derive next to
//! the trait of the same name.

mod overlay;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Derives `appconf::EnvOverlay` for a struct with named fields.
///
/// # Attributes
///
/// - `#[env(prefix = "...")]` on the struct - prefix for every variable name
/// - `#[env(var = "...")]` on a field - bind the field to `{prefix}{var}`
/// - `#[env]` on a field - bind the field to `{prefix}{FIELD_NAME}`
///
/// Fields without `#[env]` are not bound.
///
/// # Example
///
/// ```rust,ignore
/// use appconf::EnvOverlay;
///
/// #[derive(Default, serde::Deserialize, EnvOverlay)]
/// #[env(prefix = "APP_")]
/// pub struct MyConfig {
///     #[env(var = "HOST")]
///     pub app_host: Option<String>,
///     #[env]
///     pub port: Option<i64>,
///     pub motd: String,
/// }
/// ```
#[proc_macro_derive(EnvOverlay, attributes(env))]
pub fn derive_env_overlay(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match overlay::derive_env_overlay(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
