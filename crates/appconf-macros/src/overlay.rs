//! `EnvOverlay` derive macro implementation.
//!
//! # Struct-level attributes `#[env(...)]`
//!
//! | Key | Example | Description |
//! |-----|---------|-------------|
//! | `prefix` | `"APP_"` | Prepended to every variable name of the struct |
//!
//! # Field-level attributes `#[env(...)]`
//!
//! | Key | Example | Description |
//! |-----|---------|-------------|
//! | `var` | `"HOST"` | Variable name (without prefix) |
//! | *(none)* | `#[env]` | Variable name is the upper-cased field name |
//!
//! The generated impl only names the field; the field type decides the
//! coercion through `EnvField`, so an unsupported type shows up as a missing
//! trait impl at the `#[env]` field.

use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};
use syn::ext::IdentExt;
use syn::{Attribute, Data, DeriveInput, Fields, Ident, LitStr, Meta, spanned::Spanned};

// ============================================================================
// Attribute structures
// ============================================================================

/// Struct-level `#[env(…)]` options.
#[derive(Default)]
struct StructAttrs {
    prefix: String,
}

/// A field carrying `#[env]` or `#[env(var = "…")]`.
struct BoundField {
    ident: Ident,
    var: String,
    span: proc_macro2::Span,
}

// ============================================================================
// Entry point
// ============================================================================

pub fn derive_env_overlay(input: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            Fields::Unnamed(_) | Fields::Unit => {
                return Err(syn::Error::new(
                    input.span(),
                    "EnvOverlay can only be derived for structs with named fields",
                ));
            }
        },
        Data::Enum(_) => {
            return Err(syn::Error::new(
                input.span(),
                "EnvOverlay cannot be derived for enums",
            ));
        }
        Data::Union(_) => {
            return Err(syn::Error::new(
                input.span(),
                "EnvOverlay cannot be derived for unions",
            ));
        }
    };

    let struct_attrs = parse_struct_attrs(&input.attrs)?;

    let mut bound = Vec::new();
    for field in fields {
        let Some(ident) = field.ident.clone() else {
            continue;
        };
        if let Some(var) = parse_field_attrs(&field.attrs, &ident)? {
            bound.push(BoundField {
                var: format!("{}{}", struct_attrs.prefix, var),
                span: field.span(),
                ident,
            });
        }
    }

    let binds = bound.iter().map(|f| {
        let ident = &f.ident;
        let field_lit = LitStr::new(&ident.unraw().to_string(), ident.span());
        let var_lit = LitStr::new(&f.var, f.span);
        quote_spanned! {f.span=>
            .bind(#field_lit, #var_lit, |record| &mut record.#ident)
        }
    });

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::appconf::EnvOverlay for #name #ty_generics #where_clause {
            fn env_bindings() -> ::appconf::BindingTable<Self> {
                ::appconf::BindingTable::<Self>::new()
                    #(#binds)*
            }
        }
    })
}

// ============================================================================
// Attribute parsing
// ============================================================================

fn parse_struct_attrs(attrs: &[Attribute]) -> syn::Result<StructAttrs> {
    let mut result = StructAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("env") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("prefix") {
                result.prefix = meta.value()?.parse::<LitStr>()?.value();
                Ok(())
            } else {
                Err(meta.error("unknown struct-level env attribute, expected `prefix`"))
            }
        })?;
    }

    Ok(result)
}

/// Returns the variable name (without prefix) if the field is bound.
fn parse_field_attrs(attrs: &[Attribute], ident: &Ident) -> syn::Result<Option<String>> {
    let mut var: Option<String> = None;

    for attr in attrs {
        if !attr.path().is_ident("env") {
            continue;
        }
        if var.is_some() {
            return Err(syn::Error::new(
                attr.span(),
                "duplicate #[env] attribute on field",
            ));
        }

        // Bare `#[env]` binds to the field name.
        if let Meta::Path(_) = attr.meta {
            var = Some(default_var_name(ident));
            continue;
        }

        let mut explicit: Option<LitStr> = None;
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("var") {
                explicit = Some(meta.value()?.parse::<LitStr>()?);
                Ok(())
            } else {
                Err(meta.error("unknown field-level env attribute, expected `var`"))
            }
        })?;

        var = Some(match explicit {
            Some(lit) if lit.value().is_empty() => {
                return Err(syn::Error::new(
                    lit.span(),
                    "environment variable name must not be empty",
                ));
            }
            Some(lit) => lit.value(),
            None => default_var_name(ident),
        });
    }

    Ok(var)
}

/// `app_host` -> `APP_HOST`; raw identifiers lose their `r#`.
fn default_var_name(ident: &Ident) -> String {
    ident.unraw().to_string().to_uppercase()
}
