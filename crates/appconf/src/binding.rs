//! Compile-time binding table between record fields and environment variables.
//!
//! A record describes which of its fields can be overridden from the
//! environment by implementing [`EnvOverlay`], either through
//! `#[derive(EnvOverlay)]` or by hand with [`BindingTable::bind`]:
//!
//! ```rust
//! use appconf::{BindingTable, EnvOverlay};
//!
//! #[derive(Default)]
//! struct Database {
//!     host: String,
//!     port: Option<u16>,
//! }
//!
//! impl EnvOverlay for Database {
//!     fn env_bindings() -> BindingTable<Self> {
//!         BindingTable::<Self>::new()
//!             .bind("host", "DB_HOST", |db| &mut db.host)
//!             .bind("port", "DB_PORT", |db| &mut db.port)
//!     }
//! }
//! ```
//!
//! Only types implementing [`EnvField`] can be bound: `String`, `bool`, the
//! primitive integers, and `Option` of any of them. Binding anything else
//! fails to compile.

use std::borrow::Cow;
use std::fmt;

use crate::env::{Environment, ProcessEnv};
use crate::error::{CoerceError, OverlayError};
use crate::overlay::Overlay;

/// Value kinds an environment variable can be coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Used verbatim after interpolation.
    String,
    /// Base-10 integer.
    Integer,
    /// `true`/`false` and their common spellings.
    Boolean,
}

impl FieldKind {
    /// Returns the kind name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field type that can be populated from an environment variable.
pub trait EnvField: Sized {
    /// Kind the raw string is coerced to.
    const KIND: FieldKind;

    /// Whether the field is nullable (`Option<_>`).
    const OPTIONAL: bool = false;

    /// Converts an interpolated environment value into the field type.
    fn coerce(raw: &str) -> Result<Self, CoerceError>;
}

impl EnvField for String {
    const KIND: FieldKind = FieldKind::String;

    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        Ok(raw.to_owned())
    }
}

impl EnvField for bool {
    const KIND: FieldKind = FieldKind::Boolean;

    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        parse_bool(raw).ok_or_else(|| CoerceError::new(FieldKind::Boolean, raw))
    }
}

macro_rules! impl_integer_field {
    ($($ty:ty),* $(,)?) => {
        $(
            impl EnvField for $ty {
                const KIND: FieldKind = FieldKind::Integer;

                fn coerce(raw: &str) -> Result<Self, CoerceError> {
                    raw.parse::<$ty>()
                        .map_err(|_| CoerceError::new(FieldKind::Integer, raw))
                }
            }
        )*
    };
}

impl_integer_field!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

// `Option<T>` is spelled out per type so that only scalars can be nullable.
macro_rules! impl_optional_field {
    ($($ty:ty),* $(,)?) => {
        $(
            impl EnvField for Option<$ty> {
                const KIND: FieldKind = <$ty as EnvField>::KIND;
                const OPTIONAL: bool = true;

                fn coerce(raw: &str) -> Result<Self, CoerceError> {
                    <$ty as EnvField>::coerce(raw).map(Some)
                }
            }
        )*
    };
}

impl_optional_field!(
    String, bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize,
);

/// Parses the boolean literals accepted from the environment.
///
/// Accepts `1`, `t`, `T`, `TRUE`, `true`, `True` and
/// `0`, `f`, `F`, `FALSE`, `false`, `False`.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

type Assign<T> = Box<dyn Fn(&mut T, &str) -> Result<(), CoerceError>>;

/// One field of a record bound to an environment variable.
pub struct FieldBinding<T> {
    field: &'static str,
    var: Cow<'static, str>,
    kind: FieldKind,
    optional: bool,
    assign: Assign<T>,
}

impl<T> FieldBinding<T> {
    /// Record field name.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Environment variable that overrides the field.
    pub fn var(&self) -> &str {
        &self.var
    }

    /// Kind the variable is coerced to.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Whether the field is an `Option`.
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Coerces `value` and writes it into the field of `target`.
    pub(crate) fn assign(&self, target: &mut T, value: &str) -> Result<(), CoerceError> {
        (self.assign)(target, value)
    }
}

impl<T> fmt::Debug for FieldBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldBinding")
            .field("field", &self.field)
            .field("var", &self.var)
            .field("kind", &self.kind)
            .field("optional", &self.optional)
            .finish_non_exhaustive()
    }
}

/// Ordered set of [`FieldBinding`]s for a record type.
///
/// Bindings are applied in the order they were added.
pub struct BindingTable<T> {
    bindings: Vec<FieldBinding<T>>,
}

impl<T> Default for BindingTable<T> {
    fn default() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }
}

impl<T: 'static> BindingTable<T> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `field` to the environment variable `var`.
    ///
    /// `accessor` hands out the field slot; its type decides the kind the
    /// variable is coerced to.
    ///
    /// # Panics
    ///
    /// Panics if `var` is empty or `field` is already bound. Both are
    /// mistakes in the record definition, not runtime conditions.
    pub fn bind<V>(
        mut self,
        field: &'static str,
        var: impl Into<Cow<'static, str>>,
        accessor: fn(&mut T) -> &mut V,
    ) -> Self
    where
        V: EnvField + 'static,
    {
        let var = var.into();
        assert!(
            !var.is_empty(),
            "field `{field}` is bound to an empty environment variable name"
        );
        assert!(
            self.get(field).is_none(),
            "field `{field}` is bound to more than one environment variable"
        );

        self.bindings.push(FieldBinding {
            field,
            var,
            kind: V::KIND,
            optional: V::OPTIONAL,
            assign: Box::new(move |target: &mut T, raw: &str| {
                *accessor(target) = V::coerce(raw)?;
                Ok(())
            }),
        });
        self
    }
}

impl<T> BindingTable<T> {
    /// Looks up the binding of a field by name.
    pub fn get(&self, field: &str) -> Option<&FieldBinding<T>> {
        self.bindings.iter().find(|b| b.field == field)
    }

    /// Iterates over the bindings in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldBinding<T>> {
        self.bindings.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl<'a, T> IntoIterator for &'a BindingTable<T> {
    type Item = &'a FieldBinding<T>;
    type IntoIter = std::slice::Iter<'a, FieldBinding<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> fmt::Debug for BindingTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.bindings).finish()
    }
}

/// A configuration record whose fields can be overridden from the environment.
///
/// Usually derived; see the crate documentation for the attribute syntax.
pub trait EnvOverlay: Sized + 'static {
    /// Returns the record's field bindings in declaration order.
    fn env_bindings() -> BindingTable<Self>;

    /// Overlays values from `env` onto `self`.
    fn apply_env<E: Environment + ?Sized>(&mut self, env: &E) -> Result<(), OverlayError> {
        Overlay::new(env).apply(self)
    }

    /// Overlays values from the process environment onto `self`.
    fn apply_process_env(&mut self) -> Result<(), OverlayError> {
        self.apply_env(&ProcessEnv)
    }
}
