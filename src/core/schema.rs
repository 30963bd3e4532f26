//! Field descriptors for loadable record types.
//!
//! A record type describes its fields once through [`Configurable::describe`].
//! Each descriptor carries the field name, the kind of value it holds, a setter,
//! and the annotations the loader reads constraints from.

use crate::core::Constraint;
use crate::error::CoerceError;
use std::fmt;
use std::time::Duration;

/// A record type that can be populated by a [`Loader`](crate::core::Loader).
///
/// The record starts as `Default::default()`; fields without a resolvable value
/// keep their default.
///
/// # Examples
///
/// ```rust
/// use configly::prelude::*;
/// use std::time::Duration;
///
/// #[derive(Debug, Default)]
/// struct ServerConfig {
///     port: u16,
///     timeout: Duration,
/// }
///
/// impl Configurable for ServerConfig {
///     fn describe(schema: &mut Schema<Self>) {
///         schema
///             .field("port", |c| &mut c.port)
///             .tag("configly", "PORT,default=8080,min=1024");
///         schema
///             .field("timeout", |c| &mut c.timeout)
///             .tag("configly", "TIMEOUT,default=30s");
///     }
/// }
/// ```
pub trait Configurable: Default + 'static {
    /// Register every field of the record, in declaration order.
    fn describe(schema: &mut Schema<Self>);
}

/// The kind of value a field holds, used to pick a coercion rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// `String`
    String,
    /// `i8`
    I8,
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// `isize`
    Isize,
    /// `u8`
    U8,
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u64`
    U64,
    /// `usize`
    Usize,
    /// `f32`
    F32,
    /// `f64`
    F64,
    /// `bool`
    Bool,
    /// `std::time::Duration`, parsed from literals such as `"1h30m"`.
    ///
    /// Negative literals such as `"-5s"` are rejected, since `Duration` is unsigned.
    Duration,
    /// Any other type; loading a value into it always fails
    Unsupported(&'static str),
}

impl Kind {
    /// Whether values of this kind are unsigned integers.
    pub fn is_unsigned(&self) -> bool {
        matches!(
            self,
            Self::U8 | Self::U16 | Self::U32 | Self::U64 | Self::Usize
        )
    }

    /// Short type name, e.g. `"u16"` or `"duration"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::Isize => "isize",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::Usize => "usize",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Bool => "bool",
            Self::Duration => "duration",
            Self::Unsupported(name) => name,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A coerced field value, widened to a common representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// String value
    String(String),
    /// Any signed integer
    Int(i64),
    /// Any unsigned integer
    Uint(u64),
    /// Any float
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// Duration value
    Duration(Duration),
}

/// Field types the loader knows how to assign.
pub trait FieldValue: Sized + 'static {
    /// Coercion rule for this type.
    const KIND: Kind;

    /// Narrow a coerced value back to this type.
    ///
    /// Returns `None` if the value has the wrong shape or does not fit.
    fn from_value(value: Value) -> Option<Self>;
}

impl FieldValue for String {
    const KIND: Kind = Kind::String;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl FieldValue for bool {
    const KIND: Kind = Kind::Bool;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }
}

impl FieldValue for Duration {
    const KIND: Kind = Kind::Duration;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Duration(d) => Some(d),
            _ => None,
        }
    }
}

impl FieldValue for f64 {
    const KIND: Kind = Kind::F64;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Float(v) => Some(v),
            _ => None,
        }
    }
}

impl FieldValue for f32 {
    const KIND: Kind = Kind::F32;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Float(v) => Some(v as f32),
            _ => None,
        }
    }
}

macro_rules! integer_field_value {
    ($variant:ident => $($ty:ty: $kind:ident),+ $(,)?) => {
        $(
            impl FieldValue for $ty {
                const KIND: Kind = Kind::$kind;

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => <$ty>::try_from(v).ok(),
                        _ => None,
                    }
                }
            }
        )+
    };
}

integer_field_value!(Int => i8: I8, i16: I16, i32: I32, i64: I64, isize: Isize);
integer_field_value!(Uint => u8: U8, u16: U16, u32: U32, u64: U64, usize: Usize);

type Setter<T> = Box<dyn Fn(&mut T, Value) -> bool + Send + Sync>;

enum Access<T> {
    /// Not assignable by the loader.
    Private,
    /// Assignable, but of a type the loader cannot produce.
    Opaque,
    Typed(Setter<T>),
}

/// How a field is annotated under one tag key.
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    /// Raw tag string, parsed on every load.
    Tag(String),
    /// Constraint declared directly.
    Constraint(Constraint),
}

/// Descriptor for one field of a record.
pub struct Field<T> {
    name: &'static str,
    kind: Kind,
    access: Access<T>,
    annotations: Vec<(String, Annotation)>,
}

impl<T> Field<T> {
    fn new(name: &'static str, kind: Kind, access: Access<T>) -> Self {
        Self {
            name,
            kind,
            access,
            annotations: Vec::new(),
        }
    }

    /// Attach a tag string under `tag_key`, e.g. `tag("configly", "PORT,default=8080")`.
    ///
    /// A later annotation under the same key replaces an earlier one.
    pub fn tag(&mut self, tag_key: impl Into<String>, raw: impl Into<String>) -> &mut Self {
        self.annotate(tag_key.into(), Annotation::Tag(raw.into()))
    }

    /// Attach a constraint under `tag_key` without going through tag parsing.
    pub fn constraint(&mut self, tag_key: impl Into<String>, constraint: Constraint) -> &mut Self {
        self.annotate(tag_key.into(), Annotation::Constraint(constraint))
    }

    fn annotate(&mut self, tag_key: String, annotation: Annotation) -> &mut Self {
        match self.annotations.iter_mut().find(|(key, _)| *key == tag_key) {
            Some((_, existing)) => *existing = annotation,
            None => self.annotations.push((tag_key, annotation)),
        }
        self
    }

    /// Field name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Kind of value the field holds.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Whether the loader may assign this field.
    pub fn is_settable(&self) -> bool {
        !matches!(self.access, Access::Private)
    }

    /// The annotation under `tag_key`. An empty tag string counts as no annotation.
    pub fn annotation(&self, tag_key: &str) -> Option<&Annotation> {
        self.annotations
            .iter()
            .find(|(key, _)| key == tag_key)
            .map(|(_, annotation)| annotation)
            .filter(|annotation| !matches!(annotation, Annotation::Tag(raw) if raw.is_empty()))
    }

    /// Assign a coerced value to this field of `record`.
    pub(crate) fn set(&self, record: &mut T, value: Value) -> Result<(), CoerceError> {
        let assigned = match &self.access {
            Access::Typed(setter) => setter(record, value),
            Access::Private | Access::Opaque => false,
        };
        if assigned {
            Ok(())
        } else {
            Err(CoerceError::Unsupported(self.kind.as_str()))
        }
    }
}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("settable", &self.is_settable())
            .field("annotations", &self.annotations)
            .finish()
    }
}

/// The ordered field table of a record type.
pub struct Schema<T> {
    fields: Vec<Field<T>>,
}

impl<T: Configurable> Schema<T> {
    /// Build the schema of `T` from its [`Configurable::describe`] implementation.
    pub fn of() -> Self {
        let mut schema = Self { fields: Vec::new() };
        T::describe(&mut schema);
        schema
    }
}

impl<T: 'static> Schema<T> {
    /// Register a field the loader can assign.
    pub fn field<V, F>(&mut self, name: &'static str, access: F) -> &mut Field<T>
    where
        V: FieldValue,
        F: Fn(&mut T) -> &mut V + Send + Sync + 'static,
    {
        let setter: Setter<T> = Box::new(move |record, value| match V::from_value(value) {
            Some(v) => {
                *access(record) = v;
                true
            }
            None => false,
        });
        self.push(Field::new(name, V::KIND, Access::Typed(setter)))
    }

    /// Register a field whose type cannot be loaded from a string.
    ///
    /// Resolving a value for it produces an "unsupported field type" error.
    pub fn opaque<V, F>(&mut self, name: &'static str, _access: F) -> &mut Field<T>
    where
        V: 'static,
        F: Fn(&mut T) -> &mut V,
    {
        let kind = Kind::Unsupported(std::any::type_name::<V>());
        self.push(Field::new(name, kind, Access::Opaque))
    }

    /// Register a field the loader must not assign. It is skipped even when tagged.
    pub fn private(&mut self, name: &'static str) -> &mut Field<T> {
        self.push(Field::new(name, Kind::Unsupported("private"), Access::Private))
    }

    fn push(&mut self, field: Field<T>) -> &mut Field<T> {
        let index = self.fields.len();
        self.fields.push(field);
        &mut self.fields[index]
    }
}

impl<T> Schema<T> {
    /// Fields in declaration order.
    pub fn fields(&self) -> &[Field<T>] {
        &self.fields
    }

    /// Number of registered fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field was registered.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
