// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::any::{Any, type_name};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// A type-erased, cheaply cloneable value stored in or retrieved from a [`Namespace`][crate::Namespace].
///
/// The value remembers the name of its concrete type so that failed conversions can explain
/// what was found instead of what was expected.
///
/// # Examples
///
/// ```
/// use switchboard_inject::Value;
///
/// let value = Value::new(String::from("Test Value"));
/// assert_eq!(value.downcast_ref::<String>().map(String::as_str), Some("Test Value"));
/// assert!(value.downcast_ref::<i32>().is_none());
/// ```
#[derive(Clone)]
pub struct Value {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Value {
    /// Wraps a concrete value.
    pub fn new<V>(value: V) -> Self
    where
        V: Any + Send + Sync,
    {
        Self {
            inner: Arc::new(value),
            type_name: type_name::<V>(),
        }
    }

    /// The fully qualified name of the wrapped type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns `true` if the wrapped value is of type `V`.
    #[must_use]
    pub fn is<V: Any>(&self) -> bool {
        self.inner.is::<V>()
    }

    /// Borrows the wrapped value as `V`, if that is its type.
    #[must_use]
    pub fn downcast_ref<V: Any>(&self) -> Option<&V> {
        self.inner.downcast_ref::<V>()
    }

    /// Returns `true` if both values share the same allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Value").field(&self.type_name).finish()
    }
}

/// A reference to another namespace entry, resolved by the namespace on lookup.
///
/// Binding a link instead of a copy keeps a single source of truth: the target may be bound
/// later, by another component, and every lookup through the link observes it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Link {
    target: String,
}

impl Link {
    /// Creates a link pointing at `target`.
    pub fn new(target: impl Into<String>) -> Self {
        Self { target: target.into() }
    }

    /// The name this link redirects to.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "link to `{}`", self.target)
    }
}

/// The declared type of a constant entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ConstantType {
    /// A UTF-8 string.
    String,
    /// A single Unicode scalar value.
    Char,
    /// `true` or `false`.
    Bool,
    /// An 8-bit signed integer.
    I8,
    /// A 16-bit signed integer.
    I16,
    /// A 32-bit signed integer.
    I32,
    /// A 64-bit signed integer.
    I64,
    /// A 32-bit float.
    F32,
    /// A 64-bit float.
    F64,
}

impl ConstantType {
    /// The name under which this type is declared.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Char => "char",
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }

    /// Parses `literal` as a constant of this type.
    ///
    /// # Errors
    ///
    /// Returns an error if the literal is not a valid value of this type.
    pub fn parse_literal(self, literal: &str) -> Result<Constant, ConstantError> {
        let invalid = || ConstantError::InvalidLiteral {
            constant_type: self,
            literal: literal.to_owned(),
        };

        let constant = match self {
            Self::String => Constant::String(literal.to_owned()),
            Self::Char => {
                let mut chars = literal.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Constant::Char(c),
                    _ => return Err(invalid()),
                }
            }
            Self::Bool => Constant::Bool(literal.trim().parse().ok().ok_or_else(invalid)?),
            Self::I8 => Constant::I8(literal.trim().parse().ok().ok_or_else(invalid)?),
            Self::I16 => Constant::I16(literal.trim().parse().ok().ok_or_else(invalid)?),
            Self::I32 => Constant::I32(literal.trim().parse().ok().ok_or_else(invalid)?),
            Self::I64 => Constant::I64(literal.trim().parse().ok().ok_or_else(invalid)?),
            Self::F32 => Constant::F32(literal.trim().parse().ok().ok_or_else(invalid)?),
            Self::F64 => Constant::F64(literal.trim().parse().ok().ok_or_else(invalid)?),
        };

        Ok(constant)
    }
}

impl fmt::Display for ConstantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConstantType {
    type Err = ConstantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let constant_type = match s {
            "String" | "string" | "str" => Self::String,
            "char" => Self::Char,
            "bool" => Self::Bool,
            "i8" => Self::I8,
            "i16" => Self::I16,
            "i32" => Self::I32,
            "i64" => Self::I64,
            "f32" => Self::F32,
            "f64" => Self::F64,
            _ => return Err(ConstantError::UnknownType(s.to_owned())),
        };

        Ok(constant_type)
    }
}

/// A literal value of a typed constant entry.
///
/// When bound into a namespace the constant is unwrapped, so a lookup of an [`Constant::I32`]
/// entry yields a [`Value`] holding an `i32`.
///
/// Floating-point constants compare by representation: every `NaN` equals every other `NaN`,
/// while `0.0` and `-0.0` differ. Resolving the same literal twice always yields equal constants.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum Constant {
    /// A string constant.
    String(String),
    /// A character constant.
    Char(char),
    /// A boolean constant.
    Bool(bool),
    /// An `i8` constant.
    I8(i8),
    /// An `i16` constant.
    I16(i16),
    /// An `i32` constant.
    I32(i32),
    /// An `i64` constant.
    I64(i64),
    /// An `f32` constant.
    F32(f32),
    /// An `f64` constant.
    F64(f64),
}

impl Constant {
    /// The declared type of this constant.
    #[must_use]
    pub fn constant_type(&self) -> ConstantType {
        match self {
            Self::String(_) => ConstantType::String,
            Self::Char(_) => ConstantType::Char,
            Self::Bool(_) => ConstantType::Bool,
            Self::I8(_) => ConstantType::I8,
            Self::I16(_) => ConstantType::I16,
            Self::I32(_) => ConstantType::I32,
            Self::I64(_) => ConstantType::I64,
            Self::F32(_) => ConstantType::F32,
            Self::F64(_) => ConstantType::F64,
        }
    }

    /// Unwraps the constant into a type-erased value.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::String(v) => Value::new(v),
            Self::Char(v) => Value::new(v),
            Self::Bool(v) => Value::new(v),
            Self::I8(v) => Value::new(v),
            Self::I16(v) => Value::new(v),
            Self::I32(v) => Value::new(v),
            Self::I64(v) => Value::new(v),
            Self::F32(v) => Value::new(v),
            Self::F64(v) => Value::new(v),
        }
    }
}

impl PartialEq for Constant {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::I8(a), Self::I8(b)) => a == b,
            (Self::I16(a), Self::I16(b)) => a == b,
            (Self::I32(a), Self::I32(b)) => a == b,
            (Self::I64(a), Self::I64(b)) => a == b,
            (Self::F32(a), Self::F32(b)) => a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan()),
            (Self::F64(a), Self::F64(b)) => a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan()),
            _ => false,
        }
    }
}

impl Eq for Constant {}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(v) => write!(f, "{v:?}"),
            Self::Char(v) => write!(f, "{v:?}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::I8(v) => write!(f, "{v}i8"),
            Self::I16(v) => write!(f, "{v}i16"),
            Self::I32(v) => write!(f, "{v}i32"),
            Self::I64(v) => write!(f, "{v}i64"),
            Self::F32(v) => write!(f, "{v}f32"),
            Self::F64(v) => write!(f, "{v}f64"),
        }
    }
}

/// An error produced while interpreting a constant declaration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ConstantError {
    /// The declared type is not a supported constant type.
    #[error("unsupported constant type `{0}`")]
    UnknownType(String),

    /// The literal cannot be parsed as the declared type.
    #[error("`{literal}` is not a valid `{constant_type}` literal")]
    InvalidLiteral {
        /// The declared type.
        constant_type: ConstantType,
        /// The rejected literal.
        literal: String,
    },
}

/// An entry stored in a namespace: either a concrete value or a link to another entry.
#[derive(Debug, Clone)]
pub enum Entry {
    /// A concrete value.
    Value(Value),
    /// A link resolved by the namespace on lookup.
    Link(Link),
}

impl From<Value> for Entry {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<Link> for Entry {
    fn from(link: Link) -> Self {
        Self::Link(link)
    }
}

impl From<Constant> for Entry {
    fn from(constant: Constant) -> Self {
        Self::Value(constant.into_value())
    }
}
