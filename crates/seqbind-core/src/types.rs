//! Closed set of type shapes the binder understands
//!
//! The type model provider resolves every parameter, result, field and
//! variable type down to one of these shapes. Anything the provider cannot
//! place in the closed set arrives as [`TypeShape::Other`] and is always
//! rejected by the generator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Leaf value kinds with a direct buffer encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    String,
    ByteArray,
}

impl PrimitiveKind {
    /// Suffix of the `seq.Buffer` accessor pair (`WriteInt32` / `ReadInt32`)
    pub fn seq_suffix(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "Bool",
            PrimitiveKind::Int => "Int",
            PrimitiveKind::Int8 => "Int8",
            PrimitiveKind::Int16 => "Int16",
            PrimitiveKind::Int32 => "Int32",
            PrimitiveKind::Int64 => "Int64",
            PrimitiveKind::Float32 => "Float32",
            PrimitiveKind::Float64 => "Float64",
            PrimitiveKind::String => "String",
            PrimitiveKind::ByteArray => "ByteArray",
        }
    }

    /// Spelling of the kind in Go source
    pub fn go_name(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Int8 => "int8",
            PrimitiveKind::Int16 => "int16",
            PrimitiveKind::Int32 => "int32",
            PrimitiveKind::Int64 => "int64",
            PrimitiveKind::Float32 => "float32",
            PrimitiveKind::Float64 => "float64",
            PrimitiveKind::String => "string",
            PrimitiveKind::ByteArray => "[]byte",
        }
    }
}

/// Shape of the type a named type is declared over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Underlying {
    Struct,
    Interface,
    Pointer,
    Other,
}

/// Reference to a named type, with the package that declares it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamedRef {
    /// Package name of the declaring package
    pub package: String,
    pub name: String,
    pub underlying: Underlying,
}

impl NamedRef {
    pub fn new(package: impl Into<String>, name: impl Into<String>, underlying: Underlying) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
            underlying,
        }
    }

    pub fn is_defined_in(&self, package: &str) -> bool {
        self.package == package
    }
}

impl fmt::Display for NamedRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.package, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeShape {
    Primitive(PrimitiveKind),
    /// The distinguished `error` interface
    Error,
    /// `*T` for a named type `T`
    PointerToNamed(NamedRef),
    /// A named type used by value
    Named(NamedRef),
    /// Anything outside the closed set, carrying the provider's spelling
    Other(String),
}

impl TypeShape {
    pub fn primitive(kind: PrimitiveKind) -> Self {
        TypeShape::Primitive(kind)
    }

    pub fn pointer_to(package: impl Into<String>, name: impl Into<String>) -> Self {
        TypeShape::PointerToNamed(NamedRef::new(package, name, Underlying::Struct))
    }

    pub fn interface(package: impl Into<String>, name: impl Into<String>) -> Self {
        TypeShape::Named(NamedRef::new(package, name, Underlying::Interface))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, TypeShape::Error)
    }

    /// The named type this shape refers to, if any
    pub fn named(&self) -> Option<&NamedRef> {
        match self {
            TypeShape::PointerToNamed(named) | TypeShape::Named(named) => Some(named),
            TypeShape::Primitive(_) | TypeShape::Error | TypeShape::Other(_) => None,
        }
    }
}

impl fmt::Display for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeShape::Primitive(kind) => write!(f, "{}", kind.go_name()),
            TypeShape::Error => write!(f, "error"),
            TypeShape::PointerToNamed(named) => write!(f, "*{}", named),
            TypeShape::Named(named) => write!(f, "{}", named),
            TypeShape::Other(spelling) => write!(f, "{}", spelling),
        }
    }
}
