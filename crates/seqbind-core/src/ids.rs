//! Descriptors and codes: the keys of the cross-runtime dispatch table
//!
//! Both sides of the bridge are built independently, so every key produced
//! here is part of the wire contract:
//!
//! - A [`Descriptor`] is derived only from the namespace, package and type
//!   name, never from anything that varies between builds.
//! - A [`Code`] is derived only from a member's position in the model's
//!   ordered field or method list. The model supplies declaration order and
//!   nothing here sorts or hashes it.
//!
//! | Member                         | Code                      |
//! |--------------------------------|---------------------------|
//! | struct field `i`, getter       | `i * 0x100 + 0x0f`        |
//! | struct field `i`, setter       | `i * 0x100 + 0x1f`        |
//! | struct method `i`              | `i * 0x100 + 0x0c`        |
//! | interface callable method `i`  | `(i + 1) * 0x100 + 0x0a`  |
//! | package function `i`           | `i + 1`                   |
//! | variable setter / getter       | `1` / `2`                 |

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable string key naming a package, type or variable
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Descriptor(String);

impl Descriptor {
    /// `<namespace>.<package>.<Type>`
    pub fn for_type(namespace: &str, package: &str, type_name: &str) -> Self {
        Self(format!("{}.{}.{}", namespace, package, type_name))
    }

    /// Package-level functions register under the bare package name
    pub fn for_package(package: &str) -> Self {
        Self(package.to_string())
    }

    /// `<package>.<Var>`
    pub fn for_variable(package: &str, variable: &str) -> Self {
        Self(format!("{}.{}", package, variable))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Numbering space a code is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeSpace {
    FieldGet,
    FieldSet,
    StructMethod,
    InterfaceMethod,
    Function,
    VariableSet,
    VariableGet,
}

/// Small integer identifying one member within a descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Code(i32);

impl Code {
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Code for the member at `index` (0-based) of its ordered list
    pub fn assign(space: CodeSpace, index: usize) -> Self {
        let i = index as i32;
        let value = match space {
            CodeSpace::FieldGet => (i << 8) | 0x0f,
            CodeSpace::FieldSet => (i << 8) | 0x1f,
            CodeSpace::StructMethod => (i << 8) | 0x0c,
            CodeSpace::InterfaceMethod => ((i + 1) << 8) | 0x0a,
            CodeSpace::Function => i + 1,
            CodeSpace::VariableSet => 1,
            CodeSpace::VariableGet => 2,
        };
        Self(value)
    }

    pub fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::LowerHex for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}
