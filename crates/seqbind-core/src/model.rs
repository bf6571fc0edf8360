//! Exported API surface of one package, as handed over by the type model provider

use crate::error::CoreError;
use crate::naming::is_exported;
use crate::types::TypeShape;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One package and its declarations, in model order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    /// Package name (`counter`)
    pub name: String,
    /// Import path (`example.com/counter`)
    pub path: String,
    #[serde(default)]
    pub declarations: Vec<Declaration>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Declaration {
    Function(Function),
    Struct(StructType),
    Interface(InterfaceType),
    Variable(Variable),
    Constant(Constant),
    /// A declaration the provider could not classify
    Other(OtherDeclaration),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Param {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub ty: TypeShape,
}

/// Ordered parameters and results of a callable
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Signature {
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub results: Vec<TypeShape>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    #[serde(flatten)]
    pub signature: Signature,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    #[serde(flatten)]
    pub signature: Signature,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeShape,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructType {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    /// Method set of the pointer receiver
    #[serde(default)]
    pub methods: Vec<Method>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterfaceType {
    pub name: String,
    #[serde(default)]
    pub methods: Vec<Method>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeShape,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constant {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtherDeclaration {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Declaration::Function(f) => &f.name,
            Declaration::Struct(s) => &s.name,
            Declaration::Interface(i) => &i.name,
            Declaration::Variable(v) => &v.name,
            Declaration::Constant(c) => &c.name,
            Declaration::Other(o) => &o.name,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Declaration::Function(_) => "function",
            Declaration::Struct(_) => "struct",
            Declaration::Interface(_) => "interface",
            Declaration::Variable(_) => "variable",
            Declaration::Constant(_) => "constant",
            Declaration::Other(_) => "other",
        }
    }

    pub fn is_exported(&self) -> bool {
        is_exported(self.name())
    }
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, name: impl Into<String>, ty: TypeShape) -> Self {
        self.params.push(Param {
            name: Some(name.into()),
            ty,
        });
        self
    }

    pub fn result(mut self, ty: TypeShape) -> Self {
        self.results.push(ty);
        self
    }

    /// Every parameter and result shape, parameters first
    pub fn shapes(&self) -> impl Iterator<Item = &TypeShape> {
        self.params.iter().map(|p| &p.ty).chain(self.results.iter())
    }
}

impl Function {
    pub fn new(name: impl Into<String>, signature: Signature) -> Self {
        Self {
            name: name.into(),
            signature,
        }
    }
}

impl Method {
    pub fn new(name: impl Into<String>, signature: Signature) -> Self {
        Self {
            name: name.into(),
            signature,
        }
    }

    pub fn is_exported(&self) -> bool {
        is_exported(&self.name)
    }
}

impl Field {
    pub fn new(name: impl Into<String>, ty: TypeShape) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

impl StructType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, ty: TypeShape) -> Self {
        self.fields.push(Field::new(name, ty));
        self
    }

    pub fn method(mut self, name: impl Into<String>, signature: Signature) -> Self {
        self.methods.push(Method::new(name, signature));
        self
    }

    /// Exported fields in declaration order
    pub fn exported_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| is_exported(&f.name))
    }

    /// Exported pointer-receiver methods in declaration order
    pub fn exported_methods(&self) -> impl Iterator<Item = &Method> {
        self.methods.iter().filter(|m| m.is_exported())
    }
}

impl InterfaceType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    pub fn method(mut self, name: impl Into<String>, signature: Signature) -> Self {
        self.methods.push(Method::new(name, signature));
        self
    }
}

impl Package {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            declarations: Vec::new(),
        }
    }

    /// Parse a package model from its JSON hand-off form
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let package: Package = serde_json::from_str(json)?;
        package.check()?;
        Ok(package)
    }

    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let json = std::fs::read_to_string(path)?;
        tracing::debug!("Loaded package model from {}", path.display());
        Self::from_json(&json)
    }

    /// Exported declarations in model order
    pub fn exported_declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter().filter(|d| d.is_exported())
    }

    pub fn find_interface(&self, name: &str) -> Option<&InterfaceType> {
        self.declarations.iter().find_map(|d| match d {
            Declaration::Interface(i) if i.name == name => Some(i),
            _ => None,
        })
    }

    pub fn find_struct(&self, name: &str) -> Option<&StructType> {
        self.declarations.iter().find_map(|d| match d {
            Declaration::Struct(s) if s.name == name => Some(s),
            _ => None,
        })
    }

    fn check(&self) -> Result<(), CoreError> {
        if self.name.is_empty() {
            return Err(CoreError::InvalidModel("package name is empty".to_string()));
        }
        let mut seen = std::collections::HashSet::new();
        for decl in &self.declarations {
            if !seen.insert(decl.name()) {
                return Err(CoreError::InvalidModel(format!(
                    "declaration '{}' appears more than once in package '{}'",
                    decl.name(),
                    self.name
                )));
            }
        }
        Ok(())
    }
}

/// Builder pattern for constructing package models
pub struct PackageBuilder {
    package: Package,
}

impl PackageBuilder {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            package: Package::new(name, path),
        }
    }

    pub fn function(mut self, name: impl Into<String>, signature: Signature) -> Self {
        self.package
            .declarations
            .push(Declaration::Function(Function::new(name, signature)));
        self
    }

    pub fn structure(mut self, def: StructType) -> Self {
        self.package.declarations.push(Declaration::Struct(def));
        self
    }

    pub fn interface(mut self, def: InterfaceType) -> Self {
        self.package.declarations.push(Declaration::Interface(def));
        self
    }

    pub fn variable(mut self, name: impl Into<String>, ty: TypeShape) -> Self {
        self.package.declarations.push(Declaration::Variable(Variable {
            name: name.into(),
            ty,
        }));
        self
    }

    pub fn constant(mut self, name: impl Into<String>) -> Self {
        self.package
            .declarations
            .push(Declaration::Constant(Constant { name: name.into() }));
        self
    }

    pub fn other(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.package
            .declarations
            .push(Declaration::Other(OtherDeclaration {
                name: name.into(),
                description: description.into(),
            }));
        self
    }

    pub fn build(self) -> Package {
        self.package
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PrimitiveKind;

    #[test]
    fn test_exported_filtering_keeps_order() {
        let package = PackageBuilder::new("counter", "example.com/counter")
            .function("Zeta", Signature::new())
            .function("hidden", Signature::new())
            .constant("Alpha")
            .build();

        let names: Vec<_> = package.exported_declarations().map(|d| d.name()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha"]);
    }

    #[test]
    fn test_struct_member_filtering() {
        let def = StructType::new("Counter")
            .field("Value", TypeShape::primitive(PrimitiveKind::Int))
            .field("step", TypeShape::primitive(PrimitiveKind::Int))
            .method("Inc", Signature::new())
            .method("reset", Signature::new());

        assert_eq!(def.exported_fields().count(), 1);
        assert_eq!(def.exported_methods().map(|m| m.name.as_str()).collect::<Vec<_>>(), vec!["Inc"]);
    }

    #[test]
    fn test_duplicate_declarations_rejected() {
        let json = r#"{
            "name": "dup",
            "path": "example.com/dup",
            "declarations": [
                {"kind": "constant", "name": "A"},
                {"kind": "constant", "name": "A"}
            ]
        }"#;
        assert!(matches!(Package::from_json(json), Err(CoreError::InvalidModel(_))));
    }
}
