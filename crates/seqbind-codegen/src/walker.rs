//! Declaration walker: drives one binder generation run over a package

use crate::config::GoBindConfig;
use crate::error::{BatchErrors, CodegenError, ErrorEntry};
use crate::printer::{render_member, Printer};
use crate::proxy::ProxyBuilder;
use crate::registry::{Registration, RegistrationGroup, RegistryEmitter};
use crate::wire::WireEncodingResolver;
use crate::Codegen;
use seqbind_core::model::{Declaration, Function, Variable};
use seqbind_core::{Code, CodeSpace, Descriptor, Package};
use std::fmt::{self, Write};
use tracing::{debug, info, instrument};

/// Everything one run produced
#[derive(Debug)]
pub struct Generation {
    /// Emitted Go source; only meaningful when `errors` is empty
    pub source: String,
    /// Every entry point registered, in emission order
    pub registrations: Vec<Registration>,
    pub errors: BatchErrors,
}

impl Generation {
    pub fn is_success(&self) -> bool {
        !self.errors.has_errors()
    }

    /// The artifact, or the full diagnostic batch if anything went wrong
    pub fn into_result(self) -> Result<String, CodegenError> {
        if self.errors.has_errors() {
            Err(self.errors.into())
        } else {
            Ok(self.source)
        }
    }

    /// Registrations under one descriptor
    pub fn registered_under<'a>(&'a self, descriptor: &'a str) -> impl Iterator<Item = &'a Registration> {
        self.registrations
            .iter()
            .filter(move |r| r.descriptor.as_str() == descriptor)
    }
}

/// Go binder generator
#[derive(Debug, Clone, Default)]
pub struct GoBindGen {
    config: GoBindConfig,
}

impl GoBindGen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: GoBindConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &GoBindConfig {
        &self.config
    }

    /// Walk every exported declaration in model order.
    ///
    /// Member-level problems are collected and generation moves on to the
    /// next member; only a package with nothing exported stops the run
    /// before any output.
    #[instrument(skip_all, fields(package = %package.name))]
    pub fn bind(&self, package: &Package) -> Result<Generation, CodegenError> {
        let mut errors = BatchErrors::new();
        errors.set_package_context(&package.name);

        if package.exported_declarations().next().is_none() {
            errors.add(ErrorEntry::no_exported_members(&package.path));
            return Ok(Generation {
                source: String::new(),
                registrations: Vec::new(),
                errors,
            });
        }

        let resolver = WireEncodingResolver::new(package, &self.config);
        let proxies = ProxyBuilder::new(&resolver);
        let mut registry = RegistryEmitter::new(self.config.seq_name());
        let mut p = Printer::new();
        self.gen_preamble(&mut p, package)?;

        let mut funcs = Vec::new();
        let mut vars = Vec::new();

        for decl in package.exported_declarations() {
            debug!("Generating {} {}", decl.kind(), decl.name());
            errors.set_type_context(decl.name());
            match decl {
                Declaration::Function(f) => {
                    let rendered = render_member(&mut errors, |p, errors| {
                        self.gen_func(p, errors, &proxies, package, f)
                    })?;
                    if let Some(rendered) = rendered {
                        p.append(rendered);
                        funcs.push(f.name.as_str());
                    }
                }
                Declaration::Struct(def) => {
                    let group = proxies.gen_struct(&mut p, &mut errors, def)?;
                    registry.emit_group(&mut p, &mut errors, group)?;
                }
                Declaration::Interface(def) => {
                    let group = proxies.gen_interface(&mut p, &mut errors, def)?;
                    registry.emit_group(&mut p, &mut errors, group)?;
                }
                Declaration::Variable(v) => {
                    let rendered = render_member(&mut errors, |p, errors| {
                        self.gen_var(p, errors, &resolver, package, v)
                    })?;
                    if let Some(rendered) = rendered {
                        p.append(rendered);
                        vars.push(v.name.as_str());
                    }
                }
                Declaration::Constant(_) => {}
                Declaration::Other(other) => {
                    errors.add(ErrorEntry::unsupported_declaration(&other.name, &other.description));
                }
            }
        }
        errors.clear_type_context();

        let mut group = RegistrationGroup::new();
        let package_descriptor = Descriptor::for_package(&package.name);
        for (i, name) in funcs.iter().enumerate() {
            group.push(Registration::literal(
                package_descriptor.clone(),
                Code::assign(CodeSpace::Function, i),
                format!("proxy_{}", name),
            ));
        }
        registry.emit_group(&mut p, &mut errors, group)?;

        let mut group = RegistrationGroup::new();
        for name in &vars {
            let descriptor = Descriptor::for_variable(&package.name, name);
            group.push(Registration::literal(
                descriptor.clone(),
                Code::assign(CodeSpace::VariableSet, 0),
                format!("var_set{}", name),
            ));
            group.push(Registration::literal(
                descriptor,
                Code::assign(CodeSpace::VariableGet, 0),
                format!("var_get{}", name),
            ));
        }
        registry.emit_group(&mut p, &mut errors, group)?;

        let registrations = registry.into_registrations();
        if errors.has_errors() {
            info!(
                "Binding {} failed with {} error(s)",
                package.path,
                errors.count()
            );
        } else {
            info!(
                "Bound {} with {} entry points",
                package.path,
                registrations.len()
            );
        }
        Ok(Generation {
            source: p.into_string(),
            registrations,
            errors,
        })
    }

    fn gen_preamble(&self, p: &mut Printer, package: &Package) -> fmt::Result {
        let name = &package.name;
        let generated = format!("{}{}", self.config.package_prefix, name);
        writeln!(
            p,
            "// Package {} is an autogenerated binder stub for package {}.",
            generated, name
        )?;
        writeln!(p, "//   seqbind -lang=go {}", package.path)?;
        writeln!(p, "//")?;
        writeln!(p, "// File is generated by seqbind. Do not edit.")?;
        writeln!(p, "package {}", generated)?;
        writeln!(p)?;
        writeln!(p, "import (")?;
        p.indent();
        writeln!(p, "{:?}", self.config.seq_import.trim_end_matches('/'))?;
        writeln!(p, "{:?}", package.path)?;
        p.outdent();
        writeln!(p, ")")?;
        writeln!(p)
    }

    fn gen_func(
        &self,
        p: &mut Printer,
        errors: &mut BatchErrors,
        proxies: &ProxyBuilder<'_, '_>,
        package: &Package,
        f: &Function,
    ) -> fmt::Result {
        writeln!(p, "func proxy_{}(out, in *{}.Buffer) {{", f.name, self.config.seq_name())?;
        p.indent();
        proxies.gen_func_body(p, errors, &f.name, &f.signature, &package.name)?;
        p.outdent();
        writeln!(p, "}}")?;
        writeln!(p)
    }

    fn gen_var(
        &self,
        p: &mut Printer,
        errors: &mut BatchErrors,
        resolver: &WireEncodingResolver<'_>,
        package: &Package,
        v: &Variable,
    ) -> fmt::Result {
        let seq = self.config.seq_name();
        let qualified = format!("{}.{}", package.name, v.name);
        if let Err(entry) = resolver.resolve(&v.ty) {
            errors.add(entry);
            return Ok(());
        }

        writeln!(p, "func var_set{}(out, in *{}.Buffer) {{", v.name, seq)?;
        p.indent();
        resolver.read(p, errors, "v", "in", &v.ty)?;
        writeln!(p, "{} = v", qualified)?;
        p.outdent();
        writeln!(p, "}}")?;
        writeln!(p)?;

        writeln!(p, "func var_get{}(out, in *{}.Buffer) {{", v.name, seq)?;
        p.indent();
        resolver.write(p, errors, &qualified, "out", &v.ty)?;
        p.outdent();
        writeln!(p, "}}")?;
        writeln!(p)
    }
}

impl Codegen for GoBindGen {
    fn generate(&mut self, package: &Package) -> Result<String, CodegenError> {
        self.bind(package)?.into_result()
    }
}
