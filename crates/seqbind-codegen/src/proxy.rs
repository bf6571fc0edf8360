//! Proxy construction for structs and interfaces
//!
//! Struct form: getter/setter entry points per exported field and a call
//! entry point per exported method, all operating on a host object named
//! by the handle read first from the request.
//!
//! Interface form: call entry points for every callable method and, when
//! the whole interface is implementable, a proxy type whose methods forward
//! each call as one blocking transaction.

use crate::error::{BatchErrors, ErrorEntry};
use crate::printer::{render_member, Printer};
use crate::registry::{Registration, RegistrationGroup};
use crate::wire::WireEncodingResolver;
use seqbind_core::model::{InterfaceType, Method, Signature, StructType};
use seqbind_core::naming::param_name;
use seqbind_core::{Code, CodeSpace, Descriptor};
use std::fmt::{self, Write};
use tracing::{debug, instrument, warn};

pub fn proxy_type_name(type_name: &str) -> String {
    format!("proxy{}", type_name)
}

/// Zero results, one result, or a value followed by an error
pub fn has_valid_arity(signature: &Signature) -> bool {
    match signature.results.as_slice() {
        [] | [_] => true,
        [_, second] => second.is_error(),
        _ => false,
    }
}

/// What can be done with an interface from the other runtime
#[derive(Debug, Clone)]
pub struct ProxySummary<'a> {
    /// Methods with an exported name, a valid arity and only representable
    /// types, in declaration order
    pub callable: Vec<&'a Method>,
    /// Every method is callable, so a proxy type can implement the interface
    pub implementable: bool,
}

impl<'a> ProxySummary<'a> {
    pub fn of(iface: &'a InterfaceType, resolver: &WireEncodingResolver<'_>) -> Self {
        let callable: Vec<&Method> = iface
            .methods
            .iter()
            .filter(|m| {
                m.is_exported()
                    && has_valid_arity(&m.signature)
                    && m.signature.shapes().all(|s| resolver.is_representable(s))
            })
            .collect();
        let implementable = callable.len() == iface.methods.len();
        Self {
            callable,
            implementable,
        }
    }
}

pub struct ProxyBuilder<'r, 'p> {
    resolver: &'r WireEncodingResolver<'p>,
}

impl<'r, 'p> ProxyBuilder<'r, 'p> {
    pub fn new(resolver: &'r WireEncodingResolver<'p>) -> Self {
        Self { resolver }
    }

    fn pkg(&self) -> &'p str {
        &self.resolver.package().name
    }

    fn seq(&self) -> &'p str {
        self.resolver.config().seq_name()
    }

    fn descriptor(&self, type_name: &str) -> Descriptor {
        Descriptor::for_type(&self.resolver.config().namespace, self.pkg(), type_name)
    }

    /// Shared call protocol: read parameters, invoke, write value then error.
    ///
    /// `selector` is what the callable is invoked on: the package name for
    /// functions, the bound receiver for methods.
    pub fn gen_func_body(
        &self,
        p: &mut Printer,
        errors: &mut BatchErrors,
        name: &str,
        signature: &Signature,
        selector: &str,
    ) -> fmt::Result {
        if !has_valid_arity(signature) {
            errors.add(ErrorEntry::signature_arity(name, signature.results.len()));
            return Ok(());
        }

        let mut args = Vec::with_capacity(signature.params.len());
        for (i, param) in signature.params.iter().enumerate() {
            let local = format!("param_{}", param_name(param.name.as_deref(), i));
            self.resolver.read(p, errors, &local, "in", &param.ty)?;
            args.push(local);
        }

        let (returns_value, returns_error) = match signature.results.as_slice() {
            [] => (false, false),
            [only] if only.is_error() => (false, true),
            [_] => (true, false),
            _ => (true, true),
        };
        let assign = match (returns_value, returns_error) {
            (true, true) => "res, err := ",
            (true, false) => "res := ",
            (false, true) => "err := ",
            (false, false) => "",
        };
        writeln!(p, "{}{}.{}({})", assign, selector, name, args.join(", "))?;

        if returns_value {
            self.resolver.write(p, errors, "res", "out", &signature.results[0])?;
        }
        if returns_error {
            let last = &signature.results[signature.results.len() - 1];
            self.resolver.write(p, errors, "err", "out", last)?;
        }
        Ok(())
    }

    /// Descriptor/code constants, proxy type and entry points for a struct.
    ///
    /// Field and method codes come from their position among the exported
    /// fields and exported methods; a member dropped for an error keeps its
    /// siblings' codes unchanged.
    #[instrument(skip_all, fields(name = %def.name), level = "debug")]
    pub fn gen_struct(
        &self,
        p: &mut Printer,
        errors: &mut BatchErrors,
        def: &StructType,
    ) -> Result<RegistrationGroup, fmt::Error> {
        let pkg = self.pkg();
        let seq = self.seq();
        let proxy = proxy_type_name(&def.name);
        let descriptor = self.descriptor(&def.name);
        let descriptor_const = format!("{}_Descriptor", proxy);

        let mut consts: Vec<(String, Code)> = Vec::new();
        let mut bodies = Printer::new();
        let mut group = RegistrationGroup::new();

        for (i, field) in def.exported_fields().enumerate() {
            errors.set_member_context(&field.name);
            let set_fn = format!("{}_{}_Set", proxy, field.name);
            let get_fn = format!("{}_{}_Get", proxy, field.name);

            let rendered = render_member(errors, |p, errors| {
                if let Err(entry) = self.resolver.resolve(&field.ty) {
                    errors.add(entry);
                    return Ok(());
                }
                writeln!(p, "func {}(out, in *{}.Buffer) {{", set_fn, seq)?;
                p.indent();
                writeln!(p, "ref := in.ReadRef()")?;
                self.resolver.read(p, errors, "v", "in", &field.ty)?;
                writeln!(p, "ref.Get().(*{}.{}).{} = v", pkg, def.name, field.name)?;
                p.outdent();
                writeln!(p, "}}")?;
                writeln!(p)?;

                writeln!(p, "func {}(out, in *{}.Buffer) {{", get_fn, seq)?;
                p.indent();
                writeln!(p, "ref := in.ReadRef()")?;
                writeln!(p, "v := ref.Get().(*{}.{}).{}", pkg, def.name, field.name)?;
                self.resolver.write(p, errors, "v", "out", &field.ty)?;
                p.outdent();
                writeln!(p, "}}")?;
                writeln!(p)
            })?;

            let Some(rendered) = rendered else {
                debug!("Dropping field {}.{}", def.name, field.name);
                continue;
            };
            bodies.append(rendered);

            let get_const = format!("{}_{}_Get_Code", proxy, field.name);
            let set_const = format!("{}_{}_Set_Code", proxy, field.name);
            let get_code = Code::assign(CodeSpace::FieldGet, i);
            let set_code = Code::assign(CodeSpace::FieldSet, i);
            group.push(Registration::named(
                descriptor.clone(),
                &descriptor_const,
                set_code,
                &set_const,
                &set_fn,
            ));
            group.push(Registration::named(
                descriptor.clone(),
                &descriptor_const,
                get_code,
                &get_const,
                &get_fn,
            ));
            consts.push((get_const, get_code));
            consts.push((set_const, set_code));
        }

        for (i, method) in def.exported_methods().enumerate() {
            errors.set_member_context(&method.name);
            let handler = format!("{}_{}", proxy, method.name);

            let rendered = render_member(errors, |p, errors| {
                writeln!(p, "func {}(out, in *{}.Buffer) {{", handler, seq)?;
                p.indent();
                writeln!(p, "ref := in.ReadRef()")?;
                writeln!(p, "v := ref.Get().(*{}.{})", pkg, def.name)?;
                self.gen_func_body(p, errors, &method.name, &method.signature, "v")?;
                p.outdent();
                writeln!(p, "}}")?;
                writeln!(p)
            })?;

            let Some(rendered) = rendered else {
                debug!("Dropping method {}.{}", def.name, method.name);
                continue;
            };
            bodies.append(rendered);

            let code_const = format!("{}_{}_Code", proxy, method.name);
            let code = Code::assign(CodeSpace::StructMethod, i);
            group.push(Registration::named(
                descriptor.clone(),
                &descriptor_const,
                code,
                &code_const,
                &handler,
            ));
            consts.push((code_const, code));
        }
        errors.clear_member_context();

        self.gen_consts(p, &descriptor_const, &descriptor, &consts)?;
        writeln!(p, "type {} {}.Ref", proxy, seq)?;
        writeln!(p)?;
        p.append(bodies);
        Ok(group)
    }

    /// Constants, call entry points and (when implementable) the proxy type
    /// for an interface
    #[instrument(skip_all, fields(name = %def.name), level = "debug")]
    pub fn gen_interface(
        &self,
        p: &mut Printer,
        errors: &mut BatchErrors,
        def: &InterfaceType,
    ) -> Result<RegistrationGroup, fmt::Error> {
        let pkg = self.pkg();
        let seq = self.seq();
        let proxy = proxy_type_name(&def.name);
        let descriptor = self.descriptor(&def.name);
        let descriptor_const = format!("{}_Descriptor", proxy);
        let summary = ProxySummary::of(def, self.resolver);

        for method in &def.methods {
            if !summary.callable.iter().any(|m| m.name == method.name) {
                warn!(
                    "{}.{} is not callable from the other runtime; {} gets no proxy type",
                    def.name, method.name, def.name
                );
            }
        }

        let mut consts: Vec<(String, Code)> = Vec::new();
        let mut bodies = Printer::new();
        let mut group = RegistrationGroup::new();

        for (i, method) in summary.callable.iter().enumerate() {
            errors.set_member_context(&method.name);
            let handler = format!("{}_{}", proxy, method.name);

            let rendered = render_member(errors, |p, errors| {
                writeln!(p, "func {}(out, in *{}.Buffer) {{", handler, seq)?;
                p.indent();
                writeln!(p, "ref := in.ReadRef()")?;
                writeln!(p, "v := ref.Get().({}.{})", pkg, def.name)?;
                self.gen_func_body(p, errors, &method.name, &method.signature, "v")?;
                p.outdent();
                writeln!(p, "}}")?;
                writeln!(p)
            })?;

            let Some(rendered) = rendered else {
                continue;
            };
            bodies.append(rendered);

            let code_const = format!("{}_{}_Code", proxy, method.name);
            let code = Code::assign(CodeSpace::InterfaceMethod, i);
            group.push(Registration::named(
                descriptor.clone(),
                &descriptor_const,
                code,
                &code_const,
                &handler,
            ));
            consts.push((code_const, code));
        }

        self.gen_consts(p, &descriptor_const, &descriptor, &consts)?;
        p.append(bodies);

        if !summary.implementable {
            // An unexported method, or a signature that cannot cross the
            // bridge: a foreign object can never satisfy this interface.
            debug!("{} is not implementable, skipping proxy type", def.name);
            errors.clear_member_context();
            return Ok(group);
        }

        writeln!(p, "type {} {}.Ref", proxy, seq)?;
        writeln!(p)?;
        for method in &def.methods {
            errors.set_member_context(&method.name);
            let rendered = render_member(errors, |p, errors| {
                self.gen_forwarding_method(p, errors, &proxy, &descriptor_const, method)
            })?;
            if let Some(rendered) = rendered {
                p.append(rendered);
            }
        }
        errors.clear_member_context();
        Ok(group)
    }

    /// One transaction per call: parameters are serialized before it,
    /// results deserialized after it in declaration order
    fn gen_forwarding_method(
        &self,
        p: &mut Printer,
        errors: &mut BatchErrors,
        proxy: &str,
        descriptor_const: &str,
        method: &Method,
    ) -> fmt::Result {
        let seq = self.seq();
        let signature = &method.signature;

        let mut params = Vec::with_capacity(signature.params.len());
        let mut locals = Vec::with_capacity(signature.params.len());
        for (i, param) in signature.params.iter().enumerate() {
            let local = format!("param_{}", param_name(param.name.as_deref(), i));
            match self.resolver.go_type(&param.ty) {
                Ok(ty) => params.push(format!("{} {}", local, ty)),
                Err(entry) => errors.add(entry),
            }
            locals.push(local);
        }
        let mut results = Vec::with_capacity(signature.results.len());
        for shape in &signature.results {
            match self.resolver.go_type(shape) {
                Ok(ty) => results.push(ty),
                Err(entry) => errors.add(entry),
            }
        }
        let results = match results.len() {
            0 => String::new(),
            1 => format!(" {}", results[0]),
            _ => format!(" ({})", results.join(", ")),
        };

        writeln!(
            p,
            "func (p *{}) {}({}){} {{",
            proxy,
            method.name,
            params.join(", "),
            results
        )?;
        p.indent();
        writeln!(p, "in := new({}.Buffer)", seq)?;
        for (param, local) in signature.params.iter().zip(&locals) {
            self.resolver.write(p, errors, local, "in", &param.ty)?;
        }

        let code_const = format!("{}_{}_Code", proxy, method.name);
        if signature.results.is_empty() {
            writeln!(
                p,
                "{}.Transact((*{}.Ref)(p), {}, {}, in)",
                seq, seq, descriptor_const, code_const
            )?;
        } else {
            writeln!(
                p,
                "out := {}.Transact((*{}.Ref)(p), {}, {}, in)",
                seq, seq, descriptor_const, code_const
            )?;
            let mut returned = Vec::with_capacity(signature.results.len());
            for (i, shape) in signature.results.iter().enumerate() {
                let local = format!("res_{}", i);
                self.resolver.read(p, errors, &local, "out", shape)?;
                returned.push(local);
            }
            writeln!(p, "return {}", returned.join(", "))?;
        }
        p.outdent();
        writeln!(p, "}}")?;
        writeln!(p)
    }

    fn gen_consts(
        &self,
        p: &mut Printer,
        descriptor_const: &str,
        descriptor: &Descriptor,
        codes: &[(String, Code)],
    ) -> fmt::Result {
        writeln!(p, "const (")?;
        p.indent();
        writeln!(p, "{} = {:?}", descriptor_const, descriptor.as_str())?;
        for (name, code) in codes {
            writeln!(p, "{} = {:#x}", name, code)?;
        }
        p.outdent();
        writeln!(p, ")")?;
        writeln!(p)
    }
}
