//! Startup registration of generated entry points
//!
//! Every entry point is collected as a [`Registration`] while its declaration
//! is generated. Registrations are grouped (package functions, variables, one
//! group per struct or interface) and each group becomes one `init` block, so
//! the whole dispatch table is in place before the first transaction.

use crate::error::{BatchErrors, ErrorEntry};
use crate::printer::Printer;
use seqbind_core::{Code, Descriptor};
use std::collections::HashSet;
use std::fmt::{self, Write};

/// One `(descriptor, code) -> handler` binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub descriptor: Descriptor,
    pub code: Code,
    /// Name of the generated handler function
    pub handler: String,
    /// How the descriptor is spelled at the registration site
    pub descriptor_expr: String,
    /// How the code is spelled at the registration site
    pub code_expr: String,
}

impl Registration {
    /// Registration spelled with literals
    pub fn literal(descriptor: Descriptor, code: Code, handler: impl Into<String>) -> Self {
        Self {
            descriptor_expr: format!("{:?}", descriptor.as_str()),
            code_expr: code.to_string(),
            descriptor,
            code,
            handler: handler.into(),
        }
    }

    /// Registration spelled with the generated descriptor and code constants
    pub fn named(
        descriptor: Descriptor,
        descriptor_const: impl Into<String>,
        code: Code,
        code_const: impl Into<String>,
        handler: impl Into<String>,
    ) -> Self {
        Self {
            descriptor,
            code,
            handler: handler.into(),
            descriptor_expr: descriptor_const.into(),
            code_expr: code_const.into(),
        }
    }
}

/// Registrations for one declaration group
#[derive(Debug, Clone, Default)]
pub struct RegistrationGroup {
    pub entries: Vec<Registration>,
}

impl RegistrationGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, registration: Registration) {
        self.entries.push(registration);
    }
}

pub struct RegistryEmitter {
    seq_name: String,
    claimed: HashSet<(Descriptor, Code)>,
    registered: Vec<Registration>,
}

impl RegistryEmitter {
    pub fn new(seq_name: impl Into<String>) -> Self {
        Self {
            seq_name: seq_name.into(),
            claimed: HashSet::new(),
            registered: Vec::new(),
        }
    }

    /// Emit one `init` block registering every entry of `group`
    ///
    /// A key already claimed earlier in the run is reported and left out of
    /// the block. Empty groups emit nothing.
    pub fn emit_group(
        &mut self,
        p: &mut Printer,
        errors: &mut BatchErrors,
        group: RegistrationGroup,
    ) -> fmt::Result {
        let mut accepted = Vec::with_capacity(group.entries.len());
        for registration in group.entries {
            let key = (registration.descriptor.clone(), registration.code);
            if self.claimed.insert(key) {
                accepted.push(registration);
            } else {
                errors.add(ErrorEntry::duplicate_code(&registration.descriptor, registration.code));
            }
        }
        if accepted.is_empty() {
            return Ok(());
        }

        writeln!(p, "func init() {{")?;
        p.indent();
        for r in &accepted {
            writeln!(
                p,
                "{}.Register({}, {}, {})",
                self.seq_name, r.descriptor_expr, r.code_expr, r.handler
            )?;
        }
        p.outdent();
        writeln!(p, "}}")?;
        writeln!(p)?;

        tracing::debug!("Registered {} entry points", accepted.len());
        self.registered.extend(accepted);
        Ok(())
    }

    /// Everything registered so far, in emission order
    pub fn registrations(&self) -> &[Registration] {
        &self.registered
    }

    pub fn into_registrations(self) -> Vec<Registration> {
        self.registered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;

    #[test]
    fn test_emit_group() -> fmt::Result {
        let mut emitter = RegistryEmitter::new("seq");
        let mut errors = BatchErrors::new();
        let mut p = Printer::new();

        let mut group = RegistrationGroup::new();
        group.push(Registration::literal(Descriptor::for_package("calc"), Code::new(1), "proxy_Add"));
        group.push(Registration::literal(Descriptor::for_package("calc"), Code::new(2), "proxy_Sub"));
        emitter.emit_group(&mut p, &mut errors, group)?;

        assert_eq!(
            p.as_str(),
            "func init() {\n\tseq.Register(\"calc\", 1, proxy_Add)\n\tseq.Register(\"calc\", 2, proxy_Sub)\n}\n\n"
        );
        assert_eq!(emitter.registrations().len(), 2);
        Ok(())
    }

    #[test]
    fn test_duplicate_key_reported_once_registered_once() -> fmt::Result {
        let mut emitter = RegistryEmitter::new("seq");
        let mut errors = BatchErrors::new();
        let mut p = Printer::new();

        let desc = Descriptor::for_variable("calc", "Mode");
        let mut first = RegistrationGroup::new();
        first.push(Registration::literal(desc.clone(), Code::new(1), "var_setMode"));
        emitter.emit_group(&mut p, &mut errors, first)?;

        let mut second = RegistrationGroup::new();
        second.push(Registration::literal(desc, Code::new(1), "var_setOther"));
        emitter.emit_group(&mut p, &mut errors, second)?;

        assert_eq!(errors.count(), 1);
        assert_eq!(errors.entries()[0].category, ErrorCategory::DuplicateCode);
        assert_eq!(emitter.registrations().len(), 1);
        assert!(!p.as_str().contains("var_setOther"));
        Ok(())
    }

    #[test]
    fn test_empty_group_emits_nothing() -> fmt::Result {
        let mut emitter = RegistryEmitter::new("seq");
        let mut errors = BatchErrors::new();
        let mut p = Printer::new();
        emitter.emit_group(&mut p, &mut errors, RegistrationGroup::new())?;
        assert!(p.is_empty());
        Ok(())
    }
}
