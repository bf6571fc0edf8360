//! Wire encoding resolution
//!
//! Maps every [`TypeShape`] onto one of a closed set of [`WireStrategy`]s and
//! emits the matching `seq.Buffer` reads and writes. Resolution is a single
//! exhaustive match; shapes outside the supported set always land in an
//! error arm, never in a default that silently emits something.

use crate::config::GoBindConfig;
use crate::error::{BatchErrors, ErrorEntry};
use crate::printer::Printer;
use crate::proxy::{proxy_type_name, ProxySummary};
use seqbind_core::naming::is_exported;
use seqbind_core::{NamedRef, Package, PrimitiveKind, TypeShape, Underlying};
use std::fmt::{self, Write};

/// How a value of some type crosses the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireStrategy<'a> {
    /// Message string, empty for nil
    Error,
    /// Leaf encode/decode keyed by kind
    Primitive(PrimitiveKind),
    /// `*T` for a struct of this package: always a host object
    ObjectPointer(&'a NamedRef),
    /// Named interface or pointer type of this package: a host object or,
    /// when a proxy type exists, a foreign one
    NamedHandle(&'a NamedRef),
}

pub struct WireEncodingResolver<'p> {
    package: &'p Package,
    config: &'p GoBindConfig,
}

impl<'p> WireEncodingResolver<'p> {
    pub fn new(package: &'p Package, config: &'p GoBindConfig) -> Self {
        Self { package, config }
    }

    pub fn package(&self) -> &'p Package {
        self.package
    }

    pub fn config(&self) -> &'p GoBindConfig {
        self.config
    }

    pub fn resolve<'a>(&self, shape: &'a TypeShape) -> Result<WireStrategy<'a>, ErrorEntry> {
        match shape {
            TypeShape::Error => Ok(WireStrategy::Error),
            TypeShape::Primitive(kind) => Ok(WireStrategy::Primitive(*kind)),
            TypeShape::PointerToNamed(named) => {
                self.check_visible(shape, named)?;
                Ok(WireStrategy::ObjectPointer(named))
            }
            TypeShape::Named(named) => match named.underlying {
                Underlying::Interface | Underlying::Pointer => {
                    self.check_visible(shape, named)?;
                    Ok(WireStrategy::NamedHandle(named))
                }
                Underlying::Struct | Underlying::Other => Err(ErrorEntry::unsupported_type(
                    shape,
                    "named types are only supported by pointer or as interfaces",
                )),
            },
            TypeShape::Other(_) => Err(ErrorEntry::unsupported_type(
                shape,
                "no wire encoding for this type shape",
            )),
        }
    }

    pub fn is_representable(&self, shape: &TypeShape) -> bool {
        self.resolve(shape).is_ok()
    }

    /// Named types must belong to the bound package and be nameable from
    /// the generated one
    fn check_visible(&self, shape: &TypeShape, named: &NamedRef) -> Result<(), ErrorEntry> {
        if !named.is_defined_in(&self.package.name) {
            return Err(ErrorEntry::cross_package(named, &self.package.name));
        }
        if !is_exported(&named.name) {
            return Err(ErrorEntry::unsupported_type(
                shape,
                "unexported types cannot be referenced from the generated package",
            ));
        }
        Ok(())
    }

    /// Whether a foreign-owned handle of `named` can be materialized
    pub fn has_proxy(&self, named: &NamedRef) -> bool {
        match named.underlying {
            Underlying::Interface => self
                .package
                .find_interface(&named.name)
                .is_some_and(|iface| ProxySummary::of(iface, self).implementable),
            Underlying::Struct | Underlying::Pointer | Underlying::Other => false,
        }
    }

    /// Spelling of `shape` in the generated package
    pub fn go_type(&self, shape: &TypeShape) -> Result<String, ErrorEntry> {
        Ok(match self.resolve(shape)? {
            WireStrategy::Error => "error".to_string(),
            WireStrategy::Primitive(kind) => kind.go_name().to_string(),
            WireStrategy::ObjectPointer(named) => format!("*{}.{}", self.package.name, named.name),
            WireStrategy::NamedHandle(named) => format!("{}.{}", self.package.name, named.name),
        })
    }

    /// Emit code writing `val` of type `shape` into buffer `seq`
    pub fn write(
        &self,
        p: &mut Printer,
        errors: &mut BatchErrors,
        val: &str,
        seq: &str,
        shape: &TypeShape,
    ) -> fmt::Result {
        match self.resolve(shape) {
            Ok(strategy) => self.emit_write(p, strategy, val, seq),
            Err(entry) => {
                errors.add(entry);
                Ok(())
            }
        }
    }

    /// Emit code declaring `val` and reading it from buffer `seq`
    pub fn read(
        &self,
        p: &mut Printer,
        errors: &mut BatchErrors,
        val: &str,
        seq: &str,
        shape: &TypeShape,
    ) -> fmt::Result {
        match self.resolve(shape) {
            Ok(strategy) => self.emit_read(p, strategy, val, seq),
            Err(entry) => {
                errors.add(entry);
                Ok(())
            }
        }
    }

    fn emit_write(&self, p: &mut Printer, strategy: WireStrategy<'_>, val: &str, seq: &str) -> fmt::Result {
        match strategy {
            WireStrategy::Error => {
                writeln!(p, "if {} == nil {{", val)?;
                writeln!(p, "\t{}.WriteString(\"\")", seq)?;
                writeln!(p, "}} else {{")?;
                writeln!(p, "\t{}.WriteString({}.Error())", seq, val)?;
                writeln!(p, "}}")
            }
            WireStrategy::Primitive(kind) => {
                writeln!(p, "{}.Write{}({})", seq, kind.seq_suffix(), val)
            }
            WireStrategy::ObjectPointer(_) | WireStrategy::NamedHandle(_) => {
                writeln!(p, "{}.WriteGoRef({})", seq, val)
            }
        }
    }

    fn emit_read(&self, p: &mut Printer, strategy: WireStrategy<'_>, val: &str, seq: &str) -> fmt::Result {
        let pkg = &self.package.name;
        match strategy {
            WireStrategy::Error => writeln!(p, "{} := {}.ReadError()", val, seq),
            WireStrategy::Primitive(kind) => {
                writeln!(p, "{} := {}.Read{}()", val, seq, kind.seq_suffix())
            }
            WireStrategy::ObjectPointer(named) => {
                writeln!(p, "// Must be a Go object")?;
                writeln!(p, "{}_ref := {}.ReadRef()", val, seq)?;
                writeln!(p, "{} := {}_ref.Get().(*{}.{})", val, val, pkg, named.name)
            }
            WireStrategy::NamedHandle(named) => {
                let seq_pkg = self.config.seq_name();
                writeln!(p, "var {} {}.{}", val, pkg, named.name)?;
                writeln!(p, "{}_ref := {}.ReadRef()", val, seq)?;
                writeln!(p, "switch {}_ref.Owner() {{", val)?;
                writeln!(p, "case {}.HostOwned:", seq_pkg)?;
                writeln!(p, "\t{} = {}_ref.Get().({}.{})", val, val, pkg, named.name)?;
                writeln!(p, "case {}.ForeignOwned:", seq_pkg)?;
                if self.has_proxy(named) {
                    writeln!(p, "\t{} = (*{})({}_ref)", val, proxy_type_name(&named.name), val)?;
                } else {
                    writeln!(
                        p,
                        "\tpanic(\"seqbind: foreign object cannot be used as {}.{}: no proxy type\")",
                        pkg, named.name
                    )?;
                }
                writeln!(p, "}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;
    use seqbind_core::model::{InterfaceType, Signature};
    use seqbind_core::PackageBuilder;

    fn package() -> Package {
        PackageBuilder::new("events", "example.com/events")
            .interface(
                InterfaceType::new("Listener")
                    .method("OnEvent", Signature::new().param("id", TypeShape::primitive(PrimitiveKind::Int))),
            )
            .interface(InterfaceType::new("Sealed").method("seal", Signature::new()))
            .build()
    }

    #[test]
    fn test_closed_set_resolution() {
        let package = package();
        let config = GoBindConfig::default();
        let resolver = WireEncodingResolver::new(&package, &config);

        assert!(matches!(resolver.resolve(&TypeShape::Error), Ok(WireStrategy::Error)));
        assert!(matches!(
            resolver.resolve(&TypeShape::primitive(PrimitiveKind::Float32)),
            Ok(WireStrategy::Primitive(PrimitiveKind::Float32))
        ));
        assert!(matches!(
            resolver.resolve(&TypeShape::pointer_to("events", "Event")),
            Ok(WireStrategy::ObjectPointer(_))
        ));
        assert!(matches!(
            resolver.resolve(&TypeShape::interface("events", "Listener")),
            Ok(WireStrategy::NamedHandle(_))
        ));
    }

    #[test]
    fn test_proxy_availability() {
        let package = package();
        let config = GoBindConfig::default();
        let resolver = WireEncodingResolver::new(&package, &config);

        assert!(resolver.has_proxy(&NamedRef::new("events", "Listener", Underlying::Interface)));
        // Unexported method
        assert!(!resolver.has_proxy(&NamedRef::new("events", "Sealed", Underlying::Interface)));
        // Named pointer types never get a proxy type
        assert!(!resolver.has_proxy(&NamedRef::new("events", "Handle", Underlying::Pointer)));
    }

    #[test]
    fn test_unsupported_and_foreign_shapes() {
        let package = package();
        let config = GoBindConfig::default();
        let resolver = WireEncodingResolver::new(&package, &config);

        let map = TypeShape::Other("map[string]int".to_string());
        assert!(matches!(
            resolver.resolve(&map),
            Err(ErrorEntry { category: ErrorCategory::UnsupportedType, .. })
        ));

        let by_value = TypeShape::Named(NamedRef::new("events", "Event", Underlying::Struct));
        assert!(matches!(
            resolver.resolve(&by_value),
            Err(ErrorEntry { category: ErrorCategory::UnsupportedType, .. })
        ));

        let foreign = TypeShape::pointer_to("time", "Timer");
        assert!(matches!(
            resolver.resolve(&foreign),
            Err(ErrorEntry { category: ErrorCategory::CrossPackageType, .. })
        ));

        let hidden = TypeShape::pointer_to("events", "session");
        assert!(matches!(
            resolver.resolve(&hidden),
            Err(ErrorEntry { category: ErrorCategory::UnsupportedType, .. })
        ));
        assert!(!resolver.is_representable(&TypeShape::interface("events", "sink")));
    }

    #[test]
    fn test_write_error_value() -> fmt::Result {
        let package = package();
        let config = GoBindConfig::default();
        let resolver = WireEncodingResolver::new(&package, &config);
        let mut errors = BatchErrors::new();
        let mut p = Printer::new();

        resolver.write(&mut p, &mut errors, "err", "out", &TypeShape::Error)?;
        assert_eq!(
            p.as_str(),
            "if err == nil {\n\tout.WriteString(\"\")\n} else {\n\tout.WriteString(err.Error())\n}\n"
        );
        assert!(!errors.has_errors());
        Ok(())
    }

    #[test]
    fn test_read_handle_with_and_without_proxy() -> fmt::Result {
        let package = package();
        let config = GoBindConfig::default();
        let resolver = WireEncodingResolver::new(&package, &config);
        let mut errors = BatchErrors::new();

        let mut p = Printer::new();
        resolver.read(&mut p, &mut errors, "l", "in", &TypeShape::interface("events", "Listener"))?;
        assert!(p.as_str().contains("switch l_ref.Owner() {"));
        assert!(p.as_str().contains("case seq.HostOwned:\n\tl = l_ref.Get().(events.Listener)"));
        assert!(p.as_str().contains("case seq.ForeignOwned:\n\tl = (*proxyListener)(l_ref)"));

        let mut p = Printer::new();
        resolver.read(&mut p, &mut errors, "s", "in", &TypeShape::interface("events", "Sealed"))?;
        assert!(p.as_str().contains("panic(\"seqbind: foreign object cannot be used as events.Sealed: no proxy type\")"));
        assert!(!p.as_str().contains("proxySealed"));

        assert!(!errors.has_errors());
        Ok(())
    }

    #[test]
    fn test_failed_resolution_records_and_emits_nothing() -> fmt::Result {
        let package = package();
        let config = GoBindConfig::default();
        let resolver = WireEncodingResolver::new(&package, &config);
        let mut errors = BatchErrors::new();
        let mut p = Printer::new();

        resolver.read(&mut p, &mut errors, "v", "in", &TypeShape::Other("chan int".to_string()))?;
        assert!(p.is_empty());
        assert_eq!(errors.count(), 1);
        Ok(())
    }
}
