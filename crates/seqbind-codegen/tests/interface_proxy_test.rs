mod fixtures;

use fixtures::{int, string, Fixtures};
use pretty_assertions::assert_eq;
use seqbind_codegen::wire::WireEncodingResolver;
use seqbind_codegen::proxy::ProxySummary;
use seqbind_codegen::{ErrorCategory, GoBindConfig, GoBindGen};
use seqbind_core::model::{InterfaceType, Signature, StructType};
use seqbind_core::{Code, PackageBuilder, TypeShape};

fn body(source: &str) -> &str {
    source.split_once(")\n\n").map(|(_, rest)| rest).unwrap_or(source)
}

#[test]
fn test_implementable_interface_output() -> Result<(), Box<dyn std::error::Error>> {
    let package = PackageBuilder::new("events", "example.com/events")
        .interface(
            InterfaceType::new("Listener")
                .method("OnEvent", Signature::new().param("e", TypeShape::pointer_to("events", "Event")))
                .method("Count", Signature::new().result(int()).result(TypeShape::Error)),
        )
        .build();

    let generation = GoBindGen::new().bind(&package)?;
    assert!(generation.is_success(), "{}", generation.errors);

    let expected = r#"const (
	proxyListener_Descriptor = "go.events.Listener"
	proxyListener_OnEvent_Code = 0x10a
	proxyListener_Count_Code = 0x20a
)

func proxyListener_OnEvent(out, in *seq.Buffer) {
	ref := in.ReadRef()
	v := ref.Get().(events.Listener)
	// Must be a Go object
	param_e_ref := in.ReadRef()
	param_e := param_e_ref.Get().(*events.Event)
	v.OnEvent(param_e)
}

func proxyListener_Count(out, in *seq.Buffer) {
	ref := in.ReadRef()
	v := ref.Get().(events.Listener)
	res, err := v.Count()
	out.WriteInt(res)
	if err == nil {
		out.WriteString("")
	} else {
		out.WriteString(err.Error())
	}
}

type proxyListener seq.Ref

func (p *proxyListener) OnEvent(param_e *events.Event) {
	in := new(seq.Buffer)
	in.WriteGoRef(param_e)
	seq.Transact((*seq.Ref)(p), proxyListener_Descriptor, proxyListener_OnEvent_Code, in)
}

func (p *proxyListener) Count() (int, error) {
	in := new(seq.Buffer)
	out := seq.Transact((*seq.Ref)(p), proxyListener_Descriptor, proxyListener_Count_Code, in)
	res_0 := out.ReadInt()
	res_1 := out.ReadError()
	return res_0, res_1
}

func init() {
	seq.Register(proxyListener_Descriptor, proxyListener_OnEvent_Code, proxyListener_OnEvent)
	seq.Register(proxyListener_Descriptor, proxyListener_Count_Code, proxyListener_Count)
}

"#;
    assert_eq!(body(&generation.source), expected);
    Ok(())
}

#[test]
fn test_unexported_method_blocks_proxy_type() -> Result<(), Box<dyn std::error::Error>> {
    let package = Fixtures::events();
    let generation = GoBindGen::new().bind(&package)?;
    assert!(generation.is_success(), "{}", generation.errors);

    let handlers: Vec<_> = generation
        .registered_under("go.events.Source")
        .map(|r| (r.handler.as_str(), r.code))
        .collect();
    assert_eq!(handlers, vec![("proxySource_Next", Code::new(0x10a))]);
    assert!(!generation.source.contains("type proxySource"));
    assert!(!generation.source.contains("func (p *proxySource)"));
    assert!(generation.source.contains("type proxyListener seq.Ref"));

    let config = GoBindConfig::default();
    let resolver = WireEncodingResolver::new(&package, &config);
    let source = package.find_interface("Source").ok_or("missing Source")?;
    assert!(!ProxySummary::of(source, &resolver).implementable);
    let listener = package.find_interface("Listener").ok_or("missing Listener")?;
    assert!(ProxySummary::of(listener, &resolver).implementable);
    Ok(())
}

#[test]
fn test_foreign_handle_arms() -> Result<(), Box<dyn std::error::Error>> {
    let generation = GoBindGen::new().bind(&Fixtures::events())?;
    let source = &generation.source;

    // Subscribe takes an implementable interface: foreign handles get a proxy
    assert!(source.contains(
        "\tswitch param_l_ref.Owner() {\n\
         \tcase seq.HostOwned:\n\
         \t\tparam_l = param_l_ref.Get().(events.Listener)\n\
         \tcase seq.ForeignOwned:\n\
         \t\tparam_l = (*proxyListener)(param_l_ref)\n\
         \t}\n"
    ));
    // Drain takes one that cannot be implemented from the other side
    assert!(source.contains(
        "\tcase seq.ForeignOwned:\n\
         \t\tpanic(\"seqbind: foreign object cannot be used as events.Source: no proxy type\")\n"
    ));
    Ok(())
}

#[test]
fn test_unrepresentable_method_is_skipped_not_reported() -> Result<(), Box<dyn std::error::Error>> {
    let package = PackageBuilder::new("io2", "example.com/io2")
        .interface(
            InterfaceType::new("Sink")
                .method("Write", Signature::new().param("w", TypeShape::interface("io", "Writer")))
                .method("Name", Signature::new().result(string())),
        )
        .build();

    let generation = GoBindGen::new().bind(&package)?;
    assert!(generation.is_success(), "{}", generation.errors);

    // Codes are assigned over the callable methods only
    let handlers: Vec<_> = generation
        .registered_under("go.io2.Sink")
        .map(|r| (r.handler.as_str(), r.code))
        .collect();
    assert_eq!(handlers, vec![("proxySink_Name", Code::new(0x10a))]);
    assert!(!generation.source.contains("type proxySink"));
    Ok(())
}

#[test]
fn test_unexported_signature_type_blocks_proxy_type() -> Result<(), Box<dyn std::error::Error>> {
    let package = PackageBuilder::new("events", "example.com/events")
        .structure(StructType::new("session").field("Id", int()))
        .interface(
            InterfaceType::new("Handler")
                .method("Handle", Signature::new().param("s", TypeShape::pointer_to("events", "session")))
                .method("Name", Signature::new().result(string())),
        )
        .build();

    let config = GoBindConfig::default();
    let resolver = WireEncodingResolver::new(&package, &config);
    let handler = package.find_interface("Handler").ok_or("missing Handler")?;
    let summary = ProxySummary::of(handler, &resolver);
    let callable: Vec<_> = summary.callable.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(callable, vec!["Name"]);
    assert!(!summary.implementable);

    let generation = GoBindGen::new().bind(&package)?;
    assert!(generation.is_success(), "{}", generation.errors);
    assert!(!generation.source.contains("type proxyHandler"));
    assert!(!generation.source.contains("events.session"));
    let handlers: Vec<_> = generation
        .registered_under("go.events.Handler")
        .map(|r| (r.handler.as_str(), r.code))
        .collect();
    assert_eq!(handlers, vec![("proxyHandler_Name", Code::new(0x10a))]);
    Ok(())
}

#[test]
fn test_unexported_type_in_function_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    let package = PackageBuilder::new("events", "example.com/events")
        .function("Open", Signature::new().result(TypeShape::pointer_to("events", "session")))
        .function("Ping", Signature::new())
        .build();

    let generation = GoBindGen::new().bind(&package)?;
    let entries = generation.errors.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].category, ErrorCategory::UnsupportedType);
    assert!(entries[0].message.contains("*events.session"));
    assert!(!generation.source.contains("events.session"));

    let handlers: Vec<_> = generation.registered_under("events").map(|r| r.handler.as_str()).collect();
    assert_eq!(handlers, vec!["proxy_Ping"]);
    Ok(())
}

#[test]
fn test_interface_without_callable_methods() -> Result<(), Box<dyn std::error::Error>> {
    let package = PackageBuilder::new("events", "example.com/events")
        .interface(InterfaceType::new("Sealed").method("seal", Signature::new()))
        .build();

    let generation = GoBindGen::new().bind(&package)?;
    assert!(generation.is_success());
    assert!(generation.registrations.is_empty());
    assert!(generation.source.contains("proxySealed_Descriptor = \"go.events.Sealed\""));
    assert!(!generation.source.contains("func init()"));
    Ok(())
}

#[test]
fn test_foreign_interface_parameter_in_function() -> Result<(), Box<dyn std::error::Error>> {
    let package = PackageBuilder::new("events", "example.com/events")
        .function("Pipe", Signature::new().param("w", TypeShape::interface("io", "Writer")))
        .function("Ping", Signature::new())
        .build();

    let generation = GoBindGen::new().bind(&package)?;
    let entries = generation.errors.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].category, ErrorCategory::CrossPackageType);
    assert!(entries[0].message.contains("io.Writer"));

    let handlers: Vec<_> = generation.registered_under("events").map(|r| r.handler.as_str()).collect();
    assert_eq!(handlers, vec!["proxy_Ping"]);
    Ok(())
}
