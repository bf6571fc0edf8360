//! Package models shared by the generator tests
#![allow(dead_code)]

use seqbind_core::model::{InterfaceType, Signature, StructType};
use seqbind_core::{Package, PackageBuilder, PrimitiveKind, TypeShape};

pub fn int() -> TypeShape {
    TypeShape::primitive(PrimitiveKind::Int)
}

pub fn string() -> TypeShape {
    TypeShape::primitive(PrimitiveKind::String)
}

pub struct Fixtures;

impl Fixtures {
    /// One function and one variable
    pub fn counter() -> Package {
        PackageBuilder::new("counter", "example.com/counter")
            .function("Add", Signature::new().param("a", int()).param("b", int()).result(int()))
            .variable("Limit", int())
            .build()
    }

    /// A struct, a fully implementable interface, a partially exported one,
    /// and a function taking the implementable interface
    pub fn events() -> Package {
        PackageBuilder::new("events", "example.com/events")
            .structure(
                StructType::new("Event")
                    .field("Topic", string())
                    .field("Seq", TypeShape::primitive(PrimitiveKind::Int64))
                    .method("Ack", Signature::new().result(TypeShape::Error)),
            )
            .interface(
                InterfaceType::new("Listener")
                    .method(
                        "OnEvent",
                        Signature::new().param("e", TypeShape::pointer_to("events", "Event")),
                    )
                    .method("Count", Signature::new().result(int()).result(TypeShape::Error)),
            )
            .interface(
                InterfaceType::new("Source")
                    .method("Next", Signature::new().result(int()))
                    .method("close", Signature::new()),
            )
            .function(
                "Subscribe",
                Signature::new()
                    .param("topic", string())
                    .param("l", TypeShape::interface("events", "Listener")),
            )
            .function(
                "Drain",
                Signature::new().param("s", TypeShape::interface("events", "Source")),
            )
            .constant("MaxTopics")
            .build()
    }
}
