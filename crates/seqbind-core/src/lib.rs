//! Package model and wire identifiers for the seqbind binder generator

pub mod error;
pub mod ids;
pub mod model;
pub mod naming;
pub mod types;

pub use error::CoreError;
pub use ids::{Code, CodeSpace, Descriptor};
pub use model::{Declaration, Package, PackageBuilder};
pub use types::{NamedRef, PrimitiveKind, TypeShape, Underlying};
