//! Binder generators: cross-runtime entry points and proxies for a package

pub mod config;
pub mod error;
pub mod printer;
pub mod proxy;
pub mod registry;
pub mod walker;
pub mod wire;

use seqbind_core::Package;

pub use config::GoBindConfig;
pub use error::{BatchErrors, CodegenError, ErrorCategory, ErrorEntry};
pub use walker::{GoBindGen, Generation};

/// Common trait for all binder generators
pub trait Codegen {
    fn generate(&mut self, package: &Package) -> Result<String, CodegenError>;
}
