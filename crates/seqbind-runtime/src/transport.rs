//! Request/response transactions.

use crate::buffer::Buffer;
use crate::errors::SeqError;
use crate::refs::Ref;
use crate::registry::Registry;

/// A blocking bridge between the two runtimes
///
/// Each call is exactly one exchange: the request is fully serialized before
/// it is sent, and the response is only handed back once the other side has
/// finished writing it. Cancellation and timeouts belong to implementations.
pub trait Transport {
    /// Invoke a member of the object behind `target`
    fn transact(&self, target: Ref, descriptor: &str, code: i32, request: Buffer) -> Result<Buffer, SeqError>;

    /// Invoke a package-level entry point (functions, variable accessors)
    fn call(&self, descriptor: &str, code: i32, request: Buffer) -> Result<Buffer, SeqError>;
}

/// Serves transactions in-process from a frozen [`Registry`]
#[derive(Debug)]
pub struct Loopback {
    registry: Registry,
}

impl Loopback {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl Transport for Loopback {
    fn transact(&self, target: Ref, descriptor: &str, code: i32, request: Buffer) -> Result<Buffer, SeqError> {
        // Object entry points read their receiver handle first
        let mut input = Buffer::new();
        input.write_ref(target);
        input.append(&request);
        let mut out = Buffer::new();
        self.registry.dispatch(descriptor, code, &mut out, &mut input)?;
        Ok(out)
    }

    fn call(&self, descriptor: &str, code: i32, mut request: Buffer) -> Result<Buffer, SeqError> {
        let mut out = Buffer::new();
        self.registry.dispatch(descriptor, code, &mut out, &mut request)?;
        Ok(out)
    }
}
