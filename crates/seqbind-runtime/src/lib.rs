//! seqbind Runtime Library
//!
//! Rust side of the `seq` wire protocol spoken by seqbind-generated binders:
//!
//! - **Buffer**: leaf encode/decode for every primitive kind, handles and errors
//! - **Ref**: cross-runtime object identity, tagged host-owned or foreign-owned
//! - **Registry**: two-phase `(descriptor, code) -> handler` dispatch table
//! - **Transport**: one blocking request/response exchange per call
//!
//! # Example
//!
//! ```rust
//! use seqbind_runtime::{Buffer, Loopback, RegistryBuilder, Transport};
//!
//! let mut builder = RegistryBuilder::new();
//! builder.register("calc", 1, |out, input| {
//!     let a = input.read_int()?;
//!     let b = input.read_int()?;
//!     out.write_int(a + b);
//!     Ok(())
//! })?;
//! let transport = Loopback::new(builder.build());
//!
//! let mut request = Buffer::new();
//! request.write_int(2);
//! request.write_int(3);
//! let mut response = transport.call("calc", 1, request)?;
//! assert_eq!(response.read_int()?, 5);
//! # Ok::<(), seqbind_runtime::SeqError>(())
//! ```

mod buffer;
mod errors;
mod refs;
mod registry;
mod transport;

pub use buffer::Buffer;
pub use errors::{RemoteError, SeqError};
pub use refs::{Owner, Ref};
pub use registry::{Handler, Registry, RegistryBuilder};
pub use transport::{Loopback, Transport};
