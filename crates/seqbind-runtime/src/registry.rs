//! Two-phase handler registration.
//!
//! All handlers are registered on a [`RegistryBuilder`] during startup. Once
//! [`RegistryBuilder::build`] freezes the table into a [`Registry`], nothing
//! can be added, and only the frozen table can serve transactions.

use crate::buffer::Buffer;
use crate::errors::SeqError;
use std::collections::HashMap;
use std::fmt;

/// Entry point serving one `(descriptor, code)`: reads the request from the
/// second buffer and writes the response into the first
pub type Handler = Box<dyn Fn(&mut Buffer, &mut Buffer) -> Result<(), SeqError> + Send + Sync>;

type Key = (String, i32);

#[derive(Default)]
pub struct RegistryBuilder {
    handlers: HashMap<Key, Handler>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `handler` to `(descriptor, code)`; each key may be bound once
    pub fn register<F>(&mut self, descriptor: impl Into<String>, code: i32, handler: F) -> Result<(), SeqError>
    where
        F: Fn(&mut Buffer, &mut Buffer) -> Result<(), SeqError> + Send + Sync + 'static,
    {
        let key = (descriptor.into(), code);
        if self.handlers.contains_key(&key) {
            return Err(SeqError::DuplicateRegistration {
                descriptor: key.0,
                code,
            });
        }
        self.handlers.insert(key, Box::new(handler));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn build(self) -> Registry {
        tracing::debug!("Freezing dispatch table with {} handlers", self.handlers.len());
        Registry {
            handlers: self.handlers,
        }
    }
}

/// Frozen dispatch table
pub struct Registry {
    handlers: HashMap<Key, Handler>,
}

impl Registry {
    pub fn contains(&self, descriptor: &str, code: i32) -> bool {
        self.handlers.contains_key(&(descriptor.to_string(), code))
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn dispatch(
        &self,
        descriptor: &str,
        code: i32,
        out: &mut Buffer,
        input: &mut Buffer,
    ) -> Result<(), SeqError> {
        let handler = self
            .handlers
            .get(&(descriptor.to_string(), code))
            .ok_or_else(|| SeqError::UnknownHandler {
                descriptor: descriptor.to_string(),
                code,
            })?;
        tracing::trace!(descriptor, code, "dispatch");
        handler(out, input).map_err(|e| SeqError::Handler {
            descriptor: descriptor.to_string(),
            code,
            message: e.to_string(),
        })
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.handlers.keys().collect();
        keys.sort();
        f.debug_struct("Registry").field("handlers", &keys).finish()
    }
}
