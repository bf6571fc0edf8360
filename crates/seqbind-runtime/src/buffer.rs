//! Transaction buffers and the leaf wire encodings.
//!
//! All fixed-width values are little-endian. Strings and byte sequences are
//! prefixed with their length as an `i32`. Errors travel as strings: the
//! empty string means "no error".

use crate::errors::{RemoteError, SeqError};
use crate::refs::Ref;

/// Append-only on the write side, cursor-driven on the read side
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Buffer {
    data: Vec<u8>,
    offset: usize,
}

impl Buffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self { data, offset: 0 }
    }

    /// Bytes not yet consumed by a read
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Append the unread part of `other`
    pub fn append(&mut self, other: &Buffer) {
        self.data.extend_from_slice(&other.data[other.offset..]);
    }

    fn take(&mut self, needed: usize) -> Result<&[u8], SeqError> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(SeqError::Underflow { needed, remaining });
        }
        let start = self.offset;
        self.offset += needed;
        Ok(&self.data[start..self.offset])
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], SeqError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn write_bool(&mut self, v: bool) {
        self.data.push(u8::from(v));
    }

    pub fn read_bool(&mut self) -> Result<bool, SeqError> {
        Ok(self.take_array::<1>()?[0] != 0)
    }

    /// Go `int` travels as 64 bits
    pub fn write_int(&mut self, v: i64) {
        self.write_int64(v);
    }

    pub fn read_int(&mut self) -> Result<i64, SeqError> {
        self.read_int64()
    }

    pub fn write_int8(&mut self, v: i8) {
        self.data.extend_from_slice(&v.to_le_bytes());
    }

    pub fn read_int8(&mut self) -> Result<i8, SeqError> {
        Ok(i8::from_le_bytes(self.take_array()?))
    }

    pub fn write_int16(&mut self, v: i16) {
        self.data.extend_from_slice(&v.to_le_bytes());
    }

    pub fn read_int16(&mut self) -> Result<i16, SeqError> {
        Ok(i16::from_le_bytes(self.take_array()?))
    }

    pub fn write_int32(&mut self, v: i32) {
        self.data.extend_from_slice(&v.to_le_bytes());
    }

    pub fn read_int32(&mut self) -> Result<i32, SeqError> {
        Ok(i32::from_le_bytes(self.take_array()?))
    }

    pub fn write_int64(&mut self, v: i64) {
        self.data.extend_from_slice(&v.to_le_bytes());
    }

    pub fn read_int64(&mut self) -> Result<i64, SeqError> {
        Ok(i64::from_le_bytes(self.take_array()?))
    }

    pub fn write_float32(&mut self, v: f32) {
        self.data.extend_from_slice(&v.to_le_bytes());
    }

    pub fn read_float32(&mut self) -> Result<f32, SeqError> {
        Ok(f32::from_le_bytes(self.take_array()?))
    }

    pub fn write_float64(&mut self, v: f64) {
        self.data.extend_from_slice(&v.to_le_bytes());
    }

    pub fn read_float64(&mut self) -> Result<f64, SeqError> {
        Ok(f64::from_le_bytes(self.take_array()?))
    }

    /// Payloads longer than `i32::MAX` bytes cannot be length-prefixed and
    /// are rejected before anything is written.
    pub fn write_byte_array(&mut self, v: &[u8]) -> Result<(), SeqError> {
        self.write_int32(length_prefix(v.len())?);
        self.data.extend_from_slice(v);
        Ok(())
    }

    pub fn read_byte_array(&mut self) -> Result<Vec<u8>, SeqError> {
        let len = self.read_int32()?;
        let len = usize::try_from(len).map_err(|_| SeqError::NegativeLength(len))?;
        Ok(self.take(len)?.to_vec())
    }

    pub fn write_string(&mut self, v: &str) -> Result<(), SeqError> {
        self.write_byte_array(v.as_bytes())
    }

    pub fn read_string(&mut self) -> Result<String, SeqError> {
        String::from_utf8(self.read_byte_array()?).map_err(|_| SeqError::InvalidUtf8)
    }

    pub fn write_ref(&mut self, r: Ref) {
        self.write_int32(r.to_wire());
    }

    pub fn read_ref(&mut self) -> Result<Ref, SeqError> {
        Ok(Ref::from_wire(self.read_int32()?))
    }

    /// `None` is written as the empty string, anything else as its message.
    ///
    /// An error whose message is empty is therefore indistinguishable from
    /// no error once it has crossed the wire.
    pub fn write_error(&mut self, err: Option<&dyn std::error::Error>) -> Result<(), SeqError> {
        match err {
            None => self.write_string(""),
            Some(e) => self.write_string(&e.to_string()),
        }
    }

    pub fn read_error(&mut self) -> Result<Option<RemoteError>, SeqError> {
        let message = self.read_string()?;
        if message.is_empty() {
            Ok(None)
        } else {
            Ok(Some(RemoteError::new(message)))
        }
    }
}

fn length_prefix(len: usize) -> Result<i32, SeqError> {
    i32::try_from(len).map_err(|_| SeqError::TooLong(len))
}
