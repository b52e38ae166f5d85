//! Byte-level model of the EVM Object Format (EOF) container.
//!
//! An [`Eof`] value is decoded once from raw bytes and never mutated. Decoding
//! only checks structural well-formedness (magic, version, section header
//! table, terminator, body sizes); all semantic rules live in the validator
//! crate that consumes this one.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc as std;

mod body;
mod code_info;
mod decode_helpers;
mod error;
mod header;

pub use body::EofBody;
pub use code_info::CodeInfo;
pub use error::ParseError;
pub use header::EofHeader;

pub use alloy_primitives::{self, Bytes};

use core::cmp::min;
use std::{fmt, vec, vec::Vec};

/// EOF magic in u16 form.
pub const EOF_MAGIC: u16 = 0xEF00;

/// EOF magic number in array form.
pub static EOF_MAGIC_BYTES: Bytes = alloy_primitives::bytes!("ef00");

/// The only supported EOF version byte.
pub const EOF_VERSION: u8 = 0x01;

/// EVM stack capacity in items. Stack-height bookkeeping may never exceed it.
pub const STACK_LIMIT: usize = 1024;

/// Maximum size in bytes of a container submitted for validation.
pub const MAX_CONTAINER_SIZE: usize = 0xC000;

/// EVM Object Format (EOF) container.
///
/// It consists of a header, body and the raw original bytes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Eof {
    /// Decoded section-size header.
    pub header: EofHeader,
    /// Body sections sliced out of `raw` per the header declarations.
    pub body: EofBody,
    /// The raw bytes the container was decoded from.
    pub raw: Bytes,
}

impl Default for Eof {
    fn default() -> Self {
        let body = EofBody {
            // One code section with a STOP byte and a zeroed type entry.
            code_info: vec![CodeInfo::default()],
            code_section: vec![1],
            code: Bytes::from_static(&[0x00]),
            container_section: vec![],
            data_section: Bytes::new(),
            is_data_filled: true,
        };
        body.into_eof()
    }
}

impl Eof {
    /// Creates a new EOF container from the given body.
    pub fn new(body: EofBody) -> Self {
        body.into_eof()
    }

    /// Returns len of the header and body in bytes.
    pub fn size(&self) -> usize {
        self.header.size() + self.header.body_size()
    }

    /// Return raw EOF bytes.
    pub fn raw(&self) -> &Bytes {
        &self.raw
    }

    /// Returns a slice of the data section.
    ///
    /// If the offset or length overruns the present bytes the slice is
    /// truncated; a fully out-of-bounds read yields an empty slice.
    pub fn data_slice(&self, offset: usize, len: usize) -> &[u8] {
        self.body
            .data_section
            .get(offset..)
            .and_then(|bytes| bytes.get(..min(len, bytes.len())))
            .unwrap_or(&[])
    }

    /// Returns a slice of the data section.
    pub fn data(&self) -> &[u8] {
        &self.body.data_section
    }

    /// Re-encodes the container from its decoded parts.
    pub fn encode_slow(&self) -> Bytes {
        let mut buffer: Vec<u8> = Vec::with_capacity(self.size());
        self.header.encode(&mut buffer);
        self.body.encode(&mut buffer);
        buffer.into()
    }

    /// Decode EOF from raw bytes.
    pub fn decode(raw: Bytes) -> Result<Self, ParseError> {
        let (header, _) = EofHeader::decode(&raw)?;
        let body = EofBody::decode(&raw, &header)?;
        Ok(Self { header, body, raw })
    }
}

impl fmt::Display for Eof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Eof {{ code sections: {}, containers: {}, data: {}/{} }}",
            self.header.code_sizes.len(),
            self.header.container_sizes.len(),
            self.body.data_section.len(),
            self.header.data_size,
        )
    }
}
