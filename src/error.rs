//! A custom gsym error
//!

use alloc::string::String;
use core::result;
#[cfg(feature = "std")]
use std::io;
use thiserror::Error;

/// The file is structurally unusable, or an internal table disagrees with itself.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The magic number matches neither byte order
    #[error("Invalid magic number: 0x{0:x}")]
    BadMagic(u32),
    /// The version field is not one this reader understands
    #[error("Unsupported GSYM version: {0}")]
    UnsupportedVersion(u16),
    /// The address offset width is not 1, 2, 4 or 8
    #[error("Invalid address offset size: {0}")]
    InvalidAddressWidth(u8),
    /// The uuid does not fit in the header
    #[error("Invalid uuid size: {0}")]
    InvalidUuidSize(u8),
    /// The buffer is smaller than a header
    #[error("Buffer is too short for a GSYM header: need {needed} bytes, have {len}")]
    Truncated { needed: usize, len: usize },
    /// A table extends past the end of the buffer
    #[error("{table} at {offset:#x} with size {size:#x} extends past the end of the {len:#x} byte buffer")]
    OutOfBounds {
        table: &'static str,
        offset: usize,
        size: usize,
        len: usize,
    },
    /// Tables that must agree with each other do not
    #[error("Inconsistent tables: {0}")]
    Inconsistent(String),
    /// A function record carries a payload chunk of an unknown type
    #[error("Unknown info type {kind} at {offset:#x}")]
    UnknownInfoType { offset: usize, kind: u32 },
}

/// An address could not be resolved; the reader stays usable.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupError {
    /// The address is smaller than the header's base address
    #[error("Address {addr:#x} is below the base address {base_address:#x}")]
    BelowRange { addr: u64, base_address: u64 },
    /// No table entry (or no function record) covers the address
    #[error("No symbol covers address {0:#x}")]
    NotFound(u64),
}

#[non_exhaustive]
#[derive(Error, Debug)]
/// A custom gsym error
pub enum Error {
    /// The file or buffer does not hold a usable GSYM
    #[error(transparent)]
    Format(#[from] FormatError),
    /// A single address lookup failed
    #[error(transparent)]
    Lookup(#[from] LookupError),
    /// An error emanating from reading and interpreting bytes
    #[error(transparent)]
    Scroll(#[from] scroll::Error),
    #[cfg(feature = "std")]
    /// An IO based error
    #[error(transparent)]
    IO(#[from] io::Error),
}

/// An impish result
pub type Result<T> = result::Result<T, Error>;
