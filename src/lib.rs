//! # libgsym
//!
//! A zero-copy, endian-aware reader for GSYM, the compact address to symbol lookup
//! table used to symbolicate crash reports and profiles.
//!
//! A GSYM maps every function's start address to a record describing it. The reader
//! loads the file once, validates its layout, and then answers lookups with a binary
//! search over the address table. When the file's byte order matches the host's the
//! tables are read in place; otherwise they are decoded once into a native copy.
//!
//! # Example
//!
//! ```rust,no_run
//! use gsym::GsymReader;
//!
//! fn symbolicate(path: &str, addr: u64) -> gsym::error::Result<()> {
//!     let gsym = GsymReader::open(path)?;
//!     let function = gsym.function_info(addr)?;
//!     println!("{:#x}: {} ({:#x?})", addr, function.name, function.range());
//!     Ok(())
//! }
//! ```
//!
//! # Feature Usage
//!
//! The `std` feature (on by default) adds [`GsymReader::open`](gsym/struct.GsymReader.html#method.open)
//! and `std::error::Error` for the error type. Without it the crate is `no_std` and only
//! needs `alloc`.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod cursor;
pub mod error;
pub mod gsym;
pub mod strtab;

pub use crate::gsym::GsymReader;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reader_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GsymReader>();
    }
}
