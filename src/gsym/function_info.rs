//! Function records, decoded only as far as their envelope.
//!
//! A record starts at an address info offset:
//!
//! ```text
//! u32 size      the number of bytes the function spans from its table address
//! u32 name      string table offset of the function name
//! repeated:
//!   u32 type    0 = end of list, 1 = line table, 2 = inline info
//!   u32 length
//!   u8  data[length]
//! ```
//!
//! The line table and inline info payloads are handed out as raw bytes.

use core::fmt;
use core::ops::Range;

use crate::cursor::ByteCursor;
use crate::error::{self, FormatError};
use crate::strtab::StringTable;

pub const INFO_TYPE_END_OF_LIST: u32 = 0;
pub const INFO_TYPE_LINE_TABLE_INFO: u32 = 1;
pub const INFO_TYPE_INLINE_INFO: u32 = 2;

#[inline]
pub fn info_type_to_str(kind: u32) -> &'static str {
    match kind {
        INFO_TYPE_END_OF_LIST => "EndOfList",
        INFO_TYPE_LINE_TABLE_INFO => "LineTableInfo",
        INFO_TYPE_INLINE_INFO => "InlineInfo",
        _ => "UNKNOWN_INFO_TYPE",
    }
}

/// The decoded envelope of a function record
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FunctionInfo<'a> {
    /// The first address of the function
    pub start: u64,
    /// How many bytes the function spans
    pub size: u32,
    /// String table offset of the name
    pub name_offset: u32,
    /// The name, resolved through the string table
    pub name: &'a str,
    /// Encoded line table, if the record has one
    pub line_table: Option<&'a [u8]>,
    /// Encoded inline info, if the record has one
    pub inline_info: Option<&'a [u8]>,
}

impl<'a> fmt::Debug for FunctionInfo<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("FunctionInfo")
            .field("start", &format_args!("0x{:x}", self.start))
            .field("size", &format_args!("0x{:x}", self.size))
            .field("name", &self.name)
            .field("line_table", &self.line_table.map(|data| data.len()))
            .field("inline_info", &self.inline_info.map(|data| data.len()))
            .finish()
    }
}

impl<'a> FunctionInfo<'a> {
    /// Decode the record under `cursor` for the function that starts at `start`
    pub fn decode(
        cursor: &mut ByteCursor<'a>,
        start: u64,
        strtab: &StringTable<'a>,
    ) -> error::Result<Self> {
        let size = cursor.read_u32()?;
        let name_offset = cursor.read_u32()?;
        let mut line_table = None;
        let mut inline_info = None;
        loop {
            let offset = cursor.position();
            let kind = cursor.read_u32()?;
            let len = cursor.read_u32()? as usize;
            let data = cursor.read_bytes(len)?;
            log::trace!(
                "{:#x}: {} with {} bytes",
                offset,
                info_type_to_str(kind),
                len
            );
            match kind {
                INFO_TYPE_END_OF_LIST => break,
                INFO_TYPE_LINE_TABLE_INFO => line_table = Some(data),
                INFO_TYPE_INLINE_INFO => inline_info = Some(data),
                _ => return Err(FormatError::UnknownInfoType { offset, kind }.into()),
            }
        }
        Ok(FunctionInfo {
            start,
            size,
            name_offset,
            name: strtab.get_or_empty(name_offset as usize),
            line_table,
            inline_info,
        })
    }

    /// The half open address range of the function
    pub fn range(&self) -> Range<u64> {
        self.start..self.start.saturating_add(self.size as u64)
    }

    /// Whether `addr` falls inside the function. A zero sized function only
    /// contains its start address.
    ///
    /// Newer LLVM GSYM readers instead let a size 0 record claim every address up to
    /// the next table entry. Callers wanting that behaviour can use
    /// [`GsymReader::index_for_address`](../struct.GsymReader.html#method.index_for_address)
    /// and decode the record themselves.
    pub fn contains(&self, addr: u64) -> bool {
        if self.size == 0 {
            return addr == self.start;
        }
        self.range().contains(&addr)
    }
}
