//! The GSYM header, and the table layout it implies.
//!
//! A GSYM file begins with a fixed 48 byte header in the file's byte order:
//!
//! |Offset|Length|Name            |
//! |:-----|:-----|:---------------|
//! |0     |4     |magic           |
//! |4     |2     |version         |
//! |6     |1     |addr_off_size   |
//! |7     |1     |uuid_size       |
//! |8     |8     |base_address    |
//! |16    |4     |num_addrs       |
//! |20    |4     |strtab_offset   |
//! |24    |4     |strtab_size     |
//! |28    |20    |uuid            |
//!
//! The address table follows the header (aligned to its element width), then the
//! 32-bit address info offsets (4 byte aligned), then the file table, which is a
//! `u32` count followed by that many [`FileEntry`](../file_table/struct.FileEntry.html)s.
//! The string table lives wherever `strtab_offset` says.

use core::fmt;
use core::ops::Range;

use scroll::{Endian, Pread, Pwrite, SizeWith};

use crate::cursor::{Width, align_up};
use crate::error::{self, FormatError};
use crate::gsym::file_table::SIZEOF_FILE_ENTRY;

/// "GSYM" when read in the file's byte order
pub const GSYM_MAGIC: u32 = 0x4753_594d;
/// `GSYM_MAGIC` read in the opposite byte order
pub const GSYM_CIGAM: u32 = 0x4d59_5347;
pub const GSYM_VERSION: u16 = 1;
pub const GSYM_MAX_UUID_SIZE: usize = 20;
pub const SIZEOF_HEADER: usize = 48;
/// Address info offsets are always 32-bit in version 1
pub const SIZEOF_INFO_OFFSET: usize = 4;

#[repr(C)]
#[derive(Clone, Copy, Default, PartialEq, Eq, Pread, Pwrite, SizeWith)]
pub struct Header {
    /// `GSYM_MAGIC`, used to detect the byte order of the file
    pub magic: u32,
    pub version: u16,
    /// The byte width of each address table entry: 1, 2, 4 or 8
    pub addr_off_size: u8,
    /// How many bytes of `uuid` are significant
    pub uuid_size: u8,
    /// Every address table entry is an offset from this address
    pub base_address: u64,
    /// The number of entries in the address table and the address info offsets
    pub num_addrs: u32,
    pub strtab_offset: u32,
    pub strtab_size: u32,
    pub uuid: [u8; 20],
}

impl fmt::Debug for Header {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Header")
            .field("magic", &format_args!("0x{:x}", self.magic))
            .field("version", &self.version)
            .field("addr_off_size", &self.addr_off_size)
            .field("uuid_size", &self.uuid_size)
            .field("base_address", &format_args!("0x{:x}", self.base_address))
            .field("num_addrs", &self.num_addrs)
            .field("strtab_offset", &format_args!("0x{:x}", self.strtab_offset))
            .field("strtab_size", &format_args!("0x{:x}", self.strtab_size))
            .field("uuid", &self.uuid())
            .finish()
    }
}

/// Figure out the byte order of a GSYM from its first four bytes
pub fn peek_endian(bytes: &[u8]) -> error::Result<Endian> {
    if bytes.len() < SIZEOF_HEADER {
        return Err(FormatError::Truncated {
            needed: SIZEOF_HEADER,
            len: bytes.len(),
        }
        .into());
    }
    match bytes.pread_with::<u32>(0, scroll::LE)? {
        GSYM_MAGIC => Ok(scroll::LE),
        GSYM_CIGAM => Ok(scroll::BE),
        magic => Err(FormatError::BadMagic(magic).into()),
    }
}

impl Header {
    /// Parse and validate the header, returning it together with the byte order
    /// of the file
    pub fn parse(bytes: &[u8]) -> error::Result<(Header, Endian)> {
        let endian = peek_endian(bytes)?;
        let header: Header = bytes.pread_with(0, endian)?;
        header.validate()?;
        Ok((header, endian))
    }

    /// Check the fields that do not depend on the rest of the file
    pub fn validate(&self) -> error::Result<()> {
        if self.magic != GSYM_MAGIC {
            return Err(FormatError::BadMagic(self.magic).into());
        }
        if self.version != GSYM_VERSION {
            return Err(FormatError::UnsupportedVersion(self.version).into());
        }
        Width::parse(self.addr_off_size)?;
        if self.uuid_size as usize > GSYM_MAX_UUID_SIZE {
            return Err(FormatError::InvalidUuidSize(self.uuid_size).into());
        }
        Ok(())
    }

    /// The width of the address table entries. Only meaningful on a validated header.
    pub fn address_width(&self) -> Width {
        Width::from_size(self.addr_off_size).unwrap_or(Width::U64)
    }

    /// The significant bytes of the uuid
    pub fn uuid(&self) -> &[u8] {
        let len = core::cmp::min(self.uuid_size as usize, GSYM_MAX_UUID_SIZE);
        &self.uuid[..len]
    }
}

/// Where each table lives in the file, as byte ranges
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub address_table: Range<usize>,
    pub info_offsets: Range<usize>,
    pub file_table: Range<usize>,
    pub string_table: Range<usize>,
    pub num_files: usize,
}

fn table_range(
    table: &'static str,
    offset: usize,
    count: usize,
    entry_size: usize,
    len: usize,
) -> error::Result<Range<usize>> {
    let out_of_bounds = |size| FormatError::OutOfBounds {
        table,
        offset,
        size,
        len,
    };
    let size = count
        .checked_mul(entry_size)
        .ok_or_else(|| out_of_bounds(usize::MAX))?;
    match offset.checked_add(size) {
        Some(end) if end <= len => Ok(offset..end),
        _ => Err(out_of_bounds(size).into()),
    }
}

impl Layout {
    /// Compute the table ranges for a validated `header` and check that every one of them
    /// lies inside `bytes`
    pub fn parse(bytes: &[u8], header: &Header, endian: Endian) -> error::Result<Layout> {
        let len = bytes.len();
        let width = header.address_width().size();
        let num_addrs = header.num_addrs as usize;

        let offset = align_up(SIZEOF_HEADER, width).unwrap_or(usize::MAX);
        let address_table = table_range("address table", offset, num_addrs, width, len)?;

        let offset = align_up(address_table.end, SIZEOF_INFO_OFFSET).unwrap_or(usize::MAX);
        let info_offsets = table_range(
            "address info offsets",
            offset,
            num_addrs,
            SIZEOF_INFO_OFFSET,
            len,
        )?;

        let offset = info_offsets.end;
        let num_files = bytes
            .pread_with::<u32>(offset, endian)
            .map_err(|_| FormatError::OutOfBounds {
                table: "file table count",
                offset,
                size: 4,
                len,
            })? as usize;
        let file_table = table_range("file table", offset + 4, num_files, SIZEOF_FILE_ENTRY, len)?;

        let string_table = table_range(
            "string table",
            header.strtab_offset as usize,
            header.strtab_size as usize,
            1,
            len,
        )?;

        Ok(Layout {
            address_table,
            info_offsets,
            file_table,
            string_table,
            num_files,
        })
    }
}
