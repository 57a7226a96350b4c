//! The GSYM reader: a mostly zero-copy, endian-aware address to function lookup table.
//!
//! When the file's byte order matches the host, the address table, the address info
//! offsets and the file table are read in place from the loaded bytes. Otherwise they
//! are decoded once, at load time, into a native copy owned by the reader, and every
//! lookup reads that copy instead.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::ops::Range;

use scroll::Endian;

use crate::cursor::ByteCursor;
use crate::error::{self, FormatError, LookupError};
use crate::strtab::StringTable;

pub mod address_table;
pub mod file_table;
pub mod function_info;
pub mod header;

pub use self::address_table::{AddressOffsets, AddressTable, InfoOffsets};
pub use self::file_table::{FileEntry, FileTable};
pub use self::function_info::FunctionInfo;
pub use self::header::{Header, Layout};

/// Tables decoded from a file whose byte order differs from the host's
#[derive(Debug, Clone, Default)]
struct Normalized {
    addr_offsets: Vec<u64>,
    info_offsets: Vec<u64>,
    files: Vec<FileEntry>,
}

/// Where the tables of a loaded GSYM are read from; chosen once, at load time
#[derive(Debug, Clone)]
enum Backing {
    /// In place, from the reader's bytes
    Direct,
    /// From a byte swapped copy
    Owned(Normalized),
}

/// A loaded GSYM file
pub struct GsymReader {
    data: Vec<u8>,
    endian: Endian,
    header: Header,
    layout: Layout,
    backing: Backing,
}

impl fmt::Debug for GsymReader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("GsymReader")
            .field("header", &self.header)
            .field("endian", &self.endian)
            .field("byte_swapped", &self.is_byte_swapped())
            .field("num_files", &self.layout.num_files)
            .field("size", &self.data.len())
            .finish()
    }
}

impl GsymReader {
    /// Read the GSYM file at `path`
    #[cfg(feature = "std")]
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> error::Result<Self> {
        let data = std::fs::read(path)?;
        Self::parse(data)
    }

    /// Copy `bytes` and parse them as a GSYM
    pub fn copy_buffer(bytes: &[u8]) -> error::Result<Self> {
        Self::parse(bytes.to_vec())
    }

    /// Parse `data` as a GSYM, taking ownership of it
    pub fn from_vec(data: Vec<u8>) -> error::Result<Self> {
        Self::parse(data)
    }

    fn parse(data: Vec<u8>) -> error::Result<Self> {
        let (header, endian) = Header::parse(&data)?;
        let layout = Layout::parse(&data, &header, endian)?;
        let backing = if endian == scroll::NATIVE {
            Backing::Direct
        } else {
            Backing::Owned(Normalized {
                addr_offsets: address_table::normalize_addresses(
                    &data[layout.address_table.clone()],
                    header.address_width(),
                    endian,
                )?,
                info_offsets: address_table::normalize_info_offsets(
                    &data[layout.info_offsets.clone()],
                    endian,
                )?,
                files: file_table::normalize(&data[layout.file_table.clone()], endian)?,
            })
        };
        let gsym = GsymReader {
            data,
            endian,
            header,
            layout,
            backing,
        };
        gsym.address_table().validate()?;
        log::debug!(
            "loaded {:?} GSYM: {} addresses, {} files, {} string table bytes, {}",
            endian,
            gsym.header.num_addrs,
            gsym.layout.num_files,
            gsym.header.strtab_size,
            match gsym.backing {
                Backing::Direct => "read in place",
                Backing::Owned(_) => "byte swapped",
            }
        );
        Ok(gsym)
    }

    /// The header, in native byte order
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// The byte order of the file
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Whether the tables were decoded into a native copy at load time
    pub fn is_byte_swapped(&self) -> bool {
        matches!(self.backing, Backing::Owned(_))
    }

    pub fn uuid(&self) -> &[u8] {
        self.header.uuid()
    }

    /// The bytes of the whole file
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn slice(&self, range: &Range<usize>) -> &[u8] {
        // every range was checked against the data in `Layout::parse`
        &self.data[range.clone()]
    }

    pub fn address_table(&self) -> AddressTable<'_> {
        let offsets = match self.backing {
            Backing::Direct => AddressOffsets::Direct {
                bytes: self.slice(&self.layout.address_table),
                width: self.header.address_width(),
            },
            Backing::Owned(ref normalized) => AddressOffsets::Owned(&normalized.addr_offsets),
        };
        AddressTable::new(self.header.base_address, offsets)
    }

    pub fn info_offsets(&self) -> InfoOffsets<'_> {
        match self.backing {
            Backing::Direct => InfoOffsets::Direct(self.slice(&self.layout.info_offsets)),
            Backing::Owned(ref normalized) => InfoOffsets::Owned(&normalized.info_offsets),
        }
    }

    pub fn file_table(&self) -> FileTable<'_> {
        match self.backing {
            Backing::Direct => FileTable::Direct(self.slice(&self.layout.file_table)),
            Backing::Owned(ref normalized) => FileTable::Owned(&normalized.files),
        }
    }

    pub fn string_table(&self) -> StringTable<'_> {
        StringTable::new(self.slice(&self.layout.string_table))
    }

    pub fn num_addresses(&self) -> usize {
        self.address_table().len()
    }

    pub fn num_files(&self) -> usize {
        self.file_table().len()
    }

    /// The absolute address of address table entry `index`
    pub fn address_at(&self, index: usize) -> Option<u64> {
        self.address_table().address_at(index)
    }

    /// Every address in the address table, in ascending order
    pub fn addresses(&self) -> impl Iterator<Item = u64> + '_ {
        self.address_table().iter()
    }

    /// Find the address table entry covering `addr`: the last entry whose address is
    /// `<= addr`
    pub fn index_for_address(&self, addr: u64) -> Result<usize, LookupError> {
        self.address_table().index_for_address(addr)
    }

    /// The file offset of the function record for address table entry `index`
    pub fn info_offset_at(&self, index: usize) -> Option<u64> {
        self.info_offsets().get(index)
    }

    /// Look up and decode the function record covering `addr`.
    ///
    /// Fails with [`LookupError::NotFound`] when the nearest preceding function does
    /// not actually extend to `addr`.
    pub fn function_info(&self, addr: u64) -> error::Result<FunctionInfo<'_>> {
        let index = self.index_for_address(addr)?;
        let (start, offset) = match (self.address_at(index), self.info_offset_at(index)) {
            (Some(start), Some(offset)) => (start, offset),
            _ => {
                return Err(FormatError::Inconsistent(alloc::format!(
                    "address table entry {} has no address info offset ({} offsets)",
                    index,
                    self.info_offsets().len()
                ))
                .into());
            }
        };
        let offset = usize::try_from(offset).map_err(|_| {
            FormatError::Inconsistent(alloc::format!(
                "address info offset {:#x} does not fit in memory",
                offset
            ))
        })?;
        log::trace!(
            "{:#x} resolved to entry {} ({:#x}), record at {:#x}",
            addr,
            index,
            start,
            offset
        );
        let mut cursor = ByteCursor::new(&self.data, offset, self.endian);
        let info = FunctionInfo::decode(&mut cursor, start, &self.string_table())?;
        if !info.contains(addr) {
            return Err(LookupError::NotFound(addr).into());
        }
        Ok(info)
    }

    /// The string at `offset` in the string table; unusable offsets give the empty string
    pub fn string_at(&self, offset: u32) -> &str {
        self.string_table().get_or_empty(offset as usize)
    }

    pub fn file_at(&self, index: u32) -> Option<FileEntry> {
        self.file_table().get(index as usize)
    }

    /// The path of file `index`, `dir/base`, or just `base` if it has no directory
    pub fn file_path(&self, index: u32) -> Option<String> {
        let file = self.file_at(index)?;
        let dir = self.string_at(file.dir);
        let base = self.string_at(file.base);
        let mut path = String::with_capacity(dir.len() + base.len() + 1);
        if !dir.is_empty() {
            path.push_str(dir);
            if !dir.ends_with('/') {
                path.push('/');
            }
        }
        path.push_str(base);
        Some(path)
    }
}
