//! The sorted address table, its parallel address info offsets, and the
//! predecessor search that maps an address to its table slot.
//!
//! Address table entries are deltas from the header's base address, stored in
//! 1, 2, 4 or 8 bytes as the header says. The search is written against
//! [`SortedOffsets`] so it neither knows nor cares which width or which backing
//! store the entries come from.

use alloc::vec::Vec;
use scroll::{Endian, Pread};

use crate::cursor::{Width, read_uint};
use crate::error::{FormatError, LookupError};
use crate::gsym::header::SIZEOF_INFO_OFFSET;

/// A random access sequence of ascending `u64`s
pub trait SortedOffsets {
    fn len(&self) -> usize;
    /// The value at `index`; only called with `index < self.len()`
    fn offset(&self, index: usize) -> u64;
}

/// Returns the greatest index whose offset is `<= target`. When several
/// consecutive entries hold that same offset, the last one of them wins.
/// Returns `None` if the table is empty or every offset is greater than `target`.
pub fn predecessor<T: SortedOffsets + ?Sized>(table: &T, target: u64) -> Option<usize> {
    // upper bound: the first index whose offset is > target
    let mut lo = 0;
    let mut hi = table.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if table.offset(mid) <= target {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo.checked_sub(1)
}

/// The address table, either read in place or from the normalized copy
#[derive(Debug, Clone, Copy)]
pub enum AddressOffsets<'a> {
    /// Native byte order entries of `width` bytes inside the file's bytes
    Direct { bytes: &'a [u8], width: Width },
    /// Entries decoded from a file of the other byte order
    Owned(&'a [u64]),
}

impl<'a> AddressOffsets<'a> {
    pub fn get(&self, index: usize) -> Option<u64> {
        if index >= SortedOffsets::len(self) {
            return None;
        }
        Some(self.offset(index))
    }

    pub fn is_empty(&self) -> bool {
        SortedOffsets::len(self) == 0
    }
}

impl<'a> SortedOffsets for AddressOffsets<'a> {
    fn len(&self) -> usize {
        match *self {
            AddressOffsets::Direct { bytes, width } => bytes.len() / width.size(),
            AddressOffsets::Owned(offsets) => offsets.len(),
        }
    }

    #[inline]
    fn offset(&self, index: usize) -> u64 {
        match *self {
            // the layout was bounds checked at load time
            AddressOffsets::Direct { bytes, width } => {
                read_uint(bytes, index * width.size(), width, scroll::NATIVE).unwrap_or(u64::MAX)
            }
            AddressOffsets::Owned(offsets) => offsets[index],
        }
    }
}

impl SortedOffsets for [u64] {
    fn len(&self) -> usize {
        <[u64]>::len(self)
    }

    fn offset(&self, index: usize) -> u64 {
        self[index]
    }
}

/// An address table resolved against its base address
#[derive(Debug, Clone, Copy)]
pub struct AddressTable<'a> {
    base_address: u64,
    offsets: AddressOffsets<'a>,
}

impl<'a> AddressTable<'a> {
    pub fn new(base_address: u64, offsets: AddressOffsets<'a>) -> Self {
        AddressTable {
            base_address,
            offsets,
        }
    }

    pub fn base_address(&self) -> u64 {
        self.base_address
    }

    pub fn len(&self) -> usize {
        SortedOffsets::len(&self.offsets)
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// The absolute address at `index`, or `None` if the index is out of range or
    /// the entry does not fit in the address space
    pub fn address_at(&self, index: usize) -> Option<u64> {
        self.offsets
            .get(index)
            .and_then(|offset| self.base_address.checked_add(offset))
    }

    /// Check that the last, and therefore greatest, entry fits in the address space
    /// once the base address is added
    pub fn validate(&self) -> Result<(), FormatError> {
        let Some(last) = self.len().checked_sub(1) else {
            return Ok(());
        };
        let offset = self.offsets.offset(last);
        match self.base_address.checked_add(offset) {
            Some(_) => Ok(()),
            None => Err(FormatError::Inconsistent(alloc::format!(
                "address offset {:#x} overflows the base address {:#x}",
                offset, self.base_address
            ))),
        }
    }

    /// The index of the entry whose half open range `[address[i], address[i + 1])`
    /// contains `addr`. The last entry extends to the end of the address space.
    pub fn index_for_address(&self, addr: u64) -> Result<usize, LookupError> {
        if addr < self.base_address {
            return Err(LookupError::BelowRange {
                addr,
                base_address: self.base_address,
            });
        }
        let target = addr - self.base_address;
        predecessor(&self.offsets, target).ok_or(LookupError::NotFound(addr))
    }

    /// Every absolute address, in table order
    pub fn iter(self) -> impl Iterator<Item = u64> + 'a {
        (0..self.len()).filter_map(move |index| self.address_at(index))
    }
}

/// The address info offsets, index parallel to the address table
#[derive(Debug, Clone, Copy)]
pub enum InfoOffsets<'a> {
    /// Native byte order `u32`s inside the file's bytes
    Direct(&'a [u8]),
    /// Offsets decoded from a file of the other byte order
    Owned(&'a [u64]),
}

impl<'a> InfoOffsets<'a> {
    pub fn len(&self) -> usize {
        match *self {
            InfoOffsets::Direct(bytes) => bytes.len() / SIZEOF_INFO_OFFSET,
            InfoOffsets::Owned(offsets) => offsets.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The file offset of the function record for address table entry `index`
    pub fn get(&self, index: usize) -> Option<u64> {
        match *self {
            InfoOffsets::Direct(bytes) => {
                let offset = index.checked_mul(SIZEOF_INFO_OFFSET)?;
                bytes
                    .pread_with::<u32>(offset, scroll::NATIVE)
                    .ok()
                    .map(u64::from)
            }
            InfoOffsets::Owned(offsets) => offsets.get(index).copied(),
        }
    }
}

/// Decode every `width` byte address offset in `bytes`, stored in `endian` byte order
pub(crate) fn normalize_addresses(
    bytes: &[u8],
    width: Width,
    endian: Endian,
) -> scroll::Result<Vec<u64>> {
    (0..bytes.len() / width.size())
        .map(|index| read_uint(bytes, index * width.size(), width, endian))
        .collect()
}

/// Decode every 32-bit address info offset in `bytes`, stored in `endian` byte order
pub(crate) fn normalize_info_offsets(bytes: &[u8], endian: Endian) -> scroll::Result<Vec<u64>> {
    (0..bytes.len() / SIZEOF_INFO_OFFSET)
        .map(|index| read_uint(bytes, index * SIZEOF_INFO_OFFSET, Width::U32, endian))
        .collect()
}
