//! Endian-aware, width-parametrized integer reads over a byte slice.

use scroll::{Endian, Pread};

use crate::error::{self, FormatError};

/// The byte width of an encoded unsigned integer
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Width {
    U8,
    U16,
    U32,
    U64,
}

impl Width {
    /// The width selected by a size in bytes, if it is one of 1, 2, 4 or 8
    pub fn from_size(size: u8) -> Option<Width> {
        match size {
            1 => Some(Width::U8),
            2 => Some(Width::U16),
            4 => Some(Width::U32),
            8 => Some(Width::U64),
            _ => None,
        }
    }

    /// Like [`from_size`](#method.from_size), but rejects bad widths with a format error
    pub fn parse(size: u8) -> error::Result<Width> {
        Width::from_size(size).ok_or_else(|| FormatError::InvalidAddressWidth(size).into())
    }

    #[inline]
    pub fn size(self) -> usize {
        match self {
            Width::U8 => 1,
            Width::U16 => 2,
            Width::U32 => 4,
            Width::U64 => 8,
        }
    }
}

/// Read an unsigned integer of `width` at `offset` in `bytes`, zero extended to a `u64`
#[inline]
pub fn read_uint(bytes: &[u8], offset: usize, width: Width, endian: Endian) -> scroll::Result<u64> {
    Ok(match width {
        Width::U8 => bytes.pread_with::<u8>(offset, endian)? as u64,
        Width::U16 => bytes.pread_with::<u16>(offset, endian)? as u64,
        Width::U32 => bytes.pread_with::<u32>(offset, endian)? as u64,
        Width::U64 => bytes.pread_with::<u64>(offset, endian)?,
    })
}

/// A read position in a byte slice with a fixed byte order.
///
/// Every read advances the cursor by the width of the value; a read that
/// runs off the end leaves the position untouched and returns the scroll error.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    bytes: &'a [u8],
    offset: usize,
    endian: Endian,
}

impl<'a> ByteCursor<'a> {
    pub fn new(bytes: &'a [u8], offset: usize, endian: Endian) -> Self {
        ByteCursor {
            bytes,
            offset,
            endian,
        }
    }

    pub fn position(&self) -> usize {
        self.offset
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// The bytes the cursor reads from
    pub fn data(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.offset)
    }

    pub fn read_uint(&mut self, width: Width) -> scroll::Result<u64> {
        let value = read_uint(self.bytes, self.offset, width, self.endian)?;
        self.offset += width.size();
        Ok(value)
    }

    pub fn read_u8(&mut self) -> scroll::Result<u8> {
        self.read_uint(Width::U8).map(|v| v as u8)
    }

    pub fn read_u16(&mut self) -> scroll::Result<u16> {
        self.read_uint(Width::U16).map(|v| v as u16)
    }

    pub fn read_u32(&mut self) -> scroll::Result<u32> {
        self.read_uint(Width::U32).map(|v| v as u32)
    }

    pub fn read_u64(&mut self) -> scroll::Result<u64> {
        self.read_uint(Width::U64)
    }

    /// Borrow the next `len` bytes and step over them
    pub fn read_bytes(&mut self, len: usize) -> scroll::Result<&'a [u8]> {
        let slice: &'a [u8] = self.bytes.pread_with(self.offset, len)?;
        self.offset += len;
        Ok(slice)
    }
}

/// Round `offset` up to the next multiple of `align` (a power of two)
#[inline]
pub(crate) fn align_up(offset: usize, align: usize) -> Option<usize> {
    debug_assert!(align.is_power_of_two());
    offset.checked_add(align - 1).map(|v| v & !(align - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths() {
        assert_eq!(Width::from_size(1), Some(Width::U8));
        assert_eq!(Width::from_size(8), Some(Width::U64));
        assert_eq!(Width::from_size(3), None);
        assert_eq!(Width::from_size(0), None);
        assert_eq!(Width::U16.size(), 2);
    }

    #[test]
    fn read_uint_respects_endian() {
        let bytes = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
        assert_eq!(read_uint(&bytes, 0, Width::U8, scroll::LE).unwrap(), 0x01);
        assert_eq!(read_uint(&bytes, 0, Width::U16, scroll::LE).unwrap(), 0x0201);
        assert_eq!(read_uint(&bytes, 0, Width::U16, scroll::BE).unwrap(), 0x0102);
        assert_eq!(read_uint(&bytes, 4, Width::U32, scroll::BE).unwrap(), 0x05060708);
        assert_eq!(
            read_uint(&bytes, 0, Width::U64, scroll::LE).unwrap(),
            0x0807060504030201
        );
        assert!(read_uint(&bytes, 6, Width::U32, scroll::LE).is_err());
    }

    #[test]
    fn cursor_advances() {
        let bytes = [0xaa, 0x34, 0x12, 0x78, 0x56, 0x34, 0x12, b'h', b'i'];
        let mut cursor = ByteCursor::new(&bytes, 0, scroll::LE);
        assert_eq!(cursor.read_u8().unwrap(), 0xaa);
        assert_eq!(cursor.read_u16().unwrap(), 0x1234);
        assert_eq!(cursor.read_u32().unwrap(), 0x12345678);
        assert_eq!(cursor.position(), 7);
        assert_eq!(cursor.read_bytes(2).unwrap(), b"hi");
        assert_eq!(cursor.remaining(), 0);
        assert!(cursor.read_u8().is_err());
        assert_eq!(cursor.position(), 9);
    }

    #[test]
    fn align() {
        assert_eq!(align_up(48, 8), Some(48));
        assert_eq!(align_up(49, 4), Some(52));
        assert_eq!(align_up(51, 1), Some(51));
        assert_eq!(align_up(usize::MAX, 4), None);
    }
}
