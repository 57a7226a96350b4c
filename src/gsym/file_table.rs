//! The GSYM file table: directory and file name pairs, referenced by index from
//! function records.

use alloc::vec::Vec;
use scroll::{Endian, Pread, Pwrite, SizeWith};

pub const SIZEOF_FILE_ENTRY: usize = 8;

/// A source file, as two offsets into the string table
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pread, Pwrite, SizeWith)]
pub struct FileEntry {
    /// String table offset of the directory, 0 if there is none
    pub dir: u32,
    /// String table offset of the file name
    pub base: u32,
}

/// A view of the file table, either read in place or from the normalized copy
#[derive(Debug, Clone, Copy)]
pub enum FileTable<'a> {
    /// Native byte order entries inside the file's bytes
    Direct(&'a [u8]),
    /// Entries decoded from a file of the other byte order
    Owned(&'a [FileEntry]),
}

impl<'a> FileTable<'a> {
    pub fn len(&self) -> usize {
        match *self {
            FileTable::Direct(bytes) => bytes.len() / SIZEOF_FILE_ENTRY,
            FileTable::Owned(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<FileEntry> {
        match *self {
            FileTable::Direct(bytes) => {
                let offset = index.checked_mul(SIZEOF_FILE_ENTRY)?;
                bytes.pread_with(offset, scroll::NATIVE).ok()
            }
            FileTable::Owned(entries) => entries.get(index).copied(),
        }
    }
}

/// Decode every entry in `bytes`, stored in `endian` byte order, into native ones
pub(crate) fn normalize(bytes: &[u8], endian: Endian) -> scroll::Result<Vec<FileEntry>> {
    let offset = &mut 0;
    (0..bytes.len() / SIZEOF_FILE_ENTRY)
        .map(|_| bytes.gread_with::<FileEntry>(offset, endian))
        .collect()
}
