//! A byte-offset based string table.
//! GSYM stores every name and path in one, and refers to them by offset.

use core::fmt;
use core::ops::Index;
use core::str;
use scroll::{Pread, ctx};

/// A string table of NUL-terminated strings, indexed by byte offsets (and not
/// member index). Offset 0 is conventionally the empty string.
#[derive(Clone, Copy, Default)]
pub struct StringTable<'a> {
    bytes: &'a [u8],
}

impl<'a> StringTable<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        StringTable { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The string starting at `offset`, or `None` if `offset` is out of range
    /// or the bytes there are not utf8. A missing final NUL ends the string at
    /// the end of the table.
    pub fn get(&self, offset: usize) -> Option<&'a str> {
        if offset >= self.bytes.len() {
            return None;
        }
        self.bytes
            .pread_with::<&'a str>(offset, ctx::StrCtx::Delimiter(0))
            .ok()
    }

    /// Like [`get`](#method.get), but malformed offsets become the empty string
    pub fn get_or_empty(&self, offset: usize) -> &'a str {
        match self.get(offset) {
            Some(s) => s,
            None => {
                log::debug!(
                    "string table offset {:#x} is unusable (table is {:#x} bytes)",
                    offset,
                    self.bytes.len()
                );
                ""
            }
        }
    }
}

impl<'a> fmt::Debug for StringTable<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", str::from_utf8(self.bytes))
    }
}

impl<'a> Index<usize> for StringTable<'a> {
    type Output = str;

    fn index(&self, index: usize) -> &Self::Output {
        self.get_or_empty(index)
    }
}
