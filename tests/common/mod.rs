//! Writes small GSYM files for the integration tests.

#![allow(dead_code)]

use gsym::cursor::Width;
use gsym::gsym::FileEntry;
use gsym::gsym::function_info::{INFO_TYPE_END_OF_LIST, INFO_TYPE_LINE_TABLE_INFO};
use gsym::gsym::header::{GSYM_MAGIC, GSYM_MAX_UUID_SIZE, GSYM_VERSION, Header, SIZEOF_HEADER};
use scroll::{Endian, Pwrite};

pub fn init_logging() {
    let _ = stderrlog::new().verbosity(4).init();
}

pub fn other_endian() -> Endian {
    if scroll::NATIVE == scroll::LE {
        scroll::BE
    } else {
        scroll::LE
    }
}

pub struct Function {
    pub offset: u64,
    pub size: u32,
    pub name: &'static str,
    pub line_table: Option<Vec<u8>>,
}

pub struct GsymBuilder {
    pub base_address: u64,
    pub width: Width,
    pub uuid: Vec<u8>,
    pub functions: Vec<Function>,
    pub files: Vec<(&'static str, &'static str)>,
}

struct StringTableBuilder {
    bytes: Vec<u8>,
}

impl StringTableBuilder {
    fn new() -> Self {
        StringTableBuilder { bytes: vec![0] }
    }

    fn add(&mut self, s: &str) -> u32 {
        if s.is_empty() {
            return 0;
        }
        let offset = self.bytes.len() as u32;
        self.bytes.extend_from_slice(s.as_bytes());
        self.bytes.push(0);
        offset
    }
}

fn align(bytes: &mut Vec<u8>, to: usize) {
    while bytes.len() % to != 0 {
        bytes.push(0);
    }
}

fn push<T: scroll::ctx::TryIntoCtx<Endian, Error = scroll::Error> + scroll::ctx::SizeWith<Endian>>(
    bytes: &mut Vec<u8>,
    value: T,
    endian: Endian,
) {
    let at = bytes.len();
    bytes.resize(at + T::size_with(&endian), 0);
    bytes.pwrite_with(value, at, endian).unwrap();
}

impl GsymBuilder {
    pub fn new(base_address: u64, width: Width) -> Self {
        GsymBuilder {
            base_address,
            width,
            uuid: vec![0x5a; 16],
            functions: Vec::new(),
            files: vec![("", "")],
        }
    }

    pub fn function(mut self, offset: u64, size: u32, name: &'static str) -> Self {
        self.functions.push(Function {
            offset,
            size,
            name,
            line_table: None,
        });
        self
    }

    pub fn file(mut self, dir: &'static str, base: &'static str) -> Self {
        self.files.push((dir, base));
        self
    }

    pub fn build(&self, endian: Endian) -> Vec<u8> {
        let mut strtab = StringTableBuilder::new();
        let names: Vec<u32> = self.functions.iter().map(|f| strtab.add(f.name)).collect();
        let files: Vec<FileEntry> = self
            .files
            .iter()
            .map(|(dir, base)| FileEntry {
                dir: strtab.add(dir),
                base: strtab.add(base),
            })
            .collect();

        let mut bytes = vec![0u8; SIZEOF_HEADER];
        align(&mut bytes, self.width.size());
        for function in &self.functions {
            match self.width {
                Width::U8 => push(&mut bytes, function.offset as u8, endian),
                Width::U16 => push(&mut bytes, function.offset as u16, endian),
                Width::U32 => push(&mut bytes, function.offset as u32, endian),
                Width::U64 => push(&mut bytes, function.offset, endian),
            }
        }
        align(&mut bytes, 4);
        let info_offsets_at = bytes.len();
        for _ in &self.functions {
            push(&mut bytes, 0u32, endian);
        }
        push(&mut bytes, files.len() as u32, endian);
        for file in &files {
            push(&mut bytes, *file, endian);
        }

        let strtab_offset = bytes.len();
        bytes.extend_from_slice(&strtab.bytes);

        for (i, (function, name)) in self.functions.iter().zip(&names).enumerate() {
            align(&mut bytes, 4);
            let record = bytes.len() as u32;
            bytes
                .pwrite_with(record, info_offsets_at + i * 4, endian)
                .unwrap();
            push(&mut bytes, function.size, endian);
            push(&mut bytes, *name, endian);
            if let Some(ref line_table) = function.line_table {
                push(&mut bytes, INFO_TYPE_LINE_TABLE_INFO, endian);
                push(&mut bytes, line_table.len() as u32, endian);
                bytes.extend_from_slice(line_table);
            }
            push(&mut bytes, INFO_TYPE_END_OF_LIST, endian);
            push(&mut bytes, 0u32, endian);
        }

        let mut uuid = [0u8; GSYM_MAX_UUID_SIZE];
        uuid[..self.uuid.len()].copy_from_slice(&self.uuid);
        let header = Header {
            magic: GSYM_MAGIC,
            version: GSYM_VERSION,
            addr_off_size: self.width.size() as u8,
            uuid_size: self.uuid.len() as u8,
            base_address: self.base_address,
            num_addrs: self.functions.len() as u32,
            strtab_offset: strtab_offset as u32,
            strtab_size: strtab.bytes.len() as u32,
            uuid,
        };
        bytes.pwrite_with(header, 0, endian).unwrap();
        bytes
    }
}
