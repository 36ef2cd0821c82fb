#![allow(dead_code)]

use gfbson_schema::{
    HEADER_LEN, TAG_ARRAY, TAG_END_OF_FILE, TAG_INTEGER, TAG_OBJECT, TAG_ROOT, TAG_STRING,
    TAG_STRING_BANK, TAG_STRING_TABLE,
};

/// Assembles GF BSON test streams record by record. Containers only write
/// their own header; the caller appends exactly `child_count` records after.
pub struct StreamBuilder {
    data: Vec<u8>,
}

impl StreamBuilder {
    pub fn new() -> StreamBuilder {
        StreamBuilder { data: vec![0; HEADER_LEN] }
    }

    fn word(mut self, value: u32) -> Self {
        self.data.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub fn header(self, record_type: u32, size: u32) -> Self {
        self.word(record_type).word(size)
    }

    pub fn root(self) -> Self {
        self.header(TAG_ROOT, 0)
    }

    pub fn eof(self) -> Self {
        self.header(TAG_END_OF_FILE, 0)
    }

    pub fn string_table(self, entries: &[(u32, u32)]) -> Self {
        let mut builder = self.header(TAG_STRING_TABLE, entries.len() as u32 * 8);
        for &(offset, length) in entries {
            builder = builder.word(offset).word(length);
        }
        builder
    }

    pub fn string_bank(self, data: &[u8]) -> Self {
        self.header(TAG_STRING_BANK, data.len() as u32).raw(data)
    }

    /// A string table holding `strings` in order, followed by its bank.
    pub fn strings(self, strings: &[&str]) -> Self {
        let mut entries = Vec::new();
        let mut bank = Vec::new();
        for s in strings {
            entries.push((bank.len() as u32, s.len() as u32));
            bank.extend_from_slice(s.as_bytes());
        }
        self.string_table(&entries).string_bank(&bank)
    }

    pub fn integer(self, key_index: u32, value: i32) -> Self {
        self.header(TAG_INTEGER, 8).word(key_index).word(value as u32)
    }

    pub fn string(self, key_index: u32, value_index: u32) -> Self {
        self.header(TAG_STRING, 8).word(key_index).word(value_index)
    }

    pub fn object(self, name_index: u32, child_count: u32) -> Self {
        self.header(TAG_OBJECT, 8).word(name_index).word(child_count)
    }

    pub fn array(self, name_index: u32, child_count: u32) -> Self {
        self.header(TAG_ARRAY, 8).word(name_index).word(child_count)
    }

    pub fn unknown(self, record_type: u32, payload: &[u8]) -> Self {
        self.header(record_type, payload.len() as u32).raw(payload)
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.data.extend_from_slice(bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }
}
