//! Shared building blocks for the GF BSON format, a tag-length-prefixed binary
//! serialization used by game assets.
//!
//! A file is a fixed 16-byte header followed by records. Every record starts
//! with a big-endian `u32` type tag and a `u32` size, followed by a
//! type-dependent payload. Strings are stored out of line: a string table
//! record lists `(offset, length)` pairs into the string bank record that
//! follows it.
//!
//! ```
//! use gfbson_schema::*;
//!
//! let bank = StringBank { data: b"hello".to_vec() };
//! let table = StringTable { entries: vec![StringInfo { offset: 0, length: 5 }] };
//! assert_eq!(bank.slice(&table.entries[0]), Some(&b"hello"[..]));
//!
//! let mut cursor = ByteCursor::new(&[0, 0, 1, 47]);
//! assert_eq!(cursor.read_u32(), Ok(TAG_INTEGER));
//! ```

pub mod bb;
pub mod node;

pub use bb::*;
pub use node::*;

pub const TAG_ROOT: u32 = 300;
pub const TAG_OBJECT: u32 = 301;
pub const TAG_ARRAY: u32 = 302;
pub const TAG_INTEGER: u32 = 303;
pub const TAG_STRING: u32 = 305;
pub const TAG_STRING_TABLE: u32 = 400;
pub const TAG_STRING_BANK: u32 = 500;
pub const TAG_END_OF_FILE: u32 = 900;

/// Size of the opaque leading file header.
pub const HEADER_LEN: usize = 16;

/// Size of the `(type, size)` header in front of every record.
pub const RECORD_HEADER_LEN: usize = 8;

/// Size of one `(offset, length)` string table entry.
pub const STRING_INFO_LEN: usize = 8;
