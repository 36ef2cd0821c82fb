//! gfbson
//!
//! Decode GF BSON game asset files and re-emit them as JSON.
//!
//! - `decode_to_json` / `decode_to_json_with` for the whole bytes → JSON pipeline
//! - `decode_file` to load and decode a file from disk
//! - the record tree, resolver and error types re-exported from the decoder
//!
//! ```
//! let mut file = vec![0u8; 16];
//! for word in [300u32, 0, 400, 8, 0, 5, 500, 5] {
//!     file.extend_from_slice(&word.to_be_bytes());
//! }
//! file.extend_from_slice(b"hello");
//! for word in [303u32, 8, 0, (-7i32) as u32, 900, 0] {
//!     file.extend_from_slice(&word.to_be_bytes());
//! }
//!
//! let options = gfbson::JsonOptions { style: gfbson::JsonStyle::Compact, ..Default::default() };
//! assert_eq!(gfbson::decode_to_json_with(&file, &options).unwrap(), r#"{"hello":-7}"#);
//! ```

use std::fs;
use std::path::Path;

use tracing::debug;

pub use gfbson_decoder::error::BsonError;
pub use gfbson_decoder::{
    dump, parse, project, project_with, to_json_string, Decoder, Document, JsonOptions, JsonStyle,
    Strings,
};
pub use gfbson_schema::{Node, NodeKind, StringBank, StringInfo, StringTable};
pub use serde_json::Value as JsonValue;

/// Decode a GF BSON buffer into pretty-printed JSON with a four space indent.
pub fn decode_to_json(buffer: &[u8]) -> Result<String, BsonError> {
    decode_to_json_with(buffer, &JsonOptions::default())
}

pub fn decode_to_json_with(buffer: &[u8], options: &JsonOptions) -> Result<String, BsonError> {
    let document = parse(buffer)?;
    to_json_string(&document, options)
}

/// Read the whole file at `path` into memory and decode it.
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<Document, BsonError> {
    let path = path.as_ref();
    let data = fs::read(path)?;
    debug!(path = %path.display(), len = data.len(), "loaded input file");
    parse(&data)
}

/// Serialize the raw record tree of `document`, unknown records included.
pub fn nodes_to_json(document: &Document, style: JsonStyle) -> Result<String, BsonError> {
    gfbson_decoder::write_value(document.nodes(), style)
}

pub mod error {
    pub use gfbson_decoder::error::BsonError;
}

pub mod schema {
    pub use gfbson_schema::*;
}
