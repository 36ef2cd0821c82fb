//! gfbson-decoder
//!
//! This crate implements:
//!  1) The record reader and stream driver (`Decoder`, `parse`, `Document`),
//!  2) String resolution through the bound string table and bank (`Strings`),
//!  3) Projection of the record tree into JSON (`project`, `to_json_string`),
//!  4) An indented text dump of the record tree (`dump`),
//!  5) The error type (`BsonError`).

pub mod error;
pub mod reader;
pub mod strings;
pub mod json;
pub mod dump;

pub use dump::dump;
pub use error::BsonError;
pub use json::{project, project_with, to_json_string, write_value, JsonOptions, JsonStyle};
pub use reader::{parse, Decoder, Document, MAX_DEPTH};
pub use strings::Strings;
