use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Map, Value};
use tracing::debug;

use gfbson_schema::{Node, NodeKind};

use crate::{error::BsonError, reader::Document, strings::Strings};

/// How the JSON text is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonStyle {
    Pretty { indent: usize },
    Compact,
}

impl Default for JsonStyle {
    fn default() -> Self {
        JsonStyle::Pretty { indent: 4 }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonOptions {
    pub style:  JsonStyle,
    /// Reject unknown top-level records instead of leaving them out of the
    /// output.
    pub strict: bool,
}

/// Project a decoded document into a JSON object, leaving unknown top-level
/// records out.
pub fn project(document: &Document) -> Result<Value, BsonError> {
    project_with(document, &JsonOptions::default())
}

pub fn project_with(document: &Document, options: &JsonOptions) -> Result<Value, BsonError> {
    let mut root = Map::new();
    // Only looked up once a keyed record shows up, so a stream holding nothing
    // but structural records projects to `{}` without a string table.
    let mut resolver: Option<Strings<'_>> = None;

    for node in document.nodes() {
        match node.kind {
            NodeKind::Root | NodeKind::StringTable(_) | NodeKind::StringBank(_) => continue,
            NodeKind::EndOfFile => break,
            NodeKind::Object { .. }
            | NodeKind::Array { .. }
            | NodeKind::Integer { .. }
            | NodeKind::String { .. } => {
                let strings = match resolver {
                    Some(strings) => strings,
                    None => {
                        let strings = document.strings()?;
                        resolver = Some(strings);
                        strings
                    }
                };
                project_into(Parent::Object(&mut root), node, &strings)?;
            }
            NodeKind::Unknown { size } => {
                if options.strict {
                    return Err(BsonError::UnsupportedTopLevelTag(node.record_type));
                }
                debug!(record_type = node.record_type, size, "leaving unknown record out of JSON");
            }
        }
    }

    Ok(Value::Object(root))
}

/// Project `document` and serialize it as JSON text.
pub fn to_json_string(document: &Document, options: &JsonOptions) -> Result<String, BsonError> {
    let value = project_with(document, options)?;
    write_value(&value, options.style)
}

/// Serialize any JSON value with the given layout.
pub fn write_value<T: Serialize + ?Sized>(value: &T, style: JsonStyle) -> Result<String, BsonError> {
    match style {
        JsonStyle::Compact => Ok(serde_json::to_string(value)?),
        JsonStyle::Pretty { indent } => {
            let indent = " ".repeat(indent);
            let mut out = Vec::new();
            let formatter = PrettyFormatter::with_indent(indent.as_bytes());
            let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
            value.serialize(&mut serializer)?;
            String::from_utf8(out)
                .map_err(|e| BsonError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
        }
    }
}

enum Parent<'p> {
    Object(&'p mut Map<String, Value>),
    Array(&'p mut Vec<Value>),
}

fn project_into(parent: Parent<'_>, node: &Node, strings: &Strings<'_>) -> Result<(), BsonError> {
    let value = match node.kind {
        NodeKind::Object { ref children, .. } => {
            let mut object = Map::new();
            for child in children {
                project_into(Parent::Object(&mut object), child, strings)?;
            }
            Value::Object(object)
        }
        NodeKind::Array { ref children, .. } => {
            // Array elements carry a key index too, but they are placed by
            // position only.
            let mut array = Vec::with_capacity(children.len());
            for child in children {
                project_into(Parent::Array(&mut array), child, strings)?;
            }
            Value::Array(array)
        }
        NodeKind::Integer { value, .. } => Value::from(value),
        NodeKind::String { value_index, .. } => {
            Value::String(strings.resolve(value_index)?.into_owned())
        }
        _ => return Err(BsonError::UnsupportedChildTag(node.record_type)),
    };

    match parent {
        Parent::Array(array) => array.push(value),
        Parent::Object(object) => {
            let key_index = node
                .key_index()
                .ok_or(BsonError::UnsupportedChildTag(node.record_type))?;
            // A repeated key replaces the earlier value.
            object.insert(strings.resolve(key_index)?.into_owned(), value);
        }
    }

    Ok(())
}
