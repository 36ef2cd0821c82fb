use serde::Serialize;

use crate::{
    TAG_ARRAY, TAG_END_OF_FILE, TAG_INTEGER, TAG_OBJECT, TAG_ROOT, TAG_STRING, TAG_STRING_BANK,
    TAG_STRING_TABLE,
};

/// One decoded record. `record_type` and `declared_size` are the raw values
/// from the 8-byte record header; `kind` holds the type-specific payload.
///
/// `declared_size` is only meaningful for string tables, string banks and
/// unknown records. Containers are framed by their child count instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub record_type:   u32,
    pub declared_size: u32,
    pub kind:          NodeKind,
}

/// The payload of a [Node]. Containers own their children directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum NodeKind {
    Root,
    Object {
        name_index: u32,
        children:   Vec<Node>,
    },
    Array {
        name_index: u32,
        children:   Vec<Node>,
    },
    Integer {
        key_index: u32,
        value:     i32,
    },
    String {
        key_index:   u32,
        value_index: u32,
    },
    StringTable(StringTable),
    StringBank(StringBank),
    EndOfFile,
    /// A record with an unrecognized tag. The payload was skipped.
    Unknown {
        size: u32,
    },
}

impl Node {
    pub fn new(record_type: u32, declared_size: u32, kind: NodeKind) -> Node {
        Node { record_type, declared_size, kind }
    }

    /// Human-readable name of the record kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            NodeKind::Root => "Root",
            NodeKind::Object { .. } => "Object",
            NodeKind::Array { .. } => "Array",
            NodeKind::Integer { .. } => "Integer",
            NodeKind::String { .. } => "String",
            NodeKind::StringTable(_) => "StringTable",
            NodeKind::StringBank(_) => "StringBank",
            NodeKind::EndOfFile => "EndOfFile",
            NodeKind::Unknown { .. } => "Unknown",
        }
    }

    /// The string table index naming this node inside a JSON object. Only
    /// containers and scalar values are keyed.
    pub fn key_index(&self) -> Option<u32> {
        match self.kind {
            NodeKind::Object { name_index, .. } | NodeKind::Array { name_index, .. } => {
                Some(name_index)
            }
            NodeKind::Integer { key_index, .. } | NodeKind::String { key_index, .. } => {
                Some(key_index)
            }
            _ => None,
        }
    }

    /// Owned children of an [Object](NodeKind::Object) or [Array](NodeKind::Array).
    /// Returns an empty slice for other kinds.
    pub fn children(&self) -> &[Node] {
        match self.kind {
            NodeKind::Object { ref children, .. } | NodeKind::Array { ref children, .. } => {
                children.as_slice()
            }
            _ => &[],
        }
    }

    pub fn is_end_of_file(&self) -> bool {
        matches!(self.kind, NodeKind::EndOfFile)
    }

    /// Whether `record_type` is one of the tags the reader dispatches on.
    pub fn is_known_tag(record_type: u32) -> bool {
        matches!(
            record_type,
            TAG_ROOT
                | TAG_OBJECT
                | TAG_ARRAY
                | TAG_INTEGER
                | TAG_STRING
                | TAG_STRING_TABLE
                | TAG_STRING_BANK
                | TAG_END_OF_FILE
        )
    }
}

/// Location of one string inside a [StringBank].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StringInfo {
    pub offset: u32,
    pub length: u32,
}

/// Ordered `(offset, length)` references into the string bank that follows
/// the table in the stream. Entries may overlap.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StringTable {
    pub entries: Vec<StringInfo>,
}

impl StringTable {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: u32) -> Option<&StringInfo> {
        self.entries.get(index as usize)
    }
}

/// Raw concatenated string bytes. Strings are not NUL terminated.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StringBank {
    #[serde(serialize_with = "serialize_bank_data")]
    pub data: Vec<u8>,
}

impl StringBank {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The bytes referenced by `info`, or `None` if the range does not lie
    /// entirely within the bank.
    pub fn slice(&self, info: &StringInfo) -> Option<&[u8]> {
        let start = info.offset as usize;
        let end = start.checked_add(info.length as usize)?;
        self.data.get(start..end)
    }
}

// Banks are mostly text; emitting them lossily keeps the raw tree readable.
fn serialize_bank_data<S>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&String::from_utf8_lossy(data))
}
