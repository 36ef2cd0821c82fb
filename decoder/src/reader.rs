use gfbson_schema::{
    ByteCursor, Node, NodeKind, StringBank, StringInfo, StringTable, HEADER_LEN,
    RECORD_HEADER_LEN, STRING_INFO_LEN, TAG_ARRAY, TAG_END_OF_FILE, TAG_INTEGER, TAG_OBJECT,
    TAG_ROOT, TAG_STRING, TAG_STRING_BANK, TAG_STRING_TABLE,
};
use tracing::{debug, trace, warn};

use crate::{error::BsonError, strings::Strings};

/// Containers nested deeper than this are rejected instead of recursing
/// until the stack runs out.
pub const MAX_DEPTH: usize = 256;

/// Decode a whole GF BSON buffer. Equivalent to `Decoder::new(buffer).parse()`.
pub fn parse(buffer: &[u8]) -> Result<Document, BsonError> {
    Decoder::new(buffer).parse()
}

/// Reads records from a borrowed buffer. A fresh decoder is created for each
/// buffer; it keeps no state between calls to [parse](Decoder::parse).
pub struct Decoder<'a> {
    cursor: ByteCursor<'a>,
}

impl<'a> Decoder<'a> {
    pub fn new(buffer: &'a [u8]) -> Decoder<'a> {
        Decoder { cursor: ByteCursor::new(buffer) }
    }

    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    /// Read one record, and recursively all of its children, starting at the
    /// current position.
    pub fn read_node(&mut self) -> Result<Node, BsonError> {
        self.read_node_at_depth(0)
    }

    fn read_node_at_depth(&mut self, depth: usize) -> Result<Node, BsonError> {
        let offset = self.cursor.position();
        let record_type = self.cursor.read_u32()?;
        let declared_size = self.cursor.read_u32()?;

        let kind = self
            .read_payload(record_type, declared_size, depth)
            .map_err(|err| match err {
                BsonError::OutOfBounds(source) => BsonError::TruncatedRecord {
                    record_type,
                    offset,
                    source,
                },
                other => other,
            })?;

        Ok(Node::new(record_type, declared_size, kind))
    }

    fn read_payload(
        &mut self,
        record_type: u32,
        declared_size: u32,
        depth: usize,
    ) -> Result<NodeKind, BsonError> {
        let kind = match record_type {
            TAG_ROOT => NodeKind::Root,
            TAG_OBJECT => {
                let (name_index, children) = self.read_container(depth)?;
                NodeKind::Object { name_index, children }
            }
            TAG_ARRAY => {
                let (name_index, children) = self.read_container(depth)?;
                NodeKind::Array { name_index, children }
            }
            TAG_INTEGER => NodeKind::Integer {
                key_index: self.cursor.read_u32()?,
                value:     self.cursor.read_i32()?,
            },
            TAG_STRING => NodeKind::String {
                key_index:   self.cursor.read_u32()?,
                value_index: self.cursor.read_u32()?,
            },
            TAG_STRING_TABLE => NodeKind::StringTable(self.read_string_table(declared_size)?),
            TAG_STRING_BANK => {
                let data = self.cursor.read_bytes(declared_size as usize)?;
                NodeKind::StringBank(StringBank { data: data.to_vec() })
            }
            TAG_END_OF_FILE => NodeKind::EndOfFile,
            _ => {
                debug!(
                    record_type,
                    declared_size,
                    offset = self.cursor.position(),
                    "skipping unknown record"
                );
                self.cursor.skip(declared_size as usize)?;
                NodeKind::Unknown { size: declared_size }
            }
        };
        Ok(kind)
    }

    // Containers are framed by their child count alone; the record's size
    // field is not consulted.
    fn read_container(&mut self, depth: usize) -> Result<(u32, Vec<Node>), BsonError> {
        if depth >= MAX_DEPTH {
            return Err(BsonError::NestingTooDeep {
                offset: self.cursor.position(),
                depth,
            });
        }

        let name_index = self.cursor.read_u32()?;
        let child_count = self.cursor.read_u32()? as usize;

        // Every child needs at least a record header, which bounds a sane
        // preallocation for corrupt counts.
        let capacity = child_count.min(self.cursor.remaining() / RECORD_HEADER_LEN);
        let mut children = Vec::with_capacity(capacity);
        for _ in 0..child_count {
            let child = self.read_node_at_depth(depth + 1)?;
            trace!(
                record_type = child.record_type,
                kind = child.kind_name(),
                depth = depth + 1,
                "decoded child record"
            );
            children.push(child);
        }

        Ok((name_index, children))
    }

    fn read_string_table(&mut self, declared_size: u32) -> Result<StringTable, BsonError> {
        let size = declared_size as usize;
        if size % STRING_INFO_LEN != 0 {
            warn!(
                declared_size,
                "string table size is not a multiple of {STRING_INFO_LEN}; trailing bytes are left unread"
            );
        }

        let count = size / STRING_INFO_LEN;
        let mut entries = Vec::with_capacity(count.min(self.cursor.remaining() / STRING_INFO_LEN));
        for _ in 0..count {
            entries.push(StringInfo {
                offset: self.cursor.read_u32()?,
                length: self.cursor.read_u32()?,
            });
        }

        Ok(StringTable { entries })
    }

    /// Decode every top-level record until an end-of-file record or the end of
    /// the buffer, binding the first string bank that follows a string table.
    pub fn parse(mut self) -> Result<Document, BsonError> {
        self.cursor.seek_to(HEADER_LEN)?;
        let mut header = [0u8; HEADER_LEN];
        header.copy_from_slice(&self.cursor.data()[..HEADER_LEN]);

        let total = self.cursor.len();
        let mut nodes = Vec::new();
        let mut table: Option<usize> = None;
        let mut bank: Option<usize> = None;
        let mut terminated = false;

        while self.cursor.position() < total {
            let offset = self.cursor.position();
            let node = self.read_node()?;
            let index = nodes.len();

            debug!(
                record_type = node.record_type,
                declared_size = node.declared_size,
                offset,
                kind = node.kind_name(),
                "decoded record"
            );

            match node.kind {
                NodeKind::EndOfFile => terminated = true,
                NodeKind::StringTable(_) if bank.is_none() => {
                    if table.is_some() {
                        warn!(offset, "replacing a string table that never had a bank bound to it");
                    }
                    table = Some(index);
                }
                NodeKind::StringTable(_) => {
                    warn!(offset, "ignoring additional string table");
                }
                NodeKind::StringBank(_) if table.is_some() && bank.is_none() => {
                    bank = Some(index);
                }
                NodeKind::StringBank(_) => {
                    warn!(offset, "ignoring string bank that has no pending string table");
                }
                _ => {}
            }

            nodes.push(node);
            if terminated {
                break;
            }
        }

        if !terminated {
            warn!("stream ended without an end-of-file record");
        } else if self.cursor.remaining() > 0 {
            debug!(
                trailing = self.cursor.remaining(),
                "ignoring bytes after end-of-file record"
            );
        }

        Ok(Document { header, nodes, table, bank })
    }
}

/// The result of decoding one buffer: the top-level records in stream order
/// plus the string table and the bank bound to it.
///
/// The table and bank are held as indices into `nodes`; the bank's bytes are
/// owned only by its own node.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    header: [u8; HEADER_LEN],
    nodes:  Vec<Node>,
    table:  Option<usize>,
    bank:   Option<usize>,
}

impl Document {
    /// The opaque 16-byte file header.
    pub fn header(&self) -> &[u8; HEADER_LEN] {
        &self.header
    }

    /// Top-level records in stream order, including the end-of-file record
    /// when one was present.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }

    /// The string table used for resolution, if the stream had one.
    pub fn string_table(&self) -> Option<&StringTable> {
        match self.nodes.get(self.table?)?.kind {
            NodeKind::StringTable(ref table) => Some(table),
            _ => None,
        }
    }

    /// The string bank bound to [string_table](Document::string_table).
    pub fn string_bank(&self) -> Option<&StringBank> {
        match self.nodes.get(self.bank?)?.kind {
            NodeKind::StringBank(ref bank) => Some(bank),
            _ => None,
        }
    }

    /// Resolver for key, name and value indices.
    pub fn strings(&self) -> Result<Strings<'_>, BsonError> {
        let table = self.string_table().ok_or(BsonError::NoStringTable)?;
        Ok(Strings::new(table, self.string_bank()))
    }
}
