use gfbson_schema::OutOfBounds;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BsonError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    OutOfBounds(#[from] OutOfBounds),

    #[error("Record type {record_type} at offset {offset:#x} is truncated: {source}")]
    TruncatedRecord {
        record_type: u32,
        offset:      usize,
        #[source]
        source:      OutOfBounds,
    },

    #[error("Container at offset {offset:#x} is nested {depth} levels deep")]
    NestingTooDeep {
        offset: usize,
        depth:  usize,
    },

    #[error("String index {index} is out of range (table has {len} entries)")]
    IndexOutOfRange {
        index: u32,
        len:   usize,
    },

    #[error("String entry {index} ({offset}+{length}) lies outside the {bank_len}-byte string bank")]
    StringOutOfBank {
        index:    u32,
        offset:   u32,
        length:   u32,
        bank_len: usize,
    },

    #[error("String table has no string bank bound to it")]
    BankUnbound,

    #[error("Stream has keyed records but no string table")]
    NoStringTable,

    #[error("Unsupported top-level record type {0}")]
    UnsupportedTopLevelTag(u32),

    #[error("Unsupported child record type {0}")]
    UnsupportedChildTag(u32),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
