mod common;

use common::StreamBuilder;
use gfbson_decoder::{parse, BsonError, Decoder, MAX_DEPTH};
use gfbson_schema::{
    NodeKind, StringInfo, HEADER_LEN, TAG_END_OF_FILE, TAG_INTEGER, TAG_OBJECT, TAG_ROOT,
    TAG_STRING_BANK, TAG_STRING_TABLE,
};

#[test]
fn test_decode_scalar_stream() {
    let data = StreamBuilder::new()
        .root()
        .string_table(&[(0, 5)])
        .string_bank(b"hello")
        .integer(0, -7)
        .eof()
        .build();

    let document = parse(&data).expect("parse failed");
    let nodes = document.nodes();

    assert_eq!(nodes.len(), 5);
    assert_eq!(nodes[0].record_type, TAG_ROOT);
    assert_eq!(nodes[0].kind, NodeKind::Root);
    assert_eq!(nodes[1].record_type, TAG_STRING_TABLE);
    assert_eq!(nodes[1].declared_size, 8);
    assert_eq!(nodes[2].record_type, TAG_STRING_BANK);
    assert_eq!(nodes[2].declared_size, 5);
    assert_eq!(nodes[3].record_type, TAG_INTEGER);
    assert_eq!(nodes[3].kind, NodeKind::Integer { key_index: 0, value: -7 });
    assert_eq!(nodes[4].record_type, TAG_END_OF_FILE);
    assert!(nodes[4].is_end_of_file());

    let table = document.string_table().expect("no string table");
    assert_eq!(table.entries, vec![StringInfo { offset: 0, length: 5 }]);
    let bank = document.string_bank().expect("no string bank");
    assert_eq!(bank.data, b"hello".to_vec());
    assert_eq!(document.strings().unwrap().resolve(0).unwrap(), "hello");
}

#[test]
fn test_header_is_kept_but_not_interpreted() {
    let mut data = StreamBuilder::new().root().eof().build();
    data[..HEADER_LEN].copy_from_slice(b"GFBSON\0\0\0\0\0\x01\0\0\0\x20");

    let document = parse(&data).expect("parse failed");
    assert_eq!(document.header(), b"GFBSON\0\0\0\0\0\x01\0\0\0\x20");
    assert_eq!(document.nodes().len(), 2);
}

#[test]
fn test_container_children_are_owned_and_counted() {
    let data = StreamBuilder::new()
        .root()
        .strings(&["outer", "inner", "a", "b"])
        .object(0, 2)
        .integer(2, 1)
        .object(1, 1)
        .integer(3, 2)
        .integer(2, 3)
        .eof()
        .build();

    let document = parse(&data).expect("parse failed");
    let nodes = document.nodes();

    // root, table, bank, outer object, trailing integer, eof
    assert_eq!(nodes.len(), 6);

    let outer = &nodes[3];
    assert_eq!(outer.record_type, TAG_OBJECT);
    assert_eq!(outer.key_index(), Some(0));
    assert_eq!(outer.children().len(), 2);
    assert_eq!(outer.children()[0].kind, NodeKind::Integer { key_index: 2, value: 1 });

    let inner = &outer.children()[1];
    assert_eq!(inner.key_index(), Some(1));
    assert_eq!(inner.children().len(), 1);
    assert_eq!(inner.children()[0].kind, NodeKind::Integer { key_index: 3, value: 2 });

    // The record after the last child is back at the top level.
    assert_eq!(nodes[4].kind, NodeKind::Integer { key_index: 2, value: 3 });
}

#[test]
fn test_read_node_leaves_cursor_after_last_child() {
    let data = StreamBuilder::new()
        .array(0, 2)
        .integer(1, 10)
        .integer(1, 20)
        .integer(9, 9)
        .build();

    // Records start right after the builder's blank file header.
    let mut decoder = Decoder::new(&data[HEADER_LEN..]);
    let array = decoder.read_node().expect("read_node failed");
    assert_eq!(array.children().len(), 2);
    assert_eq!(decoder.position(), 3 * 16);

    let next = decoder.read_node().expect("read_node failed");
    assert_eq!(next.kind, NodeKind::Integer { key_index: 9, value: 9 });
    assert_eq!(decoder.position(), data.len() - HEADER_LEN);
}

#[test]
fn test_unknown_record_is_skipped() {
    let data = StreamBuilder::new()
        .root()
        .strings(&["x", "y"])
        .integer(0, 1)
        .unknown(777, &[0xde, 0xad, 0xbe, 0xef])
        .integer(1, 2)
        .eof()
        .build();

    let document = parse(&data).expect("parse failed");
    let nodes = document.nodes();

    assert_eq!(nodes.len(), 7);
    assert_eq!(nodes[4].record_type, 777);
    assert_eq!(nodes[4].declared_size, 4);
    assert_eq!(nodes[4].kind, NodeKind::Unknown { size: 4 });
    assert_eq!(nodes[5].kind, NodeKind::Integer { key_index: 1, value: 2 });
}

#[test]
fn test_stops_at_first_end_of_file() {
    // Three garbage bytes after the terminator would fail a header read.
    let data = StreamBuilder::new()
        .root()
        .eof()
        .raw(&[1, 2, 3])
        .build();

    let document = parse(&data).expect("parse failed");
    assert_eq!(document.nodes().len(), 2);
    assert!(document.nodes()[1].is_end_of_file());

    let data = StreamBuilder::new()
        .root()
        .eof()
        .root()
        .eof()
        .build();
    assert_eq!(parse(&data).unwrap().nodes().len(), 2);
}

#[test]
fn test_missing_end_of_file_is_tolerated() {
    let data = StreamBuilder::new()
        .root()
        .strings(&["k"])
        .integer(0, 5)
        .build();

    let document = parse(&data).expect("parse failed");
    assert_eq!(document.nodes().len(), 4);
    assert!(!document.nodes().iter().any(|node| node.is_end_of_file()));
}

#[test]
fn test_header_only_file_is_empty() {
    let data = StreamBuilder::new().build();
    let document = parse(&data).expect("parse failed");
    assert!(document.nodes().is_empty());
    assert!(document.string_table().is_none());
}

#[test]
fn test_short_file_is_out_of_bounds() {
    let result = parse(&[0u8; 10]);
    assert!(matches!(result, Err(BsonError::OutOfBounds(_))));
}

#[test]
fn test_truncated_record_header() {
    let data = StreamBuilder::new().root().raw(&[0, 0, 1]).build();
    match parse(&data) {
        Err(BsonError::OutOfBounds(err)) => {
            assert_eq!(err.position, HEADER_LEN + 8);
            assert_eq!(err.wanted, 4);
            assert_eq!(err.len, HEADER_LEN + 11);
        }
        other => panic!("expected OutOfBounds, got {:?}", other),
    }
}

#[test]
fn test_truncated_payload_names_the_record() {
    let data = StreamBuilder::new()
        .root()
        .header(TAG_INTEGER, 8)
        .raw(&[0, 0, 0, 0, 0xff, 0xff])
        .build();

    match parse(&data) {
        Err(BsonError::TruncatedRecord { record_type, offset, .. }) => {
            assert_eq!(record_type, TAG_INTEGER);
            assert_eq!(offset, HEADER_LEN + 8);
        }
        other => panic!("expected TruncatedRecord, got {:?}", other),
    }
}

#[test]
fn test_string_bank_larger_than_stream() {
    let data = StreamBuilder::new()
        .header(TAG_STRING_BANK, 100)
        .raw(b"short")
        .build();

    assert!(matches!(
        parse(&data),
        Err(BsonError::TruncatedRecord { record_type: TAG_STRING_BANK, .. })
    ));
}

#[test]
fn test_unknown_record_larger_than_stream() {
    let data = StreamBuilder::new().root().header(4242, 64).raw(&[0; 8]).build();

    assert!(matches!(
        parse(&data),
        Err(BsonError::TruncatedRecord { record_type: 4242, .. })
    ));
}

#[test]
fn test_corrupt_child_count_fails_without_huge_allocation() {
    let data = StreamBuilder::new()
        .root()
        .object(0, u32::MAX)
        .integer(0, 1)
        .build();

    assert!(matches!(
        parse(&data),
        Err(BsonError::TruncatedRecord { record_type: TAG_OBJECT, .. })
    ));
}

#[test]
fn test_nesting_limit() {
    let mut builder = StreamBuilder::new().root().strings(&["n"]);
    for _ in 0..MAX_DEPTH + 1 {
        builder = builder.object(0, 1);
    }
    let data = builder.integer(0, 1).eof().build();

    assert!(matches!(
        parse(&data),
        Err(BsonError::NestingTooDeep { depth, .. }) if depth == MAX_DEPTH
    ));
}

#[test]
fn test_second_bank_is_consumed_but_not_bound() {
    let data = StreamBuilder::new()
        .root()
        .string_table(&[(0, 5)])
        .string_bank(b"hello")
        .string_bank(b"world")
        .integer(0, 1)
        .eof()
        .build();

    let document = parse(&data).expect("parse failed");
    assert_eq!(document.nodes().len(), 6);
    assert_eq!(
        document.nodes()[3].kind,
        NodeKind::StringBank(gfbson_schema::StringBank { data: b"world".to_vec() })
    );
    assert_eq!(document.nodes()[4].kind, NodeKind::Integer { key_index: 0, value: 1 });
    assert_eq!(document.string_bank().unwrap().data, b"hello".to_vec());
}

#[test]
fn test_second_table_after_binding_is_ignored() {
    let data = StreamBuilder::new()
        .string_table(&[(0, 5)])
        .string_bank(b"hello")
        .string_table(&[(1, 2), (0, 1)])
        .string_bank(b"xyz")
        .eof()
        .build();

    let document = parse(&data).expect("parse failed");
    assert_eq!(document.string_table().unwrap().len(), 1);
    assert_eq!(document.string_bank().unwrap().data, b"hello".to_vec());
}

#[test]
fn test_pending_table_is_replaced_until_bound() {
    let data = StreamBuilder::new()
        .string_table(&[(0, 1)])
        .string_table(&[(0, 2), (2, 3)])
        .string_bank(b"abcde")
        .eof()
        .build();

    let document = parse(&data).expect("parse failed");
    let strings = document.strings().unwrap();
    assert_eq!(strings.len(), 2);
    assert_eq!(strings.resolve(0).unwrap(), "ab");
    assert_eq!(strings.resolve(1).unwrap(), "cde");
}

#[test]
fn test_bank_before_table_is_not_bound() {
    let data = StreamBuilder::new()
        .string_bank(b"hello")
        .string_table(&[(0, 5)])
        .eof()
        .build();

    let document = parse(&data).expect("parse failed");
    assert!(document.string_table().is_some());
    assert!(document.string_bank().is_none());
    assert!(matches!(
        document.strings().unwrap().resolve(0),
        Err(BsonError::BankUnbound)
    ));
}

#[test]
fn test_decode_is_deterministic() {
    let data = StreamBuilder::new()
        .root()
        .strings(&["list", "name", "value"])
        .array(0, 2)
        .string(1, 2)
        .integer(1, -1)
        .eof()
        .build();

    assert_eq!(parse(&data).unwrap(), parse(&data).unwrap());
}
