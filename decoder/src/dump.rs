//! Indented text rendering of the record tree, for poking at files whose
//! layout is not fully understood yet.
//!
//! Unlike the JSON projection this never fails: a name that cannot be
//! resolved is printed as `#<index>` so broken files can still be inspected.

use std::fmt::Write;

use gfbson_schema::{Node, NodeKind};

use crate::{reader::Document, strings::Strings};

fn indent(depth: usize) -> String {
    " ".repeat(depth * 2)
}

/// Render every top-level record of `document`, one per line.
pub fn dump(document: &Document) -> String {
    let strings = document.strings().ok();
    let mut out = String::new();

    for node in document.nodes() {
        write_node(&mut out, node, strings.as_ref(), 0);
        out.push('\n');
    }

    out
}

fn name(strings: Option<&Strings<'_>>, index: u32) -> String {
    strings
        .and_then(|strings| strings.resolve(index).ok())
        .map(|name| name.into_owned())
        .unwrap_or_else(|| format!("#{}", index))
}

fn write_node(out: &mut String, node: &Node, strings: Option<&Strings<'_>>, depth: usize) {
    // Writing into a String cannot fail.
    let _ = match node.kind {
        NodeKind::Root => write!(out, "<root>"),
        NodeKind::EndOfFile => write!(out, "<EOF>"),
        NodeKind::Object { name_index, ref children } => {
            write_container(out, "Object", ('{', '}'), name(strings, name_index), children, strings, depth);
            Ok(())
        }
        NodeKind::Array { name_index, ref children } => {
            write_container(out, "Array", ('[', ']'), name(strings, name_index), children, strings, depth);
            Ok(())
        }
        NodeKind::Integer { key_index, value } => write!(
            out,
            "[Integer]: Key: \"{}\", Value: {}",
            name(strings, key_index),
            value
        ),
        NodeKind::String { key_index, value_index } => write!(
            out,
            "[String]: Key: \"{}\", Value: \"{}\"",
            name(strings, key_index),
            name(strings, value_index)
        ),
        NodeKind::StringTable(ref table) => {
            // Entries of a table other than the bound one are shown raw.
            let bound = strings.filter(|strings| std::ptr::eq(strings.table(), table));
            let _ = write!(out, "[String Table]: {} entries", table.len());
            for (index, info) in table.entries.iter().enumerate() {
                let _ = write!(out, "\n{}[{}] ", indent(depth + 1), index);
                let _ = match bound {
                    Some(_) => write!(out, "\"{}\"", name(bound, index as u32)),
                    None => write!(out, "{}+{}", info.offset, info.length),
                };
            }
            Ok(())
        }
        NodeKind::StringBank(ref bank) => write!(out, "[String Bank]: {} bytes", bank.len()),
        NodeKind::Unknown { size } => write!(out, "[Node type {}]: {} bytes", node.record_type, size),
    };
}

fn write_container(
    out: &mut String,
    label: &str,
    (open, close): (char, char),
    name: String,
    children: &[Node],
    strings: Option<&Strings<'_>>,
    depth: usize,
) {
    let _ = write!(out, "[{}]: Name: \"{}\", Contents: {}", label, name, open);

    if children.is_empty() {
        out.push(close);
        return;
    }

    for child in children {
        out.push('\n');
        out.push_str(&indent(depth + 1));
        write_node(out, child, strings, depth + 1);
    }

    out.push('\n');
    out.push_str(&indent(depth));
    out.push(close);
}
