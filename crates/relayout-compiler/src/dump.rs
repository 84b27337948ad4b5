//! Human-readable layout dump for debugging and snapshot tests.
//!
//! ```text
//! Node size=16 align=8
//! fields:
//!   @0 id: i32
//!   @8 next: *Node
//! diffs:
//!   copy  id @0/4 -> @0/4 x1
//!   zero  next -> @8/8 x1
//! ```
//!
//! Diff lines read `source offset/stride -> destination offset/stride x count`.
//! The diff section only appears while a plan exists.

use std::fmt::Write as _;

use relayout_core::{Indirection, TypeId};

use crate::diff::DiffOp;
use crate::field::Field;
use crate::table::TypeTable;

/// Render the committed layout and current plan of a type.
pub fn dump_type(types: &TypeTable, id: TypeId) -> Option<String> {
    let ty = types.get(id)?;
    let mut out = String::new();

    write!(out, "{} size={} align={}", ty.name(), ty.size(), ty.align()).ok()?;
    if ty.is_sealed() {
        out.push_str(" sealed");
    }
    out.push('\n');

    out.push_str("fields:\n");
    for field in ty.fields() {
        writeln!(
            out,
            "  @{} {}: {}",
            field.offset(),
            field.name(),
            field_type(types, field)
        )
        .ok()?;
    }

    if !ty.diffs().is_empty() {
        out.push_str("diffs:\n");
        for diff in ty.diffs() {
            let name = ty.fields().get(diff.field).map_or("?", Field::name);
            write!(out, "  {:<5} {name}", diff.op.mnemonic()).ok()?;
            if !matches!(diff.op, DiffOp::Zero) {
                write!(out, " @{}/{}", diff.src_offset, diff.src_stride).ok()?;
            }
            writeln!(
                out,
                " -> @{}/{} x{}",
                diff.dst_offset, diff.dst_stride, diff.count
            )
            .ok()?;
        }
    }

    Some(out)
}

fn field_type(types: &TypeTable, field: &Field) -> String {
    let name = types.name_of(field.ty());
    let elem = match field.indirection() {
        Indirection::Pointer => format!("*{name}"),
        Indirection::Value => name,
    };
    match field.count() {
        1 => elem,
        n => format!("[{elem}; {n}]"),
    }
}
