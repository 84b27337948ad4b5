//! Diff application and pointer slot discovery.

use relayout_compiler::{DiffOp, Type, TypeTable};
use relayout_core::{Indirection, POINTER_SIZE, TypeRef};

/// Fill one new element `dst` from one old element `src` using `ty`'s plan.
///
/// Nested composites that migrate apply their own plan; fixed types and
/// pointers are copied as raw bytes.
pub fn apply_diffs(types: &TypeTable, ty: &Type, src: &[u8], dst: &mut [u8]) {
    for diff in ty.diffs() {
        let dst_range = diff.dst_offset..diff.dst_offset + diff.dst_len();
        match diff.op {
            DiffOp::Copy => {
                let nested = match (diff.indirection, diff.ty) {
                    (Indirection::Value, TypeRef::Composite(id)) if !types.is_fixed(diff.ty) => {
                        types.get(id)
                    }
                    _ => None,
                };
                match nested {
                    Some(nested) => {
                        for i in 0..diff.count {
                            let s = diff.src_offset + i * diff.src_stride;
                            let d = diff.dst_offset + i * diff.dst_stride;
                            apply_diffs(
                                types,
                                nested,
                                &src[s..s + diff.src_stride],
                                &mut dst[d..d + diff.dst_stride],
                            );
                        }
                    }
                    None => {
                        let len = diff.dst_len();
                        dst[dst_range]
                            .copy_from_slice(&src[diff.src_offset..diff.src_offset + len]);
                    }
                }
            }
            DiffOp::Cast(Some(cast)) => {
                for i in 0..diff.count {
                    let s = diff.src_offset + i * diff.src_stride;
                    let d = diff.dst_offset + i * diff.dst_stride;
                    cast.apply(
                        &src[s..s + diff.src_stride],
                        &mut dst[d..d + diff.dst_stride],
                    );
                }
            }
            DiffOp::Cast(None) | DiffOp::Zero => dst[dst_range].fill(0),
        }
    }
}

/// Offsets of every stored managed address within one element of a pool.
pub fn pointer_slots(types: &TypeTable, ty: TypeRef, indirection: Indirection) -> Vec<usize> {
    let mut slots = Vec::new();
    match indirection {
        Indirection::Pointer => slots.push(0),
        Indirection::Value => collect_slots(types, ty, 0, &mut slots),
    }
    slots
}

fn collect_slots(types: &TypeTable, ty: TypeRef, base: usize, slots: &mut Vec<usize>) {
    let Some(ty) = ty.as_composite().and_then(|id| types.get(id)) else {
        return;
    };
    for field in ty.fields() {
        let start = base + field.offset();
        match field.indirection() {
            Indirection::Pointer => {
                slots.extend((0..field.count()).map(|i| start + i * POINTER_SIZE));
            }
            Indirection::Value if field.ty().is_primitive() => {}
            Indirection::Value => {
                let stride = types.size_of(field.ty());
                for i in 0..field.count() {
                    collect_slots(types, field.ty(), start + i * stride, slots);
                }
            }
        }
    }
}
