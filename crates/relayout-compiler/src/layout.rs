//! Layout compiler.
//!
//! Turns each type's pending field list into a committed layout (offsets,
//! size, alignment) plus the transition plan from the previous layout.
//! Offsets are always recomputed from scratch.

use std::collections::HashMap;

use relayout_core::limits::{MAX_BYTES, checked_bytes};
use relayout_core::{Error, Indirection, POINTER_SIZE, Result, TypeId, TypeRef, find_cast};

use crate::diff::{Diff, DiffOp};
use crate::field::Field;
use crate::table::TypeTable;
use crate::ty::Type;

/// Round `n` up to a multiple of `align` (a power of two).
#[inline]
pub fn round_up(n: usize, align: usize) -> usize {
    (n + align - 1) & !(align - 1)
}

fn checked_round_up(n: usize, align: usize) -> Option<usize> {
    n.checked_add(align - 1)
        .map(|n| n & !(align - 1))
        .filter(|&n| n <= MAX_BYTES)
}

fn too_large() -> Error {
    Error::CapacityExceeded {
        what: "bytes",
        limit: MAX_BYTES,
    }
}

impl TypeTable {
    /// Element size of `ty` as it was laid out before the current pass.
    ///
    /// A type already compiled in `generation` reports its saved previous
    /// size; anything else has not changed yet.
    pub fn prior_size_of(&self, ty: TypeRef, generation: u64) -> usize {
        match ty {
            TypeRef::Primitive(p) => p.size(),
            TypeRef::Composite(id) => match self.types.get(&id) {
                Some(t) if t.generation == generation && !t.sealed => t.old_size,
                Some(t) => t.size,
                None => 0,
            },
        }
    }

    fn prior_element_size(&self, field: &Field, generation: u64) -> usize {
        match field.indirection {
            Indirection::Pointer => POINTER_SIZE,
            Indirection::Value => self.prior_size_of(field.ty, generation),
        }
    }

    fn field_align(&self, field: &Field) -> usize {
        match field.indirection {
            Indirection::Pointer => POINTER_SIZE,
            Indirection::Value => self.align_of(field.ty),
        }
    }

    /// Check every pending list before anything is compiled.
    ///
    /// Value cycles and layouts larger than [`MAX_BYTES`] are rejected first,
    /// then each plan is checked against the diff capacity.
    pub fn validate_pending(&self) -> Result<()> {
        let mut layouts = HashMap::new();
        for &id in self.types.keys() {
            self.pending_layout_in(id, &mut layouts)?;
        }

        let limit = self.limits().get_max_diffs();
        for ty in self.types.values().filter(|t| !t.sealed) {
            let needed: usize = ty
                .pending
                .iter()
                .map(|f| {
                    let grows = f
                        .prev
                        .and_then(|i| ty.fields.get(i))
                        .is_some_and(|old| f.count > old.count);
                    1 + usize::from(grows)
                })
                .sum();
            if needed > limit {
                return Err(Error::CapacityExceeded {
                    what: "diffs",
                    limit,
                });
            }
        }
        Ok(())
    }

    /// Size and alignment `id` will have once its pending list is compiled.
    pub fn pending_layout(&self, id: TypeId) -> Result<(usize, usize)> {
        self.pending_layout_in(id, &mut HashMap::new())
    }

    /// `None` marks a type whose layout is still being computed.
    fn pending_layout_in(
        &self,
        id: TypeId,
        layouts: &mut HashMap<TypeId, Option<(usize, usize)>>,
    ) -> Result<(usize, usize)> {
        match layouts.get(&id) {
            Some(Some(layout)) => return Ok(*layout),
            Some(None) => {
                return Err(Error::RecursiveValueField(
                    self.name_of(TypeRef::Composite(id)),
                ));
            }
            None => {}
        }
        let Some(ty) = self.types.get(&id) else {
            return Ok((0, 1));
        };
        if ty.sealed {
            layouts.insert(id, Some((ty.size, ty.align)));
            return Ok((ty.size, ty.align));
        }

        layouts.insert(id, None);
        let mut size = 0;
        let mut align = 1;
        for field in &ty.pending {
            let (stride, field_align) = match (field.indirection, field.ty) {
                (Indirection::Pointer, _) => (POINTER_SIZE, POINTER_SIZE),
                (Indirection::Value, TypeRef::Primitive(p)) => (p.size(), p.align()),
                (Indirection::Value, TypeRef::Composite(nested)) => {
                    self.pending_layout_in(nested, layouts)?
                }
            };
            size = checked_round_up(size, field_align)
                .and_then(|offset| offset.checked_add(checked_bytes(field.count, stride)?))
                .filter(|&n| n <= MAX_BYTES)
                .ok_or_else(too_large)?;
            align = align.max(field_align);
        }

        let layout = (checked_round_up(size, align).ok_or_else(too_large)?, align);
        layouts.insert(id, Some(layout));
        Ok(layout)
    }

    /// Compile every non-fixed type for `generation`.
    ///
    /// Callers run [`validate_pending`](Self::validate_pending) first.
    pub fn compile_all(&mut self, generation: u64) {
        let ids: Vec<TypeId> = self.types.keys().copied().collect();
        for id in ids {
            self.compile(id, generation);
        }
    }

    /// Compile one type, nested types first.
    ///
    /// A type already stamped with `generation`, or sealed, is left alone.
    /// This also ends recursion through pointer cycles.
    pub fn compile(&mut self, id: TypeId, generation: u64) {
        let Some(ty) = self.types.get_mut(&id) else {
            return;
        };
        if ty.sealed || ty.generation == generation {
            return;
        }
        ty.generation = generation;
        ty.old_size = ty.size;

        let nested: Vec<TypeId> = ty
            .pending
            .iter()
            .filter_map(|f| f.ty.as_composite())
            .collect();
        for nested_id in nested {
            self.compile(nested_id, generation);
        }

        let Some(ty) = self.types.get(&id) else {
            return;
        };
        let (fields, size, align, diffs) = self.lay_out(ty, generation);
        log::trace!(
            "compiled `{}`: size {} -> {}, {} diffs",
            ty.name,
            ty.old_size,
            size,
            diffs.len()
        );

        let Some(ty) = self.types.get_mut(&id) else {
            return;
        };
        ty.pending = fields.clone();
        ty.fields = fields;
        ty.size = size;
        ty.align = align;
        ty.diffs = diffs;
        ty.dirty = false;
    }

    fn lay_out(&self, ty: &Type, generation: u64) -> (Vec<Field>, usize, usize, Vec<Diff>) {
        let mut fields = ty.pending.clone();
        let mut diffs = Vec::with_capacity(fields.len());
        let mut size = 0;
        let mut align = 1;

        for (index, field) in fields.iter_mut().enumerate() {
            let field_align = self.field_align(field);
            let stride = self.element_size(field.ty, field.indirection);
            field.offset = round_up(size, field_align);
            size = field.offset + field.count * stride;
            align = align.max(field_align);

            let old = field.prev.and_then(|i| ty.fields.get(i));
            self.plan_field(index, field, old, stride, generation, &mut diffs);
            field.prev = Some(index);
        }

        (fields, round_up(size, align), align, diffs)
    }

    fn plan_field(
        &self,
        index: usize,
        field: &Field,
        old: Option<&Field>,
        stride: usize,
        generation: u64,
        diffs: &mut Vec<Diff>,
    ) {
        let zero = |dst_offset, count| Diff {
            op: DiffOp::Zero,
            field: index,
            ty: field.ty,
            indirection: field.indirection,
            src_offset: 0,
            dst_offset,
            src_stride: 0,
            dst_stride: stride,
            count,
        };

        let Some(old) = old else {
            diffs.push(zero(field.offset, field.count));
            return;
        };

        let op = if old.ty == field.ty {
            DiffOp::Copy
        } else if field.indirection.is_pointer() {
            DiffOp::Cast(None)
        } else {
            DiffOp::Cast(find_cast(old.ty, field.ty))
        };
        let overlap = field.count.min(old.count);
        diffs.push(Diff {
            op,
            field: index,
            ty: field.ty,
            indirection: field.indirection,
            src_offset: old.offset,
            dst_offset: field.offset,
            src_stride: self.prior_element_size(old, generation),
            dst_stride: stride,
            count: overlap,
        });

        if field.count > overlap {
            diffs.push(zero(
                field.offset + overlap * stride,
                field.count - overlap,
            ));
        }
    }
}
