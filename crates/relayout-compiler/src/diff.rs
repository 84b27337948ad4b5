//! Transition plans.
//!
//! A compile turns the previous committed layout plus the pending field list
//! into a list of [`Diff`]s. Applied in order to an old instance, they fill a
//! new instance: every field byte of the new instance is covered by exactly
//! one diff. Padding is left as allocated (zeroed).

use relayout_core::{Cast, Indirection, TypeRef};

/// What a diff does to its destination range.
#[derive(Clone, Copy, Debug)]
pub enum DiffOp {
    /// Same type as before: copy bytes, recursing into migrating composites.
    Copy,
    /// Type changed: convert per element, or zero-fill when no cast exists.
    Cast(Option<&'static Cast>),
    /// New field, or new trailing array elements: zero-fill.
    Zero,
}

impl DiffOp {
    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Copy => "copy",
            Self::Cast(Some(_)) => "cast",
            Self::Cast(None) => "lossy",
            Self::Zero => "zero",
        }
    }
}

/// One step of a type's transition plan.
#[derive(Clone, Copy, Debug)]
pub struct Diff {
    pub op: DiffOp,
    /// Index of the destination field in the new committed list.
    pub field: usize,
    /// Destination field type.
    pub ty: TypeRef,
    pub indirection: Indirection,
    pub src_offset: usize,
    pub dst_offset: usize,
    /// Old element size; zero for `Zero` diffs.
    pub src_stride: usize,
    /// New element size.
    pub dst_stride: usize,
    pub count: usize,
}

impl Diff {
    /// Bytes of the destination covered by this diff.
    #[inline]
    pub fn dst_len(&self) -> usize {
        self.count * self.dst_stride
    }
}
