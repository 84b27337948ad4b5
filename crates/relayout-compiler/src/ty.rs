//! Composite type records.

use crate::diff::Diff;
use crate::field::Field;

/// A named composite record with a committed and a pending field list.
///
/// Edits only touch the pending list. The committed list, size, alignment and
/// offsets change only when a migration compiles the type.
#[derive(Clone, Debug)]
pub struct Type {
    pub(crate) name: String,
    pub(crate) fields: Vec<Field>,
    pub(crate) pending: Vec<Field>,
    pub(crate) size: usize,
    /// Size in effect before the most recent compile.
    pub(crate) old_size: usize,
    pub(crate) align: usize,
    /// Last migration pass that compiled this type.
    pub(crate) generation: u64,
    /// Sealed types are fixed: never recompiled, never migrated.
    pub(crate) sealed: bool,
    /// Pending list differs from the committed one.
    pub(crate) dirty: bool,
    /// Most recent transition plan; only meaningful while a migration is open.
    pub(crate) diffs: Vec<Diff>,
}

impl Type {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            fields: Vec::new(),
            pending: Vec::new(),
            size: 0,
            old_size: 0,
            align: 1,
            generation: 0,
            sealed: false,
            dirty: false,
            diffs: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Committed fields, in layout order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Pending fields, as they will be laid out by the next compile.
    pub fn pending_fields(&self) -> &[Field] {
        &self.pending
    }

    /// Committed field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn old_size(&self) -> usize {
        self.old_size
    }

    pub fn align(&self) -> usize {
        self.align
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Whether the pending list has edits the next compile will apply.
    pub fn has_pending_edits(&self) -> bool {
        self.dirty
    }

    pub fn diffs(&self) -> &[Diff] {
        &self.diffs
    }

    pub(crate) fn pending_index(&self, name: &str) -> Option<usize> {
        self.pending.iter().position(|f| f.name == name)
    }

    /// Whether any committed or pending field references `ty`.
    pub(crate) fn references(&self, ty: relayout_core::TypeId) -> bool {
        self.fields
            .iter()
            .chain(&self.pending)
            .any(|f| f.ty.as_composite() == Some(ty))
    }
}
