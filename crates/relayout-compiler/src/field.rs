//! Named slots of a type's field list.

use relayout_core::{Indirection, TypeRef};

/// One named, typed, counted slot in a field list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub(crate) name: String,
    pub(crate) ty: TypeRef,
    /// 1 for a scalar, N for a fixed-size array.
    pub(crate) count: usize,
    pub(crate) indirection: Indirection,
    /// Derived by the compiler; meaningless on an uncompiled pending field.
    pub(crate) offset: usize,
    /// Position of the counterpart in the committed list, if any.
    pub(crate) prev: Option<usize>,
}

impl Field {
    pub(crate) fn from_spec(spec: FieldSpec) -> Self {
        Self {
            name: spec.name,
            ty: spec.ty,
            count: spec.count,
            indirection: spec.indirection,
            offset: 0,
            prev: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> TypeRef {
        self.ty
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn indirection(&self) -> Indirection {
        self.indirection
    }

    pub fn is_pointer(&self) -> bool {
        self.indirection.is_pointer()
    }

    /// Byte offset within an instance, as of the last compile.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// Description of a field to add to a type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub(crate) name: String,
    pub(crate) ty: TypeRef,
    pub(crate) count: usize,
    pub(crate) indirection: Indirection,
}

impl FieldSpec {
    /// A single inline value.
    pub fn value(name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        Self::array(name, ty, 1)
    }

    /// A fixed-size inline array.
    pub fn array(name: impl Into<String>, ty: impl Into<TypeRef>, count: usize) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            count,
            indirection: Indirection::Value,
        }
    }

    /// A single address of a managed instance.
    pub fn pointer(name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        Self::pointer_array(name, ty, 1)
    }

    /// A fixed-size array of addresses of managed instances.
    pub fn pointer_array(name: impl Into<String>, ty: impl Into<TypeRef>, count: usize) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            count,
            indirection: Indirection::Pointer,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
