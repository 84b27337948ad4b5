//! Handle newtypes.

use crate::primitive::Primitive;

/// Handle to a composite type registered in a model.
///
/// Ids are never reused within a model, so a handle to a removed type stays
/// dangling instead of silently aliasing a newer type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeId(pub u32);

/// Handle to a pool registered in a model.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[repr(transparent)]
pub struct PoolId(pub u32);

/// Reference from a field or pool to the type it holds.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum TypeRef {
    Primitive(Primitive),
    Composite(TypeId),
}

impl TypeRef {
    pub const I8: Self = Self::Primitive(Primitive::I8);
    pub const I16: Self = Self::Primitive(Primitive::I16);
    pub const I32: Self = Self::Primitive(Primitive::I32);
    pub const I64: Self = Self::Primitive(Primitive::I64);
    pub const F32: Self = Self::Primitive(Primitive::F32);
    pub const F64: Self = Self::Primitive(Primitive::F64);

    #[inline]
    pub fn is_primitive(self) -> bool {
        matches!(self, Self::Primitive(_))
    }

    #[inline]
    pub fn as_composite(self) -> Option<TypeId> {
        match self {
            Self::Composite(id) => Some(id),
            Self::Primitive(_) => None,
        }
    }
}

impl From<Primitive> for TypeRef {
    fn from(p: Primitive) -> Self {
        Self::Primitive(p)
    }
}

impl From<TypeId> for TypeRef {
    fn from(id: TypeId) -> Self {
        Self::Composite(id)
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primitive(p) => write!(f, "{p}"),
            Self::Composite(id) => write!(f, "T{}", id.0),
        }
    }
}

impl std::fmt::Display for PoolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P{}", self.0)
    }
}
