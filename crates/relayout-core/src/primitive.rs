//! Fixed primitive type descriptors.
//!
//! Primitives are process-wide constants: their size never changes, they have
//! no field list, and they are never migrated.

use crate::cast::Cast;

/// A fixed scalar type usable as a field type or a pool element type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum Primitive {
    I8 = 0,
    I16 = 1,
    I32 = 2,
    I64 = 3,
    F32 = 4,
    F64 = 5,
}

impl Primitive {
    /// Every primitive, in discriminant order.
    pub const ALL: [Primitive; 6] = [
        Self::I8,
        Self::I16,
        Self::I32,
        Self::I64,
        Self::F32,
        Self::F64,
    ];

    /// Size in bytes.
    pub const fn size(self) -> usize {
        match self {
            Self::I8 => 1,
            Self::I16 => 2,
            Self::I32 | Self::F32 => 4,
            Self::I64 | Self::F64 => 8,
        }
    }

    /// Alignment in bytes. Primitives align to their own size.
    pub const fn align(self) -> usize {
        self.size()
    }

    /// Display name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }

    /// Registered conversions out of this primitive.
    pub fn casts(self) -> &'static [Cast] {
        crate::cast::table(self)
    }
}

impl std::fmt::Display for Primitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
