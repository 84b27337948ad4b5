//! Indirection kinds.

/// Width of a stored managed address.
pub const POINTER_SIZE: usize = std::mem::size_of::<usize>();

/// How a field or pool holds its type.
///
/// There are exactly two kinds. Every `Pointer` slot, whether embedded in a
/// composite or stored in a pointer-array pool, is redirected when a
/// migration closes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[repr(u8)]
pub enum Indirection {
    /// The value itself, laid out inline.
    #[default]
    Value = 0,
    /// Address of a managed instance, laid out as a native pointer.
    Pointer = 1,
}

impl Indirection {
    #[inline]
    pub fn is_pointer(self) -> bool {
        matches!(self, Self::Pointer)
    }
}
