//! Zeroed, aligned element storage.
//!
//! Every block is its own heap allocation so addresses handed to callers stay
//! put until the block is dropped. Zero-length blocks still reserve one byte,
//! which keeps every block start unique and non-null.

use std::alloc::{self, Layout};
use std::ptr::NonNull;

use crate::invariants;

/// Minimum alignment of every block; covers every primitive and pointer.
pub const BLOCK_ALIGN: usize = 16;

pub struct Block {
    ptr: NonNull<u8>,
    layout: Layout,
    /// Requested length; may be zero while `layout.size()` is not.
    len: usize,
}

impl Block {
    /// Allocate `len` zeroed bytes aligned to at least [`BLOCK_ALIGN`].
    pub fn zeroed(len: usize, align: usize) -> Self {
        let align = align.max(BLOCK_ALIGN);
        let layout = Layout::from_size_align(len.max(1), align)
            .unwrap_or_else(|_| invariants::layout_overflow(len, align));

        // SAFETY: `layout` has a non-zero size.
        let raw = unsafe { alloc::alloc_zeroed(layout) };
        let Some(ptr) = NonNull::new(raw) else {
            alloc::handle_alloc_error(layout)
        };

        Self { ptr, layout, len }
    }

    #[inline]
    pub fn as_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    #[inline]
    pub fn addr(&self) -> usize {
        self.ptr.as_ptr().addr()
    }

    /// Bytes reserved for this block; never zero.
    #[inline]
    pub fn span(&self) -> usize {
        self.layout.size()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: the allocation holds at least `len` initialized bytes.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: the allocation holds at least `len` initialized bytes and
        // `&mut self` excludes other views created through this block.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Pointer to `offset` bytes into the block, keeping its provenance.
    #[inline]
    pub fn ptr_at(&self, offset: usize) -> *mut u8 {
        self.ptr.as_ptr().wrapping_add(offset)
    }

    /// Read a stored address from `offset`.
    pub fn read_ptr(&self, offset: usize) -> *mut u8 {
        assert!(offset + size_of::<*mut u8>() <= self.len);
        // SAFETY: bounds checked above; the slot holds plain bytes.
        unsafe { self.ptr_at(offset).cast::<*mut u8>().read_unaligned() }
    }

    /// Store an address at `offset`.
    pub fn write_ptr(&mut self, offset: usize, value: *mut u8) {
        assert!(offset + size_of::<*mut u8>() <= self.len);
        // SAFETY: bounds checked above.
        unsafe { self.ptr_at(offset).cast::<*mut u8>().write_unaligned(value) }
    }
}

impl Drop for Block {
    fn drop(&mut self) {
        // SAFETY: `ptr` was allocated with `layout` and is released once.
        unsafe { alloc::dealloc(self.ptr.as_ptr(), self.layout) }
    }
}

impl std::fmt::Debug for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Block")
            .field("addr", &format_args!("{:#x}", self.addr()))
            .field("len", &self.len)
            .field("aligned", &self.addr().is_multiple_of(self.layout.align()))
            .finish()
    }
}
