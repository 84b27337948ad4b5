//! Block headers and their arena.

use crate::block::Block;
use crate::invariants;

/// Index of a tag within its pool's arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(transparent)]
pub struct TagId(pub(crate) u32);

impl TagId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a tag currently describes.
///
/// A tag either counts live elements or, between the two migration phases,
/// forwards to the tag holding the migrated copy of its data.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TagHeader {
    Count(usize),
    Forward(TagId),
}

/// One batch of same-type elements, linked into its pool.
#[derive(Debug)]
pub struct Tag {
    pub(crate) prev: Option<TagId>,
    pub(crate) next: Option<TagId>,
    pub(crate) header: TagHeader,
    /// Element size the block was laid out with.
    pub(crate) stride: usize,
    pub(crate) block: Block,
}

impl Tag {
    pub(crate) fn new(count: usize, stride: usize, align: usize) -> Self {
        let len = count
            .checked_mul(stride)
            .unwrap_or_else(|| invariants::layout_overflow(usize::MAX, align));
        Self {
            prev: None,
            next: None,
            header: TagHeader::Count(count),
            stride,
            block: Block::zeroed(len, align),
        }
    }

    pub fn header(&self) -> TagHeader {
        self.header
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn block(&self) -> &Block {
        &self.block
    }

    /// Element count, or `None` once the tag forwards elsewhere.
    pub fn count(&self) -> Option<usize> {
        match self.header {
            TagHeader::Count(n) => Some(n),
            TagHeader::Forward(_) => None,
        }
    }

    pub fn forward(&self) -> Option<TagId> {
        match self.header {
            TagHeader::Forward(id) => Some(id),
            TagHeader::Count(_) => None,
        }
    }

    /// Bytes of element `index`.
    pub(crate) fn element(&self, index: usize) -> &[u8] {
        let start = index * self.stride;
        &self.block.as_slice()[start..start + self.stride]
    }
}

/// Slab of tags with slot reuse.
#[derive(Debug, Default)]
pub struct TagArena {
    slots: Vec<Option<Tag>>,
    free: Vec<u32>,
}

impl TagArena {
    pub fn insert(&mut self, tag: Tag) -> TagId {
        if let Some(slot) = self.free.pop() {
            self.slots[slot as usize] = Some(tag);
            return TagId(slot);
        }
        let slot = self.slots.len() as u32;
        self.slots.push(Some(tag));
        TagId(slot)
    }

    pub fn remove(&mut self, id: TagId) -> Option<Tag> {
        let tag = self.slots.get_mut(id.index())?.take()?;
        self.free.push(id.0);
        Some(tag)
    }

    pub fn get(&self, id: TagId) -> Option<&Tag> {
        self.slots.get(id.index())?.as_ref()
    }

    pub fn get_mut(&mut self, id: TagId) -> Option<&mut Tag> {
        self.slots.get_mut(id.index())?.as_mut()
    }

    /// Number of tags held, live and superseded.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}
