//! Index from raw addresses to the blocks that contain them.

use std::collections::BTreeMap;

use relayout_core::PoolId;

use crate::tag::TagId;

/// Where a block lives.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BlockRef {
    pub pool: PoolId,
    pub tag: TagId,
    pub start: usize,
    /// Reserved bytes, at least one.
    pub span: usize,
}

impl BlockRef {
    #[inline]
    pub fn contains(&self, addr: usize) -> bool {
        addr >= self.start && addr - self.start < self.span
    }
}

/// Every live block keyed by start address.
#[derive(Debug, Default)]
pub struct AddressMap {
    blocks: BTreeMap<usize, BlockRef>,
}

impl AddressMap {
    pub fn insert(&mut self, block: BlockRef) {
        self.blocks.insert(block.start, block);
    }

    pub fn remove(&mut self, start: usize) -> Option<BlockRef> {
        self.blocks.remove(&start)
    }

    /// Block containing `addr`, including interior addresses.
    pub fn lookup(&self, addr: usize) -> Option<BlockRef> {
        self.blocks
            .range(..=addr)
            .next_back()
            .map(|(_, block)| *block)
            .filter(|block| block.contains(addr))
    }

    /// Drop every block that belongs to `pool`.
    pub fn remove_pool(&mut self, pool: PoolId) {
        self.blocks.retain(|_, block| block.pool != pool);
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
