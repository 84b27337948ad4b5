//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use relayout_core::PoolId;

use crate::pool::Pool;
use crate::state::State;
use crate::tag::{Tag, TagArena, TagId};

impl TagArena {
    pub(crate) fn ensure(&self, id: TagId) -> &Tag {
        self.get(id).unwrap_or_else(|| {
            panic!(
                "TagArena: tag {} not found (list links must only name live slots)",
                id.index()
            )
        })
    }

    pub(crate) fn ensure_mut(&mut self, id: TagId) -> &mut Tag {
        self.get_mut(id).unwrap_or_else(|| {
            panic!(
                "TagArena: tag {} not found (list links must only name live slots)",
                id.index()
            )
        })
    }
}

impl State {
    pub(crate) fn ensure_pool(&self, id: PoolId) -> &Pool {
        self.pools.get(&id).unwrap_or_else(|| {
            panic!(
                "State: pool {} not found (address index must only name registered pools)",
                id.0
            )
        })
    }
}

pub(crate) fn layout_overflow(len: usize, align: usize) -> ! {
    panic!("Block: {len} bytes aligned to {align} exceed the address space")
}
