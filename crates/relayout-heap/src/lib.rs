#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Migrating allocation pools.
//!
//! - **Block**: one zeroed, aligned allocation.
//! - **Tag**: a block header, either counting elements or forwarding to the
//!   block that replaced it.
//! - **Pool**: every block of one (type, indirection) pair.
//! - **State**: the coordinator owning types and pools; runs migrations.

mod address;
mod block;
mod invariants;
mod migrate;
mod pool;
mod state;
mod tag;


pub use address::{AddressMap, BlockRef};
pub use block::{BLOCK_ALIGN, Block};
pub use migrate::{apply_diffs, pointer_slots};
pub use pool::{Pool, Tags};
pub use state::{Phase, State};
pub use tag::{Tag, TagArena, TagHeader, TagId};
