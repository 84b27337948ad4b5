//! Migration coordinator.
//!
//! `State` owns every type and pool of one model and drives the two-phase
//! protocol:
//!
//! 1. `begin_migration` compiles every type and copies every migrating pool
//!    into new blocks. Old blocks stay alive and forward to their copies.
//! 2. `end_migration` rewrites every stored managed address to its new
//!    location, then releases the old blocks.
//!
//! Between the two, callers translate addresses they hold with `resolve`.

use std::ptr::NonNull;

use indexmap::IndexMap;
use relayout_compiler::{FieldSpec, Type, TypeTable, dump_type};
use relayout_core::limits::{MAX_BYTES, checked_bytes};
use relayout_core::{
    Error, Indirection, Limits, POINTER_SIZE, PoolId, Result, TypeId, TypeRef,
};

use crate::address::{AddressMap, BlockRef};
use crate::migrate::pointer_slots;
use crate::pool::Pool;
use crate::tag::TagId;

/// Whether a migration is open.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// Between `begin_migration` and `end_migration`.
    Planning,
}

/// One model: its types, its pools and the memory they hold.
#[derive(Debug)]
pub struct State {
    types: TypeTable,
    pub(crate) pools: IndexMap<PoolId, Pool>,
    next_pool: u32,
    addresses: AddressMap,
    generation: u64,
    phase: Phase,
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl State {
    pub fn new() -> Self {
        Self::with_limits(Limits::default())
    }

    pub fn with_limits(limits: Limits) -> Self {
        Self {
            types: TypeTable::new(limits),
            pools: IndexMap::new(),
            next_pool: 0,
            addresses: AddressMap::default(),
            generation: 0,
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of migrations opened so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    pub fn type_id(&self, name: &str) -> Option<TypeId> {
        self.types.id_of(name)
    }

    pub fn ty(&self, id: TypeId) -> Option<&Type> {
        self.types.get(id)
    }

    pub fn dump_type(&self, id: TypeId) -> Option<String> {
        dump_type(&self.types, id)
    }

    pub fn pool(&self, id: PoolId) -> Option<&Pool> {
        self.pools.get(&id)
    }

    pub fn find_pool(&self, ty: impl Into<TypeRef>, indirection: Indirection) -> Option<PoolId> {
        let ty = ty.into();
        self.pools
            .iter()
            .find(|(_, p)| p.ty == ty && p.indirection == indirection)
            .map(|(&id, _)| id)
    }

    fn ensure_idle(&self) -> Result<()> {
        match self.phase {
            Phase::Idle => Ok(()),
            Phase::Planning => Err(Error::MigrationInProgress),
        }
    }

    // ------------------------------------------------------------------
    // Registry
    // ------------------------------------------------------------------

    pub fn create_type(&mut self, name: &str) -> Result<TypeId> {
        self.ensure_idle()?;
        self.types.create(name)
    }

    /// Remove a type together with every pool built for it.
    pub fn remove_type(&mut self, id: TypeId) -> Result<()> {
        self.ensure_idle()?;
        self.types.remove(id)?;

        let ty = TypeRef::Composite(id);
        let doomed: Vec<PoolId> = self
            .pools
            .iter()
            .filter(|(_, p)| p.ty == ty)
            .map(|(&pid, _)| pid)
            .collect();
        for pid in doomed {
            self.drop_pool(pid);
        }
        Ok(())
    }

    /// Pool for `ty` held with `indirection`, created on first use.
    pub fn get_pool(&mut self, ty: impl Into<TypeRef>, indirection: Indirection) -> Result<PoolId> {
        self.ensure_idle()?;
        let ty = ty.into();
        self.types.check_ref(ty)?;
        if let Some(id) = self.find_pool(ty, indirection) {
            return Ok(id);
        }

        let limit = self.types.limits().get_max_pools();
        if self.pools.len() >= limit {
            return Err(Error::CapacityExceeded {
                what: "pools",
                limit,
            });
        }
        let id = PoolId(self.next_pool);
        self.next_pool += 1;
        self.pools.insert(id, Pool::new(ty, indirection));
        Ok(id)
    }

    /// Pool of inline instances of `ty`.
    pub fn value_pool(&mut self, ty: impl Into<TypeRef>) -> Result<PoolId> {
        self.get_pool(ty, Indirection::Value)
    }

    /// Pool of addresses of `ty` instances.
    pub fn pointer_pool(&mut self, ty: impl Into<TypeRef>) -> Result<PoolId> {
        self.get_pool(ty, Indirection::Pointer)
    }

    pub fn remove_pool(&mut self, id: PoolId) -> Result<()> {
        self.ensure_idle()?;
        if !self.pools.contains_key(&id) {
            return Err(Error::PoolNotFound(id));
        }
        self.drop_pool(id);
        Ok(())
    }

    /// Free every block of a pool, keeping the pool registered.
    pub fn clear_pool(&mut self, id: PoolId) -> Result<()> {
        self.ensure_idle()?;
        let pool = self.pools.get_mut(&id).ok_or(Error::PoolNotFound(id))?;
        pool.clear();
        self.addresses.remove_pool(id);
        Ok(())
    }

    fn drop_pool(&mut self, id: PoolId) {
        self.pools.shift_remove(&id);
        self.addresses.remove_pool(id);
    }

    // ------------------------------------------------------------------
    // Field editing
    // ------------------------------------------------------------------

    pub fn add_field(&mut self, id: TypeId, field: FieldSpec) -> Result<()> {
        self.ensure_idle()?;
        self.types.add_field(id, field, None)
    }

    /// Insert a field at `index`; an index past the end appends.
    pub fn insert_field(&mut self, id: TypeId, field: FieldSpec, index: usize) -> Result<()> {
        self.ensure_idle()?;
        self.types.add_field(id, field, Some(index))
    }

    pub fn remove_field(&mut self, id: TypeId, name: &str) -> Result<()> {
        self.ensure_idle()?;
        self.types.remove_field(id, name)
    }

    pub fn resize_field(&mut self, id: TypeId, name: &str, count: usize) -> Result<()> {
        self.ensure_idle()?;
        self.types.resize_field(id, name, count)
    }

    pub fn move_field(&mut self, id: TypeId, name: &str, index: usize) -> Result<()> {
        self.ensure_idle()?;
        self.types.move_field(id, name, index)
    }

    pub fn retype_field(&mut self, id: TypeId, name: &str, to: impl Into<TypeRef>) -> Result<()> {
        self.ensure_idle()?;
        self.types.retype_field(id, name, to.into())
    }

    /// Freeze a compiled type: it is never migrated again and rejects edits.
    pub fn seal_type(&mut self, id: TypeId) -> Result<()> {
        self.ensure_idle()?;
        self.types.seal(id)
    }

    // ------------------------------------------------------------------
    // Allocation
    // ------------------------------------------------------------------

    /// Allocate `count` zeroed elements. A zero count allocates nothing.
    pub fn alloc(&mut self, id: PoolId, count: usize) -> Result<Option<NonNull<u8>>> {
        self.ensure_idle()?;
        let pool = self.pools.get_mut(&id).ok_or(Error::PoolNotFound(id))?;
        if count == 0 {
            return Ok(None);
        }

        let (stride, align) = match pool.indirection {
            Indirection::Pointer => (POINTER_SIZE, POINTER_SIZE),
            Indirection::Value => (self.types.size_of(pool.ty), self.types.align_of(pool.ty)),
        };
        if checked_bytes(count, stride).is_none() {
            return Err(Error::CapacityExceeded {
                what: "bytes",
                limit: MAX_BYTES,
            });
        }
        let tag = pool.allocate(count, stride, align);
        let block = &pool.tags.ensure(tag).block;
        self.addresses.insert(BlockRef {
            pool: id,
            tag,
            start: block.addr(),
            span: block.span(),
        });
        Ok(NonNull::new(block.as_ptr()))
    }

    /// Free a block previously returned by [`alloc`](Self::alloc). Null is a no-op.
    pub fn free<T>(&mut self, id: PoolId, ptr: *mut T) -> Result<()> {
        self.ensure_idle()?;
        if !self.pools.contains_key(&id) {
            return Err(Error::PoolNotFound(id));
        }
        if ptr.is_null() {
            return Ok(());
        }

        let addr = ptr.addr();
        let block = self
            .addresses
            .lookup(addr)
            .ok_or(Error::UnknownAddress(addr))?;
        if block.pool != id {
            return Err(Error::AddressNotInPool { addr, pool: id });
        }
        if block.start != addr {
            return Err(Error::NotBlockStart(addr));
        }

        self.addresses.remove(addr);
        if let Some(pool) = self.pools.get_mut(&id) {
            pool.unlink(block.tag);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Migration
    // ------------------------------------------------------------------

    /// Open a migration: compile every type and copy every migrating pool.
    ///
    /// Pending lists are validated first; on error nothing has changed.
    pub fn begin_migration(&mut self) -> Result<()> {
        self.ensure_idle()?;
        self.types.validate_pending()?;
        self.check_migrated_blocks()?;

        self.generation += 1;
        let generation = self.generation;
        self.types.compile_all(generation);

        let mut migrated = 0;
        for (&pool_id, pool) in self.pools.iter_mut() {
            if pool.indirection.is_pointer() {
                continue;
            }
            let Some(ty) = pool.ty.as_composite().and_then(|id| self.types.get(id)) else {
                continue;
            };
            if ty.is_sealed() {
                continue;
            }

            for tag in pool.migrate(&self.types, ty) {
                let block = &pool.tags.ensure(tag).block;
                self.addresses.insert(BlockRef {
                    pool: pool_id,
                    tag,
                    start: block.addr(),
                    span: block.span(),
                });
                migrated += 1;
            }
        }

        self.phase = Phase::Planning;
        log::debug!(
            "migration {generation} opened: {} types compiled, {migrated} blocks migrated",
            self.types.len()
        );
        Ok(())
    }

    /// Every block a migration reallocates must fit its new element size.
    fn check_migrated_blocks(&self) -> Result<()> {
        for pool in self.pools.values() {
            if pool.indirection.is_pointer() || self.types.is_fixed(pool.ty) {
                continue;
            }
            let Some(id) = pool.ty.as_composite() else {
                continue;
            };
            let (size, _) = self.types.pending_layout(id)?;
            let fits = pool
                .tags()
                .all(|(_, tag)| checked_bytes(tag.count().unwrap_or(0), size).is_some());
            if !fits {
                return Err(Error::CapacityExceeded {
                    what: "bytes",
                    limit: MAX_BYTES,
                });
            }
        }
        Ok(())
    }

    /// Translate an address allocated before the open migration.
    ///
    /// Null maps to null. Addresses in blocks that did not move map to
    /// themselves. An interior address maps to the start of its element.
    pub fn resolve<T>(&self, ptr: *mut T) -> Result<*mut T> {
        if self.phase != Phase::Planning {
            return Err(Error::MigrationNotOpen);
        }
        self.resolve_addr(ptr.cast())
            .map(|p| p.cast())
            .ok_or(Error::UnknownAddress(ptr.addr()))
    }

    fn resolve_addr(&self, ptr: *mut u8) -> Option<*mut u8> {
        if ptr.is_null() {
            return Some(ptr);
        }
        let block = self.addresses.lookup(ptr.addr())?;
        let pool = self.ensure_pool(block.pool);
        let tag = pool.tags.ensure(block.tag);
        let Some(forward) = tag.forward() else {
            return Some(ptr);
        };

        let index = match tag.stride {
            0 => 0,
            stride => (ptr.addr() - block.start) / stride,
        };
        let new = pool.tags.ensure(forward);
        Some(new.block.ptr_at(index * new.stride))
    }

    /// Close the migration: redirect every stored address, then release
    /// superseded blocks.
    pub fn end_migration(&mut self) -> Result<()> {
        if self.phase != Phase::Planning {
            return Err(Error::MigrationNotOpen);
        }

        let patches = self.collect_patches();
        let rewritten = patches.len();
        for (pool_id, tag, offset, target) in patches {
            if let Some(pool) = self.pools.get_mut(&pool_id) {
                pool.tags.ensure_mut(tag).block.write_ptr(offset, target);
            }
        }

        let mut released = 0;
        for pool in self.pools.values_mut() {
            for start in pool.release_superseded() {
                self.addresses.remove(start);
                released += 1;
            }
        }

        self.types.clear_diffs();
        self.phase = Phase::Idle;
        log::debug!(
            "migration {} closed: {rewritten} addresses redirected, {released} blocks released",
            self.generation
        );
        Ok(())
    }

    /// Every stored address in a live block that now lives elsewhere.
    fn collect_patches(&self) -> Vec<(PoolId, TagId, usize, *mut u8)> {
        let mut patches = Vec::new();
        for (&pool_id, pool) in &self.pools {
            let slots = pointer_slots(&self.types, pool.ty, pool.indirection);
            if slots.is_empty() {
                continue;
            }

            for (tag_id, tag) in pool.tags() {
                for index in 0..tag.count().unwrap_or(0) {
                    let base = index * tag.stride;
                    for &slot in &slots {
                        let offset = base + slot;
                        let old = tag.block.read_ptr(offset);
                        match self.resolve_addr(old) {
                            Some(new) if new != old => patches.push((pool_id, tag_id, offset, new)),
                            Some(_) => {}
                            None => log::warn!(
                                "pool {pool_id}: address {:#x} at offset {offset} was not \
                                 allocated by this model, left unchanged",
                                old.addr()
                            ),
                        }
                    }
                }
            }
        }
        patches
    }
}
