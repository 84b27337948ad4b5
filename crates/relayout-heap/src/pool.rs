//! Allocation pools.
//!
//! A pool owns every block of one (type, indirection) pair as a doubly linked
//! list of tags. New blocks are linked at the head. While a migration is open
//! the pool holds a second list: the superseded tags, each forwarding to its
//! replacement in the live list.

use relayout_compiler::{Type, TypeTable};
use relayout_core::{Indirection, TypeRef};

use crate::migrate::apply_diffs;
use crate::tag::{Tag, TagArena, TagHeader, TagId};

#[derive(Debug)]
pub struct Pool {
    pub(crate) ty: TypeRef,
    pub(crate) indirection: Indirection,
    pub(crate) tags: TagArena,
    pub(crate) head: Option<TagId>,
    pub(crate) superseded: Option<TagId>,
}

/// Walks one linked list of tags.
pub struct Tags<'a> {
    arena: &'a TagArena,
    cur: Option<TagId>,
}

impl<'a> Iterator for Tags<'a> {
    type Item = (TagId, &'a Tag);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cur?;
        let tag = self.arena.ensure(id);
        self.cur = tag.next;
        Some((id, tag))
    }
}

impl Pool {
    pub(crate) fn new(ty: TypeRef, indirection: Indirection) -> Self {
        Self {
            ty,
            indirection,
            tags: TagArena::default(),
            head: None,
            superseded: None,
        }
    }

    pub fn ty(&self) -> TypeRef {
        self.ty
    }

    pub fn indirection(&self) -> Indirection {
        self.indirection
    }

    pub fn tag(&self, id: TagId) -> Option<&Tag> {
        self.tags.get(id)
    }

    /// Live tags, most recently allocated first.
    pub fn tags(&self) -> Tags<'_> {
        Tags {
            arena: &self.tags,
            cur: self.head,
        }
    }

    /// Tags replaced by the open migration.
    pub fn superseded_tags(&self) -> Tags<'_> {
        Tags {
            arena: &self.tags,
            cur: self.superseded,
        }
    }

    pub fn block_count(&self) -> usize {
        self.tags().count()
    }

    pub fn element_count(&self) -> usize {
        self.tags().filter_map(|(_, tag)| tag.count()).sum()
    }

    /// Link a fresh zeroed block of `count` elements at the head.
    pub(crate) fn allocate(&mut self, count: usize, stride: usize, align: usize) -> TagId {
        let mut tag = Tag::new(count, stride, align);
        tag.next = self.head;
        let id = self.tags.insert(tag);
        if let Some(old_head) = self.head {
            self.tags.ensure_mut(old_head).prev = Some(id);
        }
        self.head = Some(id);
        id
    }

    /// Unlink a live tag and hand it back to the caller.
    pub(crate) fn unlink(&mut self, id: TagId) -> Option<Tag> {
        let tag = self.tags.remove(id)?;
        match tag.prev {
            Some(prev) => self.tags.ensure_mut(prev).next = tag.next,
            None => self.head = tag.next,
        }
        if let Some(next) = tag.next {
            self.tags.ensure_mut(next).prev = tag.prev;
        }
        Some(tag)
    }

    /// Start addresses of every block, live and superseded.
    pub(crate) fn block_starts(&self) -> Vec<usize> {
        self.tags()
            .chain(self.superseded_tags())
            .map(|(_, tag)| tag.block.addr())
            .collect()
    }

    /// Release every block.
    pub(crate) fn clear(&mut self) {
        self.tags.clear();
        self.head = None;
        self.superseded = None;
    }

    /// Copy every live block into a new block laid out for `ty`'s current
    /// layout, leaving the old tags as forwarders.
    ///
    /// Returns the new tags in list order.
    pub(crate) fn migrate(&mut self, types: &TypeTable, ty: &Type) -> Vec<TagId> {
        let old: Vec<TagId> = self.tags().map(|(id, _)| id).collect();
        let mut fresh = Vec::with_capacity(old.len());

        for &old_id in &old {
            let old_tag = self.tags.ensure(old_id);
            let count = old_tag.count().unwrap_or(0);
            let stride = ty.size();
            let mut tag = Tag::new(count, stride, ty.align());
            let data = tag.block.as_mut_slice();
            for index in 0..count {
                let dst = &mut data[index * stride..(index + 1) * stride];
                apply_diffs(types, ty, old_tag.element(index), dst);
            }
            log::trace!(
                "migrated block {:#x} -> {:#x} ({count} x {} -> {} bytes)",
                old_tag.block.addr(),
                tag.block.addr(),
                old_tag.stride,
                stride
            );

            let new_id = self.tags.insert(tag);
            self.tags.ensure_mut(old_id).header = TagHeader::Forward(new_id);
            fresh.push(new_id);
        }

        for (i, &id) in fresh.iter().enumerate() {
            let tag = self.tags.ensure_mut(id);
            tag.prev = i.checked_sub(1).map(|p| fresh[p]);
            tag.next = fresh.get(i + 1).copied();
        }
        self.superseded = self.head;
        self.head = fresh.first().copied();
        fresh
    }

    /// Drop the superseded list, returning the start address of each block.
    pub(crate) fn release_superseded(&mut self) -> Vec<usize> {
        let mut released = Vec::new();
        let mut cur = self.superseded.take();
        while let Some(id) = cur {
            let tag = self.tags.remove(id);
            cur = tag.as_ref().and_then(|t| t.next);
            released.extend(tag.map(|t| t.block.addr()));
        }
        released
    }
}
