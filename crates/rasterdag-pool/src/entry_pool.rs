//! Buffer-set / entry-pool abstraction over [`crate::pool::PoolAllocator`].
//!
//! Pipelines often carry several concurrent intermediates at once (each
//! composite input, for instance). The entry pool owns a fixed array of
//! buffer slots; an [`ImageBufferSet`] is a handle collection that
//! borrows slots without duplication, so a slot is in at most one set at
//! a time.

use crate::error::{PoolError, Result};
use crate::pool::{PoolAllocator, PoolHandle};

/// A handle to one acquired slot in an [`EntryPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferSlotHandle {
    slot: usize,
}

impl BufferSlotHandle {
    /// The slot index this handle refers to.
    #[inline]
    pub fn slot(&self) -> usize {
        self.slot
    }
}

/// Owns a [`PoolAllocator`] plus a fixed array of slots tracking which
/// block-level allocation (if any) backs each slot.
#[derive(Debug)]
pub struct EntryPool {
    allocator: PoolAllocator,
    slots: Vec<Option<PoolHandle>>,
}

impl EntryPool {
    /// Creates an entry pool with `slot_count` slots over a bitmap
    /// allocator of `block_size`-byte blocks, `block_count` blocks total.
    pub fn new(block_size: usize, block_count: u32, slot_count: usize) -> Result<Self> {
        Ok(EntryPool {
            allocator: PoolAllocator::new(block_size, block_count)?,
            slots: vec![None; slot_count],
        })
    }

    /// Acquires a free slot and allocates at least `size` bytes for it.
    /// Returns `None` if no slot is free or no contiguous block run
    /// fits — a resource-exhaustion condition the caller propagates as
    /// render-result emptiness, not a hard error.
    pub fn acquire(&mut self, size: usize) -> Option<BufferSlotHandle> {
        let free_slot = self.slots.iter().position(|s| s.is_none())?;
        let handle = self.allocator.allocate(size)?;
        self.slots[free_slot] = Some(handle);
        Some(BufferSlotHandle { slot: free_slot })
    }

    /// Releases a slot, returning its backing memory to the allocator.
    /// Releasing an already-free slot is a protocol violation.
    pub fn release(&mut self, handle: BufferSlotHandle) -> Result<()> {
        let Some(pool_handle) = self.slots[handle.slot].take() else {
            return Err(rasterdag_core::Error::double_release(handle.slot).into());
        };
        self.allocator.deallocate(pool_handle)?;
        Ok(())
    }

    /// Borrows the bytes backing a live slot.
    pub fn bytes(&self, handle: BufferSlotHandle) -> Result<&[u8]> {
        let pool_handle = self.slots[handle.slot].ok_or(PoolError::StaleSlotHandle {
            slot: handle.slot,
        })?;
        Ok(self.allocator.bytes(pool_handle))
    }

    /// Mutably borrows the bytes backing a live slot.
    pub fn bytes_mut(&mut self, handle: BufferSlotHandle) -> Result<&mut [u8]> {
        let pool_handle = self.slots[handle.slot].ok_or(PoolError::StaleSlotHandle {
            slot: handle.slot,
        })?;
        Ok(self.allocator.bytes_mut(pool_handle))
    }
}

/// A collection of slot handles borrowed from one [`EntryPool`],
/// typically one per composite input, released together once the node
/// consuming them has produced its own output.
#[derive(Debug, Default)]
pub struct ImageBufferSet {
    handles: Vec<BufferSlotHandle>,
}

impl ImageBufferSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        ImageBufferSet::default()
    }

    /// Adds an acquired slot handle to the set.
    pub fn push(&mut self, handle: BufferSlotHandle) {
        self.handles.push(handle);
    }

    /// The handles currently held by this set.
    pub fn handles(&self) -> &[BufferSlotHandle] {
        &self.handles
    }

    /// Releases every handle in the set back to `pool`, stopping at the
    /// first error (leaving any remaining handles un-released so the
    /// caller can retry or report the specific failed slot).
    pub fn release_all(&mut self, pool: &mut EntryPool) -> Result<()> {
        while let Some(handle) = self.handles.pop() {
            pool.release(handle)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_and_release_roundtrip() {
        let mut pool = EntryPool::new(16, 8, 4).unwrap();
        let h = pool.acquire(32).unwrap();
        assert!(pool.bytes(h).is_ok());
        pool.release(h).unwrap();
        assert!(pool.bytes(h).is_err());
    }

    #[test]
    fn double_release_is_rejected() {
        let mut pool = EntryPool::new(16, 8, 2).unwrap();
        let h = pool.acquire(16).unwrap();
        pool.release(h).unwrap();
        let err = pool.release(h).unwrap_err();
        assert!(matches!(
            err,
            PoolError::Core(rasterdag_core::Error::DoubleRelease { .. })
        ));
    }

    #[test]
    fn no_free_slot_returns_none_even_with_room_in_allocator() {
        let mut pool = EntryPool::new(16, 8, 1).unwrap();
        let _h = pool.acquire(16).unwrap();
        assert!(pool.acquire(16).is_none());
    }

    #[test]
    fn buffer_set_releases_every_handle() {
        let mut pool = EntryPool::new(16, 8, 4).unwrap();
        let mut set = ImageBufferSet::new();
        set.push(pool.acquire(16).unwrap());
        set.push(pool.acquire(16).unwrap());
        set.release_all(&mut pool).unwrap();
        assert_eq!(pool.allocator.used_block_count(), 0);
    }
}
